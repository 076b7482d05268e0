use clap::{Parser, Subcommand};
use s3_gallery::gallery::{self, GalleryStatus};
use s3_gallery::source::{self, ListingSource};
use s3_gallery::{config, listing, output};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Shared arguments for commands that read a listing.
#[derive(clap::Args, Clone)]
struct SourceArgs {
    /// Listing location: an http(s) URL, a file path, or `-` for stdin
    source: String,

    /// Resolve keys against this URL instead of the listing's own location
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Parser)]
#[command(name = "s3-gallery")]
#[command(about = "Turn an S3 bucket listing into an image gallery")]
#[command(long_about = "\
Turn an S3 bucket listing into an image gallery

Reads a ListBucketResult XML document and keeps the entries whose keys end
in .jpg, .jpeg, .png, .gif, .bmp or .webp, newest first.

Sources:

  s3-gallery list https://my-bucket.s3.amazonaws.com/      # fetch
  s3-gallery list saved-listing.xml                        # local file
  curl -s https://my-bucket.s3.amazonaws.com/ | s3-gallery list -   # stdin

Keys are joined onto the listing URL (minus a trailing listing file name
such as list.xml). Files and stdin have no URL of their own, so keys are
used as-is unless --base-url is given.

Logging goes to stderr; set RUST_LOG=debug to see skipped entries.

Run 's3-gallery gen-config' to generate a documented s3-gallery.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./s3-gallery.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved image list
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write a static gallery page
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Output HTML file
        #[arg(long, default_value = "gallery.html")]
        output: PathBuf,
    },
    /// Print a stock s3-gallery.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::List { source, json } => {
            let config = load_config(cli.config.as_deref())?;
            let acquired = acquire(&source, &config).await?;
            let (images, status) = GalleryStatus::classify(listing::parse_listing_document(
                &acquired.content,
                &acquired.source_url,
            ));
            report_status(status);

            if json {
                println!("{}", output::format_list_json(&images)?);
            } else {
                output::print_list_output(
                    &images,
                    &acquired.source_url,
                    acquired.kind,
                    status.message(),
                );
            }
        }
        Command::Build {
            source,
            output: output_path,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let acquired = acquire(&source, &config).await?;
            let (images, status) = GalleryStatus::classify(listing::parse_listing_document(
                &acquired.content,
                &acquired.source_url,
            ));
            report_status(status);

            let page = gallery::render_gallery(&images, &config, &acquired.source_url, status);
            gallery::write_gallery(&output_path, page)?;
            info!(path = %output_path.display(), images = images.len(), "gallery written");
            output::print_build_output(&output_path, images.len());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so `list --json` output stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<config::Config, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    Ok(config::load_config(path, &cwd)?)
}

async fn acquire(
    args: &SourceArgs,
    config: &config::Config,
) -> Result<source::Acquired, source::SourceError> {
    let listing_source = ListingSource::from_arg(&args.source);
    let acquired = source::acquire(&listing_source, &config.fetch).await?;
    Ok(acquired.with_base_url(args.base_url.as_deref()))
}

fn report_status(status: GalleryStatus) {
    if let Some(message) = status.message() {
        warn!("{}", message);
    }
}

//! Listing acquisition.
//!
//! A listing reaches the parser through one of three paths, each producing the
//! full document text plus the source URL keys are resolved against:
//!
//! | Argument | Kind | Source URL |
//! |----------|------|------------|
//! | `https://bucket.example.com/` | [`SourceKind::Fetch`] | the URL as given |
//! | `listing.xml` | [`SourceKind::Upload`] | `file://` URL of the canonical path |
//! | `-` | [`SourceKind::Input`] | `stdin:` |
//!
//! Only fetched listings carry a usable base. For the other two, pass
//! `--base-url` to say which bucket the keys belong to.
//!
//! Failures are reported once and never retried.

use crate::config::FetchConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use url::Url;

/// Source URL given to listings read from stdin. Yields no base.
pub const STDIN_SOURCE_URL: &str = "stdin:";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Request failure: HTTP {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a listing comes from, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    Url(String),
    File(PathBuf),
    Stdin,
}

impl ListingSource {
    /// `-` is stdin, `http://` / `https://` is a URL, anything else a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            return Self::Stdin;
        }
        let lower = arg.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(arg.to_string())
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

/// How the listing was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Fetch,
    Upload,
    Input,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Fetch => "fetch",
            Self::Upload => "upload",
            Self::Input => "input",
        })
    }
}

/// A fully read listing, ready for the parser.
#[derive(Debug, Clone)]
pub struct Acquired {
    pub content: String,
    pub source_url: String,
    pub kind: SourceKind,
}

impl Acquired {
    /// Replace the source URL keys are resolved against.
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(base) = base_url {
            self.source_url = base.to_string();
        }
        self
    }
}

/// Read the whole listing from its source.
pub async fn acquire(source: &ListingSource, fetch: &FetchConfig) -> Result<Acquired, SourceError> {
    match source {
        ListingSource::Url(url) => fetch_listing(url, fetch).await,
        ListingSource::File(path) => read_file(path).await,
        ListingSource::Stdin => read_stdin().await,
    }
}

async fn fetch_listing(url: &str, fetch: &FetchConfig) -> Result<Acquired, SourceError> {
    info!(%url, "fetching listing");
    let client = reqwest::Client::builder()
        .user_agent(fetch.user_agent.as_str())
        .timeout(Duration::from_secs(fetch.timeout_secs))
        .build()?;

    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }
    let content = resp.text().await?;
    debug!(bytes = content.len(), "listing fetched");

    Ok(Acquired {
        content,
        source_url: url.to_string(),
        kind: SourceKind::Fetch,
    })
}

async fn read_file(path: &std::path::Path) -> Result<Acquired, SourceError> {
    info!(path = %path.display(), "reading listing file");
    let bytes = tokio::fs::read(path).await?;
    let canonical = tokio::fs::canonicalize(path).await?;
    let source_url = Url::from_file_path(&canonical)
        .map(String::from)
        .unwrap_or_else(|()| canonical.display().to_string());

    Ok(Acquired {
        content: String::from_utf8_lossy(&bytes).into_owned(),
        source_url,
        kind: SourceKind::Upload,
    })
}

async fn read_stdin() -> Result<Acquired, SourceError> {
    info!("reading listing from stdin");
    let mut bytes = Vec::new();
    tokio::io::stdin().read_to_end(&mut bytes).await?;

    Ok(Acquired {
        content: String::from_utf8_lossy(&bytes).into_owned(),
        source_url: STDIN_SOURCE_URL.to_string(),
        kind: SourceKind::Input,
    })
}

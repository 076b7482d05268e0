//! Static gallery page generation.
//!
//! Renders the parsed image list as one self-contained HTML document:
//!
//! - **App bar** with the configured title
//! - **Status banner** when the listing produced nothing to show
//! - **Image grid**: `repeat(auto-fit, minmax(..))` tiles, one per image in
//!   listing order, each with a skeleton placeholder until its lazily-loaded
//!   image arrives and fades in
//! - **Preview dialog**: clicking a tile shows the full-size image; the
//!   backdrop or Escape closes it
//!
//! Styles and the ~30 lines of script are embedded at compile time from
//! `static/`. Image URLs are referenced, never downloaded.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) so every interpolated key, URL, and
//! title is escaped.

use crate::config::{self, Config};
use crate::listing::{ImageDescriptor, ListingError};
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub const NO_IMAGES_MESSAGE: &str = "No images found in the provided S3 list.";
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse the S3 file list.";

const CSS_STATIC: &str = include_str!("../static/gallery.css");
const JS: &str = include_str!("../static/gallery.js");

/// What the listing yielded, for the status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryStatus {
    Ready,
    /// Parsed, but no entry qualified.
    Empty,
    /// Not an XML document at all.
    Unparseable,
}

impl GalleryStatus {
    /// Split a parse result into the images to show and the banner state.
    pub fn classify(
        result: Result<Vec<ImageDescriptor>, ListingError>,
    ) -> (Vec<ImageDescriptor>, GalleryStatus) {
        match result {
            Ok(images) if images.is_empty() => (images, GalleryStatus::Empty),
            Ok(images) => (images, GalleryStatus::Ready),
            Err(_) => (Vec::new(), GalleryStatus::Unparseable),
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Ready => None,
            Self::Empty => Some(NO_IMAGES_MESSAGE),
            Self::Unparseable => Some(PARSE_FAILURE_MESSAGE),
        }
    }
}

/// Render the full gallery document.
///
/// `source` is shown as provenance only; image URLs are already resolved.
pub fn render_gallery(
    images: &[ImageDescriptor],
    config: &Config,
    source: &str,
    status: GalleryStatus,
) -> Markup {
    let css = format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_layout_css(&config.gallery),
        CSS_STATIC
    );

    let content = html! {
        header.app-bar {
            h1 { (config.gallery.title) }
        }
        main.container {
            p.source { "Source: " code { (source) } }
            @if let Some(message) = status.message() {
                div.alert role="alert" { (message) }
            }
            div.image-grid {
                @for (idx, image) in images.iter().enumerate() {
                    (render_tile(idx, image))
                }
            }
        }
        dialog.preview id="preview" {
            img id="preview-image" alt="";
        }
        script { (PreEscaped(JS)) }
    };

    base_document(&config.gallery.title, &css, content)
}

/// Write a rendered page, creating parent directories as needed.
pub fn write_gallery(path: &Path, page: Markup) -> Result<(), GalleryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, page.into_string())?;
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// One grid tile. Undated images carry no tooltip.
fn render_tile(idx: usize, image: &ImageDescriptor) -> Markup {
    let tooltip = (image.last_modified != DateTime::<Utc>::UNIX_EPOCH)
        .then(|| image.last_modified.format("%Y-%m-%d %H:%M UTC").to_string());

    html! {
        figure.tile {
            div.skeleton {}
            img src=(image.url) alt={ "img-" (idx) } title=[tooltip] loading="lazy";
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn render(images: &[ImageDescriptor], status: GalleryStatus) -> String {
        render_gallery(images, &Config::default(), "https://b.example.com/", status).into_string()
    }

    #[test]
    fn document_structure() {
        let html = render(&[], GalleryStatus::Ready);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>S3 Gallery</title>"));
        assert!(html.contains("app-bar"));
        assert!(html.contains("<dialog"));
        assert!(html.contains(r#"id="preview-image""#));
        assert!(html.contains("showModal"));
    }

    #[test]
    fn tiles_follow_given_order() {
        let images = vec![
            descriptor("https://b.example.com/new.jpg", "2024-02-01T00:00:00Z"),
            descriptor("https://b.example.com/old.jpg", "2020-02-01T00:00:00Z"),
        ];
        let html = render(&images, GalleryStatus::Ready);
        let new_at = html.find("new.jpg").unwrap();
        let old_at = html.find("old.jpg").unwrap();
        assert!(new_at < old_at);
        assert!(html.contains(r#"alt="img-0""#));
        assert!(html.contains(r#"alt="img-1""#));
        assert_eq!(html.matches(r#"loading="lazy""#).count(), 2);
    }

    #[test]
    fn dated_tiles_get_tooltip_undated_do_not() {
        let images = vec![
            descriptor("a.png", "2024-02-01T09:30:00Z"),
            ImageDescriptor {
                url: "b.png".into(),
                last_modified: DateTime::<Utc>::UNIX_EPOCH,
            },
        ];
        let html = render(&images, GalleryStatus::Ready);
        assert!(html.contains(r#"title="2024-02-01 09:30 UTC""#));
        assert_eq!(html.matches("title=\"").count(), 1);
    }

    #[test]
    fn ready_has_no_banner() {
        let images = vec![descriptor("a.png", "2024-02-01T00:00:00Z")];
        let html = render(&images, GalleryStatus::Ready);
        assert!(!html.contains(r#"role="alert""#));
    }

    #[test]
    fn empty_and_unparseable_banners_differ() {
        let empty = render(&[], GalleryStatus::Empty);
        assert!(empty.contains(NO_IMAGES_MESSAGE));
        let broken = render(&[], GalleryStatus::Unparseable);
        assert!(broken.contains(PARSE_FAILURE_MESSAGE));
        assert!(!broken.contains(NO_IMAGES_MESSAGE));
    }

    #[test]
    fn classify_maps_parse_results() {
        let (images, status) = GalleryStatus::classify(Ok(vec![]));
        assert!(images.is_empty());
        assert_eq!(status, GalleryStatus::Empty);

        let one = vec![descriptor("a.png", "2024-02-01T00:00:00Z")];
        let (images, status) = GalleryStatus::classify(Ok(one));
        assert_eq!(images.len(), 1);
        assert_eq!(status, GalleryStatus::Ready);

        let err = crate::listing::parse_listing_document("<<<", "").unwrap_err();
        let (images, status) = GalleryStatus::classify(Err(err));
        assert!(images.is_empty());
        assert_eq!(status, GalleryStatus::Unparseable);
    }

    #[test]
    fn config_drives_title_and_layout() {
        let mut config = Config::default();
        config.gallery.title = "Team Bucket".into();
        config.gallery.min_column_width = "180px".into();
        let html = render_gallery(&[], &config, "stdin:", GalleryStatus::Empty).into_string();
        assert!(html.contains("<title>Team Bucket</title>"));
        assert!(html.contains("--grid-min-column: 180px;"));
        assert!(html.contains("minmax(var(--grid-min-column), 1fr)"));
    }

    #[test]
    fn keys_and_title_are_escaped() {
        let mut config = Config::default();
        config.gallery.title = "<b>bold</b>".into();
        let images = vec![descriptor(r#"x"onerror="alert(1).png"#, "2024-02-01T00:00:00Z")];
        let html = render_gallery(&images, &config, "<src>", GalleryStatus::Ready).into_string();
        assert!(!html.contains("<b>bold</b>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains(r#""onerror=""#));
        assert!(html.contains("&lt;src&gt;"));
    }

    #[test]
    fn write_gallery_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out/nested/gallery.html");
        let page = render_gallery(&[], &Config::default(), "stdin:", GalleryStatus::Empty);
        write_gallery(&path, page).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains(NO_IMAGES_MESSAGE));
    }
}

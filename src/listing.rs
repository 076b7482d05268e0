//! Bucket listing parsing and image URL resolution.
//!
//! Turns an S3 `ListBucketResult` document into the ordered list of images the
//! gallery shows. Only two elements of each `<Contents>` entry are read:
//!
//! ```text
//! <ListBucketResult>
//!   <Contents>
//!     <Key>photos/2024/dawn.jpg</Key>               → url
//!     <LastModified>2024-05-01T06:12:00.000Z</LastModified>  → last_modified
//!     <Size>..</Size> <ETag>..</ETag> ...            (ignored)
//!   </Contents>
//!   <IsTruncated>..</IsTruncated>                    (ignored, no pagination)
//! </ListBucketResult>
//! ```
//!
//! ## Filtering
//!
//! An entry survives only if its `Key` is present, non-empty, and ends in one
//! of [`IMAGE_EXTENSIONS`] (compared case-insensitively).
//!
//! ## URL Resolution
//!
//! Keys are joined onto a base derived from the listing's source URL:
//!
//! | Source URL | Key | Image URL |
//! |------------|-----|-----------|
//! | `https://b.example.com/list.xml` | `a/b.png` | `https://b.example.com/a/b.png` |
//! | `https://b.example.com/prefix/` | `/x.png` | `https://b.example.com/prefix/x.png` |
//! | `stdin:` | `c.png` | `c.png` |
//!
//! Sources that are not absolute hierarchical URLs with a host (`blob:`,
//! `file:`, `stdin:`, plain text) produce no base, and keys pass through
//! verbatim.
//!
//! ## Ordering
//!
//! Newest first. Entries without a usable timestamp get the Unix epoch and
//! therefore sort last. The sort is stable, so entries with equal timestamps
//! keep document order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use roxmltree::{Document, Node, ParsingOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Key suffixes treated as images (without the leading dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// One image in the gallery, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Absolute URL, or the raw key when the source gave no base.
    pub url: String,
    /// `LastModified` of the object, or the Unix epoch when missing.
    pub last_modified: DateTime<Utc>,
}

/// A `<Contents>` element before filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingEntry {
    pub key: Option<String>,
    pub last_modified_raw: Option<String>,
}

/// Parse a listing into image descriptors, newest first.
///
/// Total over all inputs: a document that is not XML yields an empty list,
/// exactly like a listing with no qualifying images.
pub fn parse_listing(content: &str, source_url: &str) -> Vec<ImageDescriptor> {
    match parse_listing_document(content, source_url) {
        Ok(images) => images,
        Err(e) => {
            debug!(error = %e, "listing is not a parseable XML document");
            Vec::new()
        }
    }
}

/// Like [`parse_listing`], but reports a document that cannot be parsed.
pub fn parse_listing_document(
    content: &str,
    source_url: &str,
) -> Result<Vec<ImageDescriptor>, ListingError> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let doc = Document::parse_with_options(content, options)?;

    let base = base_url(source_url);
    let mut images: Vec<ImageDescriptor> = collect_entries(&doc)
        .into_iter()
        .filter_map(|entry| {
            let key = entry.key.filter(|k| !k.is_empty())?;
            if !is_image_key(&key) {
                debug!(key = %key, "skipping non-image key");
                return None;
            }
            Some(ImageDescriptor {
                url: resolve_url(&base, &key),
                last_modified: entry
                    .last_modified_raw
                    .as_deref()
                    .and_then(parse_timestamp)
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            })
        })
        .collect();

    // sort_by is stable: equal timestamps keep document order
    images.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    Ok(images)
}

/// Every `<Contents>` element at any depth, in document order.
pub fn collect_entries(doc: &Document) -> Vec<ListingEntry> {
    doc.descendants()
        .filter(|n| is_named(n, "Contents"))
        .map(|contents| ListingEntry {
            key: first_descendant_text(contents, "Key"),
            last_modified_raw: first_descendant_text(contents, "LastModified"),
        })
        .collect()
}

fn is_named(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// Concatenated text of the first descendant element called `name`.
fn first_descendant_text(node: Node, name: &str) -> Option<String> {
    node.descendants()
        .skip(1)
        .find(|n| is_named(n, name))
        .map(|found| {
            found
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect()
        })
}

/// Does the key end in `.<ext>` for a supported image extension?
pub fn is_image_key(key: &str) -> bool {
    key.rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Derive the base that keys are joined onto.
///
/// Returns origin + path without a trailing slash. A final path segment
/// ending in `.xml` names the listing document itself and is dropped, so a
/// listing saved at `/list.xml` resolves keys against its directory.
/// Returns an empty string when `source_url` is not an absolute URL with a
/// host.
pub fn base_url(source_url: &str) -> String {
    let Ok(parsed) = Url::parse(source_url) else {
        return String::new();
    };
    let origin = parsed.origin();
    if parsed.cannot_be_a_base() || !origin.is_tuple() {
        return String::new();
    }

    let mut path = parsed.path();
    if let Some((dir, last)) = path.rsplit_once('/') {
        let is_document = last
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("xml"));
        if is_document {
            path = dir;
        }
    }
    let path = path.strip_suffix('/').unwrap_or(path);
    format!("{}{}", origin.ascii_serialization(), path)
}

/// Join a key onto a base with exactly one slash; empty base keeps the key.
pub fn resolve_url(base: &str, key: &str) -> String {
    if base.is_empty() {
        return key.to_string();
    }
    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{}/{}", base, key.trim_start_matches('/'))
}

/// Parse a `LastModified` value.
///
/// Accepts RFC 3339 (what S3 emits), RFC 2822, and naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` / `YYYY-MM-DD` forms read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

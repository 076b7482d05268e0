//! CLI output formatting.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Source: https://bucket.example.com/ (fetch)
//! Images (2)
//! 001 https://bucket.example.com/2024/dawn.jpg
//!     Modified: 2024-05-01 06:12:00 UTC
//! 002 https://bucket.example.com/undated.png
//!     Modified: unknown
//! ```
//!
//! With `--json` the list is a JSON array of `{url, last_modified}` instead.
//!
//! ## Build
//!
//! ```text
//! Gallery → gallery.html (2 images)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::listing::ImageDescriptor;
use crate::source::SourceKind;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_modified(ts: &DateTime<Utc>) -> String {
    if *ts == DateTime::<Utc>::UNIX_EPOCH {
        "unknown".to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "image" } else { "images" }
}

// ============================================================================
// list
// ============================================================================

/// Format the resolved image list, one entity per index.
///
/// `status` is the banner message when nothing qualified, printed in place of
/// the entries.
pub fn format_list_output(
    images: &[ImageDescriptor],
    source_url: &str,
    kind: SourceKind,
    status: Option<&str>,
) -> Vec<String> {
    let mut lines = vec![
        format!("Source: {} ({})", source_url, kind),
        format!("Images ({})", images.len()),
    ];
    if let Some(message) = status {
        lines.push(format!("{}{}", indent(1), message));
    }
    for (i, image) in images.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), image.url));
        lines.push(format!(
            "{}Modified: {}",
            indent(1),
            format_modified(&image.last_modified)
        ));
    }
    lines
}

pub fn print_list_output(
    images: &[ImageDescriptor],
    source_url: &str,
    kind: SourceKind,
    status: Option<&str>,
) {
    for line in format_list_output(images, source_url, kind, status) {
        println!("{}", line);
    }
}

/// Pretty JSON array of descriptors.
pub fn format_list_json(images: &[ImageDescriptor]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(images)
}

// ============================================================================
// build
// ============================================================================

pub fn format_build_output(output: &Path, image_count: usize) -> Vec<String> {
    vec![format!(
        "Gallery → {} ({} {})",
        output.display(),
        image_count,
        plural(image_count)
    )]
}

pub fn print_build_output(output: &Path, image_count: usize) {
    for line in format_build_output(output, image_count) {
        println!("{}", line);
    }
}

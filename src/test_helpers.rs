//! Shared test utilities for the s3-gallery test suite.
//!
//! Builds bucket listing documents and extracts fields from parse results so
//! tests read as tables of keys and timestamps instead of XML blobs.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let xml = listing_xml(&[
//!     ("a/dawn.jpg", Some("2024-05-01T06:12:00.000Z")),
//!     ("notes.txt", None),
//! ]);
//! let images = parse_listing(&xml, "https://bucket.example.com/");
//! assert_eq!(urls(&images), vec!["https://bucket.example.com/a/dawn.jpg"]);
//! ```

use crate::listing::ImageDescriptor;

// =========================================================================
// Listing builders
// =========================================================================

/// Render a `ListBucketResult` with one `<Contents>` per `(key, last_modified)`.
///
/// `None` omits the `LastModified` element entirely.
pub fn listing_xml(entries: &[(&str, Option<&str>)]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\n\
         \x20 <Name>bucket</Name>\n\
         \x20 <IsTruncated>false</IsTruncated>\n",
    );
    for (key, last_modified) in entries {
        xml.push_str("  <Contents>\n");
        xml.push_str(&format!("    <Key>{key}</Key>\n"));
        if let Some(lm) = last_modified {
            xml.push_str(&format!("    <LastModified>{lm}</LastModified>\n"));
        }
        xml.push_str("    <Size>1024</Size>\n");
        xml.push_str("  </Contents>\n");
    }
    xml.push_str("</ListBucketResult>\n");
    xml
}

/// A descriptor with a parsed timestamp. Panics on an invalid timestamp.
pub fn descriptor(url: &str, last_modified: &str) -> ImageDescriptor {
    ImageDescriptor {
        url: url.to_string(),
        last_modified: crate::listing::parse_timestamp(last_modified)
            .unwrap_or_else(|| panic!("bad test timestamp '{last_modified}'")),
    }
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All image URLs in result order.
pub fn urls(images: &[ImageDescriptor]) -> Vec<&str> {
    images.iter().map(|i| i.url.as_str()).collect()
}

//! # S3 Gallery
//!
//! Browse the images in an object-storage bucket from its listing alone. Feed
//! it an S3 `ListBucketResult` document (by URL, from a file, or on stdin) and
//! it resolves every image key to a fetchable URL, newest first, then either
//! prints that list or writes a single static HTML gallery page.
//!
//! # Pipeline
//!
//! ```text
//! 1. Acquire   URL | file | stdin  →  (content, source URL)
//! 2. Parse     content + source URL →  Vec<ImageDescriptor>   (pure, total)
//! 3. Present   descriptors          →  text / JSON / gallery.html
//! ```
//!
//! Only stage 2 carries real logic, and it is a pure function: no I/O, no
//! shared state, safe to call from anywhere. Stage 1 is the only async part.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`listing`] | Listing parser: filters image keys, resolves URLs, sorts by recency |
//! | [`source`] | Stage 1: fetch by URL, read a local file, or read stdin |
//! | [`gallery`] | Stage 3: lazily-loaded grid with a full-size preview dialog, via Maud |
//! | [`config`] | `s3-gallery.toml` loading, validation, merging, and CSS generation |
//! | [`output`] | CLI output formatting for `list` and `build` |
//!
//! # Design Decisions
//!
//! ## Never Fail on Content
//!
//! Listings come from wherever the user found them. [`listing::parse_listing`]
//! therefore never errors: entries without a key or with a non-image key are
//! skipped, missing timestamps become the epoch, and a document that is not
//! XML yields an empty list. Callers that want to tell "not XML" apart from
//! "no images" use [`listing::parse_listing_document`].
//!
//! ## No Pagination
//!
//! One listing, one gallery. `IsTruncated` and continuation tokens are
//! ignored; fetch the next page yourself if you need it.
//!
//! ## Reference, Don't Copy
//!
//! The gallery page links to the bucket's objects. Nothing is downloaded or
//! re-encoded, so the page is only as available as the bucket.

pub mod config;
pub mod gallery;
pub mod listing;
pub mod output;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;

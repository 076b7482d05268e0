//! End-to-end: a saved bucket listing through acquisition, parsing, and
//! gallery rendering, using only the public API.

use s3_gallery::config::Config;
use s3_gallery::gallery::{self, GalleryStatus, NO_IMAGES_MESSAGE, PARSE_FAILURE_MESSAGE};
use s3_gallery::listing::{self, ImageDescriptor};
use s3_gallery::source::{self, ListingSource, SourceKind};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BUCKET_URL: &str = "https://holiday-photos.s3.amazonaws.com/";

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/listing.xml")
}

fn fixture() -> String {
    std::fs::read_to_string(fixture_path()).unwrap()
}

fn urls(images: &[ImageDescriptor]) -> Vec<&str> {
    images.iter().map(|i| i.url.as_str()).collect()
}

#[test]
fn fixture_resolves_newest_first() {
    let images = listing::parse_listing(&fixture(), BUCKET_URL);
    assert_eq!(
        urls(&images),
        vec![
            "https://holiday-photos.s3.amazonaws.com/2024/Harbour.JPEG",
            // same timestamp as sunset, earlier in the document
            "https://holiday-photos.s3.amazonaws.com/2023/beach.jpg",
            "https://holiday-photos.s3.amazonaws.com/2023/sunset.webp",
            // no LastModified
            "https://holiday-photos.s3.amazonaws.com/scans/old-map.gif",
        ]
    );
    assert_eq!(images[1].last_modified, images[2].last_modified);
    assert_eq!(images[3].last_modified.timestamp(), 0);
}

#[test]
fn fixture_saved_as_xml_file_resolves_against_its_directory() {
    let images = listing::parse_listing(
        &fixture(),
        "https://holiday-photos.s3.amazonaws.com/exports/list.xml?v=2",
    );
    assert_eq!(
        images[0].url,
        "https://holiday-photos.s3.amazonaws.com/exports/2024/Harbour.JPEG"
    );
}

#[tokio::test]
async fn uploaded_file_keeps_keys_unless_base_given() {
    let config = Config::default();

    let acquired = source::acquire(&ListingSource::File(fixture_path()), &config.fetch)
        .await
        .unwrap();
    assert_eq!(acquired.kind, SourceKind::Upload);
    let verbatim = listing::parse_listing(&acquired.content, &acquired.source_url);
    assert_eq!(verbatim[0].url, "2024/Harbour.JPEG");

    let rebased = acquired.with_base_url(Some(BUCKET_URL));
    let resolved = listing::parse_listing(&rebased.content, &rebased.source_url);
    assert_eq!(
        resolved[0].url,
        "https://holiday-photos.s3.amazonaws.com/2024/Harbour.JPEG"
    );
}

#[test]
fn build_writes_gallery_page() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("site/gallery.html");

    let (images, status) =
        GalleryStatus::classify(listing::parse_listing_document(&fixture(), BUCKET_URL));
    assert_eq!(status, GalleryStatus::Ready);

    let page = gallery::render_gallery(&images, &Config::default(), BUCKET_URL, status);
    gallery::write_gallery(&out, page).unwrap();

    let html = std::fs::read_to_string(&out).unwrap();
    assert_eq!(html.matches(r#"class="tile""#).count(), 4);
    assert!(html.contains(r#"src="https://holiday-photos.s3.amazonaws.com/2023/beach.jpg""#));
    assert!(!html.contains("README.txt"));
}

#[test]
fn empty_and_broken_listings_build_with_banners() {
    let empty = "<ListBucketResult><Name>b</Name></ListBucketResult>";
    let (images, status) =
        GalleryStatus::classify(listing::parse_listing_document(empty, BUCKET_URL));
    let html = gallery::render_gallery(&images, &Config::default(), BUCKET_URL, status)
        .into_string();
    assert!(html.contains(NO_IMAGES_MESSAGE));

    let (images, status) = GalleryStatus::classify(listing::parse_listing_document(
        "not xml at all <<<",
        BUCKET_URL,
    ));
    let html = gallery::render_gallery(&images, &Config::default(), BUCKET_URL, status)
        .into_string();
    assert!(html.contains(PARSE_FAILURE_MESSAGE));
    // both cases look identical through the total parser
    assert!(listing::parse_listing("not xml at all <<<", BUCKET_URL).is_empty());
    assert!(listing::parse_listing(empty, BUCKET_URL).is_empty());
}

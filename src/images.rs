//! Image tracking for TEXT sections.
//!
//! Section HTML is scanned for image tags, each referenced image is fetched
//! and hashed, and the resulting records are reconciled against the
//! previously known set by content hash. Hash is the durable identity:
//! upstream renames images freely between course versions while the bytes
//! stay identical, so a matching hash means "same image, new path".
//!
//! An image that can't be fetched is skipped with a logged error rather than
//! failing the section; a missing image entry just gets picked up again on
//! the next sync.

use crate::api::CourseApi;
use crate::console::Console;
use crate::error::ApiError;
use crate::structure::ImageRecord;
use scraper::{Html, Selector};
use sha2::{Digest, Sha256};

/// Extracts image references (src attributes) from section HTML, in document
/// order.
///
/// Only image tags with both a source and an alt attribute are tracked;
/// alt-less markup is decorative.
pub fn extract_image_refs(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("img[src][alt]").expect("Invalid image selector");

    doc.select(&selector)
        .filter_map(|elem| elem.value().attr("src"))
        .map(|src| src.to_string())
        .collect()
}

/// Hex-encoded SHA-256 of raw image bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Resolves an image reference into an absolute fetch URL.
fn resolve_image_url(image_base_url: &str, reference: &str) -> Result<String, ApiError> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Ok(reference.to_string());
    }

    let base = url::Url::parse(image_base_url)
        .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", image_base_url, e)))?;

    base.join(reference)
        .map(|u| u.to_string())
        .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", reference, e)))
}

/// Returns the basename of an image reference.
fn basename(reference: &str) -> String {
    reference
        .rsplit('/')
        .next()
        .unwrap_or(reference)
        .to_string()
}

/// Builds the image records for one section.
///
/// Each reference in `html` is fetched and hashed. A hash already seen in
/// this run only refreshes the path of the record built earlier; a hash known
/// from the previous sync reuses that record (titles included) with the path
/// refreshed; anything else becomes a fresh record with empty titles.
pub async fn resolve_images(
    html: &str,
    known: &[ImageRecord],
    image_base_url: &str,
    api: &dyn CourseApi,
    console: &Console,
) -> Vec<ImageRecord> {
    let mut result: Vec<ImageRecord> = Vec::new();

    for reference in extract_image_refs(html) {
        let url = match resolve_image_url(image_base_url, &reference) {
            Ok(url) => url,
            Err(e) => {
                console.error(&format!("Skipping image with bad reference: {}", e));
                continue;
            }
        };

        let bytes = match api.image_bytes(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                console.error(&format!("Skipping unreachable image {}: {}", url, e));
                continue;
            }
        };

        let hash = content_hash(&bytes);

        // Duplicate within this section: the latest reference wins the path.
        if let Some(existing) = result.iter_mut().find(|r| r.hash == hash) {
            existing.path = reference;
            continue;
        }

        if let Some(old) = known.iter().find(|r| r.hash == hash) {
            let mut record = old.clone();
            record.path = reference;
            result.push(record);
            continue;
        }

        result.push(ImageRecord {
            filename: basename(&reference),
            path: reference,
            hash,
            title_ru: String::new(),
            title_en: String::new(),
        });
    }

    result
}

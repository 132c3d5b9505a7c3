//! Unifies the three ways callers name an item — media key, dedup key,
//! or local file path — into whichever key an endpoint accepts.

use std::path::Path;
use std::sync::LazyLock;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use regex::Regex;

use crate::client::PhotosClient;
use crate::error::{PhotosError, Result};
use crate::util;

/// Dedup keys are the URL-safe base64 form of a 20-byte SHA-1 digest:
/// exactly 27 characters, no padding.
pub static DEDUP_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{27}$").expect("static pattern"));

pub fn is_dedup_key(input: &str) -> bool {
    DEDUP_KEY_PATTERN.is_match(input)
}

/// Encodes a raw SHA-1 digest as a dedup key.
pub fn sha1_to_dedup_key(hash: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(hash)
}

/// Decodes a dedup key back to the raw digest; anything that does not
/// decode to exactly 20 bytes is rejected.
pub fn dedup_key_to_sha1(key: &str) -> Result<[u8; 20]> {
    let bytes = URL_SAFE_NO_PAD
        .decode(key)
        .map_err(|e| PhotosError::Input(format!("invalid dedup key: {e}")))?;
    bytes
        .try_into()
        .map_err(|_| PhotosError::Input("dedup key does not encode a SHA-1 digest".into()))
}

impl PhotosClient {
    /// Resolves input for endpoints that accept a media key or a dedup
    /// key interchangeably: dedup keys pass through, existing files are
    /// hashed into a dedup key, anything else is assumed to already be a
    /// media key.
    pub async fn resolve_item_key(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Err(PhotosError::Input("item key or file path is required".into()));
        }
        if is_dedup_key(input) {
            return Ok(input.to_string());
        }
        if Path::new(input).exists() {
            let hash = util::sha1_file(Path::new(input)).await?;
            return Ok(sha1_to_dedup_key(&hash));
        }
        Ok(input.to_string())
    }

    /// Resolves input for endpoints that require a true media key: dedup
    /// keys and file paths go through a hash lookup, and an empty lookup
    /// result is a `NotFound` error.
    pub async fn resolve_media_key(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Err(PhotosError::Input("item key or file path is required".into()));
        }

        if is_dedup_key(input) {
            let hash = dedup_key_to_sha1(input)?;
            let media_key = self.find_media_by_hash(&hash).await?;
            if media_key.is_empty() {
                return Err(PhotosError::NotFound(format!(
                    "no library item for dedup key {input}"
                )));
            }
            return Ok(media_key);
        }

        if Path::new(input).exists() {
            let hash = util::sha1_file(Path::new(input)).await?;
            let media_key = self.find_media_by_hash(&hash).await?;
            if media_key.is_empty() {
                return Err(PhotosError::NotFound(format!(
                    "file {input} is not in the library"
                )));
            }
            return Ok(media_key);
        }

        Ok(input.to_string())
    }
}

//! Album operations.

use std::sync::LazyLock;

use regex::Regex;

use crate::client::{PhotosClient, RequestOptions};
use crate::error::{PhotosError, Result};
use crate::proto;

const CREATE_ALBUM_PATH: &str = "/6439526531001121323/8386163971075832964";
const ADD_TO_ALBUM_PATH: &str = "/6439526531001121323/2317171406655703421";
const RENAME_ALBUM_PATH: &str = "/6439526531001121323/669247368986085882";
const DELETE_ALBUM_PATH: &str = "/6439526531001121323/1508186792518960932";

/// Album keys look like `AF1QipOTAHAvdvLHVyvBNXPZy_93ArwuxfW9dATmqi8T`;
/// anything else is treated as a free-form album name.
pub static ALBUM_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^AF1Qip[A-Za-z0-9_-]{32,44}$").expect("static pattern"));

pub fn is_album_key(input: &str) -> bool {
    ALBUM_KEY_PATTERN.is_match(input)
}

fn standard_options() -> RequestOptions {
    RequestOptions::new().auth().common_headers().check_status()
}

impl PhotosClient {
    /// Creates an album, optionally seeded with media, and returns the
    /// new album key.
    pub async fn create_album(&self, name: &str, media_keys: &[String]) -> Result<String> {
        let (model, make, api_version) = self.device_info();
        let request = proto::CreateAlbumRequest {
            name: name.to_string(),
            media_keys: media_keys.to_vec(),
            device: Some(proto::DeviceSpec {
                model,
                make: make.to_string(),
                android_api_version: api_version,
            }),
        };

        let response: proto::CreateAlbumResponse = self
            .do_proto_request(
                &self.data_url(CREATE_ALBUM_PATH),
                &request,
                standard_options(),
            )
            .await?;

        let album_key = response
            .album
            .map(|a| a.album_key)
            .unwrap_or_default();
        if album_key.is_empty() {
            return Err(PhotosError::Protocol(
                "create album reply missing album key".into(),
            ));
        }
        Ok(album_key)
    }

    /// Adds media items to an existing album.
    pub async fn add_media_to_album(&self, album_key: &str, media_keys: &[String]) -> Result<()> {
        let request = proto::AddToAlbumRequest {
            album_key: album_key.to_string(),
            media_keys: media_keys.to_vec(),
        };
        self.do_proto_send(
            &self.data_url(ADD_TO_ALBUM_PATH),
            &request,
            standard_options(),
        )
        .await
    }

    /// Renames an album.
    pub async fn rename_album(&self, album_key: &str, name: &str) -> Result<()> {
        let request = proto::RenameAlbumRequest {
            album_key: album_key.to_string(),
            name: name.to_string(),
        };
        self.do_proto_send(
            &self.data_url(RENAME_ALBUM_PATH),
            &request,
            standard_options(),
        )
        .await
    }

    /// Deletes an album (the media stays in the library).
    pub async fn delete_album(&self, album_key: &str) -> Result<()> {
        let request = proto::DeleteAlbumRequest {
            album_key: album_key.to_string(),
        };
        self.do_proto_send(
            &self.data_url(DELETE_ALBUM_PATH),
            &request,
            standard_options(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn album_key_pattern() {
        assert!(is_album_key("AF1QipOTAHAvdvLHVyvBNXPZy_93ArwuxfW9dATmqi8T"));
        assert!(!is_album_key("Holiday 2024"));
        assert!(!is_album_key("AF1Qip"));
        // dedup keys must not be mistaken for album keys
        assert!(!is_album_key("L9ThxnotKPzthJ7hu3bnORuT6xI"));
    }
}

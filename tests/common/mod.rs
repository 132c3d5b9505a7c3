#![allow(dead_code)]

use std::sync::Arc;

use gphotos_sdk::{ClientConfig, MemoryTokenCache, PhotosClient, TokenCache};
use wiremock::MockServer;

pub const CREDS: &str = "androidId=3abc&app=com.google.android.apps.photos&client_sig=38918a453d07199354f8b19af05ec6562ced5788&Email=user%40gmail.com&Token=aas_et%2Fxyz&lang=en&service=oauth2%3Ahttps%3A%2F%2Fwww.googleapis.com%2Fauth%2Fphotos";

pub const HASH_LOOKUP_PATH: &str = "/6439526531001121323/5084965799730810217";
pub const COMMIT_UPLOAD_PATH: &str = "/6439526531001121323/16538846908252377752";
pub const INTERACTIVE_UPLOAD_PATH: &str = "/data/upload/uploadmedia/interactive";
pub const TRASH_ACTION_PATH: &str = "/6439526531001121323/17490284929287180316";
pub const SET_CAPTION_PATH: &str = "/6439526531001121323/1552790390512470739";
pub const SET_FAVOURITE_PATH: &str = "/6439526531001121323/5144645502632292153";
pub const LIBRARY_STATE_PATH: &str = "/6439526531001121323/18047484249733410717";
pub const DOWNLOAD_INFO_PATH: &str =
    "/$rpc/social.frontend.photos.preparedownloaddata.v1.PhotosPrepareDownloadDataService/PhotosPrepareDownload";

/// Client pointed at the mock server with a pre-seeded bearer token, so
/// data-plane tests skip the exchange round-trip.
pub fn authed_client(server: &MockServer) -> Arc<PhotosClient> {
    let cache = Arc::new(MemoryTokenCache::new());
    cache.set("test-token", 9_999_999_999);

    Arc::new(
        PhotosClient::new(ClientConfig {
            auth_data: CREDS.to_string(),
            token_cache: Some(cache),
            auth_url: Some(format!("{}/auth", server.uri())),
            data_base_url: Some(server.uri()),
            upload_base_url: Some(server.uri()),
            ..ClientConfig::default()
        })
        .unwrap(),
    )
}

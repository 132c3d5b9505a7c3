//! Unofficial client for the Google Photos mobile RPC protocol.
//!
//! Speaks the length-delimited binary protocol of the Android app over
//! HTTPS: content-addressed upload with server-side dedup, download,
//! library enumeration, and metadata mutation on behalf of a signed-in
//! account. Authentication consumes a pre-obtained long-lived credential
//! string and manages the short-lived bearer token itself.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gphotos_sdk::{ClientConfig, PhotosClient, UploadOptions};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> gphotos_sdk::Result<()> {
//!     let client = Arc::new(PhotosClient::new(ClientConfig::new(auth_data))?);
//!
//!     let mut events = client.upload(
//!         "/photos/2024",
//!         UploadOptions { workers: 3, recursive: true, ..Default::default() },
//!         CancellationToken::new(),
//!     );
//!     while let Some(event) = events.recv().await {
//!         println!("{:?} {:?}", event.path, event.status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod albums;
pub mod auth;
pub mod client;
pub mod download;
pub mod error;
pub mod library;
pub mod media;
pub mod proto;
pub mod resolver;
pub mod types;
pub mod upload;
pub mod util;
pub mod wire;

pub use auth::{Credentials, MemoryTokenCache, TokenCache};
pub use client::{ClientConfig, PhotosClient, RequestOptions};
pub use error::{PhotosError, Result};
pub use library::parse_library_response;
pub use media::TrashAction;
pub use resolver::{dedup_key_to_sha1, is_dedup_key, sha1_to_dedup_key};
pub use types::{
    Album, DownloadInfo, LibraryResponse, MediaItem, Quality, UploadEvent, UploadOptions,
    UploadStatus,
};

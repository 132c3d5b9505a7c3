use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PhotosError;

/// Upload quality tier. The server infers the tier from the device model
/// declared at commit time, so this maps onto a model/code pair there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quality {
    #[default]
    Original,
    StorageSaver,
}

/// State of a single file as it moves through the upload pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Hashing,
    Checking,
    Uploading,
    Finalizing,
    Completed,
    /// Hash already present in the library; nothing was uploaded.
    Skipped,
    Failed,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Hashing => "hashing",
            UploadStatus::Checking => "checking",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Finalizing => "finalizing",
            UploadStatus::Completed => "completed",
            UploadStatus::Skipped => "skipped",
            UploadStatus::Failed => "failed",
        }
    }

    /// True for the states a file can end in.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadStatus::Completed | UploadStatus::Skipped | UploadStatus::Failed
        )
    }
}

/// Status update emitted by the upload pipeline.
///
/// The first event of a batch carries only `total` (no status); every
/// event after that has a status and, once known, the dedup key.
#[derive(Debug, Default)]
pub struct UploadEvent {
    pub path: PathBuf,
    pub status: Option<UploadStatus>,
    pub media_key: String,
    pub dedup_key: String,
    pub error: Option<PhotosError>,
    pub worker_id: usize,
    /// Total files in the batch; non-zero only on the first event.
    pub total: usize,
}

/// Runtime options for an upload batch.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Worker count; values below 1 are treated as 1 and the pool never
    /// exceeds the number of files.
    pub workers: usize,
    pub recursive: bool,
    /// Skip the dedup lookup and upload even if the hash is known.
    pub force_upload: bool,
    /// Remove the source file after a successful upload or dedup skip.
    pub delete_from_host: bool,
    /// Accept any file, not just the supported photo/video extensions.
    pub disable_filter: bool,
    pub caption: String,
    pub favourite: bool,
    pub archive: bool,
    /// Override the client default quality for this batch.
    pub quality: Option<Quality>,
    pub use_quota: bool,
}

/// Download information for a media item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadInfo {
    pub filename: String,
    pub file_size: i64,
    pub is_edited: bool,
    /// Preferred URL: the original if available, otherwise the edited one.
    pub download_url: String,
    pub original_url: String,
    pub edited_url: String,
}

/// Parsed library enumeration reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryResponse {
    pub media_items: Vec<MediaItem>,
    pub albums: Vec<Album>,
    /// Opaque cursor carried across state-refresh calls.
    pub state_token: String,
    /// Non-empty iff more pages exist.
    pub page_token: String,
}

/// A single media item projected out of the library tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaItem {
    pub media_key: String,
    pub filename: String,
    pub caption: String,
    pub creation_timestamp: i64,
    pub file_size: i64,
    pub width: u32,
    pub height: u32,
    pub is_video: bool,
    pub is_in_trash: bool,
    pub trashed_at: i64,
    pub album_media_key: String,
    pub download_url: String,
    pub thumbnail_url: String,
    pub dedup_key: String,
}

/// An album projected out of the library tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Album {
    pub album_key: String,
    pub name: String,
    pub item_count: i64,
    pub cover_key: String,
}

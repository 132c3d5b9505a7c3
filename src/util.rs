//! Local file helpers: streaming SHA-1, the supported-format filter, and
//! upload candidate collection.

use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};
use tokio::io::AsyncReadExt;

use crate::error::Result;

/// Photo formats the service accepts.
pub const SUPPORTED_PHOTO_EXTENSIONS: [&str; 20] = [
    "avif", "bmp", "gif", "heic", "ico", "jpg", "jpeg", "png", "tiff", "webp", "cr2", "cr3",
    "nef", "arw", "orf", "raf", "rw2", "pef", "sr2", "dng",
];

/// Video formats the service accepts.
pub const SUPPORTED_VIDEO_EXTENSIONS: [&str; 19] = [
    "3gp", "3g2", "asf", "avi", "divx", "m2t", "m2ts", "m4v", "mkv", "mmv", "mod", "mov", "mp4",
    "mpg", "mpeg", "mts", "tod", "wmv", "ts",
];

const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Computes the SHA-1 digest of a file, streaming it in fixed-size
/// chunks. Every chunk boundary is an await point, so dropping the
/// future cancels the hash cleanly.
pub async fn sha1_file(path: &Path) -> Result<[u8; 20]> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha1::new();
    let mut chunk = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let n = file.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        hasher.update(&chunk[..n]);
    }

    Ok(hasher.finalize().into())
}

/// True when the file's extension is in the supported photo or video set.
pub fn is_supported_media(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    SUPPORTED_PHOTO_EXTENSIONS.contains(&ext.as_str())
        || SUPPORTED_VIDEO_EXTENSIONS.contains(&ext.as_str())
}

/// Resolves an upload path to the list of candidate files: a single file
/// as-is, a directory scanned (optionally recursively), then filtered to
/// supported formats unless the filter is disabled.
pub async fn collect_supported_files(
    path: &Path,
    recursive: bool,
    disable_filter: bool,
) -> Result<Vec<PathBuf>> {
    let meta = tokio::fs::metadata(path).await?;

    let mut files = Vec::new();
    if meta.is_dir() {
        let mut pending = vec![path.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let entry_path = entry.path();
                if entry.file_type().await?.is_dir() {
                    if recursive {
                        pending.push(entry_path);
                    }
                } else {
                    files.push(entry_path);
                }
            }
        }
        files.sort();
    } else {
        files.push(path.to_path_buf());
    }

    if !disable_filter {
        files.retain(|f| is_supported_media(f));
    }
    Ok(files)
}

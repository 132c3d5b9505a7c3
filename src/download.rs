//! Download-side operations: the prepare-download RPC, streaming
//! thumbnails, and the download-to-file helpers.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use percent_encoding::percent_decode_str;
use tokio::io::AsyncWriteExt;

use crate::client::{PhotosClient, RequestOptions};
use crate::error::{PhotosError, Result};
use crate::proto;
use crate::types::DownloadInfo;

const DOWNLOAD_INFO_PATH: &str =
    "/$rpc/social.frontend.photos.preparedownloaddata.v1.PhotosPrepareDownloadDataService/PhotosPrepareDownload";
const THUMBNAIL_PATH: &str = "/6439526531001121323/929371161542873203";

impl PhotosClient {
    /// Fetches download metadata for a media item. The preferred
    /// `download_url` is the original when available, otherwise the
    /// edited rendition; neither being present is an error.
    pub async fn get_download_info(&self, media_key: &str) -> Result<DownloadInfo> {
        let request = proto::DownloadInfoRequest {
            target: Some(proto::DownloadTarget {
                item: Some(proto::DownloadItemRef {
                    media_key: media_key.to_string(),
                }),
            }),
            spec: Some(proto::DownloadSpec {
                f1: Some(proto::DownloadSpecMeta {
                    f7: Some(proto::DownloadSpecMetaInner {
                        f2: Some(proto::Empty {}),
                    }),
                }),
                f5: Some(proto::DownloadSpecUrls {
                    f2: Some(proto::Empty {}),
                    f3: Some(proto::Empty {}),
                    f5: Some(proto::DownloadSpecUrlsInner {
                        f1: Some(proto::Empty {}),
                        f3: 0,
                    }),
                }),
            }),
        };

        let response: proto::DownloadInfoResponse = self
            .do_proto_request(
                &self.data_url(DOWNLOAD_INFO_PATH),
                &request,
                RequestOptions::new().auth().common_headers().check_status(),
            )
            .await?;

        let mut info = DownloadInfo::default();
        if let Some(result) = &response.result {
            if let Some(metadata) = &result.metadata {
                info.filename = metadata.filename.clone();
                info.file_size = metadata.file_size;
            }
            if let Some(urls) = &result.urls {
                info.is_edited = urls.is_edited > 0;
                if let Some(pair) = &urls.download_urls {
                    info.original_url = pair.original_url.clone();
                    info.edited_url = pair.edited_url.clone();
                } else if let Some(fallback) = &urls.fallback {
                    info.original_url = fallback.download_url.clone();
                }
            }
        }

        info.download_url = if !info.original_url.is_empty() {
            info.original_url.clone()
        } else {
            info.edited_url.clone()
        };
        if info.download_url.is_empty() {
            return Err(PhotosError::Protocol("no download URL available".into()));
        }

        Ok(info)
    }

    /// Fetches a thumbnail as an open byte stream; dropping the response
    /// closes it.
    pub async fn get_thumbnail(
        &self,
        media_key: &str,
        width: i32,
        height: i32,
        force_jpeg: bool,
        no_overlay: bool,
    ) -> Result<reqwest::Response> {
        let request = proto::ThumbnailRequest {
            target: Some(proto::ThumbnailTarget {
                media_key: media_key.to_string(),
            }),
            width,
            height,
            force_jpeg: force_jpeg as i32,
            no_overlay: no_overlay as i32,
        };

        self.do_request_stream(
            &self.data_url(THUMBNAIL_PATH),
            prost::Message::encode_to_vec(&request),
            RequestOptions::new().auth().common_headers().check_status(),
        )
        .await
    }

    /// Downloads a URL to disk. The filename is taken from, in order:
    /// the caller, the Content-Disposition header, the last dotted URL
    /// path segment, or the literal `download`.
    pub async fn download_file(
        &self,
        url: &str,
        output: &Path,
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(PhotosError::Api {
                message: "download failed".into(),
                status: response.status().as_u16(),
            });
        }

        let mut name = filename.unwrap_or("").to_string();
        if name.is_empty() {
            name = response
                .headers()
                .get(reqwest::header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok())
                .map(filename_from_content_disposition)
                .unwrap_or_default();
        }
        if name.is_empty() {
            name = filename_from_url(url);
        }
        if name.is_empty() {
            name = "download".to_string();
        }

        let target = resolve_output_path(output, &name).await?;
        write_stream_to_file(response, &target).await?;
        Ok(target)
    }

    /// Downloads a media item using its preferred URL.
    pub async fn download_media(&self, media_key: &str, output: &Path) -> Result<PathBuf> {
        let info = self.get_download_info(media_key).await?;
        let filename = (!info.filename.is_empty()).then_some(info.filename.as_str());
        self.download_file(&info.download_url, output, filename).await
    }

    /// Downloads a thumbnail to disk as `<media_key>.jpg`.
    pub async fn download_thumbnail(
        &self,
        media_key: &str,
        width: i32,
        height: i32,
        force_jpeg: bool,
        no_overlay: bool,
        output: &Path,
    ) -> Result<PathBuf> {
        let response = self
            .get_thumbnail(media_key, width, height, force_jpeg, no_overlay)
            .await?;
        let target = resolve_output_path(output, &format!("{media_key}.jpg")).await?;
        write_stream_to_file(response, &target).await?;
        Ok(target)
    }
}

/// Pulls a filename out of a Content-Disposition header, handling both
/// the RFC 5987 `filename*=charset''encoded` form and the quoted
/// `filename=` form.
pub(crate) fn filename_from_content_disposition(header: &str) -> String {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("filename*=") {
            if let Some(idx) = value.find("''") {
                let encoded = &value[idx + 2..];
                return percent_decode_str(encoded)
                    .decode_utf8()
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| encoded.to_string());
            }
        } else if let Some(value) = part.strip_prefix("filename=") {
            return value.trim_matches('"').to_string();
        }
    }
    String::new()
}

/// Last non-empty URL path segment containing a dot, or "".
pub(crate) fn filename_from_url(raw: &str) -> String {
    let Ok(parsed) = url::Url::parse(raw) else {
        return String::new();
    };
    for segment in parsed.path().rsplit('/') {
        if !segment.is_empty() && segment.contains('.') {
            return segment.to_string();
        }
    }
    String::new()
}

/// Resolves where the downloaded bytes land: an existing directory gets
/// the filename joined on, a missing path becomes the target file (with
/// parents created), anything else is used as-is.
pub(crate) async fn resolve_output_path(output: &Path, filename: &str) -> Result<PathBuf> {
    if output.as_os_str().is_empty() {
        return Ok(PathBuf::from(filename));
    }

    match tokio::fs::metadata(output).await {
        Ok(meta) if meta.is_dir() => Ok(output.join(filename)),
        Ok(_) => Ok(output.to_path_buf()),
        Err(_) => {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            Ok(output.to_path_buf())
        }
    }
}

async fn write_stream_to_file(response: reqwest::Response, target: &Path) -> Result<()> {
    let mut file = tokio::fs::File::create(target).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}

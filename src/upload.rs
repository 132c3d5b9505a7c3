//! Content-addressed upload: the dedup lookup, the three-phase upload
//! RPCs, and the batch pipeline that drives them through a worker pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Method;
use tokio::sync::mpsc;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::client::{PhotosClient, RequestOptions};
use crate::error::{PhotosError, Result};
use crate::proto;
use crate::resolver::sha1_to_dedup_key;
use crate::types::{Quality, UploadEvent, UploadOptions, UploadStatus};
use crate::util;

const HASH_LOOKUP_PATH: &str = "/6439526531001121323/5084965799730810217";
const COMMIT_UPLOAD_PATH: &str = "/6439526531001121323/16538846908252377752";
const INTERACTIVE_UPLOAD_PATH: &str = "/data/upload/uploadmedia/interactive";

/// Present on every commit; meaning unmapped, value captured from the
/// reference client.
const COMMIT_TIMING_CONSTANT: i64 = 46_000_000;

const EVENT_CHANNEL_CAPACITY: usize = 32;

fn standard_options() -> RequestOptions {
    RequestOptions::new().auth().common_headers().check_status()
}

impl PhotosClient {
    /// Checks the library for an item with the given SHA-1 digest.
    /// Returns the media key, or "" when the hash is unknown (not an
    /// error).
    pub async fn find_media_by_hash(&self, sha1_hash: &[u8]) -> Result<String> {
        let request = proto::HashLookupRequest {
            query: Some(proto::HashLookupQuery {
                fingerprint: Some(proto::HashFingerprint {
                    sha1_hash: sha1_hash.to_vec(),
                }),
                options: Some(proto::Empty {}),
            }),
        };

        let response: proto::HashLookupResponse = self
            .do_proto_request(
                &self.data_url(HASH_LOOKUP_PATH),
                &request,
                standard_options(),
            )
            .await?;

        Ok(response.media_key().to_string())
    }

    /// Phase one: reserves an upload slot. The token arrives in the
    /// `X-GUploader-UploadID` reply header, not the body.
    pub async fn upload_reserve(&self, sha1_base64: &str, file_size: u64) -> Result<String> {
        let request = proto::UploadTokenRequest {
            f1: 2,
            f2: 2,
            f3: 1,
            f4: 3,
            file_size_bytes: file_size as i64,
        };

        let opts = standard_options()
            .header("X-Goog-Hash", format!("sha1={sha1_base64}"))
            .header("X-Upload-Content-Length", file_size.to_string());

        let (_, headers) = self
            .do_request(
                &self.upload_url(INTERACTIVE_UPLOAD_PATH),
                prost::Message::encode_to_vec(&request),
                opts,
            )
            .await?;

        let token = headers
            .get("X-GUploader-UploadID")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if token.is_empty() {
            return Err(PhotosError::Upload(
                "reply missing X-GUploader-UploadID header".into(),
            ));
        }
        Ok(token.to_string())
    }

    /// Phase two: streams the file bytes against the reservation. The
    /// body is an unsized stream, so the transport frames it as chunked
    /// transfer; the reply is the opaque commit token.
    pub async fn upload_stream(&self, path: &Path, upload_token: &str) -> Result<proto::CommitToken> {
        let file = tokio::fs::File::open(path).await?;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let url = format!(
            "{}?upload_id={}",
            self.upload_url(INTERACTIVE_UPLOAD_PATH),
            upload_token
        );
        let (bytes, _) = self
            .do_request(&url, body, standard_options().method(Method::PUT))
            .await?;

        Ok(<proto::CommitToken as prost::Message>::decode(
            bytes.as_slice(),
        )?)
    }

    /// Phase three: commits the uploaded bytes as a library item and
    /// returns its media key.
    ///
    /// `quality`/`use_quota` fall back to the client defaults; a zero
    /// `mtime_epoch` means "now".
    pub async fn upload_commit(
        &self,
        commit_token: &proto::CommitToken,
        file_name: &str,
        sha1_hash: &[u8],
        mtime_epoch: i64,
        quality: Option<Quality>,
        use_quota: bool,
    ) -> Result<String> {
        let mtime = if mtime_epoch == 0 {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0)
        } else {
            mtime_epoch
        };

        let quality = quality.unwrap_or(self.quality);
        let use_quota = use_quota || self.use_quota;
        let (model, quality_code) = self.commit_device_profile(quality, use_quota);
        let (_, make, api_version) = self.device_info();

        let request = proto::CommitUploadRequest {
            item: Some(proto::CommitItem {
                token: Some(commit_token.clone()),
                file_name: file_name.to_string(),
                sha1_hash: sha1_hash.to_vec(),
                timing: Some(proto::CommitTiming {
                    file_last_modified: mtime,
                    f2: COMMIT_TIMING_CONSTANT,
                }),
                quality: quality_code,
                f10: 1,
            }),
            device: Some(proto::DeviceSpec {
                model,
                make: make.to_string(),
                android_api_version: api_version,
            }),
            f3: vec![1, 3],
        };

        let response: proto::CommitUploadResponse = self
            .do_proto_request(
                &self.data_url(COMMIT_UPLOAD_PATH),
                &request,
                standard_options(),
            )
            .await?;

        let media_key = response.media_key();
        if media_key.is_empty() {
            return Err(PhotosError::Upload("commit reply missing media key".into()));
        }
        Ok(media_key.to_string())
    }

    /// The server infers upload behaviour from the declared device
    /// model, so the commit lies strategically: storage-saver claims a
    /// Pixel 2, quota-consuming uploads claim a Pixel 8.
    fn commit_device_profile(&self, quality: Quality, use_quota: bool) -> (String, i64) {
        let (mut model, code) = match quality {
            Quality::StorageSaver => ("Pixel 2".to_string(), 1),
            Quality::Original => (self.device_model(), 3),
        };
        if use_quota {
            model = "Pixel 8".to_string();
        }
        (model, code)
    }

    /// Uploads a file or directory as one batch, returning the event
    /// stream. The first event carries the batch total; every file then
    /// walks hashing → checking → uploading → finalizing into a terminal
    /// completed / skipped / failed state. Batches on the same client
    /// are serialized; cancelling the token fails the remaining files
    /// with `Cancelled` and closes the stream.
    pub fn upload(
        self: &Arc<Self>,
        path: impl Into<PathBuf>,
        options: UploadOptions,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<UploadEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let client = Arc::clone(self);
        let path = path.into();

        tokio::spawn(async move {
            let _batch = client.upload_lock.lock().await;
            run_batch(client.clone(), path, options, cancel, tx).await;
        });

        rx
    }
}

async fn run_batch(
    client: Arc<PhotosClient>,
    path: PathBuf,
    options: UploadOptions,
    cancel: CancellationToken,
    tx: mpsc::Sender<UploadEvent>,
) {
    let files = match util::collect_supported_files(&path, options.recursive, options.disable_filter)
        .await
    {
        Ok(files) => files,
        Err(err) => {
            tx.send(UploadEvent {
                path,
                status: Some(UploadStatus::Failed),
                error: Some(err),
                ..UploadEvent::default()
            })
            .await
            .ok();
            return;
        }
    };
    if files.is_empty() {
        return;
    }

    let workers = options.workers.max(1).min(files.len());

    tx.send(UploadEvent {
        total: files.len(),
        ..UploadEvent::default()
    })
    .await
    .ok();

    let (work_tx, work_rx) = mpsc::channel::<PathBuf>(files.len());
    let work_rx = Arc::new(tokio::sync::Mutex::new(work_rx));

    let mut handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        let client = Arc::clone(&client);
        let work_rx = Arc::clone(&work_rx);
        let tx = tx.clone();
        let cancel = cancel.clone();
        let options = options.clone();

        handles.push(tokio::spawn(async move {
            loop {
                let job = { work_rx.lock().await.recv().await };
                let Some(file) = job else { break };

                if cancel.is_cancelled() {
                    emit(&tx, &file, worker_id, UploadStatus::Failed, "", "")
                        .error(PhotosError::Cancelled)
                        .send()
                        .await;
                    continue;
                }

                tokio::select! {
                    biased;
                    _ = process_file(&client, &file, worker_id, &options, &tx) => {}
                    _ = cancel.cancelled() => {
                        emit(&tx, &file, worker_id, UploadStatus::Failed, "", "")
                            .error(PhotosError::Cancelled)
                            .send()
                            .await;
                    }
                }
            }
        }));
    }

    for file in files {
        if work_tx.send(file).await.is_err() {
            break;
        }
    }
    drop(work_tx);

    for handle in handles {
        handle.await.ok();
    }
}

struct EventBuilder<'a> {
    tx: &'a mpsc::Sender<UploadEvent>,
    event: UploadEvent,
}

impl EventBuilder<'_> {
    fn error(mut self, error: PhotosError) -> Self {
        self.event.error = Some(error);
        self
    }

    async fn send(self) {
        // A dropped receiver just means nobody is listening any more.
        self.tx.send(self.event).await.ok();
    }
}

fn emit<'a>(
    tx: &'a mpsc::Sender<UploadEvent>,
    path: &Path,
    worker_id: usize,
    status: UploadStatus,
    media_key: &str,
    dedup_key: &str,
) -> EventBuilder<'a> {
    EventBuilder {
        tx,
        event: UploadEvent {
            path: path.to_path_buf(),
            status: Some(status),
            media_key: media_key.to_string(),
            dedup_key: dedup_key.to_string(),
            error: None,
            worker_id,
            total: 0,
        },
    }
}

/// Per-file state machine. Every transition emits an event; the last
/// event for a file is always completed, skipped or failed.
async fn process_file(
    client: &PhotosClient,
    path: &Path,
    worker_id: usize,
    options: &UploadOptions,
    tx: &mpsc::Sender<UploadEvent>,
) {
    emit(tx, path, worker_id, UploadStatus::Hashing, "", "")
        .send()
        .await;
    let hash = match util::sha1_file(path).await {
        Ok(hash) => hash,
        Err(err) => {
            emit(tx, path, worker_id, UploadStatus::Failed, "", "")
                .error(err)
                .send()
                .await;
            return;
        }
    };
    let dedup_key = sha1_to_dedup_key(&hash);

    if !options.force_upload {
        emit(tx, path, worker_id, UploadStatus::Checking, "", &dedup_key)
            .send()
            .await;
        // A failed lookup is not fatal; the upload proceeds.
        let media_key = client.find_media_by_hash(&hash).await.unwrap_or_default();
        if !media_key.is_empty() {
            if options.delete_from_host {
                tokio::fs::remove_file(path).await.ok();
            }
            emit(tx, path, worker_id, UploadStatus::Skipped, &media_key, &dedup_key)
                .send()
                .await;
            return;
        }
    }

    let metadata = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(err) => {
            emit(tx, path, worker_id, UploadStatus::Failed, "", &dedup_key)
                .error(err.into())
                .send()
                .await;
            return;
        }
    };

    emit(tx, path, worker_id, UploadStatus::Uploading, "", &dedup_key)
        .send()
        .await;
    let sha1_base64 = BASE64.encode(hash);
    let upload_token = match client.upload_reserve(&sha1_base64, metadata.len()).await {
        Ok(token) => token,
        Err(err) => {
            emit(tx, path, worker_id, UploadStatus::Failed, "", &dedup_key)
                .error(err)
                .send()
                .await;
            return;
        }
    };
    let commit_token = match client.upload_stream(path, &upload_token).await {
        Ok(token) => token,
        Err(err) => {
            emit(tx, path, worker_id, UploadStatus::Failed, "", &dedup_key)
                .error(err)
                .send()
                .await;
            return;
        }
    };

    emit(tx, path, worker_id, UploadStatus::Finalizing, "", &dedup_key)
        .send()
        .await;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    let media_key = match client
        .upload_commit(
            &commit_token,
            &file_name,
            &hash,
            mtime,
            options.quality,
            options.use_quota,
        )
        .await
    {
        Ok(key) => key,
        Err(err) => {
            emit(tx, path, worker_id, UploadStatus::Failed, "", &dedup_key)
                .error(err)
                .send()
                .await;
            return;
        }
    };

    // Post-upload side effects never demote a completed upload.
    if !options.caption.is_empty() {
        if let Err(err) = client.set_caption(&media_key, &options.caption).await {
            warn!(path = %path.display(), error = %err, "caption failed");
        }
    }
    if options.favourite {
        if let Err(err) = client.set_favourite(&media_key, true).await {
            warn!(path = %path.display(), error = %err, "favourite failed");
        }
    }
    if options.archive {
        if let Err(err) = client.set_archived(&[media_key.clone()], true).await {
            warn!(path = %path.display(), error = %err, "archive failed");
        }
    }
    if options.delete_from_host {
        tokio::fs::remove_file(path).await.ok();
    }

    emit(tx, path, worker_id, UploadStatus::Completed, &media_key, &dedup_key)
        .send()
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;

    fn test_client() -> PhotosClient {
        let creds = "androidId=1&app=x&client_sig=s&Email=a%40b.c&Token=t&lang=en&service=svc";
        PhotosClient::new(ClientConfig::new(creds)).unwrap()
    }

    #[test]
    fn device_profile_table() {
        let client = test_client();
        assert_eq!(
            client.commit_device_profile(Quality::Original, false),
            ("Pixel XL".to_string(), 3)
        );
        assert_eq!(
            client.commit_device_profile(Quality::StorageSaver, false),
            ("Pixel 2".to_string(), 1)
        );
        // Quota overrides the model but keeps the quality code.
        assert_eq!(
            client.commit_device_profile(Quality::Original, true),
            ("Pixel 8".to_string(), 3)
        );
        assert_eq!(
            client.commit_device_profile(Quality::StorageSaver, true),
            ("Pixel 8".to_string(), 1)
        );
    }

    #[test]
    fn device_profile_follows_model_override() {
        let client = test_client();
        client.set_device_model("Pixel 6");
        assert_eq!(
            client.commit_device_profile(Quality::Original, false),
            ("Pixel 6".to_string(), 3)
        );
    }
}

mod common;

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use gphotos_sdk::{proto, PhotosError, UploadEvent, UploadOptions, UploadStatus};
use prost::Message;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_bytes, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn lookup_response(media_key: &str) -> Vec<u8> {
    proto::HashLookupResponse {
        result: Some(proto::HashLookupResult {
            item: Some(proto::HashLookupItem {
                media: Some(proto::HashLookupMedia {
                    media_key: media_key.to_string(),
                }),
            }),
        }),
    }
    .encode_to_vec()
}

fn lookup_request(sha1_hash: &[u8]) -> Vec<u8> {
    proto::HashLookupRequest {
        query: Some(proto::HashLookupQuery {
            fingerprint: Some(proto::HashFingerprint {
                sha1_hash: sha1_hash.to_vec(),
            }),
            options: Some(proto::Empty {}),
        }),
    }
    .encode_to_vec()
}

fn commit_token_bytes() -> Vec<u8> {
    proto::CommitToken {
        f1: 2,
        f2: vec![0xde, 0xad, 0xbe, 0xef],
    }
    .encode_to_vec()
}

fn commit_response(media_key: &str) -> Vec<u8> {
    proto::CommitUploadResponse {
        result: Some(proto::CommitResult {
            media: Some(proto::CommitMedia {
                media_key: media_key.to_string(),
            }),
        }),
    }
    .encode_to_vec()
}

fn write_file(dir: &std::path::Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::File::create(&path)
        .unwrap()
        .write_all(contents)
        .unwrap();
    path
}

async fn mount_upload_phases(server: &MockServer, media_key: &str) {
    Mock::given(method("POST"))
        .and(path(common::INTERACTIVE_UPLOAD_PATH))
        .respond_with(
            ResponseTemplate::new(200).insert_header("X-GUploader-UploadID", "upload-slot-1"),
        )
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .and(path(common::INTERACTIVE_UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(commit_token_bytes()))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(common::COMMIT_UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(commit_response(media_key)))
        .mount(server)
        .await;
}

async fn collect(mut rx: tokio::sync::mpsc::Receiver<UploadEvent>) -> Vec<UploadEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn statuses_for<'a>(events: &'a [UploadEvent], file: &std::path::Path) -> Vec<UploadStatus> {
    events
        .iter()
        .filter(|e| e.path == file)
        .filter_map(|e| e.status)
        .collect()
}

#[tokio::test]
async fn batch_with_dedup_hit_skips_one_and_uploads_the_rest() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let dir = tempfile::tempdir().unwrap();
    let file_a = write_file(dir.path(), "a.jpg", b"contents of the first photo");
    let file_b = write_file(dir.path(), "b.jpg", b"this one is already in the library");
    let file_c = write_file(dir.path(), "c.jpg", b"and a third, new photo");

    let known_hash = gphotos_sdk::util::sha1_file(&file_b).await.unwrap();

    // Lookup for the known hash answers with a media key; everything
    // else misses. The specific mock is mounted first so it wins.
    Mock::given(method("POST"))
        .and(path(common::HASH_LOOKUP_PATH))
        .and(body_bytes(lookup_request(&known_hash)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(lookup_response("existing-key")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(common::HASH_LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::new()))
        .mount(&server)
        .await;
    mount_upload_phases(&server, "fresh-key").await;

    let events = collect(client.upload(
        dir.path(),
        UploadOptions {
            workers: 2,
            ..UploadOptions::default()
        },
        CancellationToken::new(),
    ))
    .await;

    // The total arrives first and exactly once.
    assert_eq!(events[0].total, 3);
    assert!(events[0].status.is_none());
    assert_eq!(events.iter().filter(|e| e.total > 0).count(), 1);

    assert_eq!(
        statuses_for(&events, &file_b),
        vec![
            UploadStatus::Hashing,
            UploadStatus::Checking,
            UploadStatus::Skipped
        ]
    );
    for file in [&file_a, &file_c] {
        assert_eq!(
            statuses_for(&events, file),
            vec![
                UploadStatus::Hashing,
                UploadStatus::Checking,
                UploadStatus::Uploading,
                UploadStatus::Finalizing,
                UploadStatus::Completed
            ]
        );
    }

    // Terminal events carry keys.
    for event in &events {
        match event.status {
            Some(UploadStatus::Skipped) => {
                assert_eq!(event.media_key, "existing-key");
                assert_eq!(event.dedup_key.len(), 27);
            }
            Some(UploadStatus::Completed) => {
                assert_eq!(event.media_key, "fresh-key");
                assert_eq!(event.dedup_key.len(), 27);
            }
            _ => {}
        }
    }
}

#[tokio::test]
async fn worker_pool_never_exceeds_file_count() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.jpg", b"one");
    write_file(dir.path(), "b.jpg", b"two");

    Mock::given(method("POST"))
        .and(path(common::HASH_LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(lookup_response("known")))
        .mount(&server)
        .await;

    let events = collect(client.upload(
        dir.path(),
        UploadOptions {
            workers: 50,
            ..UploadOptions::default()
        },
        CancellationToken::new(),
    ))
    .await;

    let max_worker = events.iter().map(|e| e.worker_id).max().unwrap();
    assert!(max_worker < 2, "worker pool exceeded file count");
}

#[tokio::test]
async fn zero_workers_are_treated_as_one() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.jpg", b"solo");

    Mock::given(method("POST"))
        .and(path(common::HASH_LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(lookup_response("known")))
        .mount(&server)
        .await;

    let events = collect(client.upload(
        dir.path(),
        UploadOptions::default(),
        CancellationToken::new(),
    ))
    .await;

    let terminal: Vec<_> = events
        .iter()
        .filter(|e| e.status.is_some_and(|s| s.is_terminal()))
        .collect();
    assert_eq!(terminal.len(), 1);
    assert_eq!(terminal[0].status, Some(UploadStatus::Skipped));
}

#[tokio::test]
async fn unsupported_files_yield_a_closed_empty_stream() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "notes.txt", b"not a photo");

    let events = collect(client.upload(
        dir.path(),
        UploadOptions::default(),
        CancellationToken::new(),
    ))
    .await;
    assert!(events.is_empty());
}

#[tokio::test]
async fn force_upload_bypasses_the_dedup_lookup() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "a.jpg", b"force me");

    Mock::given(method("POST"))
        .and(path(common::HASH_LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(lookup_response("existing")))
        .expect(0)
        .mount(&server)
        .await;
    mount_upload_phases(&server, "forced-key").await;

    let events = collect(client.upload(
        dir.path(),
        UploadOptions {
            force_upload: true,
            ..UploadOptions::default()
        },
        CancellationToken::new(),
    ))
    .await;

    assert_eq!(
        statuses_for(&events, &file),
        vec![
            UploadStatus::Hashing,
            UploadStatus::Uploading,
            UploadStatus::Finalizing,
            UploadStatus::Completed
        ]
    );
}

#[tokio::test]
async fn dedup_hit_with_delete_from_host_removes_the_source() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "a.jpg", b"duplicate");

    Mock::given(method("POST"))
        .and(path(common::HASH_LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(lookup_response("existing")))
        .mount(&server)
        .await;

    let events = collect(client.upload(
        &file,
        UploadOptions {
            delete_from_host: true,
            ..UploadOptions::default()
        },
        CancellationToken::new(),
    ))
    .await;

    let last = events.last().unwrap();
    assert_eq!(last.status, Some(UploadStatus::Skipped));
    assert!(!file.exists());
}

#[tokio::test]
async fn cancellation_fails_remaining_files_without_commits() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let dir = tempfile::tempdir().unwrap();
    let files = [
        write_file(dir.path(), "a.jpg", b"first"),
        write_file(dir.path(), "b.jpg", b"second"),
        write_file(dir.path(), "c.jpg", b"third"),
    ];

    // The reservation stalls long enough for the cancel to land mid-flight.
    Mock::given(method("POST"))
        .and(path(common::INTERACTIVE_UPLOAD_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-GUploader-UploadID", "slot")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(common::COMMIT_UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(commit_response("never")))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let mut rx = client.upload(
        dir.path(),
        UploadOptions {
            workers: 1,
            force_upload: true,
            ..UploadOptions::default()
        },
        cancel.clone(),
    );

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        if event.status == Some(UploadStatus::Uploading) {
            cancel.cancel();
        }
        events.push(event);
    }

    let mut terminal = HashMap::new();
    for event in &events {
        if let Some(status) = event.status {
            if status.is_terminal() {
                terminal.insert(event.path.clone(), event);
            }
        }
    }
    assert_eq!(terminal.len(), files.len());
    for file in &files {
        let event = terminal[file];
        assert_eq!(event.status, Some(UploadStatus::Failed));
        assert!(matches!(event.error, Some(PhotosError::Cancelled)));
    }
}

#[tokio::test]
async fn post_op_failure_does_not_demote_a_completed_upload() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "a.jpg", b"captioned");

    mount_upload_phases(&server, "captioned-key").await;
    Mock::given(method("POST"))
        .and(path(common::SET_CAPTION_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("caption backend down"))
        .expect(1)
        .mount(&server)
        .await;

    let events = collect(client.upload(
        &file,
        UploadOptions {
            force_upload: true,
            caption: "holiday snap".to_string(),
            ..UploadOptions::default()
        },
        CancellationToken::new(),
    ))
    .await;

    let last = events.last().unwrap();
    assert_eq!(last.status, Some(UploadStatus::Completed));
    assert_eq!(last.media_key, "captioned-key");
}

#[tokio::test]
async fn batches_on_one_client_are_serialized() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.jpg", b"batch one");
    let dir2 = tempfile::tempdir().unwrap();
    write_file(dir2.path(), "b.jpg", b"batch two");

    Mock::given(method("POST"))
        .and(path(common::HASH_LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(lookup_response("known")))
        .mount(&server)
        .await;

    let first = client.upload(
        dir.path(),
        UploadOptions::default(),
        CancellationToken::new(),
    );
    let second = client.upload(
        dir2.path(),
        UploadOptions::default(),
        CancellationToken::new(),
    );

    // Both batches run to completion despite overlapping submission.
    let first_events = collect(first).await;
    let second_events = collect(second).await;
    assert!(first_events
        .iter()
        .any(|e| e.status == Some(UploadStatus::Skipped)));
    assert!(second_events
        .iter()
        .any(|e| e.status == Some(UploadStatus::Skipped)));
}

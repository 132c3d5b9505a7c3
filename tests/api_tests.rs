mod common;

use std::io::Write;

use gphotos_sdk::{proto, wire, PhotosError};
use prost::Message;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn data_requests_carry_bearer_and_protobuf_headers() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    Mock::given(method("POST"))
        .and(path(common::SET_FAVOURITE_PATH))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Content-Type", "application/x-protobuf"))
        .and(header("x-goog-ext-173412678-bin", "CgcIAhClARgC"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.set_favourite("some-key", true).await.unwrap();
}

#[tokio::test]
async fn status_check_surfaces_the_response_body() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    Mock::given(method("POST"))
        .and(path(common::TRASH_ACTION_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("quota exceeded for account"))
        .mount(&server)
        .await;

    let err = client
        .move_to_trash(&["some-key".to_string()])
        .await
        .unwrap_err();
    match err {
        PhotosError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "quota exceeded for account");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn gzip_error_bodies_are_decoded_before_surfacing() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    Mock::given(method("POST"))
        .and(path(common::SET_CAPTION_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("Content-Encoding", "gzip")
                .set_body_bytes(gzip(b"malformed caption request")),
        )
        .mount(&server)
        .await;

    let err = client.set_caption("key", "caption").await.unwrap_err();
    match err {
        PhotosError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "malformed caption request");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn find_media_by_hash_returns_empty_for_unknown_hashes() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    Mock::given(method("POST"))
        .and(path(common::HASH_LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::new()))
        .mount(&server)
        .await;

    let media_key = client.find_media_by_hash(&[7u8; 20]).await.unwrap();
    assert_eq!(media_key, "");
}

#[tokio::test]
async fn upload_reserve_reads_the_token_header() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    Mock::given(method("POST"))
        .and(path(common::INTERACTIVE_UPLOAD_PATH))
        .and(header("X-Goog-Hash", "sha1=c2hhMWRpZ2VzdA=="))
        .and(header("X-Upload-Content-Length", "1024"))
        .respond_with(ResponseTemplate::new(200).insert_header("X-GUploader-UploadID", "slot-9"))
        .mount(&server)
        .await;

    let token = client
        .upload_reserve("c2hhMWRpZ2VzdA==", 1024)
        .await
        .unwrap();
    assert_eq!(token, "slot-9");
}

#[tokio::test]
async fn upload_reserve_without_token_header_is_an_upload_error() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    Mock::given(method("POST"))
        .and(path(common::INTERACTIVE_UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client.upload_reserve("aGFzaA==", 10).await.unwrap_err();
    assert!(matches!(err, PhotosError::Upload(_)));
}

#[tokio::test]
async fn upload_stream_sends_the_reservation_as_query_param() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let token_bytes = proto::CommitToken {
        f1: 2,
        f2: vec![1, 2, 3],
    }
    .encode_to_vec();
    Mock::given(method("PUT"))
        .and(path(common::INTERACTIVE_UPLOAD_PATH))
        .and(query_param("upload_id", "slot-7"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(token_bytes))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("payload.jpg");
    std::fs::write(&file, b"raw image bytes").unwrap();

    let commit_token = client.upload_stream(&file, "slot-7").await.unwrap();
    assert_eq!(commit_token.f1, 2);
    assert_eq!(commit_token.f2, vec![1, 2, 3]);
}

#[tokio::test]
async fn resolve_media_key_misses_become_not_found() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    Mock::given(method("POST"))
        .and(path(common::HASH_LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::new()))
        .mount(&server)
        .await;

    // 27 URL-safe characters: shaped like a dedup key.
    let err = client
        .resolve_media_key("AAAAAAAAAAAAAAAAAAAAAAAAAAA")
        .await
        .unwrap_err();
    assert!(matches!(err, PhotosError::NotFound(_)));
}

#[tokio::test]
async fn resolve_media_key_passes_opaque_keys_through() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    // Not a dedup key, not a file: assumed to already be a media key,
    // with no network round-trip.
    let key = client.resolve_media_key("AF1QipSomeOpaqueKey").await.unwrap();
    assert_eq!(key, "AF1QipSomeOpaqueKey");
}

#[tokio::test]
async fn resolve_item_key_hashes_existing_files() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("photo.jpg");
    std::fs::write(&file, b"file contents to fingerprint").unwrap();

    let key = client
        .resolve_item_key(file.to_str().unwrap())
        .await
        .unwrap();
    assert!(gphotos_sdk::is_dedup_key(&key));

    let digest = gphotos_sdk::util::sha1_file(&file).await.unwrap();
    assert_eq!(key, gphotos_sdk::sha1_to_dedup_key(&digest));
}

#[tokio::test]
async fn download_info_prefers_the_original_url() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let response = proto::DownloadInfoResponse {
        result: Some(proto::DownloadResult {
            metadata: Some(proto::DownloadMetadata {
                filename: "IMG_0042.jpg".to_string(),
                file_size: 123_456,
            }),
            urls: Some(proto::DownloadUrls {
                is_edited: 1,
                download_urls: Some(proto::DownloadUrlPair {
                    original_url: "https://dl.example/original".to_string(),
                    edited_url: "https://dl.example/edited".to_string(),
                }),
                fallback: None,
            }),
        }),
    };
    Mock::given(method("POST"))
        .and(path(common::DOWNLOAD_INFO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(response.encode_to_vec()))
        .mount(&server)
        .await;

    let info = client.get_download_info("media-key").await.unwrap();
    assert_eq!(info.filename, "IMG_0042.jpg");
    assert_eq!(info.file_size, 123_456);
    assert!(info.is_edited);
    assert_eq!(info.download_url, "https://dl.example/original");
}

#[tokio::test]
async fn download_info_without_urls_is_a_protocol_error() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    Mock::given(method("POST"))
        .and(path(common::DOWNLOAD_INFO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::new()))
        .mount(&server)
        .await;

    let err = client.get_download_info("media-key").await.unwrap_err();
    assert!(matches!(err, PhotosError::Protocol(_)));
}

#[tokio::test]
async fn download_file_falls_back_to_the_literal_download_name() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    Mock::given(method("GET"))
        .and(path("/media/raw"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bytes".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let saved = client
        .download_file(&format!("{}/media/raw", server.uri()), dir.path(), None)
        .await
        .unwrap();
    assert_eq!(saved.file_name().unwrap(), "download");
    assert_eq!(std::fs::read(&saved).unwrap(), b"bytes");
}

#[tokio::test]
async fn download_file_honours_content_disposition() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    Mock::given(method("GET"))
        .and(path("/media/raw"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=\"named.jpg\"")
                .set_body_bytes(b"image".to_vec()),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let saved = client
        .download_file(&format!("{}/media/raw", server.uri()), dir.path(), None)
        .await
        .unwrap();
    assert_eq!(saved.file_name().unwrap(), "named.jpg");
}

#[tokio::test]
async fn set_favourite_twice_succeeds_both_times() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    Mock::given(method("POST"))
        .and(path(common::SET_FAVOURITE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    client.set_favourite("key", true).await.unwrap();
    client.set_favourite("key", true).await.unwrap();
}

#[tokio::test]
async fn library_state_parses_a_video_reply() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    // root.1.2[0].5.1 = 2 (video) and .5.3.5 carries the download URL.
    let mut video = Vec::new();
    wire::append_string_field(&mut video, 5, "https://dl.example/video.mp4");
    let mut dl = Vec::new();
    wire::append_varint_field(&mut dl, 1, 2);
    wire::append_message(&mut dl, 3, &video);
    let mut item = Vec::new();
    wire::append_string_field(&mut item, 1, "mediakey-video");
    wire::append_message(&mut item, 5, &dl);
    let mut body = Vec::new();
    wire::append_message(&mut body, 2, &item);
    wire::append_string_field(&mut body, 6, "state-after");
    let mut reply = Vec::new();
    wire::append_message(&mut reply, 1, &body);

    Mock::given(method("POST"))
        .and(path(common::LIBRARY_STATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(reply))
        .mount(&server)
        .await;

    let response = client.library_state("").await.unwrap();
    assert_eq!(response.state_token, "state-after");
    assert_eq!(response.media_items.len(), 1);
    let item = &response.media_items[0];
    assert!(item.is_video);
    assert_eq!(item.download_url, "https://dl.example/video.mp4");
}

#[tokio::test]
async fn create_album_returns_the_new_key() {
    let server = MockServer::start().await;
    let client = common::authed_client(&server);

    let response = proto::CreateAlbumResponse {
        album: Some(proto::AlbumRef {
            album_key: "AF1QipNewAlbum".to_string(),
        }),
    };
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(response.encode_to_vec()))
        .mount(&server)
        .await;

    let key = client
        .create_album("Holiday", &["mk1".to_string()])
        .await
        .unwrap();
    assert_eq!(key, "AF1QipNewAlbum");
}

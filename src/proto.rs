//! Hand-maintained message descriptors for the schema-bound endpoints.
//!
//! Field numbers and types are protocol constants captured from the
//! reference mobile client; fields whose meaning is still unmapped keep
//! their number as a name (`f4`, `f10`, ...). Do not renumber anything
//! here without a fresh capture.

/// Empty sub-message; the server reads presence as a feature toggle.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Empty {}

// ---------------------------------------------------------------------------
// Dedup lookup
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HashLookupRequest {
    #[prost(message, optional, tag = "1")]
    pub query: ::core::option::Option<HashLookupQuery>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HashLookupQuery {
    #[prost(message, optional, tag = "1")]
    pub fingerprint: ::core::option::Option<HashFingerprint>,
    #[prost(message, optional, tag = "2")]
    pub options: ::core::option::Option<Empty>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HashFingerprint {
    /// Raw 20-byte SHA-1 digest of the file contents.
    #[prost(bytes = "vec", tag = "1")]
    pub sha1_hash: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HashLookupResponse {
    #[prost(message, optional, tag = "1")]
    pub result: ::core::option::Option<HashLookupResult>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HashLookupResult {
    #[prost(message, optional, tag = "2")]
    pub item: ::core::option::Option<HashLookupItem>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HashLookupItem {
    #[prost(message, optional, tag = "2")]
    pub media: ::core::option::Option<HashLookupMedia>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HashLookupMedia {
    #[prost(string, tag = "1")]
    pub media_key: ::prost::alloc::string::String,
}

impl HashLookupResponse {
    /// Media key of the first match, or "" when the hash is unknown.
    pub fn media_key(&self) -> &str {
        self.result
            .as_ref()
            .and_then(|r| r.item.as_ref())
            .and_then(|i| i.media.as_ref())
            .map(|m| m.media_key.as_str())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Upload reservation and commit
// ---------------------------------------------------------------------------

/// Body of the reservation POST; the interesting reply is the
/// `X-GUploader-UploadID` header, not the body.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UploadTokenRequest {
    #[prost(int64, tag = "1")]
    pub f1: i64,
    #[prost(int64, tag = "2")]
    pub f2: i64,
    #[prost(int64, tag = "3")]
    pub f3: i64,
    #[prost(int64, tag = "4")]
    pub f4: i64,
    #[prost(int64, tag = "7")]
    pub file_size_bytes: i64,
}

/// Opaque blob returned by the byte-stream PUT; echoed verbatim into the
/// commit message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitToken {
    #[prost(int64, tag = "1")]
    pub f1: i64,
    #[prost(bytes = "vec", tag = "2")]
    pub f2: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitUploadRequest {
    #[prost(message, optional, tag = "1")]
    pub item: ::core::option::Option<CommitItem>,
    #[prost(message, optional, tag = "2")]
    pub device: ::core::option::Option<DeviceSpec>,
    #[prost(bytes = "vec", tag = "3")]
    pub f3: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitItem {
    #[prost(message, optional, tag = "1")]
    pub token: ::core::option::Option<CommitToken>,
    #[prost(string, tag = "2")]
    pub file_name: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "3")]
    pub sha1_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "4")]
    pub timing: ::core::option::Option<CommitTiming>,
    #[prost(int64, tag = "7")]
    pub quality: i64,
    #[prost(int64, tag = "10")]
    pub f10: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitTiming {
    #[prost(int64, tag = "1")]
    pub file_last_modified: i64,
    #[prost(int64, tag = "2")]
    pub f2: i64,
}

/// Device identity declared at commit time; the server infers the
/// storage tier from the model string.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeviceSpec {
    #[prost(string, tag = "1")]
    pub model: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub make: ::prost::alloc::string::String,
    #[prost(int64, tag = "3")]
    pub android_api_version: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitUploadResponse {
    #[prost(message, optional, tag = "1")]
    pub result: ::core::option::Option<CommitResult>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitResult {
    #[prost(message, optional, tag = "3")]
    pub media: ::core::option::Option<CommitMedia>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitMedia {
    #[prost(string, tag = "1")]
    pub media_key: ::prost::alloc::string::String,
}

impl CommitUploadResponse {
    pub fn media_key(&self) -> &str {
        self.result
            .as_ref()
            .and_then(|r| r.media.as_ref())
            .map(|m| m.media_key.as_str())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Metadata mutations
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetCaptionRequest {
    #[prost(string, tag = "1")]
    pub caption: ::prost::alloc::string::String,
    /// Media key or dedup key.
    #[prost(string, tag = "2")]
    pub item_key: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetFavouriteRequest {
    #[prost(message, optional, tag = "1")]
    pub target: ::core::option::Option<FavouriteTarget>,
    #[prost(message, optional, tag = "2")]
    pub state: ::core::option::Option<FavouriteState>,
    #[prost(message, optional, tag = "3")]
    pub context: ::core::option::Option<FavouriteContext>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FavouriteTarget {
    #[prost(string, tag = "1")]
    pub item_key: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FavouriteState {
    /// 1 = favourite, 2 = unfavourite.
    #[prost(int64, tag = "1")]
    pub action: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FavouriteContext {
    #[prost(message, optional, tag = "1")]
    pub scope: ::core::option::Option<FavouriteScope>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FavouriteScope {
    #[prost(message, optional, tag = "19")]
    pub f19: ::core::option::Option<Empty>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetArchivedRequest {
    #[prost(message, optional, tag = "1")]
    pub targets: ::core::option::Option<ArchiveTargets>,
    #[prost(message, optional, tag = "2")]
    pub state: ::core::option::Option<ArchiveState>,
    #[prost(message, optional, tag = "3")]
    pub context: ::core::option::Option<Empty>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ArchiveTargets {
    #[prost(string, repeated, tag = "1")]
    pub item_keys: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ArchiveState {
    /// 1 = archive, 2 = unarchive.
    #[prost(int64, tag = "1")]
    pub action: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetLocationRequest {
    #[prost(message, optional, tag = "4")]
    pub edit: ::core::option::Option<LocationEdit>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LocationEdit {
    #[prost(message, optional, tag = "1")]
    pub target: ::core::option::Option<LocationTarget>,
    #[prost(message, optional, tag = "2")]
    pub place: ::core::option::Option<LocationPlace>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LocationTarget {
    #[prost(string, tag = "1")]
    pub media_key: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LocationPlace {
    /// Always 2 when setting a location.
    #[prost(int64, tag = "1")]
    pub action: i64,
    #[prost(message, optional, tag = "2")]
    pub coordinates: ::core::option::Option<GeoPoint>,
    #[prost(message, optional, tag = "3")]
    pub viewport: ::core::option::Option<GeoViewport>,
    #[prost(message, optional, tag = "4")]
    pub place_name: ::core::option::Option<PlaceName>,
    #[prost(string, tag = "5")]
    pub place_id: ::prost::alloc::string::String,
}

/// Coordinates in decimal degrees scaled by 10^7.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoPoint {
    #[prost(sfixed32, tag = "1")]
    pub latitude: i32,
    #[prost(sfixed32, tag = "2")]
    pub longitude: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoViewport {
    #[prost(message, optional, tag = "1")]
    pub south_west: ::core::option::Option<GeoPoint>,
    #[prost(message, optional, tag = "2")]
    pub north_east: ::core::option::Option<GeoPoint>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PlaceName {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(int64, tag = "3")]
    pub f3: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetDateTimeRequest {
    #[prost(message, optional, tag = "1")]
    pub edit: ::core::option::Option<DateTimeEdit>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DateTimeEdit {
    #[prost(string, repeated, tag = "1")]
    pub item_keys: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    /// Seconds since the epoch.
    #[prost(double, tag = "2")]
    pub timestamp: f64,
    /// Timezone offset in seconds.
    #[prost(int32, tag = "3")]
    pub timezone_offset: i32,
}

// ---------------------------------------------------------------------------
// Trash
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TrashActionKind {
    Unspecified = 0,
    MoveToTrash = 1,
    PermanentDelete = 2,
    RestoreFromTrash = 3,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrashActionRequest {
    #[prost(enumeration = "TrashActionKind", tag = "1")]
    pub action: i32,
    #[prost(string, repeated, tag = "2")]
    pub item_keys: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    /// 1 for trash/delete, 2 for restore.
    #[prost(int64, tag = "4")]
    pub f4: i64,
    #[prost(message, optional, tag = "8")]
    pub scope: ::core::option::Option<TrashScope>,
    #[prost(message, optional, tag = "9")]
    pub origin: ::core::option::Option<TrashOrigin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrashScope {
    #[prost(message, optional, tag = "4")]
    pub flags: ::core::option::Option<TrashScopeFlags>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrashScopeFlags {
    #[prost(message, optional, tag = "2")]
    pub f2: ::core::option::Option<Empty>,
    #[prost(message, optional, tag = "3")]
    pub f3: ::core::option::Option<TrashScopeNested>,
    #[prost(message, optional, tag = "4")]
    pub f4: ::core::option::Option<Empty>,
    #[prost(message, optional, tag = "5")]
    pub f5: ::core::option::Option<TrashScopeNested>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrashScopeNested {
    #[prost(message, optional, tag = "1")]
    pub f1: ::core::option::Option<Empty>,
}

/// Client version side field; present on trash and restore, absent on
/// permanent delete.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrashOrigin {
    #[prost(int64, tag = "1")]
    pub f1: i64,
    #[prost(message, optional, tag = "2")]
    pub client: ::core::option::Option<TrashClient>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrashClient {
    #[prost(int64, tag = "1")]
    pub version_code: i64,
    #[prost(string, tag = "2")]
    pub api_version: ::prost::alloc::string::String,
}

// ---------------------------------------------------------------------------
// Download info and thumbnails
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadInfoRequest {
    #[prost(message, optional, tag = "1")]
    pub target: ::core::option::Option<DownloadTarget>,
    #[prost(message, optional, tag = "2")]
    pub spec: ::core::option::Option<DownloadSpec>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadTarget {
    #[prost(message, optional, tag = "1")]
    pub item: ::core::option::Option<DownloadItemRef>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadItemRef {
    #[prost(string, tag = "1")]
    pub media_key: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadSpec {
    #[prost(message, optional, tag = "1")]
    pub f1: ::core::option::Option<DownloadSpecMeta>,
    #[prost(message, optional, tag = "5")]
    pub f5: ::core::option::Option<DownloadSpecUrls>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadSpecMeta {
    #[prost(message, optional, tag = "7")]
    pub f7: ::core::option::Option<DownloadSpecMetaInner>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadSpecMetaInner {
    #[prost(message, optional, tag = "2")]
    pub f2: ::core::option::Option<Empty>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadSpecUrls {
    #[prost(message, optional, tag = "2")]
    pub f2: ::core::option::Option<Empty>,
    #[prost(message, optional, tag = "3")]
    pub f3: ::core::option::Option<Empty>,
    #[prost(message, optional, tag = "5")]
    pub f5: ::core::option::Option<DownloadSpecUrlsInner>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadSpecUrlsInner {
    #[prost(message, optional, tag = "1")]
    pub f1: ::core::option::Option<Empty>,
    #[prost(int64, tag = "3")]
    pub f3: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadInfoResponse {
    #[prost(message, optional, tag = "1")]
    pub result: ::core::option::Option<DownloadResult>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadResult {
    #[prost(message, optional, tag = "2")]
    pub metadata: ::core::option::Option<DownloadMetadata>,
    #[prost(message, optional, tag = "3")]
    pub urls: ::core::option::Option<DownloadUrls>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadMetadata {
    #[prost(string, tag = "1")]
    pub filename: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub file_size: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadUrls {
    #[prost(int64, tag = "1")]
    pub is_edited: i64,
    #[prost(message, optional, tag = "2")]
    pub download_urls: ::core::option::Option<DownloadUrlPair>,
    #[prost(message, optional, tag = "3")]
    pub fallback: ::core::option::Option<DownloadUrlFallback>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadUrlPair {
    #[prost(string, tag = "1")]
    pub original_url: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub edited_url: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadUrlFallback {
    #[prost(string, tag = "1")]
    pub download_url: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ThumbnailRequest {
    #[prost(message, optional, tag = "1")]
    pub target: ::core::option::Option<ThumbnailTarget>,
    #[prost(int32, tag = "2")]
    pub width: i32,
    #[prost(int32, tag = "3")]
    pub height: i32,
    #[prost(int32, tag = "4")]
    pub force_jpeg: i32,
    #[prost(int32, tag = "5")]
    pub no_overlay: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ThumbnailTarget {
    #[prost(string, tag = "1")]
    pub media_key: ::prost::alloc::string::String,
}

// ---------------------------------------------------------------------------
// Albums
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateAlbumRequest {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "2")]
    pub media_keys: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(message, optional, tag = "3")]
    pub device: ::core::option::Option<DeviceSpec>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateAlbumResponse {
    #[prost(message, optional, tag = "1")]
    pub album: ::core::option::Option<AlbumRef>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AlbumRef {
    #[prost(string, tag = "1")]
    pub album_key: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddToAlbumRequest {
    #[prost(string, tag = "1")]
    pub album_key: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "2")]
    pub media_keys: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RenameAlbumRequest {
    #[prost(string, tag = "1")]
    pub album_key: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteAlbumRequest {
    #[prost(string, tag = "1")]
    pub album_key: ::prost::alloc::string::String,
}

//! Metadata mutations: caption, favourite, archive, location, datetime,
//! and the trash actions. All of these accept media keys or dedup keys.

use chrono::{DateTime, FixedOffset};

use crate::client::{PhotosClient, RequestOptions};
use crate::error::{PhotosError, Result};
use crate::proto;

const SET_CAPTION_PATH: &str = "/6439526531001121323/1552790390512470739";
const SET_FAVOURITE_PATH: &str = "/6439526531001121323/5144645502632292153";
const SET_ARCHIVED_PATH: &str = "/6439526531001121323/4969555272007493424";
const SET_LOCATION_PATH: &str = "/6439526531001121323/227609453150053792";
const SET_DATETIME_PATH: &str = "/6439526531001121323/17462398412150687934";
const TRASH_ACTION_PATH: &str = "/6439526531001121323/17490284929287180316";

/// Coordinates travel as degrees scaled to fixed-point.
const COORDINATE_SCALE: f64 = 10_000_000.0;

/// Generic place identifier sent when no place is named; the server
/// positions the item from the raw coordinates.
const GENERIC_PLACE_ID: &str = "ChIJN1t_tDeuEmsRUsoyG83frY4";

fn standard_options() -> RequestOptions {
    RequestOptions::new().auth().common_headers().check_status()
}

/// What to do with the items handed to [`PhotosClient::trash_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashAction {
    MoveToTrash,
    PermanentDelete,
    RestoreFromTrash,
}

impl PhotosClient {
    /// Sets the caption of a media item.
    pub async fn set_caption(&self, item_key: &str, caption: &str) -> Result<()> {
        let request = proto::SetCaptionRequest {
            caption: caption.to_string(),
            item_key: item_key.to_string(),
        };
        self.do_proto_send(
            &self.data_url(SET_CAPTION_PATH),
            &request,
            standard_options(),
        )
        .await
    }

    /// Adds or removes the favourite mark on a media item.
    pub async fn set_favourite(&self, item_key: &str, is_favourite: bool) -> Result<()> {
        let request = proto::SetFavouriteRequest {
            target: Some(proto::FavouriteTarget {
                item_key: item_key.to_string(),
            }),
            state: Some(proto::FavouriteState {
                action: if is_favourite { 1 } else { 2 },
            }),
            context: Some(proto::FavouriteContext {
                scope: Some(proto::FavouriteScope {
                    f19: Some(proto::Empty {}),
                }),
            }),
        };
        self.do_proto_send(
            &self.data_url(SET_FAVOURITE_PATH),
            &request,
            standard_options(),
        )
        .await
    }

    /// Archives or unarchives a batch of items.
    pub async fn set_archived(&self, item_keys: &[String], is_archived: bool) -> Result<()> {
        let request = proto::SetArchivedRequest {
            targets: Some(proto::ArchiveTargets {
                item_keys: item_keys.to_vec(),
            }),
            state: Some(proto::ArchiveState {
                action: if is_archived { 1 } else { 2 },
            }),
            context: Some(proto::Empty {}),
        };
        self.do_proto_send(
            &self.data_url(SET_ARCHIVED_PATH),
            &request,
            standard_options(),
        )
        .await
    }

    /// Sets the geographic location of a media item. The request carries
    /// a synthetic viewport around the point and a generic place id.
    pub async fn set_location(&self, item_key: &str, latitude: f64, longitude: f64) -> Result<()> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(PhotosError::Input(
                "latitude must be between -90 and 90".into(),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(PhotosError::Input(
                "longitude must be between -180 and 180".into(),
            ));
        }

        let scale = |deg: f64| (deg * COORDINATE_SCALE) as i32;
        let request = proto::SetLocationRequest {
            edit: Some(proto::LocationEdit {
                target: Some(proto::LocationTarget {
                    media_key: item_key.to_string(),
                }),
                place: Some(proto::LocationPlace {
                    action: 2,
                    coordinates: Some(proto::GeoPoint {
                        latitude: scale(latitude),
                        longitude: scale(longitude),
                    }),
                    viewport: Some(proto::GeoViewport {
                        south_west: Some(proto::GeoPoint {
                            latitude: scale(latitude - 0.3),
                            longitude: scale(longitude - 0.125),
                        }),
                        north_east: Some(proto::GeoPoint {
                            latitude: scale(latitude + 0.1),
                            longitude: scale(longitude + 0.125),
                        }),
                    }),
                    place_name: Some(proto::PlaceName {
                        name: String::new(),
                        f3: 1,
                    }),
                    place_id: GENERIC_PLACE_ID.to_string(),
                }),
            }),
        };
        self.do_proto_send(
            &self.data_url(SET_LOCATION_PATH),
            &request,
            standard_options(),
        )
        .await
    }

    /// Sets the capture time of one or more items; the timezone offset
    /// of the supplied timestamp travels with it.
    pub async fn set_datetime(
        &self,
        item_keys: &[String],
        timestamp: DateTime<FixedOffset>,
    ) -> Result<()> {
        let request = proto::SetDateTimeRequest {
            edit: Some(proto::DateTimeEdit {
                item_keys: item_keys.to_vec(),
                timestamp: timestamp.timestamp() as f64,
                timezone_offset: timestamp.offset().local_minus_utc(),
            }),
        };
        self.do_proto_send(
            &self.data_url(SET_DATETIME_PATH),
            &request,
            standard_options(),
        )
        .await
    }

    /// Performs a trash operation on a batch of items. Each action
    /// populates a specific side-field set; the trees here match the
    /// reference client capture and must not be simplified.
    pub async fn trash_action(&self, item_keys: &[String], action: TrashAction) -> Result<()> {
        let full_flags = proto::TrashScopeFlags {
            f2: Some(proto::Empty {}),
            f3: Some(proto::TrashScopeNested {
                f1: Some(proto::Empty {}),
            }),
            f4: Some(proto::Empty {}),
            f5: Some(proto::TrashScopeNested {
                f1: Some(proto::Empty {}),
            }),
        };
        let origin = proto::TrashOrigin {
            f1: 5,
            client: Some(proto::TrashClient {
                version_code: self.client_version_code(),
                api_version: self.device_info().2.to_string(),
            }),
        };

        let (kind, f4, flags, origin) = match action {
            TrashAction::MoveToTrash => (
                proto::TrashActionKind::MoveToTrash,
                1,
                full_flags,
                Some(origin),
            ),
            TrashAction::PermanentDelete => {
                (proto::TrashActionKind::PermanentDelete, 1, full_flags, None)
            }
            TrashAction::RestoreFromTrash => (
                proto::TrashActionKind::RestoreFromTrash,
                2,
                proto::TrashScopeFlags {
                    f2: Some(proto::Empty {}),
                    f3: Some(proto::TrashScopeNested {
                        f1: Some(proto::Empty {}),
                    }),
                    f4: None,
                    f5: None,
                },
                Some(origin),
            ),
        };

        let request = proto::TrashActionRequest {
            action: kind as i32,
            item_keys: item_keys.to_vec(),
            f4,
            scope: Some(proto::TrashScope { flags: Some(flags) }),
            origin,
        };
        self.do_proto_send(
            &self.data_url(TRASH_ACTION_PATH),
            &request,
            standard_options(),
        )
        .await
    }

    /// Moves items to the trash.
    pub async fn move_to_trash(&self, item_keys: &[String]) -> Result<()> {
        self.trash_action(item_keys, TrashAction::MoveToTrash).await
    }

    /// Restores items from the trash.
    pub async fn restore_from_trash(&self, item_keys: &[String]) -> Result<()> {
        self.trash_action(item_keys, TrashAction::RestoreFromTrash)
            .await
    }

    /// Deletes items immediately, bypassing the trash.
    pub async fn permanent_delete(&self, item_keys: &[String]) -> Result<()> {
        self.trash_action(item_keys, TrashAction::PermanentDelete)
            .await
    }
}

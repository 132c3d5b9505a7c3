//! Library enumeration: the schemaless state/page request trees and the
//! projection of replies into typed records.
//!
//! The request bodies are structural — dozens of empty sub-messages
//! acting as server-side feature toggles around a handful of varints and
//! strings. They are built with the primitive appenders and must stay
//! byte-identical to the reference capture; fields append in ascending
//! number within each nested message.

use crate::client::{PhotosClient, RequestOptions};
use crate::error::Result;
use crate::types::{Album, LibraryResponse, MediaItem};
use crate::wire::{
    append_bytes_field, append_empty_message, append_message, append_packed_varints,
    append_string_field, append_varint_field, decode_tree, Value,
};

const LIBRARY_STATE_PATH: &str = "/6439526531001121323/18047484249733410717";

// ---------------------------------------------------------------------------
// Request builders
// ---------------------------------------------------------------------------

/// Per-item field masks (section 1.1.1 of the request).
fn media_masks() -> Vec<u8> {
    let mut b = Vec::new();
    append_empty_message(&mut b, 1);
    append_empty_message(&mut b, 3);
    append_empty_message(&mut b, 4);

    let mut f5 = Vec::new();
    append_empty_message(&mut f5, 1);
    append_empty_message(&mut f5, 2);
    append_empty_message(&mut f5, 3);
    append_empty_message(&mut f5, 4);
    append_empty_message(&mut f5, 5);
    append_empty_message(&mut f5, 7);
    append_message(&mut b, 5, &f5);

    append_empty_message(&mut b, 6);

    let mut f7 = Vec::new();
    append_empty_message(&mut f7, 2);
    append_message(&mut b, 7, &f7);

    append_empty_message(&mut b, 15);
    append_empty_message(&mut b, 16);
    append_empty_message(&mut b, 17);
    append_empty_message(&mut b, 19);
    append_empty_message(&mut b, 20);

    let mut f21 = Vec::new();
    let mut f21_5 = Vec::new();
    append_empty_message(&mut f21_5, 3);
    append_message(&mut f21, 5, &f21_5);
    append_empty_message(&mut f21, 6);
    append_message(&mut b, 21, &f21);

    append_empty_message(&mut b, 25);

    let mut f30 = Vec::new();
    append_empty_message(&mut f30, 2);
    append_message(&mut b, 30, &f30);

    append_empty_message(&mut b, 31);
    append_empty_message(&mut b, 32);

    let mut f33 = Vec::new();
    append_empty_message(&mut f33, 1);
    append_message(&mut b, 33, &f33);

    append_empty_message(&mut b, 34);
    append_empty_message(&mut b, 36);
    append_empty_message(&mut b, 37);
    append_empty_message(&mut b, 38);
    append_empty_message(&mut b, 39);
    append_empty_message(&mut b, 40);
    append_empty_message(&mut b, 41);

    b
}

/// Rendition masks (section 1.1.5).
fn media_view_masks() -> Vec<u8> {
    let mut b = Vec::new();

    let mut f2 = Vec::new();
    let mut f2_2 = Vec::new();
    let mut f2_2_3 = Vec::new();
    append_empty_message(&mut f2_2_3, 2);
    append_message(&mut f2_2, 3, &f2_2_3);
    let mut f2_2_4 = Vec::new();
    append_empty_message(&mut f2_2_4, 2);
    append_empty_message(&mut f2_2_4, 4);
    append_message(&mut f2_2, 4, &f2_2_4);
    append_message(&mut f2, 2, &f2_2);
    let mut f2_4 = Vec::new();
    let mut f2_4_2 = Vec::new();
    append_varint_field(&mut f2_4_2, 2, 1);
    append_message(&mut f2_4, 2, &f2_4_2);
    append_message(&mut f2, 4, &f2_4);
    let mut f2_5 = Vec::new();
    append_empty_message(&mut f2_5, 2);
    append_message(&mut f2, 5, &f2_5);
    append_varint_field(&mut f2, 6, 1);
    append_message(&mut b, 2, &f2);

    let mut f3 = Vec::new();
    let mut f3_2 = Vec::new();
    append_empty_message(&mut f3_2, 3);
    append_empty_message(&mut f3_2, 4);
    append_message(&mut f3, 2, &f3_2);
    let mut f3_3 = Vec::new();
    append_empty_message(&mut f3_3, 2);
    let mut f3_3_3 = Vec::new();
    append_varint_field(&mut f3_3_3, 2, 1);
    append_message(&mut f3_3, 3, &f3_3_3);
    append_message(&mut f3, 3, &f3_3);
    append_empty_message(&mut f3, 4);
    let mut f3_5 = Vec::new();
    let mut f3_5_2 = Vec::new();
    append_varint_field(&mut f3_5_2, 2, 1);
    append_message(&mut f3_5, 2, &f3_5_2);
    append_message(&mut f3, 5, &f3_5);
    append_empty_message(&mut f3, 7);
    append_message(&mut b, 3, &f3);

    let mut f4 = Vec::new();
    let mut f4_2 = Vec::new();
    append_empty_message(&mut f4_2, 2);
    append_message(&mut f4, 2, &f4_2);
    append_message(&mut b, 4, &f4);

    let mut f5 = Vec::new();
    let mut f5_1 = Vec::new();
    let mut f5_1_2 = Vec::new();
    append_empty_message(&mut f5_1_2, 3);
    append_empty_message(&mut f5_1_2, 4);
    append_message(&mut f5_1, 2, &f5_1_2);
    let mut f5_1_3 = Vec::new();
    append_empty_message(&mut f5_1_3, 2);
    let mut f5_1_3_3 = Vec::new();
    append_varint_field(&mut f5_1_3_3, 2, 1);
    append_message(&mut f5_1_3, 3, &f5_1_3_3);
    append_message(&mut f5_1, 3, &f5_1_3);
    append_message(&mut f5, 1, &f5_1);
    append_varint_field(&mut f5, 3, 1);
    append_message(&mut b, 5, &f5);

    b
}

/// Suggestion masks (section 1.1.9).
fn media_suggestion_masks() -> Vec<u8> {
    let mut b = Vec::new();
    append_empty_message(&mut b, 2);
    let mut f3 = Vec::new();
    append_empty_message(&mut f3, 1);
    append_empty_message(&mut f3, 2);
    append_message(&mut b, 3, &f3);

    let mut f4 = Vec::new();
    let mut f4_1 = Vec::new();
    let mut f4_1_3 = Vec::new();
    let mut f4_1_3_1 = Vec::new();
    let mut f4_1_3_1_1 = Vec::new();
    let mut f4_1_3_1_1_5 = Vec::new();
    append_empty_message(&mut f4_1_3_1_1_5, 1);
    append_message(&mut f4_1_3_1_1, 5, &f4_1_3_1_1_5);
    append_empty_message(&mut f4_1_3_1_1, 6);
    append_empty_message(&mut f4_1_3_1_1, 7);
    append_message(&mut f4_1_3_1, 1, &f4_1_3_1_1);
    append_empty_message(&mut f4_1_3_1, 2);
    let mut f4_1_3_1_3 = Vec::new();
    let mut f4_1_3_1_3_1 = Vec::new();
    let mut f4_1_3_1_3_1_5 = Vec::new();
    append_empty_message(&mut f4_1_3_1_3_1_5, 1);
    append_message(&mut f4_1_3_1_3_1, 5, &f4_1_3_1_3_1_5);
    append_empty_message(&mut f4_1_3_1_3_1, 6);
    append_empty_message(&mut f4_1_3_1_3_1, 7);
    append_message(&mut f4_1_3_1_3, 1, &f4_1_3_1_3_1);
    append_empty_message(&mut f4_1_3_1_3, 2);
    append_message(&mut f4_1_3_1, 3, &f4_1_3_1_3);
    append_message(&mut f4_1_3, 1, &f4_1_3_1);
    append_message(&mut f4_1, 3, &f4_1_3);
    let mut f4_1_4 = Vec::new();
    let mut f4_1_4_1 = Vec::new();
    append_empty_message(&mut f4_1_4_1, 2);
    append_message(&mut f4_1_4, 1, &f4_1_4_1);
    append_message(&mut f4_1, 4, &f4_1_4);
    append_message(&mut f4, 1, &f4_1);
    append_message(&mut b, 4, &f4);

    b
}

/// Media section masks (section 1.1).
fn media_section() -> Vec<u8> {
    let mut b = Vec::new();

    append_message(&mut b, 1, &media_masks());
    append_message(&mut b, 5, &media_view_masks());
    append_empty_message(&mut b, 8);
    append_message(&mut b, 9, &media_suggestion_masks());

    let mut f11 = Vec::new();
    append_empty_message(&mut f11, 2);
    append_empty_message(&mut f11, 3);
    let mut f11_4 = Vec::new();
    let mut f11_4_2 = Vec::new();
    append_varint_field(&mut f11_4_2, 1, 1);
    append_varint_field(&mut f11_4_2, 2, 2);
    append_message(&mut f11_4, 2, &f11_4_2);
    append_message(&mut f11, 4, &f11_4);
    append_message(&mut b, 11, &f11);

    append_empty_message(&mut b, 12);

    let mut f14 = Vec::new();
    append_empty_message(&mut f14, 2);
    append_empty_message(&mut f14, 3);
    let mut f14_4 = Vec::new();
    let mut f14_4_2 = Vec::new();
    append_varint_field(&mut f14_4_2, 1, 1);
    append_varint_field(&mut f14_4_2, 2, 2);
    append_message(&mut f14_4, 2, &f14_4_2);
    append_message(&mut f14, 4, &f14_4);
    append_message(&mut b, 14, &f14);

    let mut f15 = Vec::new();
    append_empty_message(&mut f15, 1);
    append_empty_message(&mut f15, 4);
    append_message(&mut b, 15, &f15);

    let mut f17 = Vec::new();
    append_empty_message(&mut f17, 1);
    append_empty_message(&mut f17, 4);
    append_message(&mut b, 17, &f17);

    let mut f19 = Vec::new();
    append_empty_message(&mut f19, 2);
    append_empty_message(&mut f19, 3);
    let mut f19_4 = Vec::new();
    let mut f19_4_2 = Vec::new();
    append_varint_field(&mut f19_4_2, 1, 1);
    append_varint_field(&mut f19_4_2, 2, 2);
    append_message(&mut f19_4, 2, &f19_4_2);
    append_message(&mut f19, 4, &f19_4);
    append_message(&mut b, 19, &f19);

    let mut f21 = Vec::new();
    append_empty_message(&mut f21, 1);
    append_message(&mut b, 21, &f21);

    append_empty_message(&mut b, 22);
    append_empty_message(&mut b, 23);

    b
}

/// Collection masks (section 1.2).
fn collection_masks() -> Vec<u8> {
    let mut b = Vec::new();

    let mut f1 = Vec::new();
    append_empty_message(&mut f1, 2);
    append_empty_message(&mut f1, 3);
    append_empty_message(&mut f1, 4);
    append_empty_message(&mut f1, 5);
    let mut f1_6 = Vec::new();
    append_empty_message(&mut f1_6, 1);
    append_empty_message(&mut f1_6, 2);
    append_empty_message(&mut f1_6, 3);
    append_empty_message(&mut f1_6, 4);
    append_empty_message(&mut f1_6, 5);
    append_empty_message(&mut f1_6, 7);
    append_message(&mut f1, 6, &f1_6);
    append_empty_message(&mut f1, 7);
    append_empty_message(&mut f1, 8);
    append_empty_message(&mut f1, 10);
    append_empty_message(&mut f1, 12);
    let mut f1_13 = Vec::new();
    append_empty_message(&mut f1_13, 2);
    append_empty_message(&mut f1_13, 3);
    append_message(&mut f1, 13, &f1_13);
    let mut f1_15 = Vec::new();
    append_empty_message(&mut f1_15, 1);
    append_message(&mut f1, 15, &f1_15);
    append_empty_message(&mut f1, 18);
    append_message(&mut b, 1, &f1);

    let mut f4 = Vec::new();
    append_empty_message(&mut f4, 1);
    append_message(&mut b, 4, &f4);

    append_empty_message(&mut b, 9);

    let mut f11 = Vec::new();
    let mut f11_1 = Vec::new();
    append_empty_message(&mut f11_1, 1);
    append_empty_message(&mut f11_1, 4);
    append_empty_message(&mut f11_1, 5);
    append_empty_message(&mut f11_1, 6);
    append_empty_message(&mut f11_1, 9);
    append_message(&mut f11, 1, &f11_1);
    append_message(&mut b, 11, &f11);

    let mut f14 = Vec::new();
    let mut f14_1 = Vec::new();
    let mut f14_1_1 = Vec::new();
    append_empty_message(&mut f14_1_1, 1);
    let mut f14_1_1_2 = Vec::new();
    let mut f14_1_1_2_2 = Vec::new();
    let mut f14_1_1_2_2_1 = Vec::new();
    append_empty_message(&mut f14_1_1_2_2_1, 1);
    append_message(&mut f14_1_1_2_2, 1, &f14_1_1_2_2_1);
    append_empty_message(&mut f14_1_1_2_2, 3);
    append_message(&mut f14_1_1_2, 2, &f14_1_1_2_2);
    append_message(&mut f14_1_1, 2, &f14_1_1_2);
    let mut f14_1_1_3 = Vec::new();
    let mut f14_1_1_3_4 = Vec::new();
    let mut f14_1_1_3_4_1 = Vec::new();
    append_empty_message(&mut f14_1_1_3_4_1, 1);
    append_message(&mut f14_1_1_3_4, 1, &f14_1_1_3_4_1);
    append_empty_message(&mut f14_1_1_3_4, 3);
    append_message(&mut f14_1_1_3, 4, &f14_1_1_3_4);
    let mut f14_1_1_3_5 = Vec::new();
    let mut f14_1_1_3_5_1 = Vec::new();
    append_empty_message(&mut f14_1_1_3_5_1, 1);
    append_message(&mut f14_1_1_3_5, 1, &f14_1_1_3_5_1);
    append_empty_message(&mut f14_1_1_3_5, 3);
    append_message(&mut f14_1_1_3, 5, &f14_1_1_3_5);
    append_message(&mut f14_1_1, 3, &f14_1_1_3);
    append_message(&mut f14_1, 1, &f14_1_1);
    append_empty_message(&mut f14_1, 2);
    append_message(&mut f14, 1, &f14_1);
    append_message(&mut b, 14, &f14);

    append_empty_message(&mut b, 17);

    let mut f18 = Vec::new();
    append_empty_message(&mut f18, 1);
    let mut f18_2 = Vec::new();
    append_empty_message(&mut f18_2, 1);
    append_message(&mut f18, 2, &f18_2);
    append_message(&mut b, 18, &f18);

    let mut f20 = Vec::new();
    let mut f20_2 = Vec::new();
    append_empty_message(&mut f20_2, 1);
    append_empty_message(&mut f20_2, 2);
    append_message(&mut f20, 2, &f20_2);
    append_message(&mut b, 20, &f20);

    append_empty_message(&mut b, 22);
    append_empty_message(&mut b, 23);
    append_empty_message(&mut b, 24);

    b
}

/// Settings and system masks (section 1.3).
fn settings_masks() -> Vec<u8> {
    let mut b = Vec::new();

    append_empty_message(&mut b, 2);

    let mut f3 = Vec::new();
    append_empty_message(&mut f3, 2);
    append_empty_message(&mut f3, 3);
    append_empty_message(&mut f3, 7);
    append_empty_message(&mut f3, 8);
    let mut f3_14 = Vec::new();
    append_empty_message(&mut f3_14, 1);
    append_message(&mut f3, 14, &f3_14);
    append_empty_message(&mut f3, 16);
    let mut f3_17 = Vec::new();
    append_empty_message(&mut f3_17, 2);
    append_message(&mut f3, 17, &f3_17);
    append_empty_message(&mut f3, 18);
    append_empty_message(&mut f3, 19);
    append_empty_message(&mut f3, 20);
    append_empty_message(&mut f3, 21);
    append_empty_message(&mut f3, 22);
    append_empty_message(&mut f3, 23);
    let mut f3_27 = Vec::new();
    append_empty_message(&mut f3_27, 1);
    let mut f3_27_2 = Vec::new();
    append_empty_message(&mut f3_27_2, 1);
    append_message(&mut f3_27, 2, &f3_27_2);
    append_message(&mut f3, 27, &f3_27);
    append_empty_message(&mut f3, 29);
    append_empty_message(&mut f3, 30);
    append_empty_message(&mut f3, 31);
    append_empty_message(&mut f3, 32);
    append_empty_message(&mut f3, 34);
    append_empty_message(&mut f3, 37);
    append_empty_message(&mut f3, 38);
    append_empty_message(&mut f3, 39);
    append_empty_message(&mut f3, 41);
    let mut f3_43 = Vec::new();
    append_empty_message(&mut f3_43, 1);
    append_message(&mut f3, 43, &f3_43);
    let mut f3_45 = Vec::new();
    let mut f3_45_1 = Vec::new();
    append_empty_message(&mut f3_45_1, 1);
    append_message(&mut f3_45, 1, &f3_45_1);
    append_message(&mut f3, 45, &f3_45);
    let mut f3_46 = Vec::new();
    append_empty_message(&mut f3_46, 1);
    append_empty_message(&mut f3_46, 2);
    append_empty_message(&mut f3_46, 3);
    append_message(&mut f3, 46, &f3_46);
    append_empty_message(&mut f3, 47);
    append_message(&mut b, 3, &f3);

    let mut f4 = Vec::new();
    append_empty_message(&mut f4, 2);
    let mut f4_3 = Vec::new();
    append_empty_message(&mut f4_3, 1);
    append_message(&mut f4, 3, &f4_3);
    append_empty_message(&mut f4, 4);
    let mut f4_5 = Vec::new();
    append_empty_message(&mut f4_5, 1);
    append_message(&mut f4, 5, &f4_5);
    append_message(&mut b, 4, &f4);

    append_empty_message(&mut b, 7);
    append_empty_message(&mut b, 12);
    append_empty_message(&mut b, 13);

    let mut f14 = Vec::new();
    append_empty_message(&mut f14, 1);
    let mut f14_2 = Vec::new();
    append_empty_message(&mut f14_2, 1);
    let mut f14_2_2 = Vec::new();
    append_empty_message(&mut f14_2_2, 1);
    append_message(&mut f14_2, 2, &f14_2_2);
    append_empty_message(&mut f14_2, 3);
    let mut f14_2_4 = Vec::new();
    append_empty_message(&mut f14_2_4, 1);
    append_message(&mut f14_2, 4, &f14_2_4);
    append_message(&mut f14, 2, &f14_2);
    let mut f14_3 = Vec::new();
    append_empty_message(&mut f14_3, 1);
    let mut f14_3_2 = Vec::new();
    append_empty_message(&mut f14_3_2, 1);
    append_message(&mut f14_3, 2, &f14_3_2);
    append_empty_message(&mut f14_3, 3);
    append_empty_message(&mut f14_3, 4);
    append_message(&mut f14, 3, &f14_3);
    append_message(&mut b, 14, &f14);

    append_empty_message(&mut b, 15);

    let mut f16 = Vec::new();
    append_empty_message(&mut f16, 1);
    append_message(&mut b, 16, &f16);

    append_empty_message(&mut b, 18);

    let mut f19 = Vec::new();
    let mut f19_4 = Vec::new();
    append_empty_message(&mut f19_4, 2);
    append_message(&mut f19, 4, &f19_4);
    let mut f19_6 = Vec::new();
    append_empty_message(&mut f19_6, 2);
    append_empty_message(&mut f19_6, 3);
    append_message(&mut f19, 6, &f19_6);
    let mut f19_7 = Vec::new();
    append_empty_message(&mut f19_7, 2);
    append_empty_message(&mut f19_7, 3);
    append_message(&mut f19, 7, &f19_7);
    append_empty_message(&mut f19, 8);
    append_empty_message(&mut f19, 9);
    append_message(&mut b, 19, &f19);

    append_empty_message(&mut b, 20);
    append_empty_message(&mut b, 22);
    append_empty_message(&mut b, 24);
    append_empty_message(&mut b, 25);
    append_empty_message(&mut b, 26);

    b
}

/// Feed options (section 1.9).
fn feed_options() -> Vec<u8> {
    let mut b = Vec::new();

    let mut f1 = Vec::new();
    let mut f1_2 = Vec::new();
    append_empty_message(&mut f1_2, 1);
    append_empty_message(&mut f1_2, 2);
    append_message(&mut f1, 2, &f1_2);
    append_message(&mut b, 1, &f1);

    let mut f2 = Vec::new();
    let mut f2_3 = Vec::new();
    append_varint_field(&mut f2_3, 2, 1);
    append_message(&mut f2, 3, &f2_3);
    append_message(&mut b, 2, &f2);

    let mut f3 = Vec::new();
    append_empty_message(&mut f3, 2);
    append_message(&mut b, 3, &f3);

    append_empty_message(&mut b, 4);

    let mut f7 = Vec::new();
    append_empty_message(&mut f7, 1);
    append_message(&mut b, 7, &f7);

    let mut f8 = Vec::new();
    append_varint_field(&mut f8, 1, 2);
    append_bytes_field(&mut f8, 2, &[0x01, 0x02, 0x03, 0x05, 0x06, 0x07]);
    append_message(&mut b, 8, &f8);

    append_empty_message(&mut b, 9);

    let mut f11 = Vec::new();
    append_empty_message(&mut f11, 1);
    append_message(&mut b, 11, &f11);

    b
}

/// Feature-flag block shared by the section-18 map entry and the
/// printing promotion options.
fn sync_feature_flags() -> Vec<u8> {
    let mut inner = Vec::new();
    append_packed_varints(&mut inner, 4, &[2, 1, 6, 8, 10, 15, 18, 13, 17, 19, 14, 20]);
    append_varint_field(&mut inner, 5, 6);
    append_varint_field(&mut inner, 6, 2);
    append_varint_field(&mut inner, 7, 1);
    append_varint_field(&mut inner, 8, 2);
    append_varint_field(&mut inner, 11, 3);
    append_varint_field(&mut inner, 12, 1);
    append_varint_field(&mut inner, 13, 3);
    append_varint_field(&mut inner, 15, 1);
    append_varint_field(&mut inner, 16, 1);
    append_varint_field(&mut inner, 17, 1);
    append_varint_field(&mut inner, 18, 2);
    inner
}

/// Section-18 map value.
fn sync_flags_entry() -> Vec<u8> {
    let mut f1_inner = Vec::new();
    append_message(&mut f1_inner, 1, &sync_feature_flags());

    let mut f1 = Vec::new();
    append_message(&mut f1, 1, &f1_inner);
    f1
}

/// Filter masks (section 1.19).
fn filter_masks() -> Vec<u8> {
    let mut b = Vec::new();

    let mut f1 = Vec::new();
    append_empty_message(&mut f1, 1);
    append_empty_message(&mut f1, 2);
    append_message(&mut b, 1, &f1);

    let mut f2 = Vec::new();
    append_packed_varints(&mut f2, 1, &[1, 2, 4, 6, 5, 7]);
    append_message(&mut b, 2, &f2);

    let mut f3 = Vec::new();
    append_empty_message(&mut f3, 1);
    append_empty_message(&mut f3, 2);
    append_message(&mut b, 3, &f3);

    let mut f5 = Vec::new();
    append_empty_message(&mut f5, 1);
    append_empty_message(&mut f5, 2);
    append_message(&mut b, 5, &f5);

    let mut f6 = Vec::new();
    append_empty_message(&mut f6, 1);
    append_message(&mut b, 6, &f6);

    let mut f7 = Vec::new();
    append_empty_message(&mut f7, 1);
    append_empty_message(&mut f7, 2);
    append_message(&mut b, 7, &f7);

    let mut f8 = Vec::new();
    append_empty_message(&mut f8, 1);
    append_message(&mut b, 8, &f8);

    b
}

/// Printing promotion sync options (section 1.20).
fn printing_options() -> Vec<u8> {
    let mut b = Vec::new();
    append_varint_field(&mut b, 1, 1);

    let mut f3 = Vec::new();
    append_string_field(
        &mut f3,
        1,
        "type.googleapis.com/photos.printing.client.PrintingPromotionSyncOptions",
    );
    let mut f3_2 = Vec::new();
    append_message(&mut f3_2, 1, &sync_feature_flags());
    append_message(&mut f3, 2, &f3_2);
    append_message(&mut b, 3, &f3);

    b
}

/// Sync scope (section 1.21); the state variant asks for extra blocks.
fn sync_scope(for_state: bool) -> Vec<u8> {
    let mut b = Vec::new();

    let mut f2 = Vec::new();
    let mut f2_2 = Vec::new();
    append_empty_message(&mut f2_2, 4);
    append_message(&mut f2, 2, &f2_2);
    append_empty_message(&mut f2, 4);
    append_empty_message(&mut f2, 5);
    append_message(&mut b, 2, &f2);

    let mut f3 = Vec::new();
    let mut f3_2 = Vec::new();
    append_varint_field(&mut f3_2, 1, 1);
    append_message(&mut f3, 2, &f3_2);
    if for_state {
        let mut f3_4 = Vec::new();
        append_empty_message(&mut f3_4, 2);
        append_message(&mut f3, 4, &f3_4);
    }
    append_message(&mut b, 3, &f3);

    let mut f5 = Vec::new();
    append_empty_message(&mut f5, 1);
    append_message(&mut b, 5, &f5);

    let mut f6 = Vec::new();
    append_empty_message(&mut f6, 1);
    let mut f6_2 = Vec::new();
    append_empty_message(&mut f6_2, 1);
    append_message(&mut f6, 2, &f6_2);
    append_message(&mut b, 6, &f6);

    let mut f7 = Vec::new();
    append_varint_field(&mut f7, 1, 2);
    if for_state {
        append_bytes_field(
            &mut f7,
            2,
            b"\x01\x07\x08\x09\x0a\x0d\x0e\x0f\x11\x13\x14\x16\x17-./01:\x06\x18267;>?@A89<GBED",
        );
    } else {
        append_bytes_field(
            &mut f7,
            2,
            b"\x01\x07\x08\x09\x0a\x0d\x0e\x0f\x11\x13\x14\x16\x17-./01:\x06\x18267;>?@A89<",
        );
    }
    append_bytes_field(&mut f7, 3, &[0x01]);
    append_message(&mut b, 7, &f7);

    let mut f8 = Vec::new();
    let mut f8_3 = Vec::new();
    let mut f8_3_1 = Vec::new();
    let mut f8_3_1_1 = Vec::new();
    let mut f8_3_1_1_2 = Vec::new();
    append_varint_field(&mut f8_3_1_1_2, 1, 1);
    append_message(&mut f8_3_1_1, 2, &f8_3_1_1_2);
    if for_state {
        let mut f8_3_1_1_4 = Vec::new();
        append_empty_message(&mut f8_3_1_1_4, 2);
        append_message(&mut f8_3_1_1, 4, &f8_3_1_1_4);
    }
    append_message(&mut f8_3_1, 1, &f8_3_1_1);
    if for_state {
        append_empty_message(&mut f8_3, 3);
    }
    append_message(&mut f8_3, 1, &f8_3_1);
    append_message(&mut f8, 3, &f8_3);
    let mut f8_4 = Vec::new();
    append_empty_message(&mut f8_4, 1);
    append_message(&mut f8, 4, &f8_4);
    if for_state {
        let mut f8_5 = Vec::new();
        let mut f8_5_1 = Vec::new();
        let mut f8_5_1_2 = Vec::new();
        append_varint_field(&mut f8_5_1_2, 1, 1);
        append_message(&mut f8_5_1, 2, &f8_5_1_2);
        let mut f8_5_1_4 = Vec::new();
        append_empty_message(&mut f8_5_1_4, 2);
        append_message(&mut f8_5_1, 4, &f8_5_1_4);
        append_message(&mut f8_5, 1, &f8_5_1);
        append_message(&mut f8, 5, &f8_5);
    }
    append_message(&mut b, 8, &f8);

    let mut f9 = Vec::new();
    append_empty_message(&mut f9, 1);
    append_message(&mut b, 9, &f9);

    let mut f10 = Vec::new();
    let mut f10_1 = Vec::new();
    append_empty_message(&mut f10_1, 1);
    append_message(&mut f10, 1, &f10_1);
    append_empty_message(&mut f10, 3);
    append_empty_message(&mut f10, 5);
    let mut f10_6 = Vec::new();
    append_empty_message(&mut f10_6, 1);
    append_message(&mut f10, 6, &f10_6);
    append_empty_message(&mut f10, 7);
    append_empty_message(&mut f10, 9);
    append_empty_message(&mut f10, 10);
    append_message(&mut b, 10, &f10);

    append_empty_message(&mut b, 11);
    append_empty_message(&mut b, 12);
    append_empty_message(&mut b, 13);

    if for_state {
        append_empty_message(&mut b, 14);
    }

    let mut f16 = Vec::new();
    append_empty_message(&mut f16, 1);
    append_message(&mut b, 16, &f16);

    b
}

/// Trailing masks (section 1.25).
fn tail_masks() -> Vec<u8> {
    let mut b = Vec::new();

    let mut f1 = Vec::new();
    let mut f1_1 = Vec::new();
    let mut f1_1_1 = Vec::new();
    append_empty_message(&mut f1_1_1, 1);
    append_message(&mut f1_1, 1, &f1_1_1);
    append_message(&mut f1, 1, &f1_1);
    append_message(&mut b, 1, &f1);

    append_empty_message(&mut b, 2);

    b
}

/// Main request section (field 1 of the envelope).
fn main_section(state_token: &str, page_token: &str, for_state: bool) -> Vec<u8> {
    let mut b = Vec::new();

    append_message(&mut b, 1, &media_section());
    append_message(&mut b, 2, &collection_masks());
    append_message(&mut b, 3, &settings_masks());

    // Page token only travels on page requests, the state token on
    // anything that refreshes state.
    append_string_field(&mut b, 4, page_token);
    append_string_field(&mut b, 6, state_token);

    append_varint_field(&mut b, 7, 2);
    append_message(&mut b, 9, &feed_options());

    if for_state {
        append_packed_varints(&mut b, 11, &[1, 2, 6]);
    } else {
        append_packed_varints(&mut b, 11, &[1, 2]);
    }

    let mut f12 = Vec::new();
    let mut f12_2 = Vec::new();
    append_empty_message(&mut f12_2, 1);
    append_empty_message(&mut f12_2, 2);
    append_message(&mut f12, 2, &f12_2);
    let mut f12_3 = Vec::new();
    append_empty_message(&mut f12_3, 1);
    append_message(&mut f12, 3, &f12_3);
    append_empty_message(&mut f12, 4);
    append_message(&mut b, 12, &f12);

    append_empty_message(&mut b, 13);

    let mut f15 = Vec::new();
    let mut f15_3 = Vec::new();
    append_varint_field(&mut f15_3, 1, 1);
    append_message(&mut f15, 3, &f15_3);
    append_message(&mut b, 15, &f15);

    // Map entry keyed by a fixed feature id.
    let mut f18 = Vec::new();
    append_varint_field(&mut f18, 1, 169_945_741);
    append_message(&mut f18, 2, &sync_flags_entry());
    append_message(&mut b, 18, &f18);

    append_message(&mut b, 19, &filter_masks());
    append_message(&mut b, 20, &printing_options());
    append_message(&mut b, 21, &sync_scope(for_state));

    let mut f22 = Vec::new();
    if for_state {
        append_varint_field(&mut f22, 1, 1);
        append_string_field(&mut f22, 2, "107818234414673686888");
    } else {
        append_varint_field(&mut f22, 1, 2);
    }
    append_message(&mut b, 22, &f22);

    append_message(&mut b, 25, &tail_masks());

    if for_state {
        append_empty_message(&mut b, 26);
    }

    b
}

/// Outer envelope (field 2).
fn envelope() -> Vec<u8> {
    let mut b = Vec::new();

    let mut f1 = Vec::new();
    let mut f1_1 = Vec::new();
    let mut f1_1_1 = Vec::new();
    append_empty_message(&mut f1_1_1, 1);
    append_message(&mut f1_1, 1, &f1_1_1);
    append_empty_message(&mut f1_1, 2);
    append_message(&mut f1, 1, &f1_1);
    append_empty_message(&mut f1, 2);
    append_message(&mut b, 1, &f1);

    append_empty_message(&mut b, 2);

    b
}

/// Full request body for a state refresh.
pub fn build_state_request(state_token: &str) -> Vec<u8> {
    let mut b = Vec::new();
    append_message(&mut b, 1, &main_section(state_token, "", true));
    append_message(&mut b, 2, &envelope());
    b
}

/// Full request body for the first page of an enumeration.
pub fn build_page_init_request(page_token: &str) -> Vec<u8> {
    let mut b = Vec::new();
    append_message(&mut b, 1, &main_section("", page_token, false));
    append_message(&mut b, 2, &envelope());
    b
}

/// Full request body for a subsequent page.
pub fn build_page_request(page_token: &str, state_token: &str) -> Vec<u8> {
    let mut b = Vec::new();
    append_message(&mut b, 1, &main_section(state_token, page_token, false));
    append_message(&mut b, 2, &envelope());
    b
}

// ---------------------------------------------------------------------------
// Response projection
// ---------------------------------------------------------------------------

fn text_at(value: &Value, path: &[u32]) -> String {
    value
        .path(path)
        .and_then(Value::text)
        .unwrap_or("")
        .to_string()
}

fn int_at(value: &Value, path: &[u32]) -> i64 {
    value.path(path).and_then(Value::as_i64).unwrap_or(0)
}

fn parse_media_item(item: &Value) -> MediaItem {
    let mut media = MediaItem {
        media_key: text_at(item, &[1]),
        filename: text_at(item, &[2, 4]),
        caption: text_at(item, &[2, 3]),
        creation_timestamp: int_at(item, &[2, 7]),
        file_size: int_at(item, &[2, 10]),
        dedup_key: text_at(item, &[2, 13, 1]),
        album_media_key: text_at(item, &[2, 1, 1]),
        is_in_trash: int_at(item, &[2, 16, 1]) == 2,
        trashed_at: int_at(item, &[2, 16, 3]),
        is_video: int_at(item, &[5, 1]) == 2,
        ..MediaItem::default()
    };

    if media.is_video {
        media.download_url = text_at(item, &[5, 3, 5]);
        media.thumbnail_url = text_at(item, &[5, 3, 2, 1]);
        media.width = int_at(item, &[5, 3, 2, 2]) as u32;
        media.height = int_at(item, &[5, 3, 2, 3]) as u32;
    } else {
        media.download_url = text_at(item, &[5, 2, 6]);
        media.thumbnail_url = text_at(item, &[5, 2, 1, 1]);
        media.width = int_at(item, &[5, 2, 1, 2]) as u32;
        media.height = int_at(item, &[5, 2, 1, 3]) as u32;
    }

    media
}

fn parse_album(item: &Value) -> Album {
    Album {
        album_key: text_at(item, &[1]),
        name: text_at(item, &[2, 5]),
        item_count: int_at(item, &[2, 7]),
        cover_key: text_at(item, &[2, 17, 1]),
    }
}

/// Projects a raw library reply onto [`LibraryResponse`]. Parsing is
/// total: missing fields become zero values and an unrecognisable
/// layout yields an empty response rather than an error.
pub fn parse_library_response(data: &[u8]) -> LibraryResponse {
    let mut response = LibraryResponse::default();

    let Ok(Some(root)) = decode_tree(data) else {
        return response;
    };
    let Some(body) = root.field(1) else {
        return response;
    };

    response.state_token = text_at(body, &[6]);
    response.page_token = text_at(body, &[5]);

    if let Some(items) = body.field(2) {
        response.media_items = items
            .items()
            .filter(|v| matches!(v, Value::Message(_)))
            .map(parse_media_item)
            .collect();
    }
    if let Some(albums) = body.field(3) {
        response.albums = albums
            .items()
            .filter(|v| matches!(v, Value::Message(_)))
            .map(parse_album)
            .collect();
    }

    response
}

impl PhotosClient {
    async fn library_request(&self, body: Vec<u8>) -> Result<LibraryResponse> {
        let (bytes, _) = self
            .do_request(
                &self.data_url(LIBRARY_STATE_PATH),
                body,
                RequestOptions::new().auth().common_headers().check_status(),
            )
            .await?;
        Ok(parse_library_response(&bytes))
    }

    /// Fetches the library state; an empty `state_token` starts from
    /// scratch.
    pub async fn library_state(&self, state_token: &str) -> Result<LibraryResponse> {
        self.library_request(build_state_request(state_token)).await
    }

    /// Fetches the first page of an enumeration.
    pub async fn library_page_init(&self, page_token: &str) -> Result<LibraryResponse> {
        self.library_request(build_page_init_request(page_token))
            .await
    }

    /// Fetches a subsequent page.
    pub async fn library_page(
        &self,
        page_token: &str,
        state_token: &str,
    ) -> Result<LibraryResponse> {
        self.library_request(build_page_request(page_token, state_token))
            .await
    }

    /// Fetches the library state and returns the decoded tree as JSON
    /// keyed by field numbers; useful when mapping layout changes.
    pub async fn library_state_json(&self, state_token: &str) -> Result<serde_json::Value> {
        let (bytes, _) = self
            .do_request(
                &self.data_url(LIBRARY_STATE_PATH),
                build_state_request(state_token),
                RequestOptions::new().auth().common_headers().check_status(),
            )
            .await?;
        crate::wire::decode_to_json(&bytes)
    }
}

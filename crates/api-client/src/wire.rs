//! Request and response envelopes for the Blueprint HTTP API.
//!
//! Entity payloads reuse the domain types from `blueprint-core`; only the wrapping objects are
//! defined here.

use blueprint_core::monitor::RedFlag;
use blueprint_core::vault::{Comparison, Photo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `PUT /blueprint/sections/{sectionKey}`.
#[derive(Debug, Serialize)]
pub(crate) struct SaveSectionReq {
    pub data: Map<String, Value>,
}

/// Body of `POST /vault/before-after`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateComparisonReq<'a> {
    pub before_photo_id: &'a str,
    pub after_photo_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotoListRes {
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ComparisonListRes {
    #[serde(default)]
    pub comparisons: Vec<Comparison>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ComparisonRes {
    pub comparison: Comparison,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RedFlagListRes {
    #[serde(default)]
    pub red_flags: Vec<RedFlag>,
}

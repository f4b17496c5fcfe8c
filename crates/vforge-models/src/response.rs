//! JSON response bodies.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Body returned when a job publishes its artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    pub success: bool,
    pub download_url: String,
}

impl TransformResponse {
    pub fn success(download_url: impl Into<String>) -> Self {
        Self {
            success: true,
            download_url: download_url.into(),
        }
    }
}

/// Body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

//! Request and response bodies of the HTTP API

use serde::{Deserialize, Serialize};

use crate::validation::{Code, ValidationOptions};

/// Body of `POST /validate`. Every field may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidateRequest {
    pub prompt_text: String,
    pub image_urls: String,
    /// Falls back to the server's default options when absent
    pub options: Option<ValidationOptions>,
}

/// Returned with a 400 when the caller asked for rejections to be signalled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedResponse {
    pub status_code: Code,
    pub error_message: String,
}

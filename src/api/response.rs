//! Response envelope shared by every API endpoint
//!
//! Responses look like `{"spHeader": {...}, "spData": {...}}`. The header
//! carries the rolling CSRF token, the authentication level, and any errors.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{PewError, PewResult};

/// Authentication level reported once the device is trusted
pub const AUTH_LEVEL_USER_REMEMBERED: &str = "USER_REMEMBERED";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpHeader {
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub csrf: Option<String>,

    #[serde(default)]
    pub auth_level: Option<String>,

    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default)]
    pub code: Option<i64>,

    #[serde(default)]
    pub message: String,
}

impl SpHeader {
    /// The first error message, if the service reported a failure
    pub fn error_message(&self) -> Option<String> {
        if let Some(first) = self.errors.first() {
            return Some(match first.code {
                Some(code) if first.message.is_empty() => format!("error code {}", code),
                _ => first.message.clone(),
            });
        }
        match self.success {
            Some(false) => Some("request was not successful".to_string()),
            _ => None,
        }
    }

    pub fn is_user_remembered(&self) -> bool {
        self.auth_level.as_deref() == Some(AUTH_LEVEL_USER_REMEMBERED)
    }
}

/// A parsed response envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(default)]
    pub sp_header: SpHeader,

    #[serde(default)]
    pub sp_data: Option<Value>,
}

impl ApiResponse {
    /// Parse a raw JSON body
    pub fn from_value(endpoint: &str, body: Value) -> PewResult<Self> {
        serde_json::from_value(body)
            .map_err(|e| PewError::api(endpoint, format!("unexpected response shape: {}", e)))
    }

    /// Deserialize `spData`, failing if the service reported an error or sent none
    pub fn into_data<T: DeserializeOwned>(self, endpoint: &str) -> PewResult<T> {
        if let Some(message) = self.sp_header.error_message() {
            return Err(PewError::api(endpoint, message));
        }
        let data = self
            .sp_data
            .ok_or_else(|| PewError::api(endpoint, "response has no spData"))?;
        serde_json::from_value(data)
            .map_err(|e| PewError::api(endpoint, format!("unexpected spData shape: {}", e)))
    }
}

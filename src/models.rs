use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One published message. Immutable once created; the id is assigned by
/// storage and `created_at` is assigned server-side at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub text: String,
    pub recipient_label: String,
    pub created_at: DateTime<Utc>,
}

/// Daily submission counter for one source IP. `count` covers the local
/// calendar day of `last_request_at`; a submission on any other day resets
/// it to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitRecord {
    pub count: u32,
    pub last_request_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub text: String,
    #[serde(default)]
    pub recipient_label: String,
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

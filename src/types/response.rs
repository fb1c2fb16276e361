use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const MIME_JSON: &str = "application/json";

/// Standard body shape for every JSON response from the SharePay backend.
///
/// A `success` of `false` is an application-level failure even when the
/// transport status is 2xx; the client maps it to the same error as a non-2xx
/// response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct ResponseEnvelope<T: Serialize + DeserializeOwned> {
    #[serde(default = "success_default")]
    pub success: bool,

    #[serde(default)]
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

// Some endpoints omit the flag on success bodies.
fn success_default() -> bool {
    true
}

impl<T: Serialize + DeserializeOwned> ResponseEnvelope<T> {
    /// Envelope for a 204/205 response that carries no body at all.
    pub fn no_content() -> Self {
        Self {
            success: true,
            message: String::new(),
            code: None,
            data: None,
            timestamp: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_envelope() {
        let raw = r#"{"success":true,"message":"ok","data":{"id":"app_1"},"timestamp":"2026-01-02T03:04:05Z"}"#;
        let resp: ResponseEnvelope<serde_json::Value> = serde_json::from_str(raw).unwrap();
        assert!(resp.success);
        assert_eq!(resp.message, "ok");
        assert!(resp.code.is_none());
        assert_eq!(resp.data.unwrap()["id"], "app_1");
    }

    #[test]
    fn parse_failure_envelope() {
        let raw = r#"{"success":false,"message":"Insufficient balance","code":"WALLET_002","data":null}"#;
        let resp: ResponseEnvelope<serde_json::Value> = serde_json::from_str(raw).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.code.as_deref(), Some("WALLET_002"));
        assert!(resp.data.is_none());
    }

    #[test]
    fn missing_fields_default() {
        let resp: ResponseEnvelope<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(resp.success);
        assert!(resp.message.is_empty());
        assert!(resp.data.is_none());
    }
}

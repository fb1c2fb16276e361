use serde::Serialize;

/// Body attached to an outbound request. JSON payloads are serialized once up
/// front so that a request can be retried after a token refresh without
/// re-serializing the caller's value.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(String),
    None,
}

impl Payload {
    pub fn json<T: Serialize>(value: &T) -> Self {
        Self::Json(serde_json::to_string(value).unwrap())
    }
}

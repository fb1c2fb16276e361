use serde::{Deserialize, Serialize};

/// Access/refresh token pair issued on login and replaced wholesale on
/// refresh. The two tokens are always stored and removed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,

    pub refresh_token: String,

    #[serde(default = "token_type_default")]
    pub token_type: String,
}

fn token_type_default() -> String {
    String::from("Bearer")
}

impl TokenPair {
    /// Value for the `Authorization` header, e.g. `Bearer <token>`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_type_defaults_to_bearer() {
        let raw = r#"{"accessToken":"A1","refreshToken":"R1"}"#;
        let pair: TokenPair = serde_json::from_str(raw).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.authorization(), "Bearer A1");
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    Merchant,
    User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: AccountRole,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Account returned by the register endpoint. Credentials are only issued
/// later, once the email OTP has been verified and the user logs in.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: u64,
    pub full_name: String,
    pub email: String,

    #[serde(default)]
    pub phone: Option<String>,

    pub role: String,
    pub verified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResetOtpRequest {
    pub email: String,
    pub otp_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetToken {
    pub reset_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub reset_token: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_screaming_case_on_the_wire() {
        let req = RegisterRequest {
            full_name: String::from("Jane Doe"),
            email: String::from("jane@example.com"),
            password: String::from("s3cret"),
            role: AccountRole::Merchant,
            phone: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["role"], "MERCHANT");
        assert_eq!(json["fullName"], "Jane Doe");
        assert!(json.get("phone").is_none());
    }
}

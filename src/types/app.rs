use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;
use crate::time::format_age;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppEnvironment {
    Sandbox,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStatus {
    Active,
    Suspended,
}

/// A merchant's developer application, the unit credentials and payment links
/// are attached to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperApp {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub environment: AppEnvironment,

    #[serde(default)]
    pub status: Option<AppStatus>,

    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub public_key: Option<String>,

    /// Masked in list/get responses; the full secret is only returned when a
    /// key is created or rotated.
    #[serde(default)]
    pub secret_key_masked: Option<String>,

    #[serde(default)]
    pub secret_key: Option<String>,

    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppRequest {
    pub name: String,
    pub description: String,
    pub environment: AppEnvironment,
    pub webhook_url: Option<String>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<AppEnvironment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

/// Full key material, returned once on creation or rotation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub public_key: String,
    pub secret_key: String,
}

impl TerminalDisplay for DeveloperApp {
    fn titles() -> Vec<&'static str> {
        vec!["ID", "Name", "Environment", "Status", "Created"]
    }

    fn row(self) -> Vec<String> {
        vec![
            self.id,
            self.name,
            format!("{:?}", self.environment),
            self.status
                .map(|s| format!("{s:?}"))
                .unwrap_or_else(|| String::from("<unknown>")),
            self.created_at
                .as_deref()
                .map(format_age)
                .unwrap_or_default(),
        ]
    }
}

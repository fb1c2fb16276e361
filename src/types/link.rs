use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;
use crate::time::format_age;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    Active,
    Expired,
}

/// Fixed links charge `amount_value`; free links let the payer choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AmountType {
    Fixed,
    Free,
}

/// A shareable payment-collection page owned by a developer app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Public URL of the collection page.
    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub amount_type: Option<AmountType>,

    #[serde(default)]
    pub amount_value: Option<f64>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub logo_url: Option<String>,

    #[serde(default)]
    pub theme_color: Option<String>,

    #[serde(default)]
    pub redirect_url: Option<String>,

    #[serde(default)]
    pub expires_at: Option<String>,

    #[serde(default)]
    pub max_uses: Option<u64>,

    #[serde(default)]
    pub collect_customer_info: Option<bool>,

    /// Number of completed payments collected through this link.
    #[serde(default)]
    pub payments: Option<u64>,

    #[serde(default)]
    pub status: Option<LinkStatus>,

    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentLinkRequest {
    pub title: String,

    /// App the link is created under; the backend rejects creation without it.
    pub app_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_type: Option<AmountType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect_customer_info: Option<bool>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentLinkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_type: Option<AmountType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LinkStatus>,
}

/// Result of an unauthenticated payment against a public link.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPaymentReceipt {
    pub success: bool,

    #[serde(default)]
    pub transaction_id: Option<String>,

    #[serde(default)]
    pub redirect_url: Option<String>,
}

impl TerminalDisplay for PaymentLink {
    fn titles() -> Vec<&'static str> {
        vec!["ID", "Title", "Amount", "Status", "Payments", "Created"]
    }

    fn row(self) -> Vec<String> {
        let amount = match (self.amount_type, self.amount_value) {
            (Some(AmountType::Free), _) => String::from("free"),
            (_, Some(value)) => format!(
                "{value} {}",
                self.currency.as_deref().unwrap_or_default()
            ),
            _ => String::new(),
        };
        vec![
            self.id,
            self.title,
            amount,
            self.status
                .map(|s| format!("{s:?}"))
                .unwrap_or_else(|| String::from("<unknown>")),
            self.payments.unwrap_or(0).to_string(),
            self.created_at
                .as_deref()
                .map(format_age)
                .unwrap_or_default(),
        ]
    }
}

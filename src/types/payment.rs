use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;
use crate::time::format_age;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    pub id: String,
    pub status: TransactionStatus,
    pub amount: f64,
    pub currency: String,
    pub created_at: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,

    /// Saved payment method to charge instead of collecting card details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl TerminalDisplay for PaymentTransaction {
    fn titles() -> Vec<&'static str> {
        vec!["ID", "Status", "Amount", "Currency", "Created"]
    }

    fn row(self) -> Vec<String> {
        vec![
            self.id,
            format!("{:?}", self.status),
            self.amount.to_string(),
            self.currency,
            format_age(&self.created_at),
        ]
    }
}

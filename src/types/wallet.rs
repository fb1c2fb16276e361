use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub currency: String,
    pub balance: f64,

    #[serde(default)]
    pub is_default: bool,
}

impl TerminalDisplay for Wallet {
    fn titles() -> Vec<&'static str> {
        vec!["ID", "Currency", "Balance", "Default"]
    }

    fn row(self) -> Vec<String> {
        vec![
            self.id,
            self.currency,
            self.balance.to_string(),
            if self.is_default { "yes" } else { "no" }.to_string(),
        ]
    }
}

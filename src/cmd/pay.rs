use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use sharepay::display::display_json;
use sharepay::types::payment::ProcessPaymentRequest;

use super::{ConfigArgs, RunCommand};

/// Process a payment against a payment link.
#[derive(Args)]
pub struct PayArgs {
    /// Payment link to pay against.
    #[arg(long)]
    pub link: String,

    /// Amount to pay; omit for fixed-amount links.
    #[arg(long)]
    pub amount: Option<f64>,

    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long)]
    pub payer_email: Option<String>,

    #[arg(long)]
    pub payer_name: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for PayArgs {
    async fn run(&self) -> Result<()> {
        let client = self.config.build_client()?;
        let tx = client
            .process_payment(&ProcessPaymentRequest {
                payment_link_id: Some(self.link.clone()),
                amount: self.amount,
                currency: self.currency.clone(),
                payer_email: self.payer_email.clone(),
                payer_name: self.payer_name.clone(),
                ..Default::default()
            })
            .await?;
        display_json(tx)
    }
}

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Subcommand};

use sharepay::display::display_json;
use sharepay::types::app::{AppEnvironment, CreateAppRequest};
use sharepay::types::link::{AmountType, CreatePaymentLinkRequest};

use super::{ConfigArgs, RunCommand};

/// Create a resource on the server and print the result as json.
#[derive(Args)]
pub struct CreateArgs {
    #[command(subcommand)]
    pub resource: CreateCommands,
}

#[derive(Subcommand)]
pub enum CreateCommands {
    /// Create a developer app.
    App(CreateAppArgs),

    /// Create a payment link under an app.
    Link(CreateLinkArgs),
}

#[async_trait]
impl RunCommand for CreateArgs {
    async fn run(&self) -> Result<()> {
        match &self.resource {
            CreateCommands::App(args) => args.run().await,
            CreateCommands::Link(args) => args.run().await,
        }
    }
}

#[derive(Args)]
pub struct CreateAppArgs {
    /// App name.
    pub name: String,

    #[arg(short, long, default_value = "")]
    pub description: String,

    #[arg(short, long, default_value = "sandbox")]
    pub environment: AppEnvironment,

    /// Webhook endpoint to deliver payment events to.
    #[arg(long)]
    pub webhook_url: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for CreateAppArgs {
    async fn run(&self) -> Result<()> {
        let client = self.config.build_client()?;
        let app = client
            .create_app(&CreateAppRequest {
                name: self.name.clone(),
                description: self.description.clone(),
                environment: self.environment,
                webhook_url: self.webhook_url.clone(),
            })
            .await?;
        display_json(app)
    }
}

#[derive(Args)]
pub struct CreateLinkArgs {
    /// Title shown on the payment page.
    pub title: String,

    /// App to create the link under.
    #[arg(long)]
    pub app_id: String,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Whether the amount is fixed or chosen by the payer.
    #[arg(long)]
    pub amount_type: Option<AmountType>,

    /// Amount to charge, for fixed links.
    #[arg(long)]
    pub amount: Option<f64>,

    #[arg(long)]
    pub currency: Option<String>,

    /// Where to send the payer after a completed payment.
    #[arg(long)]
    pub redirect_url: Option<String>,

    /// RFC3339 expiry timestamp.
    #[arg(long)]
    pub expires_at: Option<String>,

    #[arg(long)]
    pub max_uses: Option<u64>,

    /// Ask payers for their name and email.
    #[arg(long)]
    pub collect_customer_info: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for CreateLinkArgs {
    async fn run(&self) -> Result<()> {
        let client = self.config.build_client()?;
        let link = client
            .create_payment_link(&CreatePaymentLinkRequest {
                title: self.title.clone(),
                app_id: self.app_id.clone(),
                description: self.description.clone(),
                amount_type: self.amount_type,
                amount_value: self.amount,
                currency: self.currency.clone(),
                logo_url: None,
                theme_color: None,
                redirect_url: self.redirect_url.clone(),
                expires_at: self.expires_at.clone(),
                max_uses: self.max_uses,
                collect_customer_info: self.collect_customer_info.then_some(true),
            })
            .await?;
        display_json(link)
    }
}

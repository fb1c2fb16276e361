use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;

use sharepay::client::Client;
use sharepay::display::{display_json, display_list, DisplayStyle};

use super::{ConfigArgs, ResourceType, RunCommand};

/// Retrieve resources from the server and print them. Lists the resource
/// type when no ID is given, otherwise shows the single resource as json.
#[derive(Args)]
pub struct GetArgs {
    /// Type of resource to display.
    pub resource: ResourceType,

    /// Optional resource ID.
    pub id: Option<String>,

    /// The display style for lists.
    #[arg(short, long, default_value = "table")]
    pub output: DisplayStyle,

    /// When displaying in CSV format, do not show the header row.
    #[arg(long)]
    pub headless: bool,

    /// When displaying in CSV format, manually specify the columns to show.
    #[arg(long)]
    pub csv_titles: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for GetArgs {
    async fn run(&self) -> Result<()> {
        let client = self.config.build_client()?;
        match self.resource {
            ResourceType::App | ResourceType::Apps => self.get_apps(&client).await,
            ResourceType::Link | ResourceType::Links => self.get_links(&client).await,
            ResourceType::Wallet | ResourceType::Wallets => self.get_wallets(&client).await,
        }
    }
}

impl GetArgs {
    async fn get_apps(&self, client: &Client) -> Result<()> {
        match self.id {
            Some(ref id) => display_json(client.get_app(id).await?),
            None => display_list(
                client.list_apps().await?,
                self.output,
                self.headless,
                self.csv_titles.clone(),
            ),
        }
    }

    async fn get_links(&self, client: &Client) -> Result<()> {
        match self.id {
            Some(ref id) => display_json(client.get_payment_link(id).await?),
            None => display_list(
                client.list_payment_links().await?,
                self.output,
                self.headless,
                self.csv_titles.clone(),
            ),
        }
    }

    async fn get_wallets(&self, client: &Client) -> Result<()> {
        if self.id.is_some() {
            bail!("wallets can only be listed, not fetched by id");
        }
        display_list(
            client.my_wallets().await?,
            self.output,
            self.headless,
            self.csv_titles.clone(),
        )
    }
}

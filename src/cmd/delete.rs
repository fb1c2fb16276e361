use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;

use super::{ConfigArgs, ResourceType, RunCommand};

/// Delete a resource by ID.
#[derive(Args)]
pub struct DeleteArgs {
    /// Type of resource to delete.
    pub resource: ResourceType,

    /// Resource ID.
    pub id: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for DeleteArgs {
    async fn run(&self) -> Result<()> {
        let client = self.config.build_client()?;
        match self.resource {
            ResourceType::App | ResourceType::Apps => client.delete_app(&self.id).await?,
            ResourceType::Link | ResourceType::Links => {
                client.delete_payment_link(&self.id).await?
            }
            ResourceType::Wallet | ResourceType::Wallets => bail!("wallets cannot be deleted"),
        }
        println!("Deleted {:?} '{}'", self.resource, self.id);
        Ok(())
    }
}

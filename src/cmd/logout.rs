use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use super::{ConfigArgs, RunCommand};

/// Revoke the current session and remove stored tokens.
#[derive(Args)]
pub struct LogoutArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for LogoutArgs {
    async fn run(&self) -> Result<()> {
        let client = self.config.build_client()?;
        client.logout().await?;
        println!("Logged out");
        Ok(())
    }
}

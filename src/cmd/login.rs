use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;
use console::Term;

use super::{ConfigArgs, RunCommand};

/// Log in to the SharePay API and store the issued tokens.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email.
    pub email: String,

    /// Account password; prompted interactively when omitted.
    #[arg(short, long)]
    pub password: Option<String>,

    /// Keep the session across invocations by writing tokens to the token
    /// file. Defaults to the `persist` config option.
    #[arg(long)]
    pub persist: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for LoginArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;
        let persist = self.persist || factory.config().persist;
        let client = factory.build_client()?;

        let password = match self.password {
            Some(ref password) => password.clone(),
            None => {
                let term = Term::stderr();
                term.write_str("Password: ").context("prompt password")?;
                term.read_secure_line().context("read password")?
            }
        };

        client.login(&self.email, &password, persist).await?;
        println!("Logged in as '{}'", self.email);
        Ok(())
    }
}

mod create;
mod delete;
mod get;
mod login;
mod logout;
mod pay;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand, ValueEnum};

use sharepay::client::factory::ClientFactory;
use sharepay::client::Client;

#[derive(Parser)]
#[command(author, version, about = "Command-line client for the SharePay payment aggregator")]
pub struct App {
    /// Log level: error, warn, info or debug.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub commands: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Login(login::LoginArgs),
    Logout(logout::LogoutArgs),
    Get(get::GetArgs),
    Create(create::CreateArgs),
    Delete(delete::DeleteArgs),
    Pay(pay::PayArgs),
}

impl App {
    pub async fn run(&self) -> Result<()> {
        match &self.commands {
            Commands::Login(args) => args.run().await,
            Commands::Logout(args) => args.run().await,
            Commands::Get(args) => args.run().await,
            Commands::Create(args) => args.run().await,
            Commands::Delete(args) => args.run().await,
            Commands::Pay(args) => args.run().await,
        }
    }
}

#[async_trait]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to the config file, defaults to ~/.config/sharepay.toml.
    #[arg(short, long)]
    pub config: Option<String>,
}

impl ConfigArgs {
    pub fn build_factory(&self) -> Result<ClientFactory> {
        ClientFactory::load(self.config.as_deref())
    }

    pub fn build_client(&self) -> Result<Client> {
        self.build_factory()?.build_client()
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResourceType {
    App,
    Apps,

    Link,
    Links,

    Wallet,
    Wallets,
}

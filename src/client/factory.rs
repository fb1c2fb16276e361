use std::sync::Arc;

use anyhow::Result;

use crate::client::{Client, FileTokenStore};
use crate::config::Config;

/// Builds clients from loaded configuration, wiring in the file-backed
/// token store at the configured path.
pub struct ClientFactory {
    cfg: Config,
}

impl ClientFactory {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    pub fn load(path: Option<&str>) -> Result<Self> {
        let cfg = Config::load(path)?;
        Ok(Self { cfg })
    }

    pub fn build_client(&self) -> Result<Client> {
        let store = Arc::new(FileTokenStore::new(self.cfg.token_path.clone()));
        Client::connect(&self.cfg.server, store)
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }
}

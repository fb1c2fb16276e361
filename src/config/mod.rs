use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::warn;
use reqwest::Url;
use serde::Deserialize;

mod defaults;

/// Client configuration, loaded from `~/.config/sharepay.toml` unless a path
/// is given. Every field has a default so the file is optional.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the SharePay API, including the version prefix.
    #[serde(default = "defaults::server")]
    pub server: String,

    /// Where durable tokens are written when logging in with `--persist`.
    #[serde(default = "defaults::token_path")]
    pub token_path: String,

    /// Persist tokens across invocations by default.
    #[serde(default = "defaults::disable")]
    pub persist: bool,
}

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut cfg = Self::read(path)?;
        cfg.validate().context("validate config")?;
        Ok(cfg)
    }

    fn read(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
            None => PathBuf::from(shellexpand::tilde("~/.config/sharepay.toml").as_ref()),
        };

        match fs::read_to_string(&path) {
            Ok(data) => toml::from_str(&data)
                .with_context(|| format!("parse config file '{}'", path.display())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(err) => {
                Err(err).with_context(|| format!("read config file '{}'", path.display()))
            }
        }
    }

    fn validate(&mut self) -> Result<()> {
        self.server = self.server.trim_end_matches('/').to_string();
        let parsed = match Url::parse(&self.server) {
            Ok(url) => url,
            Err(_) => bail!("invalid server url '{}'", self.server),
        };
        match parsed.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                parsed.scheme()
            ),
        }

        self.token_path = shellexpand::tilde(&self.token_path).into_owned();
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: defaults::server(),
            token_path: defaults::token_path(),
            persist: defaults::disable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let mut cfg = Config::default();
        cfg.validate().unwrap();
        assert!(cfg.server.starts_with("https://"));
        assert!(!cfg.server.ends_with('/'));
        assert!(!cfg.persist);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let mut cfg: Config = toml::from_str(r#"server = "http://localhost:8080/api/v1/""#).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.server, "http://localhost:8080/api/v1");
    }

    #[test]
    fn bad_scheme_is_rejected() {
        let mut cfg: Config = toml::from_str(r#"server = "ftp://example.com""#).unwrap();
        assert!(cfg.validate().is_err());
    }
}

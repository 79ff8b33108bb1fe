use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to local defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("SKILLSWAP_DB_PATH").unwrap_or_else(|| "skillswap.db".into());
        let host = lookup("SKILLSWAP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("SKILLSWAP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("SKILLSWAP_PORT is not a valid port: {}", raw))?,
            None => 3000,
        };

        Ok(Self {
            db_path: db_path.into(),
            host,
            port,
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Listen port override.
pub const ENV_PORT: &str = "PORT";
/// Ledger node URL override.
pub const ENV_NODE_URL: &str = "IOTA_NODE_URL";
/// Explorer base URL override.
pub const ENV_EXPLORER_URL: &str = "EXPLORER_URL";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub node_url: String,
    /// Explorer base for tracking links; derived from `node_url` when unset.
    pub explorer_url: Option<String>,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            node_url: "http://localhost:14265".into(),
            explorer_url: None,
            request_timeout_secs: 30,
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file; missing keys take their defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))
    }

    /// Apply `PORT`, `IOTA_NODE_URL` and `EXPLORER_URL` from the process environment.
    pub fn apply_env(self) -> ServerResult<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    pub fn apply_env_from<F>(mut self, lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT).filter(|p| !p.is_empty()) {
            let port: u16 = port
                .parse()
                .map_err(|_| ServerError::Config(format!("{ENV_PORT} is not a port: {port}")))?;
            self.bind_addr.set_port(port);
        }
        if let Some(url) = lookup(ENV_NODE_URL).filter(|u| !u.is_empty()) {
            self.node_url = url;
        }
        if let Some(url) = lookup(ENV_EXPLORER_URL).filter(|u| !u.is_empty()) {
            self.explorer_url = Some(url);
        }
        Ok(self)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if !(self.node_url.starts_with("http://") || self.node_url.starts_with("https://")) {
            return Err(ServerError::Config(format!(
                "node_url must be an http(s) URL, got {:?}",
                self.node_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ServerError::Config("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

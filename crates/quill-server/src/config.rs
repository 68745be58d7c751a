use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use quill_api::session::SessionConfig;

/// Ten years.
const MAX_SESSION_TTL_HOURS: u64 = 24 * 365 * 10;

/// Process configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = get("PORT", "3000")
            .parse()
            .context("PORT must be a port number")?;
        let ttl_hours: u64 = get("QUILL_SESSION_TTL_HOURS", "24")
            .parse()
            .context("QUILL_SESSION_TTL_HOURS must be a whole number of hours")?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours) {
            bail!("QUILL_SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}");
        }
        let cookie_secure = get("QUILL_COOKIE_SECURE", "false")
            .parse()
            .context("QUILL_COOKIE_SECURE must be true or false")?;

        Ok(Self {
            database_url: get("DATABASE_URL", "quill.db"),
            host: get("IP", "0.0.0.0"),
            port,
            static_dir: get("QUILL_STATIC_DIR", "public").into(),
            session: SessionConfig {
                ttl_hours,
                cookie_secure,
            },
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;

fn default_max_file_size() -> usize {
    // 200 MiB in bytes
    200 * 1024 * 1024
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_file_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Failed to parse BIND_ADDR: {}", raw))?,
            None => default_bind_addr(),
        };

        let max_file_size = match lookup("MAX_FILE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Failed to parse MAX_FILE_SIZE: {}", raw))?,
            None => default_max_file_size(),
        };

        if max_file_size == 0 {
            anyhow::bail!("MAX_FILE_SIZE must be greater than zero");
        }

        Ok(Config {
            bind_addr,
            max_file_size,
        })
    }
}

pub fn load_config() -> Result<Config> {
    let config = Config::new()?;
    tracing::info!(
        "Loaded configuration: bind_addr={}, max_file_size={}MB",
        config.bind_addr,
        config.max_file_size / (1024 * 1024)
    );
    Ok(config)
}

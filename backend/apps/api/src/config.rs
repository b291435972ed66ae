//! Server Configuration
//!
//! Read once from the environment (and `.env`) at startup.

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Startup configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `None` selects the in-memory store (debug builds only)
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub listen_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    /// `APP_ENV=production`: Secure cookies
    pub production: bool,
    pub password_pepper: Option<Vec<u8>>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {raw}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("LISTEN_ADDR must be host:port")?;

        let frontend_origins = parse_origins(
            &env::var("FRONTEND_ORIGINS").unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string()),
        );

        let production = env::var("APP_ENV").is_ok_and(|v| v.eq_ignore_ascii_case("production"));

        let password_pepper = match env::var("PASSWORD_PEPPER") {
            Ok(b64) if !b64.is_empty() => Some(
                general_purpose::STANDARD
                    .decode(b64.trim())
                    .context("PASSWORD_PEPPER must be base64")?,
            ),
            _ => None,
        };

        Ok(Self {
            database_url,
            max_connections,
            listen_addr,
            frontend_origins,
            production,
            password_pepper,
        })
    }
}

/// Comma-separated list, blanks dropped
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

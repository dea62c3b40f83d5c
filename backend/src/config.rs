use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::io::emailjs;

const DEFAULT_DATABASE_URL: &str = "sqlite:weekly_payments.db";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

/// Runtime configuration, read from `LEDGER_*` environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite URL of the key-value store
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Origin allowed to call the API from a browser
    pub cors_origin: String,
    /// Week label used when a record has none
    pub default_week: String,
    /// Amount used when a new record is given none
    pub default_amount: Option<f64>,
    /// Seed two sample records into an empty ledger at startup
    pub seed_demo: bool,
    pub emailjs_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            default_week: String::new(),
            default_amount: None,
            seed_demo: true,
            emailjs_base_url: emailjs::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match var("LEDGER_BIND_ADDR") {
            Some(addr) => addr
                .trim()
                .parse()
                .with_context(|| format!("Invalid LEDGER_BIND_ADDR: {}", addr))?,
            None => defaults.bind_addr,
        };

        let default_amount = match var("LEDGER_DEFAULT_AMOUNT") {
            Some(amount) => Some(
                amount
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .with_context(|| format!("Invalid LEDGER_DEFAULT_AMOUNT: {}", amount))?,
            ),
            None => None,
        };

        let seed_demo = match var("LEDGER_SEED_DEMO") {
            Some(flag) => parse_flag(&flag)
                .with_context(|| format!("Invalid LEDGER_SEED_DEMO: {}", flag))?,
            None => defaults.seed_demo,
        };

        Ok(Self {
            database_url: var("LEDGER_DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr,
            cors_origin: var("LEDGER_CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            default_week: lookup("LEDGER_DEFAULT_WEEK").unwrap_or(defaults.default_week),
            default_amount,
            seed_demo,
            emailjs_base_url: var("EMAILJS_BASE_URL").unwrap_or(defaults.emailjs_base_url),
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

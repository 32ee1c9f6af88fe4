use std::env;

use chrono::Duration;
use log::*;
use pwg_common::Secret;
use wallet_payment_engine::DEFAULT_TOKEN_TTL_SECONDS;

const DEFAULT_PWG_HOST: &str = "127.0.0.1";
const DEFAULT_PWG_PORT: u16 = 5800;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// How long an issued confirmation token stays valid.
    pub token_ttl: Duration,
    pub email: EmailConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PWG_HOST.to_string(),
            port: DEFAULT_PWG_PORT,
            database_url: String::default(),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS),
            email: EmailConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("PWG_HOST").ok().unwrap_or_else(|| DEFAULT_PWG_HOST.into());
        let port = env::var("PWG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for PWG_PORT. {e} Using the default, {DEFAULT_PWG_PORT}, instead."
                    );
                    DEFAULT_PWG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PWG_PORT);
        let database_url = env::var("PWG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ PWG_DATABASE_URL is not set. Please set it to the URL for the wallet database.");
            String::default()
        });
        let token_ttl = configure_token_ttl();
        let email = EmailConfig::from_env_or_default();
        Self { host, port, database_url, token_ttl, email }
    }
}

fn configure_token_ttl() -> Duration {
    env::var("PWG_TOKEN_TTL_SECONDS")
        .map_err(|_| {
            info!(
                "🪛️ PWG_TOKEN_TTL_SECONDS is not set. Using the default value of {DEFAULT_TOKEN_TTL_SECONDS} \
                 seconds."
            )
        })
        .and_then(|s| {
            s.parse::<i64>()
                .map(Duration::seconds)
                .map_err(|e| warn!("🪛️ Invalid configuration value for PWG_TOKEN_TTL_SECONDS. {e}"))
        })
        .ok()
        .unwrap_or_else(|| Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS))
}

//-------------------------------------------------  EmailConfig  ------------------------------------------------------
/// Settings for the transactional email HTTP API that delivers confirmation codes.
#[derive(Clone, Debug, Default)]
pub struct EmailConfig {
    /// The message submission endpoint, e.g. "https://api.mailprovider.example/v3/messages".
    pub api_url: String,
    pub api_key: Secret<String>,
    /// The sender address placed in the `from` field of every message.
    pub sender: String,
}

impl EmailConfig {
    pub fn from_env_or_default() -> Self {
        let api_url = env::var("PWG_EMAIL_API_URL").ok().unwrap_or_else(|| {
            error!("🪛️ PWG_EMAIL_API_URL is not set. Token emails cannot be delivered without it.");
            String::default()
        });
        let api_key = env::var("PWG_EMAIL_API_KEY").ok().unwrap_or_else(|| {
            error!("🪛️ PWG_EMAIL_API_KEY is not set. Token emails cannot be delivered without it.");
            String::default()
        });
        let sender = env::var("PWG_EMAIL_FROM").ok().unwrap_or_else(|| {
            warn!("🪛️ PWG_EMAIL_FROM is not set. Using a placeholder sender address.");
            "no-reply@localhost".to_string()
        });
        Self { api_url, api_key: Secret::new(api_key), sender }
    }
}

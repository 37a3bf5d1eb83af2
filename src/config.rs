use std::{env, path::PathBuf};

use anyhow::{Context, bail};
use secrecy::SecretString;

const DEFAULT_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:5174"];
const DEFAULT_RAZORPAY_API_BASE: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: SecretString,
    pub allowed_origins: Vec<String>,
    pub upload_dir: PathBuf,
    /// `None` keeps the service up with payment routes disabled.
    pub razorpay: Option<RazorpayConfig>,
}

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: SecretString,
    pub api_base: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let Some(jwt_secret) = var("JWT_SECRET") else {
            bail!("JWT_SECRET is not set; refusing to sign tokens with a default secret");
        };

        let host = var("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("APP_PORT").or_else(|| var("PORT")) {
            Some(p) => p.parse::<u16>().with_context(|| format!("invalid port `{p}`"))?,
            None => 4000,
        };

        let allowed_origins = match var("FRONTEND_ORIGIN") {
            Some(list) => parse_origins(&list),
            None => DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let upload_dir = PathBuf::from(var("UPLOAD_DIR").unwrap_or_else(|| "uploads".into()));

        let razorpay = match (var("RAZORPAY_KEY_ID"), var("RAZORPAY_KEY_SECRET")) {
            (Some(key_id), Some(key_secret)) => Some(RazorpayConfig {
                key_id,
                key_secret: SecretString::from(key_secret),
                api_base: var("RAZORPAY_API_BASE")
                    .unwrap_or_else(|| DEFAULT_RAZORPAY_API_BASE.to_string()),
            }),
            (None, None) => {
                tracing::warn!("razorpay credentials not configured, payment routes disabled");
                None
            }
            _ => {
                tracing::warn!(
                    "only one of RAZORPAY_KEY_ID/RAZORPAY_KEY_SECRET is set, payment routes disabled"
                );
                None
            }
        };

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret: SecretString::from(jwt_secret),
            allowed_origins,
            upload_dir,
            razorpay,
        })
    }
}

fn parse_origins(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    gateway::RazorpayClient,
    jwt::JwtKeys,
};

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub jwt: JwtKeys,
    pub payments: Option<RazorpayClient>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn from_config(orm: DatabaseConnection, config: &AppConfig) -> anyhow::Result<Self> {
        let payments = config
            .razorpay
            .as_ref()
            .map(RazorpayClient::new)
            .transpose()?;

        Ok(Self {
            orm,
            jwt: JwtKeys::new(&config.jwt_secret),
            payments,
            upload_dir: config.upload_dir.clone(),
        })
    }

    /// The payment gateway, or [`AppError::PaymentUnavailable`] when it is not configured.
    pub fn payments(&self) -> AppResult<&RazorpayClient> {
        self.payments.as_ref().ok_or(AppError::PaymentUnavailable)
    }
}

//! Razorpay payment gateway client.
//!
//! Only two calls are needed by the order flow:
//!
//! - `POST {api_base}/orders` creates the gateway order the checkout widget pays against.
//! - Signature verification, done locally: the gateway signs `"{order_id}|{payment_id}"`
//!   with HMAC-SHA256 keyed by the account secret and hands the hex digest to the client.

use std::{sync::Arc, time::Duration};

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::RazorpayConfig;

type HmacSha256 = Hmac<Sha256>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("amount {0} does not fit the gateway's minor unit")]
    AmountOverflow(i64),
}

/// Order record as returned by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GatewayOrder {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    /// Minor currency unit (paise for INR).
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
    #[serde(default)]
    pub attempts: i64,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    description: String,
}

/// Configured gateway client. Its presence in the application state is what enables
/// the payment routes.
#[derive(Clone)]
pub struct RazorpayClient {
    inner: Arc<RazorpayClientInner>,
}

struct RazorpayClientInner {
    http: reqwest::Client,
    key_id: String,
    key_secret: SecretString,
    api_base: String,
}

impl RazorpayClient {
    pub fn new(config: &RazorpayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(RazorpayClientInner {
                http,
                key_id: config.key_id.clone(),
                key_secret: config.key_secret.clone(),
                api_base: config.api_base.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Create a gateway order for `amount` major currency units.
    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let minor = to_minor_units(amount).ok_or(GatewayError::AmountOverflow(amount))?;

        let response = self
            .inner
            .http
            .post(format!("{}/orders", self.inner.api_base))
            .basic_auth(&self.inner.key_id, Some(self.inner.key_secret.expose_secret()))
            .json(&CreateOrderBody {
                amount: minor,
                currency,
                receipt,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorEnvelope>().await {
                Ok(envelope) if !envelope.error.description.is_empty() => {
                    envelope.error.description
                }
                _ => status.canonical_reason().unwrap_or("unknown").to_string(),
            };
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let order = response.json::<GatewayOrder>().await?;
        tracing::debug!(gateway_order_id = %order.id, "gateway order created");
        Ok(order)
    }

    /// Check a checkout callback signature with the account secret.
    pub fn verify_payment(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_signature(
            self.inner.key_secret.expose_secret(),
            order_id,
            payment_id,
            signature,
        )
    }
}

/// Major to minor currency unit.
pub fn to_minor_units(amount: i64) -> Option<i64> {
    amount.checked_mul(100)
}

/// Recompute HMAC-SHA256 over `order_id|payment_id` and compare it with the hex `signature`.
///
/// The comparison runs in constant time. Anything that is not valid hex is a mismatch.
pub fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(provided) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac.verify_slice(&provided).is_ok()
}

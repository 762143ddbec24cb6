use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::models::PaymentHandoff;

/// The external payment flow. It receives the hand-off and later reports
/// payment back through the callback endpoint; it never runs inside the
/// booking core.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn hand_off(&self, handoff: &PaymentHandoff) -> anyhow::Result<()>;
}

pub struct LogPaymentGateway;

#[async_trait]
impl PaymentGateway for LogPaymentGateway {
    async fn hand_off(&self, handoff: &PaymentHandoff) -> anyhow::Result<()> {
        tracing::info!(
            psid = %handoff.psid,
            amount = handoff.amount,
            "payment hand-off (no PAYMENT_URL configured)"
        );
        Ok(())
    }
}

pub struct HttpPaymentGateway {
    url: String,
    client: reqwest::Client,
}

impl HttpPaymentGateway {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn hand_off(&self, handoff: &PaymentHandoff) -> anyhow::Result<()> {
        self.client
            .post(&self.url)
            .json(handoff)
            .send()
            .await
            .context("failed to reach payment service")?
            .error_for_status()
            .context("payment service returned error")?;
        Ok(())
    }
}

/// base64(HMAC-SHA1(secret, psid)), the value expected in `X-Vics-Signature`.
pub fn sign_callback(secret: &str, psid: &str) -> Option<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(psid.as_bytes());
    let result = mac.finalize().into_bytes();
    Some(base64::engine::general_purpose::STANDARD.encode(result))
}

pub fn verify_callback_signature(secret: &str, psid: &str, signature: &str) -> bool {
    let Ok(expected) = base64::engine::general_purpose::STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha1>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(psid.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::FlagsConfig;

const DEFAULT_CREATOR_ID: &str = "admin-menu@hoopshop.app";
const DEFAULT_CREATOR_TYPE: &str = "email";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook secret is not configured")]
    MissingSecret,

    #[error("webhook secret is not a valid HMAC key")]
    InvalidSecret(#[from] hmac::digest::InvalidLength),

    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook responded with status {0}")]
    Status(reqwest::StatusCode),
}

/// Who changed a flag, as reported in the change notification.
#[derive(Debug, Clone, Default)]
pub struct FlagActor<'a> {
    pub id: Option<&'a str>,
    pub kind: Option<&'a str>,
}

/// Sends signed flag-change events to an external webhook.
///
/// Without a configured URL every notification is logged and reported as
/// delivered.
#[derive(Clone)]
pub struct FlagNotifier {
    client: reqwest::Client,
    url: Option<String>,
    secret: Option<String>,
}

impl FlagNotifier {
    pub fn new(config: &FlagsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.webhook_url.as_deref().map(ensure_trailing_slash),
            secret: config.webhook_secret.clone(),
        }
    }

    #[instrument(skip(self, actor), fields(actor = actor.id.unwrap_or(DEFAULT_CREATOR_ID)))]
    pub async fn notify(
        &self,
        flag: &str,
        action: &str,
        actor: FlagActor<'_>,
    ) -> Result<(), NotifyError> {
        let body = change_payload(flag, action, &actor, Utc::now());

        let Some(url) = self.url.as_deref() else {
            info!("No flag webhook configured, change recorded in logs only");
            return Ok(());
        };
        let secret = self.secret.as_deref().ok_or(NotifyError::MissingSecret)?;

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-Sentry-Signature", sign(secret, &body)?)
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Flag webhook rejected notification");
            return Err(NotifyError::Status(response.status()));
        }

        info!("Flag change notification delivered");
        Ok(())
    }
}

fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// Serialize a single flag change event.
///
/// `change_id` is the event time in milliseconds, emitted as a JSON number.
pub fn change_payload(
    flag: &str,
    action: &str,
    actor: &FlagActor<'_>,
    at: DateTime<Utc>,
) -> String {
    json!({
        "meta": { "version": 1 },
        "data": [{
            "action": action,
            "change_id": at.timestamp_millis(),
            "created_at": at.format("%Y-%m-%dT%H:%M:%S+00:00").to_string(),
            "created_by": {
                "id": actor.id.unwrap_or(DEFAULT_CREATOR_ID),
                "type": actor.kind.unwrap_or(DEFAULT_CREATOR_TYPE),
            },
            "flag": flag,
        }],
    })
    .to_string()
}

/// Hex-encoded HMAC-SHA256 of `body` under `secret`.
pub fn sign(secret: &str, body: &str) -> Result<String, hmac::digest::InvalidLength> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())?;
    mac.update(body.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

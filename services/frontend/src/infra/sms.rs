use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::types::SmsChallenge;
use crate::infra::notify::{Delivery, SMS_CHANNEL, mask_phone};

/// Sends SMS codes through a JSON "send text to number" REST endpoint.
#[derive(Clone)]
pub struct HttpSmsDelivery {
    client: reqwest::Client,
    url: String,
    api_key: String,
    api_secret: String,
    from: String,
}

#[derive(Serialize)]
struct SendTextRequest<'a> {
    api_key: &'a str,
    api_secret: &'a str,
    from: &'a str,
    to: &'a str,
    text: String,
}

#[derive(Deserialize)]
struct SendTextResponse {
    #[serde(default)]
    messages: Vec<MessageStatus>,
}

#[derive(Deserialize)]
struct MessageStatus {
    status: String,
    #[serde(rename = "error-text", default)]
    error_text: Option<String>,
}

pub fn challenge_text(code: &str) -> String {
    format!("Your verification code is: {code}")
}

impl HttpSmsDelivery {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            from: from.into(),
        }
    }
}

/// Any per-message status other than `"0"` is a failure.
fn check_statuses(resp: &SendTextResponse) -> anyhow::Result<()> {
    for m in &resp.messages {
        if m.status != "0" {
            anyhow::bail!(
                "sms rejected with status {}: {}",
                m.status,
                m.error_text.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}

impl Delivery<SmsChallenge> for HttpSmsDelivery {
    async fn deliver(&self, msg: &SmsChallenge) -> anyhow::Result<()> {
        let body = SendTextRequest {
            api_key: &self.api_key,
            api_secret: &self.api_secret,
            from: &self.from,
            to: &msg.phone,
            text: challenge_text(&msg.code),
        };
        let resp: SendTextResponse = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .context("send sms request")?
            .error_for_status()
            .context("sms provider returned error status")?
            .json()
            .await
            .context("decode sms provider response")?;
        check_statuses(&resp)?;
        info!(channel = SMS_CHANNEL, phone = %mask_phone(&msg.phone), "sms challenge sent");
        Ok(())
    }
}

use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use firmq_core::config::Config;

use crate::infra::smtp::SmtpSettings;
use crate::usecase::account::BootstrapAdminInput;
use crate::usecase::code::CodeTtl;

const DEFAULT_EMAIL_FROM: &str = "FirmQ <no-reply@localhost>";

/// Frontend service configuration loaded from environment variables.
///
/// Field names map to upper-case variables (`jwt_secret` reads `JWT_SECRET`).
#[derive(Clone, Deserialize)]
pub struct FrontendConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for session tokens.
    pub jwt_secret: String,
    #[serde(default = "default_port")]
    pub frontend_port: u16,
    #[serde(default = "default_email_ttl")]
    pub email_confirmation_ttl_secs: i64,
    #[serde(default = "default_sms_ttl")]
    pub sms_confirmation_ttl_secs: i64,
    #[serde(default = "default_email_capacity")]
    pub email_queue_capacity: usize,
    #[serde(default = "default_sms_capacity")]
    pub sms_queue_capacity: usize,
    #[serde(default = "default_enqueue_timeout")]
    pub enqueue_timeout_ms: u64,
    /// Base URL placed in confirmation links.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub email_from: Option<String>,

    pub sms_api_url: Option<String>,
    pub sms_api_key: Option<String>,
    pub sms_api_secret: Option<String>,
    pub sms_from: Option<String>,

    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
    pub bootstrap_admin_phone: Option<String>,
}

impl Config for FrontendConfig {}

fn default_port() -> u16 {
    8080
}
fn default_email_ttl() -> i64 {
    86_400
}
fn default_sms_ttl() -> i64 {
    300
}
fn default_email_capacity() -> usize {
    1000
}
fn default_sms_capacity() -> usize {
    100
}
fn default_enqueue_timeout() -> u64 {
    100
}
fn default_server_url() -> String {
    "http://localhost:8080".to_owned()
}
fn default_smtp_port() -> u16 {
    587
}

fn set(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// SMS provider credentials, present only when fully configured.
pub struct SmsSettings<'a> {
    pub url: &'a str,
    pub api_key: &'a str,
    pub api_secret: &'a str,
    pub from: &'a str,
}

impl FrontendConfig {
    pub fn code_ttl(&self) -> CodeTtl {
        CodeTtl {
            email: TimeDelta::seconds(self.email_confirmation_ttl_secs),
            sms: TimeDelta::seconds(self.sms_confirmation_ttl_secs),
        }
    }

    pub fn enqueue_timeout(&self) -> Duration {
        Duration::from_millis(self.enqueue_timeout_ms)
    }

    /// `None` when `SMTP_HOST` is unset; email then runs in log-only mode.
    pub fn smtp(&self) -> Option<SmtpSettings<'_>> {
        Some(SmtpSettings {
            host: set(&self.smtp_host)?,
            port: self.smtp_port,
            username: set(&self.smtp_username),
            password: set(&self.smtp_password),
            from: set(&self.email_from).unwrap_or(DEFAULT_EMAIL_FROM),
            server_url: &self.server_url,
        })
    }

    /// `None` unless URL, key and secret are all set.
    pub fn sms(&self) -> Option<SmsSettings<'_>> {
        Some(SmsSettings {
            url: set(&self.sms_api_url)?,
            api_key: set(&self.sms_api_key)?,
            api_secret: set(&self.sms_api_secret)?,
            from: set(&self.sms_from).unwrap_or("FirmQ"),
        })
    }

    pub fn bootstrap_admin(&self) -> Option<BootstrapAdminInput> {
        Some(BootstrapAdminInput {
            email: set(&self.bootstrap_admin_email)?.to_owned(),
            password: set(&self.bootstrap_admin_password)?.to_owned(),
            phone: set(&self.bootstrap_admin_phone)?.to_owned(),
        })
    }
}

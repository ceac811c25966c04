//! Bounded per-channel notification queues.
//!
//! Requests enqueue and return; one long-lived worker per channel drains its queue
//! in FIFO order and hands each message to a [`Delivery`]. When a queue stays full
//! for longer than the enqueue timeout the *new* message is rejected.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::SendTimeoutError};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::domain::types::{EmailConfirmation, SmsChallenge};

pub const EMAIL_CHANNEL: &str = "email";
pub const SMS_CHANNEL: &str = "sms";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EnqueueError {
    #[error("notification queue is full")]
    Full,
    #[error("notification worker has stopped")]
    Closed,
}

/// Producer side of one channel.
pub struct NotificationQueue<M> {
    channel: &'static str,
    tx: mpsc::Sender<M>,
    timeout: Duration,
}

impl<M> Clone for NotificationQueue<M> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel,
            tx: self.tx.clone(),
            timeout: self.timeout,
        }
    }
}

impl<M: Send> NotificationQueue<M> {
    /// Create a queue and the receiver its worker drains. `capacity` is at least 1.
    pub fn bounded(
        channel: &'static str,
        capacity: usize,
        timeout: Duration,
    ) -> (Self, mpsc::Receiver<M>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                channel,
                tx,
                timeout,
            },
            rx,
        )
    }

    pub async fn enqueue(&self, msg: M) -> Result<(), EnqueueError> {
        match self.tx.send_timeout(msg, self.timeout).await {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => {
                warn!(channel = self.channel, "notification queue full, message dropped");
                Err(EnqueueError::Full)
            }
            Err(SendTimeoutError::Closed(_)) => {
                warn!(channel = self.channel, "notification worker gone, message dropped");
                Err(EnqueueError::Closed)
            }
        }
    }
}

/// External "send this message" capability.
pub trait Delivery<M>: Send + Sync + 'static {
    fn deliver(&self, msg: &M) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Drain `rx` until every queue handle is dropped. Failures are logged, never retried.
pub fn spawn_worker<M, D>(channel: &'static str, mut rx: mpsc::Receiver<M>, delivery: D) -> JoinHandle<()>
where
    M: Send + Sync + 'static,
    D: Delivery<M>,
{
    tokio::spawn(async move {
        info!(channel, "notification worker started");
        while let Some(msg) = rx.recv().await {
            if let Err(e) = delivery.deliver(&msg).await {
                error!(channel, error = ?e, "notification delivery failed");
            }
        }
        info!(channel, "notification worker stopped");
    })
}

/// Keep the last two characters of a phone number.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    let keep = chars.len().min(2);
    let hidden = chars.len() - keep;
    std::iter::repeat_n('*', hidden)
        .chain(chars[hidden..].iter().copied())
        .collect()
}

// ── No-op delivery ───────────────────────────────────────────────────────────

/// Stand-in used when a provider is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDelivery;

impl Delivery<EmailConfirmation> for LogDelivery {
    async fn deliver(&self, msg: &EmailConfirmation) -> anyhow::Result<()> {
        info!(
            channel = EMAIL_CHANNEL,
            recipient = %msg.recipient,
            "smtp not configured, skipping email confirmation"
        );
        Ok(())
    }
}

impl Delivery<SmsChallenge> for LogDelivery {
    async fn deliver(&self, msg: &SmsChallenge) -> anyhow::Result<()> {
        info!(
            channel = SMS_CHANNEL,
            phone = %mask_phone(&msg.phone),
            "sms provider not configured, skipping sms"
        );
        Ok(())
    }
}

// ── Notifier ─────────────────────────────────────────────────────────────────

/// Both outbound channels used by the account state machine.
///
/// Enqueue failures are logged and swallowed: the request has already done its
/// work, and the client recovers by asking for a new code.
#[derive(Clone)]
pub struct Notifier {
    pub email: NotificationQueue<EmailConfirmation>,
    pub sms: NotificationQueue<SmsChallenge>,
}

impl Notifier {
    pub async fn email_confirmation(&self, msg: EmailConfirmation) {
        if let Err(e) = self.email.enqueue(msg).await {
            error!(channel = EMAIL_CHANNEL, error = %e, "email confirmation not queued");
        }
    }

    pub async fn sms_challenge(&self, msg: SmsChallenge) {
        if let Err(e) = self.sms.enqueue(msg).await {
            error!(channel = SMS_CHANNEL, error = %e, "sms challenge not queued");
        }
    }
}

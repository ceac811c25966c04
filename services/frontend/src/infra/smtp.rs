use std::sync::Arc;

use anyhow::Context as _;
use lettre::message::{Mailbox, Message, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::info;

use crate::domain::types::EmailConfirmation;
use crate::infra::notify::{Delivery, EMAIL_CHANNEL};

pub struct SmtpSettings<'a> {
    pub host: &'a str,
    pub port: u16,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub from: &'a str,
    pub server_url: &'a str,
}

/// Sends email-confirmation links over SMTP (STARTTLS).
#[derive(Clone)]
pub struct SmtpEmailDelivery {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    server_url: String,
}

impl SmtpEmailDelivery {
    pub fn new(settings: &SmtpSettings<'_>) -> anyhow::Result<Self> {
        let from = settings
            .from
            .parse::<Mailbox>()
            .context("invalid EMAIL_FROM address")?;
        let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(settings.host)
            .context("configure smtp transport")?
            .port(settings.port);
        let builder = match (settings.username, settings.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.to_owned(), pass.to_owned()))
            }
            _ => builder,
        };
        Ok(Self {
            transport: Arc::new(builder.build()),
            from,
            server_url: settings.server_url.trim_end_matches('/').to_owned(),
        })
    }

    fn message(&self, msg: &EmailConfirmation) -> anyhow::Result<Message> {
        let to = msg
            .recipient
            .parse::<Mailbox>()
            .context("invalid recipient address")?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(confirmation_subject(&msg.display_name))
            .header(header::ContentType::TEXT_PLAIN)
            .body(confirmation_link(&self.server_url, &msg.code))
            .context("build confirmation email")
    }
}

pub fn confirmation_subject(display_name: &str) -> String {
    format!("Email confirmation for {display_name}")
}

pub fn confirmation_link(server_url: &str, code: &str) -> String {
    format!("{server_url}/confirm-email/{code}")
}

impl Delivery<EmailConfirmation> for SmtpEmailDelivery {
    async fn deliver(&self, msg: &EmailConfirmation) -> anyhow::Result<()> {
        let email = self.message(msg)?;
        self.transport
            .send(email)
            .await
            .context("send confirmation email")?;
        info!(channel = EMAIL_CHANNEL, recipient = %msg.recipient, "email confirmation sent");
        Ok(())
    }
}

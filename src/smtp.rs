//! SMTP delivery of the composed notification.

use anyhow::{Context, Result};
use lettre::address::Envelope;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, SmtpTransport, Transport};
use tracing::info;

use crate::core::Mailer;

/// Fixed relay endpoint: submission over a STARTTLS-upgraded connection.
pub const RELAY_HOST: &str = "smtp.gmail.com";
pub const SUBMISSION_PORT: u16 = 587;

/// Delivers messages through the submission relay with plain credential
/// login. Each send opens and closes its own connection; nothing persists
/// across invocations.
pub struct SmtpMailer {
    relay: String,
    port: u16,
}

impl SmtpMailer {
    pub fn new() -> Self {
        Self {
            relay: RELAY_HOST.to_string(),
            port: SUBMISSION_PORT,
        }
    }
}

impl Default for SmtpMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mailer for SmtpMailer {
    fn send(
        &self,
        from_email: &str,
        from_password: &str,
        to_email: &str,
        message: &str,
    ) -> Result<()> {
        let from: Address = from_email
            .parse()
            .with_context(|| format!("invalid sender address `{}`", from_email))?;
        let to: Address = to_email
            .parse()
            .with_context(|| format!("invalid recipient address `{}`", to_email))?;
        let envelope =
            Envelope::new(Some(from), vec![to]).context("could not build message envelope")?;

        let transport = SmtpTransport::starttls_relay(&self.relay)
            .with_context(|| format!("could not configure relay `{}`", self.relay))?
            .port(self.port)
            .credentials(Credentials::new(
                from_email.to_owned(),
                from_password.to_owned(),
            ))
            .build();

        transport
            .send_raw(&envelope, message.as_bytes())
            .with_context(|| format!("relay `{}` did not accept the message", self.relay))?;

        info!(to = to_email, "notification email sent");
        Ok(())
    }
}

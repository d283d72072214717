//! Core domain types and service traits for ipy-alerts
//!
//! This module defines the parameter-set data model, the error taxonomy,
//! and the trait contract for message delivery.

use std::collections::BTreeMap;

use anyhow::Result;
use thiserror::Error;

use crate::config::sanitize;

/// The five parameters every run must resolve, in validation order.
pub const REQUIRED_KEYS: [&str; 5] = [
    "to_email",
    "subject",
    "body",
    "from_email",
    "from_password",
];

/// Errors surfaced by a run. Resolution-source problems are never errors;
/// they degrade to "no value from this source" inside the resolver.
#[derive(Debug, Error)]
pub enum AlertsError {
    /// A required parameter could not be resolved from any source. Raised
    /// before the work block runs and before any transport activity.
    #[error("{0} is unset, no email will be sent")]
    MissingParameter(&'static str),

    /// The work block failed. Propagated unmodified; the notification is
    /// never sent.
    #[error(transparent)]
    Execution(anyhow::Error),

    /// Connecting, upgrading, authenticating, or handing the message to
    /// the relay failed. No retry.
    #[error("email delivery failed")]
    Transport(#[source] anyhow::Error),
}

/// Parameter overrides supplied directly by the caller, e.g. as CLI flags.
/// An explicit value here is the topmost configuration layer: no other
/// source is consulted for that parameter.
#[derive(Debug, Clone, Default)]
pub struct AlertRequest {
    pub to_email: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub from_email: Option<String>,
    pub from_password: Option<String>,
    /// Path to the INI config file; `~` and `$VAR` are expanded at
    /// resolve time.
    pub email_config: Option<String>,
}

/// Working mapping from parameter name to resolved value, filled in as the
/// sources are consulted.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    values: BTreeMap<&'static str, Option<String>>,
}

impl ParameterSet {
    /// Seeds the set with the caller's explicit overrides.
    pub fn from_request(request: &AlertRequest) -> Self {
        let mut values = BTreeMap::new();
        values.insert("to_email", request.to_email.clone());
        values.insert("subject", request.subject.clone());
        values.insert("body", request.body.clone());
        values.insert("from_email", request.from_email.clone());
        values.insert("from_password", request.from_password.clone());
        Self { values }
    }

    /// Returns the current value for `key`, treating the empty string as
    /// unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|value| value.as_deref())
            .filter(|value| !value.is_empty())
    }

    pub fn set(&mut self, key: &'static str, value: Option<String>) {
        self.values.insert(key, value);
    }

    /// Checks that every required parameter is present and non-empty,
    /// then sanitizes each value. Fails with the first missing key in
    /// `REQUIRED_KEYS` order.
    pub fn validated(mut self) -> Result<EmailParams, AlertsError> {
        let mut take = |key: &'static str| -> Result<String, AlertsError> {
            match self.values.remove(key).flatten() {
                Some(value) if !value.is_empty() => Ok(sanitize(&value)),
                _ => Err(AlertsError::MissingParameter(key)),
            }
        };

        Ok(EmailParams {
            to_email: take("to_email")?,
            subject: take("subject")?,
            body: take("body")?,
            from_email: take("from_email")?,
            from_password: take("from_password")?,
        })
    }
}

/// A fully resolved, sanitized parameter set. The credentials live only
/// for the single send; nothing is cached across invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailParams {
    pub to_email: String,
    pub subject: String,
    pub body: String,
    pub from_email: String,
    pub from_password: String,
}

// =============================================================================
// Service Traits
// =============================================================================

/// Delivers a composed notification message.
pub trait Mailer: Send + Sync {
    /// Sends `message` to `to_email`, authenticating against the relay as
    /// `from_email`.
    ///
    /// # Returns
    /// * `Ok(())` once the relay has accepted the message
    /// * `Err` on any connect, upgrade, authentication, or send failure
    fn send(
        &self,
        from_email: &str,
        from_password: &str,
        to_email: &str,
        message: &str,
    ) -> Result<()>;
}

//! The orchestrator, decoupled from the entry point.
//!
//! Control flow is strictly sequential: resolve every parameter, validate,
//! sanitize, run the work block, compose, send. A missing parameter fails
//! before any side effect; a work-block failure surfaces unmodified and the
//! notification is never sent; a transport failure surfaces with no retry.

use anyhow::Result;
use tracing::debug;

use crate::config::Resolver;
use crate::core::{AlertRequest, AlertsError, Mailer, ParameterSet, REQUIRED_KEYS};
use crate::formatting::compose;
use crate::session::{JsonSessionStore, SessionStore};
use crate::smtp::SmtpMailer;

/// Ties the resolver, the work block, and the mailer together for one run.
pub struct App {
    session: Box<dyn SessionStore>,
    mailer: Box<dyn Mailer>,
}

impl App {
    /// Production wiring: host-exported session document, real relay.
    pub fn new() -> Self {
        Self::with_parts(
            Box::new(JsonSessionStore::from_env()),
            Box::new(SmtpMailer::new()),
        )
    }

    /// Assembles an app from explicit components. This is the seam the
    /// tests use to substitute a static session store and a recording
    /// mailer.
    pub fn with_parts(session: Box<dyn SessionStore>, mailer: Box<dyn Mailer>) -> Self {
        Self { session, mailer }
    }

    /// Resolves the parameters, runs `work`, and sends the notification.
    pub fn run<W>(&self, request: &AlertRequest, work: W) -> Result<(), AlertsError>
    where
        W: FnOnce() -> Result<()>,
    {
        let resolver = Resolver::new(self.session.as_ref(), request.email_config.as_deref());

        let mut params = ParameterSet::from_request(request);
        for key in REQUIRED_KEYS {
            if params.get(key).is_none() {
                debug!(key, "not given as a flag, consulting the other sources");
                params.set(key, resolver.resolve(key));
            }
        }
        let params = params.validated()?;

        work().map_err(AlertsError::Execution)?;

        let message = compose(
            &params.from_email,
            &params.subject,
            &params.to_email,
            &params.body,
        );
        self.mailer
            .send(
                &params.from_email,
                &params.from_password,
                &params.to_email,
                &message,
            )
            .map_err(AlertsError::Transport)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

//! End-to-end orchestrator tests against a recording mailer.
//!
//! The whole file is serialized: several tests mutate namespaced
//! environment variables, and the resolver consults the environment for
//! every parameter that is not given as a flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use ipy_alerts::app::App;
use ipy_alerts::core::{AlertRequest, AlertsError, Mailer};
use ipy_alerts::session::{SessionLookup, SessionStore, StaticSessionStore};
use serial_test::serial;

#[derive(Clone, Debug, PartialEq, Eq)]
struct SentMail {
    from_email: String,
    from_password: String,
    to_email: String,
    message: String,
}

/// Records every send instead of talking to a relay.
#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl RecordingMailer {
    fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(
        &self,
        from_email: &str,
        from_password: &str,
        to_email: &str,
        message: &str,
    ) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(SentMail {
            from_email: from_email.to_string(),
            from_password: from_password.to_string(),
            to_email: to_email.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

/// Rejects every send, standing in for a relay that refuses the login.
struct FailingMailer;

impl Mailer for FailingMailer {
    fn send(&self, _: &str, _: &str, _: &str, _: &str) -> anyhow::Result<()> {
        Err(anyhow!("authentication rejected"))
    }
}

struct NoSession;

impl SessionStore for NoSession {
    fn get(&self, _key: &str) -> SessionLookup {
        SessionLookup::Unavailable
    }
}

fn full_request() -> AlertRequest {
    AlertRequest {
        to_email: Some("dest@example.com".to_string()),
        subject: Some("'job finished'".to_string()),
        body: Some("\"all green\"".to_string()),
        from_email: Some("sender@example.com".to_string()),
        from_password: Some("hunter2".to_string()),
        email_config: None,
    }
}

fn app_with_mailer(mailer: RecordingMailer) -> App {
    App::with_parts(Box::new(NoSession), Box::new(mailer))
}

#[test]
#[serial]
fn sends_one_sanitized_notification_after_the_work_runs() {
    let mailer = RecordingMailer::default();
    let app = app_with_mailer(mailer.clone());
    let executed = AtomicBool::new(false);

    app.run(&full_request(), || {
        executed.store(true, Ordering::SeqCst);
        Ok(())
    })
    .unwrap();

    assert!(executed.load(Ordering::SeqCst));
    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        SentMail {
            from_email: "sender@example.com".to_string(),
            from_password: "hunter2".to_string(),
            to_email: "dest@example.com".to_string(),
            message: "from: sender@example.com\r\n\
                      subject: job finished\r\n\
                      to: dest@example.com\r\n\
                      mime-version: 1.0\r\n\
                      content-type: text/html\r\n\
                      \r\n\
                      all green"
                .to_string(),
        }
    );
}

#[test]
#[serial]
fn missing_parameter_fails_before_any_side_effect() {
    let mailer = RecordingMailer::default();
    let app = app_with_mailer(mailer.clone());
    let executed = AtomicBool::new(false);

    let request = AlertRequest {
        to_email: Some("user@example.com".to_string()),
        ..Default::default()
    };
    let err = app
        .run(&request, || {
            executed.store(true, Ordering::SeqCst);
            Ok(())
        })
        .unwrap_err();

    assert!(matches!(err, AlertsError::MissingParameter("subject")));
    assert!(!executed.load(Ordering::SeqCst), "work block must not run");
    assert!(mailer.sent().is_empty(), "no notification may be sent");
}

#[test]
#[serial]
fn work_failure_aborts_the_run_with_no_notification() {
    let mailer = RecordingMailer::default();
    let app = app_with_mailer(mailer.clone());

    let err = app
        .run(&full_request(), || Err(anyhow!("boom")))
        .unwrap_err();

    assert!(matches!(err, AlertsError::Execution(_)));
    assert_eq!(err.to_string(), "boom");
    assert!(mailer.sent().is_empty());
}

#[test]
#[serial]
fn transport_failure_surfaces_with_no_retry() {
    let app = App::with_parts(Box::new(NoSession), Box::new(FailingMailer));

    let err = app.run(&full_request(), || Ok(())).unwrap_err();

    assert!(matches!(err, AlertsError::Transport(_)));
    assert_eq!(err.to_string(), "email delivery failed");
}

#[test]
#[serial]
fn explicit_flag_wins_over_every_other_source() {
    std::env::set_var("IPY_ALERTS_SUBJECT", "from the environment");
    let session = StaticSessionStore::new([("subject", "from the session")]);
    let mailer = RecordingMailer::default();
    let app = App::with_parts(Box::new(session), Box::new(mailer.clone()));

    app.run(&full_request(), || Ok(())).unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].message.contains("subject: job finished"));

    std::env::remove_var("IPY_ALERTS_SUBJECT");
}

#[test]
#[serial]
fn session_store_fills_in_what_no_flag_provides() {
    let session = StaticSessionStore::new([("from_password", "'session_password'")]);
    let mailer = RecordingMailer::default();
    let app = App::with_parts(Box::new(session), Box::new(mailer.clone()));

    let mut request = full_request();
    request.from_password = None;
    app.run(&request, || Ok(())).unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    // Resolved values are sanitized exactly like explicit ones.
    assert_eq!(sent[0].from_password, "session_password");
}

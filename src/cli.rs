//! Command-Line Interface (CLI) argument parsing.
//!
//! Flag names mirror the parameter names; anything after `--` is the work
//! command. A parameter given as a flag is the topmost configuration layer:
//! it is used verbatim (after quote trimming) and no other source is
//! consulted for it.

use clap::Parser;

use crate::core::AlertRequest;

/// Default location of the INI config file. `~` is expanded at resolve
/// time, not at parse time.
pub const DEFAULT_CONFIG_PATH: &str = "~/.ipy_alerts.ini";

/// Run a command, then send a single email notification about its completion.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Recipient address.
    #[arg(long = "to_email", short = 'e')]
    pub to_email: Option<String>,

    /// Subject line.
    #[arg(long = "subject", short = 's')]
    pub subject: Option<String>,

    /// Message body, sent as HTML.
    #[arg(long = "body", short = 'b')]
    pub body: Option<String>,

    /// Sender address, also used to authenticate against the relay.
    #[arg(long = "from_email", short = 'f')]
    pub from_email: Option<String>,

    /// Password for the sender account.
    #[arg(long = "from_password", short = 'p')]
    pub from_password: Option<String>,

    /// INI config file consulted for parameters not given as flags.
    #[arg(long = "email_config", short = 'c', value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub email_config: String,

    /// Work command to run before the notification, given after `--`.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Splits the invocation into the parameter overrides and the work
    /// command.
    pub fn into_request(self) -> (AlertRequest, Vec<String>) {
        let Cli {
            to_email,
            subject,
            body,
            from_email,
            from_password,
            email_config,
            command,
        } = self;

        (
            AlertRequest {
                to_email,
                subject,
                body,
                from_email,
                from_password,
                email_config: Some(email_config),
            },
            command,
        )
    }
}

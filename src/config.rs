//! Layered resolution of the required email parameters.
//!
//! Each parameter is resolved by consulting sources in a fixed precedence
//! order: an explicit command-line flag outranks the INI config file, which
//! outranks the process environment, which outranks the live-session store.
//! The resolver walks the three implicit sources lowest to highest and lets
//! later writes overwrite earlier ones, so the highest-precedence value
//! survives. Explicit flags never reach the resolver at all; the
//! orchestrator only calls it for parameters with no flag.

use std::path::PathBuf;
use std::sync::LazyLock;

use ini::Ini;
use regex::Regex;
use tracing::debug;

use crate::session::{SessionLookup, SessionStore};

/// Namespace prefix for environment-variable lookups, e.g.
/// `IPY_ALERTS_FROM_PASSWORD`.
pub const ENV_PREFIX: &str = "IPY_ALERTS_";

/// Section consulted in both the INI file and the live-session document.
pub const CONFIG_SECTION: &str = "ipy_alerts";

static QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["']|["']$"#).expect("quote-trimming regex is valid"));

/// Strips one leading and one trailing quote character (`"` or `'`), each
/// side independently, so a value quoted on only one side is still trimmed
/// on that side. Re-sanitizing a clean value is a no-op.
pub fn sanitize(value: &str) -> String {
    QUOTES.replace_all(value, "").into_owned()
}

/// The environment variable consulted for `key`.
pub fn env_var_name(key: &str) -> String {
    format!("{}{}", ENV_PREFIX, key.to_uppercase())
}

/// Per-parameter resolver over the implicit sources.
pub struct Resolver<'a> {
    session: &'a dyn SessionStore,
    config_path: Option<&'a str>,
}

impl<'a> Resolver<'a> {
    pub fn new(session: &'a dyn SessionStore, config_path: Option<&'a str>) -> Self {
        Self {
            session,
            config_path,
        }
    }

    /// Returns the highest-precedence value any implicit source holds for
    /// `key`, or `None` when every source comes up empty. Read-only: the
    /// only accesses are the session store, the environment, and the file.
    pub fn resolve(&self, key: &str) -> Option<String> {
        let mut value = match self.session.get(key) {
            SessionLookup::Found(session_value) => Some(session_value),
            SessionLookup::Absent => None,
            SessionLookup::Unavailable => {
                debug!(key, "live-session store unavailable");
                None
            }
        };

        if let Ok(env_value) = std::env::var(env_var_name(key)) {
            value = Some(env_value);
        }

        self.config_file_value(key, value)
    }

    /// Looks `key` up in the config file, falling back to the value already
    /// accumulated from the lower-precedence sources. A missing file, an
    /// unexpandable path, or an unparsable file all mean "no value here",
    /// never an error.
    fn config_file_value(&self, key: &str, fallback: Option<String>) -> Option<String> {
        let Some(raw_path) = self.config_path else {
            return fallback;
        };

        let path = match shellexpand::full(raw_path) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(err) => {
                debug!(path = raw_path, %err, "could not expand config file path");
                return fallback;
            }
        };
        if !path.exists() {
            return fallback;
        }

        let file = match Ini::load_from_file(&path) {
            Ok(file) => file,
            Err(err) => {
                debug!(path = %path.display(), %err, "could not parse config file");
                return fallback;
            }
        };

        file.section(Some(CONFIG_SECTION))
            .and_then(|section| section.get(key))
            .map(str::to_owned)
            .or(fallback)
    }
}

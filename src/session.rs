//! The live-session configuration store.
//!
//! The interactive host that launches the tool may expose a live
//! configuration document. The host is an external collaborator: the
//! resolver only ever sees the `SessionStore` trait, and a store that
//! cannot be consulted reports so through an explicit lookup variant
//! instead of a swallowed error.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::config::CONFIG_SECTION;

/// Environment variable through which the host exports the path of its
/// session document.
pub const SESSION_FILE_ENV: &str = "IPY_ALERTS_SESSION_FILE";

/// Outcome of probing the live-session store for one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    /// The store holds a value for the parameter.
    Found(String),
    /// The store is reachable but has no value for the parameter.
    Absent,
    /// The store itself cannot be consulted: no host, no document, or a
    /// document that does not parse.
    Unavailable,
}

/// Read-only lookup into the host-provided session configuration.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> SessionLookup;
}

/// The session document is nested: section name first, then parameter name.
#[derive(Debug, Deserialize)]
struct SessionDocument(HashMap<String, HashMap<String, String>>);

/// Production store reading a JSON session document from the path the host
/// exports in `IPY_ALERTS_SESSION_FILE`. Re-read on every lookup, since the
/// host may rewrite it while the session is live.
pub struct JsonSessionStore {
    path: Option<PathBuf>,
}

impl JsonSessionStore {
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os(SESSION_FILE_ENV).map(PathBuf::from),
        }
    }

    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl SessionStore for JsonSessionStore {
    fn get(&self, key: &str) -> SessionLookup {
        let Some(path) = &self.path else {
            return SessionLookup::Unavailable;
        };

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %path.display(), %err, "session document unreadable");
                return SessionLookup::Unavailable;
            }
        };
        let SessionDocument(sections) = match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(err) => {
                debug!(path = %path.display(), %err, "session document malformed");
                return SessionLookup::Unavailable;
            }
        };

        match sections.get(CONFIG_SECTION).and_then(|section| section.get(key)) {
            Some(value) => SessionLookup::Found(value.clone()),
            None => SessionLookup::Absent,
        }
    }
}

/// In-memory store for exercising the resolver without a live host.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct StaticSessionStore {
    values: HashMap<String, String>,
}

#[cfg(any(test, feature = "test-utils"))]
impl StaticSessionStore {
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl SessionStore for StaticSessionStore {
    fn get(&self, key: &str) -> SessionLookup {
        match self.values.get(key) {
            Some(value) => SessionLookup::Found(value.clone()),
            None => SessionLookup::Absent,
        }
    }
}

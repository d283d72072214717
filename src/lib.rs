//! ipy-alerts - run a unit of work, then email a notification about it.
//!
//! The crate resolves the five required email parameters from layered
//! sources (explicit flags, an INI config file, namespaced environment
//! variables, and a host-provided live-session store), executes a
//! caller-supplied work block, and delivers a single message through an
//! SMTP submission relay.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod executor;
pub mod formatting;
pub mod session;
pub mod smtp;

// Re-export core types for convenience
pub use crate::core::*;

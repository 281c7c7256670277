//! `dbconnect` - open a PostgreSQL connection with bounded retry
//!
//! The connector makes a fixed number of attempts with a constant delay
//! between them and hands the open connection to the caller, or reports
//! exhaustion with the last error text.

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

/// Command-line interface definitions
pub mod cli;
/// Configuration management
pub mod config;
pub mod connection;
pub mod connector;
/// Error types
pub mod error;
pub mod retry;

pub use config::{Config, DatabaseConfig};
pub use connection::Connection;
pub use connector::{connect, AttemptOutcome, ConnectionAttempt, Connector};
pub use error::ConnectError;
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Bounded, fixed-delay connection retry loop
//!
//! Every failure is treated as transient: the connector logs it, waits the
//! configured delay and tries again until the attempt budget is spent. It
//! never terminates the process; exhaustion is returned to the caller.

use crate::config::{Config, DatabaseConfig};
use crate::connection::{Connection, STORE_NAME};
use crate::error::{error_chain, ConnectError, Result};
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper};
use std::fmt::Display;
use std::future::Future;
use tracing::{debug, info, warn};

/// Outcome of one connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A usable connection was obtained
    Success,
    /// The attempt failed with the given error text
    Failure(String),
}

/// Record of a single pass through the retry loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionAttempt {
    /// 0-based attempt index
    pub index: u32,
    /// What happened
    pub outcome: AttemptOutcome,
}

impl ConnectionAttempt {
    /// 1-based attempt number, as shown in logs
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.index + 1
    }

    /// Error text if the attempt failed
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            AttemptOutcome::Success => None,
            AttemptOutcome::Failure(message) => Some(message),
        }
    }

    /// Whether the attempt failed
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Failure(_))
    }
}

/// Opens database connections with bounded retry
#[derive(Debug, Clone)]
pub struct Connector<S = TokioSleeper> {
    policy: RetryPolicy,
    sleeper: S,
    store: String,
}

impl Connector<TokioSleeper> {
    /// Create a connector that sleeps on the tokio timer
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            sleeper: TokioSleeper,
            store: STORE_NAME.to_string(),
        }
    }

    /// Create a connector from the `[retry]` section of a config
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(RetryPolicy::from(&config.retry))
    }
}

impl Default for Connector<TokioSleeper> {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl<S: Sleeper> Connector<S> {
    /// Replace the sleeper used between attempts
    #[must_use]
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> Connector<T> {
        Connector {
            policy: self.policy,
            sleeper,
            store: self.store,
        }
    }

    /// Set the backend name used in failure diagnostics
    #[must_use]
    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = store.into();
        self
    }

    /// Get the retry policy
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Open a connection to the database described by `config`
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::Exhausted`] carrying the last error text when
    /// every attempt fails
    pub async fn connect(&self, config: &DatabaseConfig) -> Result<Connection> {
        info!(
            "Connecting to {} at {}:{} (database {}, up to {} attempts)",
            self.store,
            config.host,
            config.port,
            config.dbname,
            self.policy.attempts()
        );

        // Resolved once per connect, not per attempt
        let password = config.password();
        let password = password.as_str();

        let connection = self
            .connect_with(move || async move {
                Connection::open(config, password)
                    .await
                    .map_err(|e| error_chain(&e))
            })
            .await?;

        info!("Connected to {} database {}", self.store, config.dbname);
        Ok(connection)
    }

    /// Run the retry loop around an arbitrary attempt function
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::Exhausted`] when every attempt fails
    pub async fn connect_with<T, E, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        self.connect_with_observer(operation, |_| {}).await
    }

    /// Run the retry loop, reporting every attempt to `observer`
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::Exhausted`] when every attempt fails
    pub async fn connect_with_observer<T, E, F, Fut, O>(
        &self,
        mut operation: F,
        mut observer: O,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
        O: FnMut(&ConnectionAttempt),
    {
        let max_attempts = self.policy.attempts();
        let mut last_error = String::new();

        for index in 0..max_attempts {
            debug!("Connection attempt {}/{}", index + 1, max_attempts);

            match operation().await {
                Ok(connection) => {
                    if index > 0 {
                        info!(
                            "{} connection succeeded on attempt {}",
                            self.store,
                            index + 1
                        );
                    }
                    observer(&ConnectionAttempt {
                        index,
                        outcome: AttemptOutcome::Success,
                    });
                    return Ok(connection);
                }
                Err(e) => {
                    let message = e.to_string();
                    let failure = ConnectError::Transient {
                        store: self.store.clone(),
                        attempt: index + 1,
                        message: message.clone(),
                    };
                    warn!("{}", failure);

                    observer(&ConnectionAttempt {
                        index,
                        outcome: AttemptOutcome::Failure(message.clone()),
                    });
                    last_error = message;

                    if self.policy.sleeps_after(index) {
                        self.sleeper.sleep(self.policy.delay).await;
                    }
                }
            }
        }

        Err(ConnectError::Exhausted {
            attempts: max_attempts,
            last_error,
        })
    }
}

/// Open a connection using both sections of `config`
///
/// # Errors
///
/// Returns [`ConnectError::Exhausted`] when every attempt fails
pub async fn connect(config: &Config) -> Result<Connection> {
    Connector::from_config(config).connect(&config.database).await
}

use thiserror::Error;

/// Errors produced while establishing a database connection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// A single attempt failed; the connector logs it and tries again
    #[error("{store} connection failed (attempt {attempt}): {message}")]
    Transient {
        /// Backend name used in diagnostics
        store: String,
        /// 1-based attempt number
        attempt: u32,
        /// Error text reported by the client library
        message: String,
    },

    /// Every permitted attempt failed
    #[error("Connection failed after multiple attempts: {last_error}")]
    Exhausted {
        /// Number of attempts made
        attempts: u32,
        /// Error text of the final attempt
        last_error: String,
    },
}

/// Render an error together with its `source()` chain
///
/// Client libraries often keep the useful text (refused, auth failure,
/// unknown host) in a source error rather than in their own message.
#[must_use]
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

/// Result type alias for connector operations
pub type Result<T> = std::result::Result<T, ConnectError>;

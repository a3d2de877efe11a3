//! Centralized error handling for the scullery client.
//!
//! ## Custom Error Types with `enum`
//!
//! We use an `enum` to represent different error categories. This is more
//! type-safe than using strings and allows pattern matching:
//!
//! ```
//! use scullery::error::SculleryError;
//!
//! fn handle_error(err: SculleryError) {
//!     match err {
//!         SculleryError::Transport(msg) => eprintln!("network problem: {}", msg),
//!         SculleryError::Api(msg) => eprintln!("server said no: {}", msg),
//!         SculleryError::Precondition(msg) => eprintln!("{}", msg),
//!         _ => eprintln!("other error: {}", err),
//!     }
//! }
//! ```
//!
//! The `Transport`/`Api` split mirrors how the remote service fails: a
//! request can die on the wire (unreachable host, garbage body), or it can
//! come back well-formed with a non-success status and a message meant for
//! the user. Callers treat both as "stage failed", but keep the message
//! intact for display.
//!
//! ## The `From` Trait for Error Conversion
//!
//! We implement `From<E>` for automatic error type conversion. This allows
//! the `?` operator to work seamlessly:
//!
//! ```no_run
//! use scullery::error::{Result, SculleryError};
//! use std::fs;
//!
//! fn read_token_file(path: &str) -> Result<String> {
//!     // std::io::Error automatically converts to SculleryError via From
//!     let content = fs::read_to_string(path)?;
//!     Ok(content)
//! }
//! ```
//!
//! ## Context Extension Trait
//!
//! The `ResultExt` trait adds a `.context()` method to any `Result` for
//! attaching contextual information to errors:
//!
//! ```no_run
//! use scullery::error::ResultExt as _;
//! use std::fs;
//!
//! fn load_session() -> scullery::error::Result<String> {
//!     let raw = fs::read_to_string("session.json")
//!         .context("Failed to load saved session")?;
//!     Ok(raw)
//! }
//! ```

use std::fmt;

/// Main error type for scullery operations.
#[derive(Debug)]
pub enum SculleryError {
    /// I/O errors (file operations, etc.)
    Io(std::io::Error),

    /// Request never produced a usable response (unreachable server,
    /// connection reset, non-JSON body)
    Transport(String),

    /// Well-formed failure response from the service; the message is
    /// shown to the user verbatim
    Api(String),

    /// Session store problems (credential could not be saved or removed)
    Session(String),

    /// Configuration/serialization errors
    Config(String),

    /// A stage was triggered without its required prior state; carries
    /// the user-facing message and never reaches the network
    Precondition(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for SculleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Transport(msg) => write!(f, "Network error: {msg}"),
            Self::Api(msg) => write!(f, "{msg}"),
            Self::Session(msg) => write!(f, "Session error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Precondition(msg) => write!(f, "{msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SculleryError {}

impl From<std::io::Error> for SculleryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for SculleryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for SculleryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<reqwest::Error> for SculleryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type alias for scullery operations.
pub type Result<T> = std::result::Result<T, SculleryError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SculleryError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: SculleryError = e.into();
            SculleryError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: SculleryError = e.into();
            SculleryError::Other(format!("{}: {}", f(), err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SculleryError::Transport("connection refused".to_owned());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_api_message_is_verbatim() {
        let err = SculleryError::Api("Invalid credentials".to_owned());
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "session.json",
        ));

        let result: Result<()> = result.context("Failed to read saved session");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read saved session")
        );
    }
}

//! Error types for flowwave.

use std::fmt;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration loading errors (environment and config file).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse automation config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single validation finding: where in the config, and what is wrong.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Violation {
    /// Location of the offending field, e.g. `flows[2].matchValue`.
    pub path: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Automation-config validation failure carrying every violation found.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Outbound transport errors (Twilio Messages API).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(
        "Missing Twilio credentials. Set TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, \
         and TWILIO_WHATSAPP_NUMBER environment variables."
    )]
    MissingCredentials,

    #[error("Request to Twilio failed: {0}")]
    Request(String),

    #[error("Twilio rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid response from Twilio: {0}")]
    InvalidResponse(String),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;

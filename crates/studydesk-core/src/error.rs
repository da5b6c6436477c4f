#![forbid(unsafe_code)]

//! Error type shared by the page model.

/// Failure while building the page model.
///
/// Runtime interaction never fails: unknown identifiers and missing elements
/// degrade to fallbacks or no-ops. Errors only arise while parsing host
/// supplied configuration or validating the collected layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// The JSON configuration block could not be decoded.
    InvalidConfig(String),
    /// The collected layout references an element that does not exist.
    InvalidLayout(String),
}

impl core::fmt::Display for SiteError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::InvalidLayout(msg) => write!(f, "invalid layout: {msg}"),
        }
    }
}

impl std::error::Error for SiteError {}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

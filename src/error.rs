use chrono::{DateTime, Utc};
use http::StatusCode;

/// Failures that callers may want to tell apart.
///
/// These travel inside [`anyhow::Error`], use [`anyhow::Error::downcast_ref`] to recover them.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("prices for `{key}` are unavailable: {reason}")]
    PriceSourceUnavailable { key: String, reason: String },

    #[error("no price for {0}")]
    PriceNotFound(DateTime<Utc>),

    #[error("charger responded with {status}: {body}")]
    ControlActionFailed { status: StatusCode, body: String },
}

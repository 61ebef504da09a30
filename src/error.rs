//! Errors surfaced at the edge of the crate
//!
//! Simulations themselves never fail: broken geometry is a bug and asserts.
//! What can go wrong is parsing things handed to us by the shell.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("unknown game id: {0:?}")]
    UnknownGame(String),

    #[error("{0} is listed in the catalog but has no simulation")]
    NotSimulated(crate::catalog::GameId),

    #[error("unknown language tag: {0:?}")]
    UnknownLanguage(String),

    #[error("invalid setting {key}: {value:?}")]
    InvalidSetting { key: &'static str, value: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

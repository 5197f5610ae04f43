//! Runtime error types.

use thiserror::Error;

use squad_engine::error::{CatalogError, ConfigError, RuleError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("intent log is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{operation} requires a confirmed squad")]
    NotManaging { operation: &'static str },

    #[error("session lock poisoned")]
    LockPoisoned,

    #[error("replays diverged: {first} != {second}")]
    Determinism { first: String, second: String },
}

/// Client-side validation and decoded backend rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("verification code must be {len} digits")]
    InvalidOtp { len: usize },

    #[error("team name cannot be empty")]
    EmptyTeamName,

    #[error("user id cannot be empty")]
    EmptyUserId,

    #[error("backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("backend response is malformed: {0}")]
    Malformed(String),
}

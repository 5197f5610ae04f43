//! Error types.
//!
//! `RuleError` is the one rejection type every engine operation returns.
//! Each variant maps to a stable reason code the UI keys its messages on.

use thiserror::Error;

use crate::domain::{ClubId, PlayerId, Position};
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    // -- admission --
    #[error("player {player} is already in the squad")]
    Duplicate { player: PlayerId },

    #[error("squad already has {size} players")]
    SquadFull { size: usize },

    #[error("all {required} {position} slots are filled")]
    PositionFull { position: Position, required: usize },

    /// `shortfall` is how much more money the action would need.
    #[error("over budget: need {shortfall} more")]
    BudgetExceeded { shortfall: Money },

    #[error("max {cap} players allowed from {club}")]
    ClubLimit { club: ClubId, cap: usize },

    // -- formation --
    #[error("goalkeepers can only be swapped with goalkeepers")]
    GkMismatch,

    #[error("formation must be {min_defenders}-{max_defenders} DEF and {min_forwards}-{max_forwards} FWD, got {defenders} DEF and {forwards} FWD")]
    InvalidFormation {
        defenders: usize,
        forwards: usize,
        min_defenders: usize,
        max_defenders: usize,
        min_forwards: usize,
        max_forwards: usize,
    },

    #[error("substitute goalkeeper must stay in the first bench slot")]
    BenchGkLock,

    // -- transfer --
    #[error("a {outgoing} must be replaced with another {outgoing}, not a {incoming}")]
    PositionMismatch { outgoing: Position, incoming: Position },

    // -- captaincy --
    #[error("player {player} is on the bench and cannot captain")]
    NotInStartingXi { player: PlayerId },

    // -- structural --
    #[error("player {player} is not in the squad")]
    NotInSquad { player: PlayerId },

    #[error("player {player} is not in the catalog")]
    UnknownPlayer { player: PlayerId },

    #[error("cannot swap player {player} with themselves")]
    SamePlayer { player: PlayerId },

    #[error("squad is incomplete: {}", .shortfalls.join(", "))]
    IncompleteSquad { shortfalls: Vec<String> },

    #[error("squad violates an invariant: {reason}")]
    InvalidSquad { reason: String },

    #[error("{intent} is not allowed while {phase}")]
    WrongPhase { intent: &'static str, phase: &'static str },
}

impl RuleError {
    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            RuleError::Duplicate { .. } => "DUPLICATE",
            RuleError::SquadFull { .. } => "SQUAD_FULL",
            RuleError::PositionFull { .. } => "POSITION_FULL",
            RuleError::BudgetExceeded { .. } => "BUDGET_EXCEEDED",
            RuleError::ClubLimit { .. } => "CLUB_LIMIT",
            RuleError::GkMismatch => "GK_MISMATCH",
            RuleError::InvalidFormation { .. } => "INVALID_FORMATION",
            RuleError::BenchGkLock => "BENCH_GK_LOCK",
            RuleError::PositionMismatch { .. } => "POSITION_MISMATCH",
            RuleError::NotInStartingXi { .. } => "NOT_IN_STARTING_XI",
            RuleError::NotInSquad { .. } => "NOT_IN_SQUAD",
            RuleError::UnknownPlayer { .. } => "UNKNOWN_PLAYER",
            RuleError::SamePlayer { .. } => "SAME_PLAYER",
            RuleError::IncompleteSquad { .. } => "INCOMPLETE_SQUAD",
            RuleError::InvalidSquad { .. } => "INVALID_SQUAD",
            RuleError::WrongPhase { .. } => "WRONG_PHASE",
        }
    }
}

/// Catalog loading failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid player id {0:?}: must match [a-zA-Z0-9_-]+")]
    InvalidId(String),

    #[error("player id {0:?} appears more than once")]
    DuplicateId(String),

    #[error("player {id} has negative price {price}")]
    NegativePrice { id: String, price: Money },

    #[error("player {id} price {price} is above the {max} ceiling")]
    PriceTooHigh { id: String, price: Money, max: Money },

    #[error("player {0} has an empty club")]
    EmptyClub(String),

    #[error("catalog JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rule configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rule config JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rule config is inconsistent: {0}")]
    Inconsistent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(RuleError::BenchGkLock.code(), "BENCH_GK_LOCK");
        assert_eq!(
            RuleError::ClubLimit { club: ClubId::from("Arsenal"), cap: 3 }.code(),
            "CLUB_LIMIT"
        );
        assert_eq!(
            RuleError::BudgetExceeded { shortfall: Money::from_tenths(5) }.to_string(),
            "over budget: need 0.5 more"
        );
    }
}

#![forbid(unsafe_code)]

/// Ruleset v1. Bumped whenever a rule change alters canonical hashes.
pub const RULESET_VERSION: u32 = 1;

pub mod money;
pub mod domain;
pub mod error;
pub mod catalog;
pub mod rules;
pub mod squad;
pub mod builder;
pub mod lineup;
pub mod transfer;
pub mod state;
pub mod intents;
pub mod transitions;
pub mod hashing;
pub mod engine;

pub use catalog::Catalog;
pub use domain::{Player, PlayerId, Position, RuleConfig};
pub use engine::SquadEngine;
pub use error::RuleError;
pub use intents::Intent;
pub use money::Money;
pub use squad::Squad;
pub use state::TeamState;

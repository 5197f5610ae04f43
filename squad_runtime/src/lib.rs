#![forbid(unsafe_code)]

//! SquadEngine Runtime
//!
//! Wraps the rule kernel with editing sessions, intent-log replay,
//! squad diffing and the typed backend contract.
//!
//! No rule logic lives here: every decision is delegated to the kernel.

pub mod error;
pub mod contract;
pub mod replay;
pub mod drift;
pub mod session;

pub use error::{ContractError, SessionError};
pub use session::{SharedSession, TapOutcome, TeamSession};

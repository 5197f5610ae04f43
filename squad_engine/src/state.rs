/// SquadEngine: Team State
///
/// A team is either still being picked or confirmed and managed.

use serde::Serialize;

use crate::domain::Player;
use crate::transfer::ManagedTeam;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TeamState {
    /// Build phase: an unordered-by-role list of picks, in pick order.
    Building { selection: Vec<Player> },
    /// Confirmed 15 with lineup and transfer accounting.
    Managing { team: ManagedTeam },
}

impl Default for TeamState {
    fn default() -> Self {
        create_initial_state()
    }
}

impl TeamState {
    pub fn phase_name(&self) -> &'static str {
        match self {
            TeamState::Building { .. } => "building",
            TeamState::Managing { .. } => "managing",
        }
    }

    pub fn selection(&self) -> Option<&[Player]> {
        match self {
            TeamState::Building { selection } => Some(selection.as_slice()),
            TeamState::Managing { .. } => None,
        }
    }

    pub fn team(&self) -> Option<&ManagedTeam> {
        match self {
            TeamState::Building { .. } => None,
            TeamState::Managing { team } => Some(team),
        }
    }
}

/// Create a fresh, empty build-phase state.
pub fn create_initial_state() -> TeamState {
    TeamState::Building {
        selection: Vec::new(),
    }
}

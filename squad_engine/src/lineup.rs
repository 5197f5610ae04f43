/// SquadEngine: Lineup Engine
///
/// Starting 11 / bench swaps, captaincy, and the two-tap selection
/// state machine the team screen drives. Every success returns a fresh
/// `Squad`; every rejection leaves the input untouched.

use serde::{Deserialize, Serialize};

use crate::domain::{PlayerId, RuleConfig};
use crate::error::RuleError;
use crate::rules::{check_formation, starting_counts};
use crate::squad::Squad;

// ---------------------------------------------------------------------------
// Swaps
// ---------------------------------------------------------------------------

/// Evaluate swapping `a` and `b` and return the resulting squad.
///
/// - starter with bench player: goalkeepers only swap with goalkeepers,
///   and the new Starting 11 must stay inside the formation bounds. A
///   captain leaving the pitch hands the armband to the incoming player.
/// - two bench players: a reorder; the locked bench goalkeeper cannot
///   take part.
/// - two starters: a reorder within the Starting 11, always legal.
pub fn evaluate_swap(
    squad: &Squad,
    a: &PlayerId,
    b: &PlayerId,
    config: &RuleConfig,
) -> Result<Squad, RuleError> {
    if a == b {
        return Err(RuleError::SamePlayer { player: a.clone() });
    }
    let ia = squad
        .slot_of(a)
        .ok_or_else(|| RuleError::NotInSquad { player: a.clone() })?;
    let ib = squad
        .slot_of(b)
        .ok_or_else(|| RuleError::NotInSquad { player: b.clone() })?;

    let starting = config.starting_size;
    let mut slots = squad.slots().to_vec();
    let mut captain = squad.captain().clone();

    match (ia < starting, ib < starting) {
        (true, false) | (false, true) => {
            let (pitch, bench) = if ia < starting { (ia, ib) } else { (ib, ia) };
            if slots[pitch].is_goalkeeper() != slots[bench].is_goalkeeper() {
                return Err(RuleError::GkMismatch);
            }
            slots.swap(pitch, bench);
            check_formation(&starting_counts(&slots, config), config)?;
            if slots[bench].id == captain {
                captain = slots[pitch].id.clone();
            }
        }
        (false, false) => {
            if slots[ia].is_goalkeeper() || slots[ib].is_goalkeeper() {
                return Err(RuleError::BenchGkLock);
            }
            slots.swap(ia, ib);
        }
        (true, true) => {
            slots.swap(ia, ib);
        }
    }

    Squad::new(slots, captain, config)
}

/// Hand the armband to `player`. Only starters may captain.
pub fn set_captain(squad: &Squad, player: &PlayerId, config: &RuleConfig) -> Result<Squad, RuleError> {
    if !squad.contains(player) {
        return Err(RuleError::NotInSquad { player: player.clone() });
    }
    if !squad.is_starter(player) {
        return Err(RuleError::NotInStartingXi { player: player.clone() });
    }
    Squad::new(squad.slots().to_vec(), player.clone(), config)
}

// ---------------------------------------------------------------------------
// Selection state machine
// ---------------------------------------------------------------------------

/// Tap-to-swap state: `Idle` until a first player is picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SwapSelector {
    #[default]
    Idle,
    PendingSwap { selected: PlayerId },
}

/// What a tap did.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// First player picked; waiting for a partner.
    Pending(PlayerId),
    /// Same player tapped again.
    Cancelled,
    /// Second starter tapped while a starter was pending: selection moves.
    Reselected(PlayerId),
    Swapped(Squad),
}

impl SwapSelector {
    pub fn selected(&self) -> Option<&PlayerId> {
        match self {
            SwapSelector::Idle => None,
            SwapSelector::PendingSwap { selected } => Some(selected),
        }
    }

    /// Feed one tap. A rejected swap still returns the selector to `Idle`.
    pub fn select(
        &mut self,
        squad: &Squad,
        player: &PlayerId,
        config: &RuleConfig,
    ) -> Result<SelectOutcome, RuleError> {
        if !squad.contains(player) {
            return Err(RuleError::NotInSquad { player: player.clone() });
        }

        let first = match std::mem::take(self) {
            SwapSelector::Idle => {
                *self = SwapSelector::PendingSwap { selected: player.clone() };
                return Ok(SelectOutcome::Pending(player.clone()));
            }
            SwapSelector::PendingSwap { selected } => selected,
        };

        if &first == player {
            return Ok(SelectOutcome::Cancelled);
        }

        if squad.is_starter(&first) && squad.is_starter(player) {
            *self = SwapSelector::PendingSwap { selected: player.clone() };
            return Ok(SelectOutcome::Reselected(player.clone()));
        }

        evaluate_swap(squad, &first, player, config).map(SelectOutcome::Swapped)
    }

    pub fn reset(&mut self) {
        *self = SwapSelector::Idle;
    }
}

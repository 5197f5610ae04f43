//! Drift detection: determinism verification and squad comparison.
//!
//! All money values are fixed-point tenths. No float arithmetic.

use std::collections::BTreeSet;

use serde::Serialize;

use squad_engine::catalog::Catalog;
use squad_engine::domain::{Player, PlayerId, RuleConfig};
use squad_engine::intents::Intent;
use squad_engine::money::Money;
use squad_engine::state::TeamState;

use crate::error::SessionError;
use crate::replay;

/// Replay the same intents twice and require identical hashes.
/// Returns the agreed hash.
pub fn verify_determinism(
    catalog: &Catalog,
    config: &RuleConfig,
    intents: &[Intent],
) -> Result<String, SessionError> {
    let first = replay::rebuild_hash(catalog, config, intents)?;
    let second = replay::rebuild_hash(catalog, config, intents)?;
    if first != second {
        tracing::error!(%first, %second, "replay determinism failure");
        return Err(SessionError::Determinism { first, second });
    }
    Ok(first)
}

/// Structured difference between two team states.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SquadDiff {
    pub phase_a: &'static str,
    pub phase_b: &'static str,
    /// In `b` but not in `a`, in `b`'s order.
    pub players_in: Vec<PlayerId>,
    /// In `a` but not in `b`, in `a`'s order.
    pub players_out: Vec<PlayerId>,
    /// Kept players that moved from the bench into the Starting 11.
    pub promoted: Vec<PlayerId>,
    /// Kept players that moved from the Starting 11 to the bench.
    pub demoted: Vec<PlayerId>,
    pub captain_a: Option<PlayerId>,
    pub captain_b: Option<PlayerId>,
    pub total_price_delta: Money,
    /// Only set when both states are managed teams.
    pub bank_delta: Option<Money>,
    pub penalty_delta: i64,
    pub free_transfers_delta: i64,
}

impl SquadDiff {
    pub fn captain_changed(&self) -> bool {
        self.captain_a != self.captain_b
    }

    pub fn is_empty(&self) -> bool {
        self.players_in.is_empty()
            && self.players_out.is_empty()
            && self.promoted.is_empty()
            && self.demoted.is_empty()
            && !self.captain_changed()
            && self.bank_delta.map_or(true, |d| d == Money::ZERO)
            && self.penalty_delta == 0
            && self.free_transfers_delta == 0
    }
}

/// Compare two states of the same team. Works across phases: a build
/// selection compares as an all-bench squad with no captain.
pub fn compare_states(a: &TeamState, b: &TeamState) -> SquadDiff {
    let players_a = roster(a);
    let players_b = roster(b);
    let ids_a: BTreeSet<&PlayerId> = players_a.iter().map(|p| &p.id).collect();
    let ids_b: BTreeSet<&PlayerId> = players_b.iter().map(|p| &p.id).collect();

    let players_in = players_b
        .iter()
        .filter(|p| !ids_a.contains(&p.id))
        .map(|p| p.id.clone())
        .collect();
    let players_out = players_a
        .iter()
        .filter(|p| !ids_b.contains(&p.id))
        .map(|p| p.id.clone())
        .collect();

    let starters_a = starter_ids(a);
    let starters_b = starter_ids(b);
    let mut promoted = Vec::new();
    let mut demoted = Vec::new();
    for p in players_b.iter().filter(|p| ids_a.contains(&p.id)) {
        match (starters_a.contains(&p.id), starters_b.contains(&p.id)) {
            (false, true) => promoted.push(p.id.clone()),
            (true, false) => demoted.push(p.id.clone()),
            _ => {}
        }
    }

    let total_a: Money = players_a.iter().map(|p| p.price).sum();
    let total_b: Money = players_b.iter().map(|p| p.price).sum();

    let (bank_delta, penalty_delta, free_transfers_delta) = match (a.team(), b.team()) {
        (Some(ta), Some(tb)) => (
            Some(tb.bank - ta.bank),
            i64::from(tb.penalty_points) - i64::from(ta.penalty_points),
            i64::from(tb.free_transfers) - i64::from(ta.free_transfers),
        ),
        _ => (None, 0, 0),
    };

    SquadDiff {
        phase_a: a.phase_name(),
        phase_b: b.phase_name(),
        players_in,
        players_out,
        promoted,
        demoted,
        captain_a: a.team().map(|t| t.squad.captain().clone()),
        captain_b: b.team().map(|t| t.squad.captain().clone()),
        total_price_delta: total_b - total_a,
        bank_delta,
        penalty_delta,
        free_transfers_delta,
    }
}

fn roster(state: &TeamState) -> &[Player] {
    match state {
        TeamState::Building { selection } => selection,
        TeamState::Managing { team } => team.squad.slots(),
    }
}

fn starter_ids(state: &TeamState) -> BTreeSet<PlayerId> {
    state
        .team()
        .map(|t| t.squad.starters().iter().map(|p| p.id.clone()).collect())
        .unwrap_or_default()
}

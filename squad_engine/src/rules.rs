/// SquadEngine: Squad Rules
///
/// Pure predicates and values over a candidate squad. No state.
/// `check_squad` is the full invariant gate every committed squad passes.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    ClubId, CompositionIssue, CompositionReport, Player, PlayerId, Position, PositionCounts,
    RuleConfig,
};
use crate::error::RuleError;
use crate::money::Money;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn counts_by_position(players: &[Player]) -> PositionCounts {
    let mut counts = PositionCounts::default();
    for p in players {
        *counts.get_mut(p.position) += 1;
    }
    counts
}

/// True iff the position already holds its full-squad quota.
pub fn is_position_full(position: Position, players: &[Player], config: &RuleConfig) -> bool {
    counts_by_position(players).get(position) >= config.required.get(position)
}

pub fn total_price(players: &[Player]) -> Money {
    players.iter().map(|p| p.price).sum()
}

/// Ceiling minus total. Negative for an over-budget candidate.
pub fn remaining_budget(players: &[Player], config: &RuleConfig) -> Money {
    config.budget_ceiling - total_price(players)
}

pub fn club_count(players: &[Player], club: &ClubId) -> usize {
    players.iter().filter(|p| &p.club_id == club).count()
}

/// Per-club counts, sorted by club for deterministic reporting.
pub fn club_counts(players: &[Player]) -> BTreeMap<&ClubId, usize> {
    let mut counts: BTreeMap<&ClubId, usize> = BTreeMap::new();
    for p in players {
        *counts.entry(&p.club_id).or_default() += 1;
    }
    counts
}

/// Report every way a (possibly partial) squad falls short of a legal one.
///
/// Valid only when each position count equals its quota exactly, the total
/// is within the ceiling and no club exceeds the cap.
pub fn validate_composition(players: &[Player], config: &RuleConfig) -> CompositionReport {
    let counts = counts_by_position(players);
    let mut issues = Vec::new();

    for pos in Position::ALL {
        let have = counts.get(pos);
        let need = config.required.get(pos);
        if have < need {
            issues.push(CompositionIssue::Shortfall {
                position: pos,
                missing: need - have,
            });
        }
    }
    for pos in Position::ALL {
        let have = counts.get(pos);
        let need = config.required.get(pos);
        if have > need {
            issues.push(CompositionIssue::Surplus {
                position: pos,
                extra: have - need,
            });
        }
    }

    let total = total_price(players);
    let remaining = config.budget_ceiling - total;
    if remaining.is_negative() {
        issues.push(CompositionIssue::OverBudget { by: -remaining });
    }

    for (club, count) in club_counts(players) {
        if count > config.club_cap {
            issues.push(CompositionIssue::ClubOverCap {
                club: club.clone(),
                count,
                cap: config.club_cap,
            });
        }
    }

    let shortfalls = issues
        .iter()
        .filter(|i| matches!(i, CompositionIssue::Shortfall { .. }))
        .map(|i| i.to_string())
        .collect();

    CompositionReport {
        is_valid: issues.is_empty(),
        shortfalls,
        issues,
        counts,
        total_price: total,
        remaining_budget: remaining,
    }
}

/// Position counts of the Starting 11 slice of an ordered squad.
pub fn starting_counts(slots: &[Player], config: &RuleConfig) -> PositionCounts {
    counts_by_position(&slots[..config.starting_size.min(slots.len())])
}

/// Check a starting-lineup count against the formation bounds.
pub fn check_formation(counts: &PositionCounts, config: &RuleConfig) -> Result<(), RuleError> {
    let b = &config.formation;
    if b.admits(counts) {
        return Ok(());
    }
    Err(RuleError::InvalidFormation {
        defenders: counts.defenders,
        forwards: counts.forwards,
        min_defenders: b.min_defenders,
        max_defenders: b.max_defenders,
        min_forwards: b.min_forwards,
        max_forwards: b.max_forwards,
    })
}

/// Run every squad invariant. Returns the first failure.
pub fn check_squad(
    slots: &[Player],
    captain: &PlayerId,
    config: &RuleConfig,
) -> Result<(), RuleError> {
    check_size(slots, config)?;
    check_distinct(slots)?;
    check_quotas(slots, config)?;
    check_budget(slots, config)?;
    check_club_cap(slots, config)?;
    check_formation(&starting_counts(slots, config), config)?;
    check_bench_goalkeeper(slots, config)?;
    check_captain(slots, captain, config)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Individual checks (private)
// ---------------------------------------------------------------------------

fn check_size(slots: &[Player], config: &RuleConfig) -> Result<(), RuleError> {
    if slots.len() != config.squad_size {
        return Err(RuleError::InvalidSquad {
            reason: format!(
                "squad has {} players, expected {}",
                slots.len(),
                config.squad_size
            ),
        });
    }
    Ok(())
}

fn check_distinct(slots: &[Player]) -> Result<(), RuleError> {
    let mut seen: BTreeSet<&PlayerId> = BTreeSet::new();
    for p in slots {
        if !seen.insert(&p.id) {
            return Err(RuleError::Duplicate { player: p.id.clone() });
        }
    }
    Ok(())
}

fn check_quotas(slots: &[Player], config: &RuleConfig) -> Result<(), RuleError> {
    let counts = counts_by_position(slots);
    if counts != config.required {
        let r = &config.required;
        return Err(RuleError::InvalidSquad {
            reason: format!(
                "squad is {}/{}/{}/{} GK/DF/MID/FWD, expected {}/{}/{}/{}",
                counts.goalkeepers,
                counts.defenders,
                counts.midfielders,
                counts.forwards,
                r.goalkeepers,
                r.defenders,
                r.midfielders,
                r.forwards
            ),
        });
    }
    Ok(())
}

fn check_budget(slots: &[Player], config: &RuleConfig) -> Result<(), RuleError> {
    let remaining = remaining_budget(slots, config);
    if remaining.is_negative() {
        return Err(RuleError::BudgetExceeded { shortfall: -remaining });
    }
    Ok(())
}

fn check_club_cap(slots: &[Player], config: &RuleConfig) -> Result<(), RuleError> {
    for (club, count) in club_counts(slots) {
        if count > config.club_cap {
            return Err(RuleError::ClubLimit {
                club: club.clone(),
                cap: config.club_cap,
            });
        }
    }
    Ok(())
}

/// First bench slot holds a goalkeeper; no other bench slot does.
fn check_bench_goalkeeper(slots: &[Player], config: &RuleConfig) -> Result<(), RuleError> {
    let bench = &slots[config.starting_size..];
    match bench.split_first() {
        Some((first, rest)) if first.is_goalkeeper() && !rest.iter().any(Player::is_goalkeeper) => {
            Ok(())
        }
        _ => Err(RuleError::BenchGkLock),
    }
}

fn check_captain(slots: &[Player], captain: &PlayerId, config: &RuleConfig) -> Result<(), RuleError> {
    match slots.iter().position(|p| &p.id == captain) {
        None => Err(RuleError::NotInSquad { player: captain.clone() }),
        Some(slot) if slot >= config.starting_size => Err(RuleError::NotInStartingXi {
            player: captain.clone(),
        }),
        Some(_) => Ok(()),
    }
}

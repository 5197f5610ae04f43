/// SquadEngine: Transfer Engine
///
/// One-for-one replacements with bank, free-transfer and penalty
/// accounting. The incoming player takes the outgoing player's slot,
/// so the lineup shape (and the bench goalkeeper lock) never changes.

use serde::Serialize;

use crate::domain::{Player, PlayerId, RuleConfig};
use crate::error::RuleError;
use crate::money::Money;
use crate::rules::club_count;
use crate::squad::Squad;

/// A squad plus its transfer-window accounting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagedTeam {
    pub squad: Squad,
    /// Money left in the bank. Never committed negative.
    pub bank: Money,
    pub free_transfers: u32,
    /// Points deducted so far for transfers beyond the free allowance.
    pub penalty_points: u32,
}

impl ManagedTeam {
    /// A freshly confirmed squad: bank is whatever the ceiling leaves over.
    pub fn new(squad: Squad, config: &RuleConfig) -> Self {
        let bank = config.budget_ceiling - squad.total_price();
        Self {
            squad,
            bank,
            free_transfers: config.free_transfers_per_window,
            penalty_points: 0,
        }
    }

    /// Restore a team whose bank and allowance come from elsewhere.
    pub fn with_accounts(squad: Squad, bank: Money, free_transfers: u32) -> Result<Self, RuleError> {
        if bank.is_negative() {
            return Err(RuleError::BudgetExceeded { shortfall: -bank });
        }
        Ok(Self {
            squad,
            bank,
            free_transfers,
            penalty_points: 0,
        })
    }

    /// Points the next transfer would cost.
    pub fn pending_penalty(&self, config: &RuleConfig) -> u32 {
        if self.free_transfers > 0 {
            0
        } else {
            config.transfer_penalty_points
        }
    }
}

/// Everything `execute` changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferOutcome {
    pub squad: Squad,
    pub bank: Money,
    pub free_transfers: u32,
    /// Penalty accrued by this transfer alone: 0 or the configured hit.
    pub penalty: u32,
    pub price_delta: Money,
}

/// `incoming.price - outgoing.price`.
pub fn price_delta(outgoing: &Player, incoming: &Player) -> Money {
    incoming.price - outgoing.price
}

/// Check a replacement without applying it.
///
/// After the membership checks: position must match, the price rise must
/// fit in `budget_remaining`, and the incoming club must have room once
/// the outgoing player has left.
pub fn can_transfer(
    squad: &Squad,
    outgoing: &Player,
    incoming: &Player,
    budget_remaining: Money,
    config: &RuleConfig,
) -> Result<(), RuleError> {
    if !squad.contains(&outgoing.id) {
        return Err(RuleError::NotInSquad { player: outgoing.id.clone() });
    }
    if squad.contains(&incoming.id) {
        return Err(RuleError::Duplicate { player: incoming.id.clone() });
    }
    if outgoing.position != incoming.position {
        return Err(RuleError::PositionMismatch {
            outgoing: outgoing.position,
            incoming: incoming.position,
        });
    }
    let delta = price_delta(outgoing, incoming);
    if delta > budget_remaining {
        return Err(RuleError::BudgetExceeded {
            shortfall: delta - budget_remaining,
        });
    }
    let staying: Vec<Player> = squad
        .slots()
        .iter()
        .filter(|p| p.id != outgoing.id)
        .cloned()
        .collect();
    if club_count(&staying, &incoming.club_id) >= config.club_cap {
        return Err(RuleError::ClubLimit {
            club: incoming.club_id.clone(),
            cap: config.club_cap,
        });
    }
    Ok(())
}

/// Apply one transfer.
///
/// Uses a free transfer when one is left, otherwise accrues the penalty.
/// The captaincy moves with the slot.
pub fn execute(
    squad: &Squad,
    outgoing: &Player,
    incoming: &Player,
    bank: Money,
    free_transfers: u32,
    config: &RuleConfig,
) -> Result<TransferOutcome, RuleError> {
    can_transfer(squad, outgoing, incoming, bank, config)?;

    let slot = squad
        .slot_of(&outgoing.id)
        .ok_or_else(|| RuleError::NotInSquad { player: outgoing.id.clone() })?;
    let mut slots = squad.slots().to_vec();
    slots[slot] = incoming.clone();

    let captain = if squad.is_captain(&outgoing.id) {
        incoming.id.clone()
    } else {
        squad.captain().clone()
    };
    let new_squad = Squad::new(slots, captain, config)?;

    let (free_transfers, penalty) = if free_transfers > 0 {
        (free_transfers - 1, 0)
    } else {
        (0, config.transfer_penalty_points)
    };
    let delta = price_delta(outgoing, incoming);

    Ok(TransferOutcome {
        squad: new_squad,
        bank: bank - delta,
        free_transfers,
        penalty,
        price_delta: delta,
    })
}

/// Apply one transfer to a managed team, looking the outgoing player up
/// by id.
pub fn execute_for_team(
    team: &ManagedTeam,
    outgoing: &PlayerId,
    incoming: &Player,
    config: &RuleConfig,
) -> Result<(ManagedTeam, TransferOutcome), RuleError> {
    let out = team
        .squad
        .player(outgoing)
        .ok_or_else(|| RuleError::NotInSquad { player: outgoing.clone() })?
        .clone();
    let outcome = execute(&team.squad, &out, incoming, team.bank, team.free_transfers, config)?;
    let next = ManagedTeam {
        squad: outcome.squad.clone(),
        bank: outcome.bank,
        free_transfers: outcome.free_transfers,
        penalty_points: team.penalty_points + outcome.penalty,
    };
    Ok((next, outcome))
}

/// One executed transfer, for the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRecord {
    pub player_out: PlayerId,
    pub player_in: PlayerId,
    pub price_delta: Money,
    pub penalty: u32,
}

/// A transfer window in progress. `revert` is a full rollback to the
/// state captured by `begin`, not an incremental undo.
#[derive(Debug, Clone)]
pub struct TransferSession {
    original: ManagedTeam,
    current: ManagedTeam,
    records: Vec<TransferRecord>,
}

impl TransferSession {
    pub fn begin(team: ManagedTeam) -> Self {
        Self {
            original: team.clone(),
            current: team,
            records: Vec::new(),
        }
    }

    pub fn current(&self) -> &ManagedTeam {
        &self.current
    }

    pub fn original(&self) -> &ManagedTeam {
        &self.original
    }

    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }

    pub fn has_changes(&self) -> bool {
        !self.records.is_empty()
    }

    /// Total penalty accrued in this session.
    pub fn session_penalty(&self) -> u32 {
        self.records.iter().map(|r| r.penalty).sum()
    }

    pub fn execute(
        &mut self,
        outgoing: &PlayerId,
        incoming: &Player,
        config: &RuleConfig,
    ) -> Result<TransferOutcome, RuleError> {
        let (next, outcome) = execute_for_team(&self.current, outgoing, incoming, config)?;
        tracing::debug!(
            player_out = %outgoing,
            player_in = %incoming.id,
            delta = %outcome.price_delta,
            penalty = outcome.penalty,
            "transfer executed"
        );
        self.records.push(TransferRecord {
            player_out: outgoing.clone(),
            player_in: incoming.id.clone(),
            price_delta: outcome.price_delta,
            penalty: outcome.penalty,
        });
        self.current = next;
        Ok(outcome)
    }

    /// Discard every pending transfer.
    pub fn revert(&mut self) -> &ManagedTeam {
        tracing::info!(discarded = self.records.len(), "transfer session reverted");
        self.current = self.original.clone();
        self.records.clear();
        &self.current
    }

    /// Close the session and keep its result.
    pub fn finish(self) -> ManagedTeam {
        self.current
    }
}

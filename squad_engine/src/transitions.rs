/// SquadEngine: Centralized Transition Logic
///
/// Every state change goes through `apply_intent`. The input state is
/// never mutated: success returns a new state, failure returns the
/// reason and the caller keeps what it had.

use serde::Serialize;

use crate::builder;
use crate::catalog::Catalog;
use crate::domain::{Player, PlayerId, RuleConfig};
use crate::error::RuleError;
use crate::intents::Intent;
use crate::lineup;
use crate::money::Money;
use crate::rules::validate_composition;
use crate::squad::Squad;
use crate::state::TeamState;
use crate::transfer::{execute_for_team, ManagedTeam};

/// Structured outcome of an accepted intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntentResult {
    pub intent: String,
    /// Points charged by this intent (transfers only).
    pub penalty: u32,
    /// Price change of a transfer.
    pub price_delta: Option<Money>,
    /// Shortfalls left after a build-phase intent.
    pub shortfalls: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public dispatcher
// ---------------------------------------------------------------------------

/// Apply `intent` to `state` and return `(new_state, result)`.
pub fn apply_intent(
    state: &TeamState,
    intent: &Intent,
    catalog: &Catalog,
    config: &RuleConfig,
) -> Result<(TeamState, IntentResult), RuleError> {
    match state {
        TeamState::Building { selection } => apply_build(selection, intent, catalog, config),
        TeamState::Managing { team } => apply_manage(team, intent, catalog, config),
    }
}

// ---------------------------------------------------------------------------
// Build phase
// ---------------------------------------------------------------------------

fn apply_build(
    selection: &[Player],
    intent: &Intent,
    catalog: &Catalog,
    config: &RuleConfig,
) -> Result<(TeamState, IntentResult), RuleError> {
    let next = match intent {
        Intent::Select { player_id } => builder::add(selection, lookup(catalog, player_id)?, config)?,
        Intent::Deselect { player_id } => builder::remove(selection, lookup(catalog, player_id)?)?,
        Intent::Toggle { player_id } => builder::toggle(selection, lookup(catalog, player_id)?, config)?,
        Intent::AutoComplete => builder::auto_complete(selection, catalog, &config.required, config),
        Intent::ResetSelection => Vec::new(),
        Intent::Confirm => {
            let squad = Squad::arrange(selection, config)?;
            tracing::info!(captain = %squad.captain(), total = %squad.total_price(), "squad confirmed");
            let team = ManagedTeam::new(squad, config);
            return Ok((
                TeamState::Managing { team },
                IntentResult {
                    intent: intent.name().to_string(),
                    ..Default::default()
                },
            ));
        }
        Intent::Swap { .. } | Intent::SetCaptain { .. } | Intent::Transfer { .. } => {
            return Err(RuleError::WrongPhase {
                intent: intent.name(),
                phase: "building",
            });
        }
    };

    let shortfalls = validate_composition(&next, config).shortfalls;
    Ok((
        TeamState::Building { selection: next },
        IntentResult {
            intent: intent.name().to_string(),
            shortfalls,
            ..Default::default()
        },
    ))
}

// ---------------------------------------------------------------------------
// Managing phase
// ---------------------------------------------------------------------------

fn apply_manage(
    team: &ManagedTeam,
    intent: &Intent,
    catalog: &Catalog,
    config: &RuleConfig,
) -> Result<(TeamState, IntentResult), RuleError> {
    let mut result = IntentResult {
        intent: intent.name().to_string(),
        ..Default::default()
    };

    let next = match intent {
        Intent::Swap { first, second } => ManagedTeam {
            squad: lineup::evaluate_swap(&team.squad, first, second, config)?,
            ..team.clone()
        },
        Intent::SetCaptain { player_id } => ManagedTeam {
            squad: lineup::set_captain(&team.squad, player_id, config)?,
            ..team.clone()
        },
        Intent::Transfer { player_out, player_in } => {
            let incoming = lookup(catalog, player_in)?;
            let (next, outcome) = execute_for_team(team, player_out, incoming, config)?;
            result.penalty = outcome.penalty;
            result.price_delta = Some(outcome.price_delta);
            next
        }
        Intent::Select { .. }
        | Intent::Deselect { .. }
        | Intent::Toggle { .. }
        | Intent::AutoComplete
        | Intent::ResetSelection
        | Intent::Confirm => {
            return Err(RuleError::WrongPhase {
                intent: intent.name(),
                phase: "managing",
            });
        }
    };

    Ok((TeamState::Managing { team: next }, result))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn lookup<'a>(catalog: &'a Catalog, id: &PlayerId) -> Result<&'a Player, RuleError> {
    catalog
        .get(id)
        .ok_or_else(|| RuleError::UnknownPlayer { player: id.clone() })
}

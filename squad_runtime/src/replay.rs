//! Replay orchestrator: rebuild a team state from an intent log.
//!
//! Delegates all rule logic to the kernel. No shortcuts, no cached state.

use squad_engine::catalog::Catalog;
use squad_engine::domain::RuleConfig;
use squad_engine::engine::SquadEngine;
use squad_engine::intents::Intent;
use squad_engine::state::TeamState;

use crate::error::SessionError;

/// Rebuild the team state from a sequence of intents, starting empty.
///
/// Returns `(final_state, canonical_hash)`. The first rejected intent
/// aborts the rebuild: a stored log is expected to hold accepted intents
/// only.
pub fn rebuild_state(
    catalog: &Catalog,
    config: &RuleConfig,
    intents: &[Intent],
) -> Result<(TeamState, String), SessionError> {
    let mut engine = SquadEngine::new(catalog.clone(), config.clone())?;
    engine.apply_sequence(intents)?;
    let hash = engine.state_hash();
    Ok((engine.state().clone(), hash))
}

/// Rebuild and return only the canonical hash.
pub fn rebuild_hash(
    catalog: &Catalog,
    config: &RuleConfig,
    intents: &[Intent],
) -> Result<String, SessionError> {
    rebuild_state(catalog, config, intents).map(|(_, hash)| hash)
}

/// Parse a JSON intent log and rebuild from it.
pub fn rebuild_from_json(
    catalog: &Catalog,
    config: &RuleConfig,
    log_json: &str,
) -> Result<(TeamState, String), SessionError> {
    let intents = Intent::list_from_json(log_json)?;
    rebuild_state(catalog, config, &intents)
}

/// SquadEngine: Engine
///
/// Top-level orchestrator. Delegates every change to
/// `transitions::apply_intent` and keeps the accepted intents as a log,
/// so any state can be rebuilt by replaying from the baseline.
///
/// The baseline is the last committed state. `revert` returns to it;
/// `commit` moves it forward.

use crate::catalog::Catalog;
use crate::domain::RuleConfig;
use crate::error::{ConfigError, RuleError};
use crate::hashing::canonical_hash;
use crate::intents::Intent;
use crate::state::{create_initial_state, TeamState};
use crate::transitions::{apply_intent, IntentResult};

/// Stateful engine wrapping the pure transition layer.
#[derive(Debug, Clone)]
pub struct SquadEngine {
    catalog: Catalog,
    config: RuleConfig,
    baseline: TeamState,
    state: TeamState,
    history: Vec<Intent>,
}

impl SquadEngine {
    /// Engine over an empty build-phase state.
    pub fn new(catalog: Catalog, config: RuleConfig) -> Result<Self, ConfigError> {
        Self::with_state(catalog, config, create_initial_state())
    }

    /// Engine whose baseline is an existing state, e.g. a team loaded
    /// from the server.
    pub fn with_state(catalog: Catalog, config: RuleConfig, state: TeamState) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            catalog,
            config,
            baseline: state.clone(),
            state,
            history: Vec::new(),
        })
    }

    pub fn state(&self) -> &TeamState {
        &self.state
    }

    pub fn baseline(&self) -> &TeamState {
        &self.baseline
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Intents accepted since the last commit.
    pub fn history(&self) -> &[Intent] {
        &self.history
    }

    pub fn state_hash(&self) -> String {
        canonical_hash(&self.state)
    }

    /// Evaluate an intent against the current state without keeping it.
    pub fn preview(&self, intent: &Intent) -> Result<(TeamState, IntentResult), RuleError> {
        apply_intent(&self.state, intent, &self.catalog, &self.config)
    }

    /// Apply a single intent. A rejected intent leaves the engine as it was.
    pub fn apply(&mut self, intent: &Intent) -> Result<IntentResult, RuleError> {
        match apply_intent(&self.state, intent, &self.catalog, &self.config) {
            Ok((next, result)) => {
                tracing::debug!(
                    intent = intent.name(),
                    phase = next.phase_name(),
                    penalty = result.penalty,
                    "intent accepted"
                );
                self.state = next;
                self.history.push(intent.clone());
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(intent = intent.name(), code = err.code(), "intent rejected: {}", err);
                Err(err)
            }
        }
    }

    /// Apply intents in order, stopping at the first rejection. Intents
    /// before the rejected one stay applied.
    pub fn apply_sequence(&mut self, intents: &[Intent]) -> Result<&TeamState, RuleError> {
        for intent in intents {
            self.apply(intent)?;
        }
        Ok(&self.state)
    }

    /// Reset to the baseline and replay `intents` from scratch.
    pub fn replay(&mut self, intents: &[Intent]) -> Result<&TeamState, RuleError> {
        self.revert();
        self.apply_sequence(intents)
    }

    /// Drop everything since the last commit.
    pub fn revert(&mut self) -> &TeamState {
        if !self.history.is_empty() {
            tracing::info!(discarded = self.history.len(), "reverted to baseline");
        }
        self.state = self.baseline.clone();
        self.history.clear();
        &self.state
    }

    /// Make the current state the new baseline. Returns its hash.
    pub fn commit(&mut self) -> String {
        let hash = self.state_hash();
        tracing::info!(intents = self.history.len(), hash = %hash, "committed");
        self.baseline = self.state.clone();
        self.history.clear();
        hash
    }

    /// True when the current state differs from the baseline. Undoing a
    /// change by hand (e.g. swapping two players back) counts as no change.
    pub fn has_changes(&self) -> bool {
        canonical_hash(&self.state) != canonical_hash(&self.baseline)
    }
}

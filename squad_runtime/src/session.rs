//! Session manager: one team being edited by one manager.
//!
//! A session owns a `SquadEngine` plus the tap-to-swap selector, and
//! turns taps into logged `Swap` intents so that every change the UI
//! makes can be replayed. Saving commits the baseline; reverting drops
//! every unsaved swap and transfer.
//!
//! Concurrency: `SharedSession` serialises access with a Mutex. No global
//! mutable state.

use std::sync::{Mutex, MutexGuard};

use squad_engine::catalog::Catalog;
use squad_engine::domain::{Player, PlayerId, RuleConfig};
use squad_engine::error::RuleError;
use squad_engine::engine::SquadEngine;
use squad_engine::intents::Intent;
use squad_engine::lineup::{SelectOutcome, SwapSelector};
use squad_engine::state::TeamState;
use squad_engine::transfer::ManagedTeam;
use squad_engine::transitions::IntentResult;

use crate::contract::CreateTeamRequest;
use crate::drift::{compare_states, SquadDiff};
use crate::error::SessionError;

/// What a tap on a squad player did.
#[derive(Debug, Clone, PartialEq)]
pub enum TapOutcome {
    Pending(PlayerId),
    Cancelled,
    Reselected(PlayerId),
    Swapped { first: PlayerId, second: PlayerId },
}

pub struct TeamSession {
    session_id: String,
    engine: SquadEngine,
    selector: SwapSelector,
}

impl TeamSession {
    /// Start a session with an empty selection.
    pub fn new(session_id: &str, catalog: Catalog, config: RuleConfig) -> Result<Self, SessionError> {
        Ok(Self {
            session_id: session_id.to_string(),
            engine: SquadEngine::new(catalog, config)?,
            selector: SwapSelector::default(),
        })
    }

    /// Resume from a known state, e.g. a team fetched from the backend.
    /// The state becomes the saved baseline.
    pub fn resume(
        session_id: &str,
        catalog: Catalog,
        config: RuleConfig,
        state: TeamState,
    ) -> Result<Self, SessionError> {
        Ok(Self {
            session_id: session_id.to_string(),
            engine: SquadEngine::with_state(catalog, config, state)?,
            selector: SwapSelector::default(),
        })
    }

    /// Apply one intent. Any accepted change clears a half-made swap
    /// selection, since the selected player may have moved or left.
    pub fn apply(&mut self, intent: &Intent) -> Result<IntentResult, SessionError> {
        let result = self.engine.apply(intent)?;
        self.selector.reset();
        Ok(result)
    }

    /// Feed one tap to the swap selector.
    pub fn tap(&mut self, player: &PlayerId) -> Result<TapOutcome, SessionError> {
        let team = self
            .engine
            .state()
            .team()
            .ok_or(SessionError::NotManaging { operation: "tap" })?;
        let first = self.selector.selected().cloned();
        let outcome = self
            .selector
            .select(&team.squad, player, self.engine.config())
            .inspect_err(|err| tracing::debug!(code = err.code(), "swap rejected"))?;

        match (outcome, first) {
            (SelectOutcome::Pending(id), _) => Ok(TapOutcome::Pending(id)),
            (SelectOutcome::Cancelled, _) => Ok(TapOutcome::Cancelled),
            (SelectOutcome::Reselected(id), _) => Ok(TapOutcome::Reselected(id)),
            (SelectOutcome::Swapped(_), Some(first)) => {
                // Re-run through the engine so the swap lands in the log.
                let intent = Intent::Swap {
                    first: first.clone(),
                    second: player.clone(),
                };
                self.engine.apply(&intent)?;
                Ok(TapOutcome::Swapped {
                    first,
                    second: player.clone(),
                })
            }
            (SelectOutcome::Swapped(_), None) => Err(SessionError::NotManaging { operation: "swap" }),
        }
    }

    /// Commit unsaved changes. Returns the new baseline hash.
    pub fn save(&mut self) -> String {
        self.selector.reset();
        let hash = self.engine.commit();
        tracing::info!(session = %self.session_id, %hash, "session saved");
        hash
    }

    /// Throw away every unsaved change.
    pub fn revert(&mut self) -> &TeamState {
        self.selector.reset();
        self.engine.revert()
    }

    pub fn has_changes(&self) -> bool {
        self.engine.has_changes()
    }

    /// What would be lost by `revert`.
    pub fn pending_changes(&self) -> SquadDiff {
        compare_states(self.engine.baseline(), self.engine.state())
    }

    /// Points the next transfer would cost.
    pub fn pending_penalty(&self) -> Result<u32, SessionError> {
        Ok(self.team("pending_penalty")?.pending_penalty(self.engine.config()))
    }

    /// Catalog players that could replace `outgoing`.
    pub fn replacement_candidates(&self, outgoing: &PlayerId, query: &str) -> Result<Vec<&Player>, SessionError> {
        let team = self.team("replacement_candidates")?;
        let out = team
            .squad
            .player(outgoing)
            .ok_or_else(|| RuleError::NotInSquad { player: outgoing.clone() })?;
        Ok(self
            .engine
            .catalog()
            .replacement_candidates(team.squad.slots(), out, query))
    }

    /// Body for `POST /api/teams/create` from the confirmed squad.
    pub fn create_team_request(&self, user_id: &str, team_name: &str) -> Result<CreateTeamRequest, SessionError> {
        let team = self.team("create_team_request")?;
        Ok(CreateTeamRequest::from_team(user_id, team_name, team)?)
    }

    pub fn state(&self) -> &TeamState {
        self.engine.state()
    }

    pub fn selector(&self) -> &SwapSelector {
        &self.selector
    }

    /// Intents applied since the last save.
    pub fn unsaved_intents(&self) -> &[Intent] {
        self.engine.history()
    }

    pub fn current_hash(&self) -> String {
        self.engine.state_hash()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn team(&self, operation: &'static str) -> Result<&ManagedTeam, SessionError> {
        self.engine
            .state()
            .team()
            .ok_or(SessionError::NotManaging { operation })
    }
}

/// Thread-safe session handle using Mutex.
pub struct SharedSession {
    inner: Mutex<TeamSession>,
}

impl SharedSession {
    pub fn new(session: TeamSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TeamSession>, SessionError> {
        self.inner.lock().map_err(|_| SessionError::LockPoisoned)
    }

    /// Apply intent under lock.
    pub fn apply(&self, intent: &Intent) -> Result<IntentResult, SessionError> {
        self.lock()?.apply(intent)
    }

    pub fn tap(&self, player: &PlayerId) -> Result<TapOutcome, SessionError> {
        self.lock()?.tap(player)
    }

    pub fn save(&self) -> Result<String, SessionError> {
        Ok(self.lock()?.save())
    }

    pub fn revert(&self) -> Result<TeamState, SessionError> {
        Ok(self.lock()?.revert().clone())
    }

    pub fn has_changes(&self) -> Result<bool, SessionError> {
        Ok(self.lock()?.has_changes())
    }

    pub fn current_hash(&self) -> Result<String, SessionError> {
        Ok(self.lock()?.current_hash())
    }

    /// Run `f` with the session locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut TeamSession) -> R) -> Result<R, SessionError> {
        Ok(f(&mut *self.lock()?))
    }
}

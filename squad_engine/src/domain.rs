/// SquadEngine: Core Domain Types
///
/// Pure data. No rule logic lives here.
/// All currency values: `Money` fixed-point (SCALE = 10).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::money::Money;

// ── Identifiers ────────────────────────────────────────────────────

/// Catalog-unique player identifier.
///
/// Always serialized as a string. Deserialization also accepts a JSON
/// integer (`"id": 7`), which becomes `"7"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => PlayerId(s),
            RawId::Number(n) => PlayerId(n.to_string()),
        })
    }
}

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

/// Validate that a player ID matches `[a-zA-Z0-9_-]+`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

/// Real-world club a player belongs to. Also used as the display name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClubId(pub String);

impl ClubId {
    pub fn new(id: impl Into<String>) -> Self {
        ClubId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClubId {
    fn from(s: &str) -> Self {
        ClubId(s.to_string())
    }
}

// ── Positions ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK", alias = "GKP")]
    Goalkeeper,
    #[serde(rename = "DF", alias = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "FWD")]
    Forward,
}

impl Position {
    /// Fixed evaluation order used by shortfall reports and auto-complete.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
        }
    }

    /// Display order, 1-based (GK first).
    pub fn order(self) -> u8 {
        match self {
            Position::Goalkeeper => 1,
            Position::Defender => 2,
            Position::Midfielder => 3,
            Position::Forward => 4,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One count per position. Used both for observed counts and for quotas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PositionCounts {
    #[serde(rename = "GK")]
    pub goalkeepers: usize,
    #[serde(rename = "DF")]
    pub defenders: usize,
    #[serde(rename = "MID")]
    pub midfielders: usize,
    #[serde(rename = "FWD")]
    pub forwards: usize,
}

impl PositionCounts {
    pub const fn new(goalkeepers: usize, defenders: usize, midfielders: usize, forwards: usize) -> Self {
        Self { goalkeepers, defenders, midfielders, forwards }
    }

    pub fn get(&self, position: Position) -> usize {
        match position {
            Position::Goalkeeper => self.goalkeepers,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    pub fn get_mut(&mut self, position: Position) -> &mut usize {
        match position {
            Position::Goalkeeper => &mut self.goalkeepers,
            Position::Defender => &mut self.defenders,
            Position::Midfielder => &mut self.midfielders,
            Position::Forward => &mut self.forwards,
        }
    }

    pub fn total(&self) -> usize {
        self.goalkeepers + self.defenders + self.midfielders + self.forwards
    }
}

// ── Player ─────────────────────────────────────────────────────────

/// A catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub price: Money,
    #[serde(alias = "realClub")]
    pub club_id: ClubId,
    /// Presentation only. Never read by the rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_color: Option<String>,
}

impl Player {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        price: Money,
        club_id: impl Into<String>,
    ) -> Self {
        Self {
            id: PlayerId(id.into()),
            name: name.into(),
            position,
            price,
            club_id: ClubId(club_id.into()),
            club_color: None,
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.position == Position::Goalkeeper
    }
}

// ── Configuration ──────────────────────────────────────────────────

/// Outfield split of the Starting 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Formation {
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

impl Formation {
    pub fn outfield(&self) -> usize {
        self.defenders + self.midfielders + self.forwards
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.defenders, self.midfielders, self.forwards)
    }
}

/// Legal ranges for the Starting 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormationBounds {
    pub goalkeepers: usize,
    pub min_defenders: usize,
    pub max_defenders: usize,
    pub min_forwards: usize,
    pub max_forwards: usize,
}

impl Default for FormationBounds {
    fn default() -> Self {
        Self {
            goalkeepers: 1,
            min_defenders: 3,
            max_defenders: 5,
            min_forwards: 1,
            max_forwards: 3,
        }
    }
}

impl FormationBounds {
    pub fn admits(&self, counts: &PositionCounts) -> bool {
        counts.goalkeepers == self.goalkeepers
            && (self.min_defenders..=self.max_defenders).contains(&counts.defenders)
            && (self.min_forwards..=self.max_forwards).contains(&counts.forwards)
    }
}

/// Every rule constant. Defaults are the season rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RuleConfig {
    pub squad_size: usize,
    pub starting_size: usize,
    pub required: PositionCounts,
    pub budget_ceiling: Money,
    pub club_cap: usize,
    pub formation: FormationBounds,
    pub default_formation: Formation,
    pub transfer_penalty_points: u32,
    pub free_transfers_per_window: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            squad_size: 15,
            starting_size: 11,
            required: PositionCounts::new(2, 5, 5, 3),
            budget_ceiling: Money::from_units(100),
            club_cap: 3,
            formation: FormationBounds::default(),
            default_formation: Formation {
                defenders: 4,
                midfielders: 4,
                forwards: 2,
            },
            transfer_penalty_points: 4,
            free_transfers_per_window: 1,
        }
    }
}

impl RuleConfig {
    /// Parse from JSON. Missing fields fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RuleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn bench_size(&self) -> usize {
        self.squad_size - self.starting_size
    }

    /// Check the constants describe a squad that can actually be fielded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.required.total() != self.squad_size {
            return Err(ConfigError::Inconsistent(format!(
                "position quotas sum to {} but squad_size is {}",
                self.required.total(),
                self.squad_size
            )));
        }
        if self.starting_size == 0 || self.starting_size >= self.squad_size {
            return Err(ConfigError::Inconsistent(format!(
                "starting_size {} must be in 1..{}",
                self.starting_size, self.squad_size
            )));
        }
        if self.budget_ceiling.is_negative() {
            return Err(ConfigError::Inconsistent(format!(
                "budget_ceiling {} is negative",
                self.budget_ceiling
            )));
        }
        if self.club_cap == 0 {
            return Err(ConfigError::Inconsistent("club_cap must be at least 1".to_string()));
        }
        let b = &self.formation;
        if b.min_defenders > b.max_defenders || b.min_forwards > b.max_forwards {
            return Err(ConfigError::Inconsistent(
                "formation bounds have min above max".to_string(),
            ));
        }
        // Bench GK lock needs exactly one spare goalkeeper.
        if self.required.goalkeepers != b.goalkeepers + 1 {
            return Err(ConfigError::Inconsistent(format!(
                "required goalkeepers {} must be starting goalkeepers {} plus one bench goalkeeper",
                self.required.goalkeepers, b.goalkeepers
            )));
        }
        let f = &self.default_formation;
        let fits = b.goalkeepers + f.outfield() == self.starting_size
            && b.admits(&PositionCounts::new(b.goalkeepers, f.defenders, f.midfielders, f.forwards))
            && f.defenders <= self.required.defenders
            && f.midfielders <= self.required.midfielders
            && f.forwards <= self.required.forwards;
        if !fits {
            return Err(ConfigError::Inconsistent(format!(
                "default formation {} cannot be fielded under the configured quotas",
                f
            )));
        }
        Ok(())
    }
}

// ── Outcomes ───────────────────────────────────────────────────────

/// One line of a composition report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompositionIssue {
    Shortfall { position: Position, missing: usize },
    Surplus { position: Position, extra: usize },
    OverBudget { by: Money },
    ClubOverCap { club: ClubId, count: usize, cap: usize },
}

impl fmt::Display for CompositionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositionIssue::Shortfall { position, missing } => {
                let plural = if *missing == 1 { "" } else { "s" };
                write!(f, "Need {} more {}{}", missing, position.name(), plural)
            }
            CompositionIssue::Surplus { position, extra } => {
                let plural = if *extra == 1 { "" } else { "s" };
                write!(f, "Remove {} {}{}", extra, position.name(), plural)
            }
            CompositionIssue::OverBudget { by } => write!(f, "Over budget by {}", by),
            CompositionIssue::ClubOverCap { club, cap, .. } => {
                write!(f, "Max {} players allowed from {}", cap, club)
            }
        }
    }
}

/// Result of `rules::validate_composition`. Reporting only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionReport {
    pub is_valid: bool,
    /// Human-readable shortfall lines in GK, DF, MID, FWD order.
    pub shortfalls: Vec<String>,
    pub issues: Vec<CompositionIssue>,
    pub counts: PositionCounts,
    pub total_price: Money,
    pub remaining_budget: Money,
}

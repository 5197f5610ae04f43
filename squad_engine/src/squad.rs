/// SquadEngine: Managed Squad
///
/// An ordered 15-slot squad. Slots 0..starting_size are the Starting 11,
/// the rest is the bench with the spare goalkeeper locked to the first
/// bench slot. A `Squad` value always satisfies `rules::check_squad`.

use serde::Serialize;

use crate::domain::{Player, PlayerId, Position, RuleConfig};
use crate::error::RuleError;
use crate::money::Money;
use crate::rules::{check_squad, total_price, validate_composition};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Squad {
    slots: Vec<Player>,
    captain: PlayerId,
    #[serde(skip)]
    starting_size: usize,
}

impl Squad {
    /// Build from an explicit slot order. Fails on the first broken invariant.
    pub fn new(slots: Vec<Player>, captain: PlayerId, config: &RuleConfig) -> Result<Self, RuleError> {
        check_squad(&slots, &captain, config)?;
        Ok(Self {
            slots,
            captain,
            starting_size: config.starting_size,
        })
    }

    /// Lay out a complete selection in the default formation.
    ///
    /// Starting 11 is the first goalkeeper picked plus the first picks of
    /// each outfield position up to the default formation; the bench gets
    /// the second goalkeeper first, then the remaining outfielders in
    /// position order. The most expensive starter captains (ties go to the
    /// earlier slot).
    pub fn arrange(selection: &[Player], config: &RuleConfig) -> Result<Self, RuleError> {
        let report = validate_composition(selection, config);
        if !report.is_valid {
            if report.shortfalls.is_empty() {
                return Err(RuleError::InvalidSquad {
                    reason: report
                        .issues
                        .iter()
                        .map(|i| i.to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
            return Err(RuleError::IncompleteSquad {
                shortfalls: report.shortfalls,
            });
        }

        let f = &config.default_formation;
        let starting_quota = |pos: Position| match pos {
            Position::Goalkeeper => config.formation.goalkeepers,
            Position::Defender => f.defenders,
            Position::Midfielder => f.midfielders,
            Position::Forward => f.forwards,
        };

        let mut starters: Vec<Player> = Vec::with_capacity(config.starting_size);
        let mut bench: Vec<Player> = Vec::with_capacity(config.bench_size());
        for pos in Position::ALL {
            let quota = starting_quota(pos);
            for (i, player) in selection.iter().filter(|p| p.position == pos).enumerate() {
                if i < quota {
                    starters.push(player.clone());
                } else {
                    bench.push(player.clone());
                }
            }
        }

        let captain = starters
            .iter()
            .fold(None::<&Player>, |best, p| match best {
                Some(b) if b.price >= p.price => Some(b),
                _ => Some(p),
            })
            .map(|p| p.id.clone())
            .ok_or_else(|| RuleError::InvalidSquad {
                reason: "no starters to captain".to_string(),
            })?;

        starters.extend(bench);
        Squad::new(starters, captain, config)
    }

    pub fn slots(&self) -> &[Player] {
        &self.slots
    }

    pub fn starters(&self) -> &[Player] {
        &self.slots[..self.starting_size]
    }

    pub fn bench(&self) -> &[Player] {
        &self.slots[self.starting_size..]
    }

    pub fn captain(&self) -> &PlayerId {
        &self.captain
    }

    pub fn is_captain(&self, id: &PlayerId) -> bool {
        &self.captain == id
    }

    pub fn slot_of(&self, id: &PlayerId) -> Option<usize> {
        self.slots.iter().position(|p| &p.id == id)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.slots.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.slot_of(id).is_some()
    }

    pub fn is_starter(&self, id: &PlayerId) -> bool {
        self.slot_of(id).is_some_and(|s| s < self.starting_size)
    }

    pub fn total_price(&self) -> Money {
        total_price(&self.slots)
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.slots.iter().map(|p| p.id.clone()).collect()
    }

    #[cfg(test)]
    pub(crate) fn into_parts(self) -> (Vec<Player>, PlayerId) {
        (self.slots, self.captain)
    }
}

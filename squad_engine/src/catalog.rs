/// SquadEngine: Player Catalog
///
/// Immutable, ordered set of eligible players for one selection period.
/// Insertion order is significant: it breaks every price tie.

use std::collections::HashMap;

use crate::domain::{is_valid_id, Player, PlayerId, Position};
use crate::error::CatalogError;
use crate::money::Money;

/// Highest price a catalog accepts. Keeps every squad total far inside
/// the range of `Money`.
pub const MAX_PRICE: Money = Money::from_units(1_000);

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    players: Vec<Player>,
    index: HashMap<PlayerId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting malformed or repeated entries.
    pub fn new(players: Vec<Player>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(players.len());
        for (i, p) in players.iter().enumerate() {
            if !is_valid_id(p.id.as_str()) {
                return Err(CatalogError::InvalidId(p.id.0.clone()));
            }
            if p.price.is_negative() {
                return Err(CatalogError::NegativePrice {
                    id: p.id.0.clone(),
                    price: p.price,
                });
            }
            if p.price > MAX_PRICE {
                return Err(CatalogError::PriceTooHigh {
                    id: p.id.0.clone(),
                    price: p.price,
                    max: MAX_PRICE,
                });
            }
            if p.club_id.as_str().trim().is_empty() {
                return Err(CatalogError::EmptyClub(p.id.0.clone()));
            }
            if index.insert(p.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(p.id.0.clone()));
            }
        }
        Ok(Self { players, index })
    }

    /// Parse a JSON array of player records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let players: Vec<Player> = serde_json::from_str(json)?;
        Self::new(players)
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.index.get(id).map(|&i| &self.players[i])
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.index.contains_key(id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn by_position(&self, position: Position) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.position == position)
    }

    /// Position order first, then most expensive first.
    /// Stable, so equal prices keep catalog order.
    pub fn sorted_for_display(&self) -> Vec<&Player> {
        let mut sorted: Vec<&Player> = self.players.iter().collect();
        sorted.sort_by(|a, b| {
            a.position
                .order()
                .cmp(&b.position.order())
                .then_with(|| b.price.cmp(&a.price))
        });
        sorted
    }

    /// Case-insensitive name search, optionally restricted to one position.
    pub fn search(&self, query: &str, position: Option<Position>) -> Vec<&Player> {
        let needle = query.trim().to_lowercase();
        self.players
            .iter()
            .filter(|p| position.map_or(true, |pos| p.position == pos))
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Players that could replace `outgoing`: same position, not already
    /// in `squad`, name matching `query`.
    pub fn replacement_candidates<'a>(
        &'a self,
        squad: &[Player],
        outgoing: &Player,
        query: &str,
    ) -> Vec<&'a Player> {
        self.search(query, Some(outgoing.position))
            .into_iter()
            .filter(|p| !squad.iter().any(|s| s.id == p.id))
            .collect()
    }
}

/// SquadEngine: Squad Builder
///
/// Admission control for a growing selection, plus the cheapest-fill
/// auto-complete used by the "smart shuffle" button.

use crate::catalog::Catalog;
use crate::domain::{Player, Position, PositionCounts, RuleConfig};
use crate::error::RuleError;
use crate::money::Money;
use crate::rules::{club_count, counts_by_position, total_price};

/// Check whether `player` may join `selection`.
///
/// Checks run in a fixed order and the first failure wins:
/// duplicate, squad full, position full, budget, club cap.
pub fn can_add(selection: &[Player], player: &Player, config: &RuleConfig) -> Result<(), RuleError> {
    if selection.iter().any(|p| p.id == player.id) {
        return Err(RuleError::Duplicate { player: player.id.clone() });
    }
    if selection.len() >= config.squad_size {
        return Err(RuleError::SquadFull { size: selection.len() });
    }
    let required = config.required.get(player.position);
    if counts_by_position(selection).get(player.position) >= required {
        return Err(RuleError::PositionFull {
            position: player.position,
            required,
        });
    }
    let after = total_price(selection) + player.price;
    if after > config.budget_ceiling {
        return Err(RuleError::BudgetExceeded {
            shortfall: after - config.budget_ceiling,
        });
    }
    if club_count(selection, &player.club_id) >= config.club_cap {
        return Err(RuleError::ClubLimit {
            club: player.club_id.clone(),
            cap: config.club_cap,
        });
    }
    Ok(())
}

/// Append `player` if admissible. The input is never modified.
pub fn add(selection: &[Player], player: &Player, config: &RuleConfig) -> Result<Vec<Player>, RuleError> {
    can_add(selection, player, config)?;
    let mut next = selection.to_vec();
    next.push(player.clone());
    Ok(next)
}

/// Drop `player`, keeping everyone else in order.
pub fn remove(selection: &[Player], player: &Player) -> Result<Vec<Player>, RuleError> {
    if !selection.iter().any(|p| p.id == player.id) {
        return Err(RuleError::NotInSquad { player: player.id.clone() });
    }
    Ok(selection.iter().filter(|p| p.id != player.id).cloned().collect())
}

/// Remove if present, otherwise admit-and-append.
pub fn toggle(selection: &[Player], player: &Player, config: &RuleConfig) -> Result<Vec<Player>, RuleError> {
    if selection.iter().any(|p| p.id == player.id) {
        remove(selection, player)
    } else {
        add(selection, player, config)
    }
}

/// Fill every open slot with the cheapest affordable catalog player.
///
/// Positions are filled GK, DF, MID, FWD. Each pick is the cheapest
/// unselected player of that position that keeps the total within the
/// ceiling and the club under its cap; equal prices go to the earlier
/// catalog entry. Slots with no admissible candidate stay empty.
pub fn auto_complete(
    selection: &[Player],
    catalog: &Catalog,
    limits: &PositionCounts,
    config: &RuleConfig,
) -> Vec<Player> {
    let mut squad = selection.to_vec();
    let mut spent = total_price(&squad);

    for pos in Position::ALL {
        let limit = limits.get(pos).min(config.required.get(pos));
        while counts_by_position(&squad).get(pos) < limit && squad.len() < config.squad_size {
            match cheapest_admissible(&squad, catalog, pos, spent, config) {
                Some(pick) => {
                    spent += pick.price;
                    squad.push(pick.clone());
                }
                None => {
                    tracing::debug!(position = %pos, "auto-complete: no affordable candidate");
                    break;
                }
            }
        }
    }

    squad
}

fn cheapest_admissible<'a>(
    squad: &[Player],
    catalog: &'a Catalog,
    position: Position,
    spent: Money,
    config: &RuleConfig,
) -> Option<&'a Player> {
    // `min_by_key` keeps the first of equal keys, i.e. catalog order.
    catalog
        .by_position(position)
        .filter(|p| !squad.iter().any(|s| s.id == p.id))
        .filter(|p| spent + p.price <= config.budget_ceiling)
        .filter(|p| club_count(squad, &p.club_id) < config.club_cap)
        .min_by_key(|p| p.price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::validate_composition;
    use crate::squad::fixtures::{player, selection};

    #[test]
    fn test_can_add_checks_in_fixed_order() {
        let config = RuleConfig::default();
        let sel = selection();

        // Already present beats squad-full.
        let err = can_add(&sel, &sel[0], &config).unwrap_err();
        assert_eq!(err.code(), "DUPLICATE");

        let extra = player("x", Position::Forward, 10, "NEW");
        assert_eq!(can_add(&sel, &extra, &config).unwrap_err().code(), "SQUAD_FULL");

        let partial = &sel[..14];
        // fw3 is cut, so the squad has room but the goalkeeper quota is met.
        let gk = player("gk9", Position::Goalkeeper, 10, "NEW");
        assert_eq!(can_add(partial, &gk, &config).unwrap_err().code(), "POSITION_FULL");
    }

    #[test]
    fn test_can_add_budget_and_club_limit() {
        let config = RuleConfig::default();
        let sel: Vec<Player> = selection().into_iter().take(14).collect();
        // 95.0 - 6.0 (fw3) = 89.0 spent, 11.0 left.
        let pricey = player("fwx", Position::Forward, 111, "NEW");
        assert_eq!(
            can_add(&sel, &pricey, &config).unwrap_err(),
            RuleError::BudgetExceeded { shortfall: Money::from_tenths(1) }
        );
        let exact = player("fwy", Position::Forward, 110, "NEW");
        assert!(can_add(&sel, &exact, &config).is_ok());

        let arsenal = player("fwz", Position::Forward, 50, "ARS");
        assert_eq!(can_add(&sel, &arsenal, &config).unwrap_err().code(), "CLUB_LIMIT");
    }

    #[test]
    fn test_huge_prices_fail_the_budget_check_without_overflow() {
        let config = RuleConfig::default();
        let half = i64::MAX / 2 + 1;
        let a = player("a", Position::Goalkeeper, half, "A");
        let b = player("b", Position::Defender, half, "B");
        let err = can_add(&[a.clone()], &b, &config).unwrap_err();
        assert_eq!(err.code(), "BUDGET_EXCEEDED");

        let report = validate_composition(&[a, b], &config);
        assert!(!report.is_valid);
        assert_eq!(report.total_price, Money::from_tenths(i64::MAX));
    }

    #[test]
    fn test_fourth_club_player_is_rejected_and_selection_unchanged() {
        let config = RuleConfig::default();
        let sel = vec![
            player("a1", Position::Defender, 50, "Arsenal"),
            player("a2", Position::Midfielder, 50, "Arsenal"),
            player("a3", Position::Forward, 50, "Arsenal"),
        ];
        let fourth = player("a4", Position::Goalkeeper, 50, "Arsenal");
        let err = toggle(&sel, &fourth, &config).unwrap_err();
        assert_eq!(err, RuleError::ClubLimit { club: "Arsenal".into(), cap: 3 });
        assert_eq!(sel.len(), 3);
    }

    #[test]
    fn test_toggle_twice_restores_order() {
        let config = RuleConfig::default();
        let sel: Vec<Player> = selection().into_iter().take(10).collect();
        let df1 = selection()[2].clone();
        let removed = toggle(&sel, &df1, &config).unwrap();
        assert_eq!(removed.len(), 9);
        let back = toggle(&removed, &df1, &config).unwrap();
        // Re-added at the end; everyone else keeps relative order.
        let others: Vec<_> = back.iter().filter(|p| p.id != df1.id).collect();
        let expected: Vec<_> = sel.iter().filter(|p| p.id != df1.id).collect();
        assert_eq!(others, expected);

        let new = player("new", Position::Forward, 50, "NEW");
        let added = toggle(&sel, &new, &config).unwrap();
        assert_eq!(toggle(&added, &new, &config).unwrap(), sel);
    }

    #[test]
    fn test_auto_complete_picks_cheapest_with_catalog_tiebreak() {
        let config = RuleConfig::default();
        let catalog = Catalog::new(vec![
            player("g1", Position::Goalkeeper, 45, "A"),
            player("g2", Position::Goalkeeper, 40, "B"),
            player("g3", Position::Goalkeeper, 40, "C"),
            player("d1", Position::Defender, 40, "D"),
        ])
        .unwrap();
        let filled = auto_complete(&[], &catalog, &config.required, &config);
        let ids: Vec<&str> = filled.iter().map(|p| p.id.as_str()).collect();
        // Two cheapest keepers in catalog order, then the only defender.
        assert_eq!(ids, vec!["g2", "g3", "d1"]);
        let report = validate_composition(&filled, &config);
        assert!(!report.is_valid);
    }

    #[test]
    fn test_auto_complete_respects_budget_and_never_fails() {
        let config = RuleConfig {
            budget_ceiling: Money::from_units(10),
            ..RuleConfig::default()
        };
        let catalog = Catalog::new(vec![
            player("g1", Position::Goalkeeper, 60, "A"),
            player("g2", Position::Goalkeeper, 50, "B"),
            player("d1", Position::Defender, 45, "C"),
        ])
        .unwrap();
        let filled = auto_complete(&[], &catalog, &config.required, &config);
        let ids: Vec<&str> = filled.iter().map(|p| p.id.as_str()).collect();
        // g2 (5.0) then g1 would make 11.0; d1 brings it to 9.5.
        assert_eq!(ids, vec!["g2", "d1"]);
    }
}

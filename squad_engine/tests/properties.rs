//! Property-based tests for admission, lineup and transfer invariants.

use std::fs;

use proptest::prelude::*;

use squad_engine::builder;
use squad_engine::catalog::Catalog;
use squad_engine::domain::{Player, PlayerId, Position, RuleConfig};
use squad_engine::lineup;
use squad_engine::money::Money;
use squad_engine::rules::{club_counts, counts_by_position, starting_counts, total_price};
use squad_engine::squad::Squad;
use squad_engine::transfer;

const PICKS: [&str; 15] = [
    "1", "2", "4", "6", "7", "9", "10", "11", "13", "14", "15", "16", "18", "19", "20",
];

const CLUBS: [&str; 6] = ["Arsenal", "Fulham", "Chelsea", "Brentford", "Wolves", "Burnley"];

fn catalog() -> Catalog {
    let data = fs::read_to_string("tests/fixtures/catalog.json").unwrap();
    Catalog::from_json(&data).unwrap()
}

fn squad(catalog: &Catalog, config: &RuleConfig) -> Squad {
    let selection: Vec<Player> = PICKS
        .iter()
        .map(|id| catalog.get(&PlayerId::from(*id)).unwrap().clone())
        .collect();
    Squad::arrange(&selection, config).unwrap()
}

fn assert_lineup_invariants(s: &Squad, config: &RuleConfig) -> Result<(), TestCaseError> {
    let counts = starting_counts(s.slots(), config);
    prop_assert_eq!(counts.get(Position::Goalkeeper), 1);
    prop_assert!(config.formation.admits(&counts), "formation out of bounds: {:?}", counts);
    prop_assert!(s.bench()[0].is_goalkeeper(), "bench slot 0 must hold the goalkeeper");
    prop_assert!(s.is_starter(s.captain()), "captain {} is not a starter", s.captain());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Whatever the tap sequence, the selection never breaks a build-phase limit.
    #[test]
    fn prop_toggles_never_break_limits(taps in prop::collection::vec(0usize..24, 0..60)) {
        let config = RuleConfig::default();
        let catalog = catalog();
        let mut selection: Vec<Player> = Vec::new();
        for i in taps {
            let player = &catalog.players()[i];
            if let Ok(next) = builder::toggle(&selection, player, &config) {
                selection = next;
            }
            let counts = counts_by_position(&selection);
            prop_assert!(selection.len() <= config.squad_size);
            for pos in Position::ALL {
                prop_assert!(counts.get(pos) <= config.required.get(pos));
            }
            prop_assert!(total_price(&selection) <= config.budget_ceiling);
            for (_, n) in club_counts(&selection) {
                prop_assert!(n <= config.club_cap);
            }
        }
    }

    /// Swaps and captaincy changes keep the lineup legal.
    #[test]
    fn prop_swaps_preserve_lineup(ops in prop::collection::vec((0usize..15, 0usize..15, any::<bool>()), 0..40)) {
        let config = RuleConfig::default();
        let mut s = squad(&catalog(), &config);
        for (a, b, captain_op) in ops {
            let ia = s.slots()[a].id.clone();
            let ib = s.slots()[b].id.clone();
            let next = if captain_op {
                lineup::set_captain(&s, &ia, &config)
            } else {
                lineup::evaluate_swap(&s, &ia, &ib, &config)
            };
            if let Ok(next) = next {
                prop_assert_eq!(next.total_price(), s.total_price());
                s = next;
            }
            assert_lineup_invariants(&s, &config)?;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Accepted transfers conserve money and never overdraw the bank.
    #[test]
    fn prop_transfer_accounting(
        slot in 0usize..15,
        price in 0i64..200,
        club in 0usize..CLUBS.len(),
        bank in 0i64..100,
        free in 0u32..3,
    ) {
        let config = RuleConfig::default();
        let s = squad(&catalog(), &config);
        let outgoing = s.slots()[slot].clone();
        let incoming = Player::new("new", "New Signing", outgoing.position, Money::from_tenths(price), CLUBS[club]);
        let bank = Money::from_tenths(bank);

        match transfer::execute(&s, &outgoing, &incoming, bank, free, &config) {
            Ok(outcome) => {
                prop_assert_eq!(outcome.price_delta + outcome.bank, bank);
                prop_assert!(!outcome.bank.is_negative());
                prop_assert_eq!(&outcome.squad.slots()[slot].id, &incoming.id);
                if free > 0 {
                    prop_assert_eq!(outcome.free_transfers, free - 1);
                    prop_assert_eq!(outcome.penalty, 0);
                } else {
                    prop_assert_eq!(outcome.free_transfers, 0);
                    prop_assert_eq!(outcome.penalty, config.transfer_penalty_points);
                }
                assert_lineup_invariants(&outcome.squad, &config)?;
                for (_, n) in club_counts(outcome.squad.slots()) {
                    prop_assert!(n <= config.club_cap);
                }
            }
            Err(err) => {
                prop_assert!(
                    matches!(err.code(), "BUDGET_EXCEEDED" | "CLUB_LIMIT"),
                    "unexpected rejection {}", err.code()
                );
            }
        }
    }
}

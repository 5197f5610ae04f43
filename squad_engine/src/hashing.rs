/// SquadEngine: Canonical Hashing
///
/// Deterministic canonical serialization + SHA-256 hashing of a
/// `TeamState`. Two states hash equal exactly when they mean the same
/// squad, so the hash doubles as a "has anything changed" check.
///
/// Rules:
///   - ruleset_version is the first field
///   - money is written as integer tenths, never as a float
///   - build-phase selections keep pick order; managed squads keep slot order
///   - UTF-8 JSON, no whitespace

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::Player;
use crate::money::Money;
use crate::state::TeamState;
use crate::transfer::ManagedTeam;
use crate::RULESET_VERSION;

/// Canonical serialization of a state to UTF-8 JSON bytes.
pub fn canonical_serialize(state: &TeamState) -> Vec<u8> {
    build_canonical_value(state).to_string().into_bytes()
}

/// SHA-256 of the canonical serialization. Lowercase hex string.
pub fn canonical_hash(state: &TeamState) -> String {
    let digest = Sha256::digest(canonical_serialize(state));
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn build_canonical_value(state: &TeamState) -> Value {
    let mut root = Map::new();
    root.insert("ruleset_version".to_string(), Value::from(RULESET_VERSION));
    root.insert("phase".to_string(), Value::from(state.phase_name()));

    match state {
        TeamState::Building { selection } => {
            root.insert("selection".to_string(), players_value(selection));
        }
        TeamState::Managing { team } => {
            root.insert("team".to_string(), team_value(team));
        }
    }

    Value::Object(root)
}

fn team_value(team: &ManagedTeam) -> Value {
    let mut map = Map::new();
    map.insert("slots".to_string(), players_value(team.squad.slots()));
    map.insert(
        "captain".to_string(),
        Value::from(team.squad.captain().as_str()),
    );
    map.insert("bank".to_string(), money_value(team.bank));
    map.insert("free_transfers".to_string(), Value::from(team.free_transfers));
    map.insert("penalty_points".to_string(), Value::from(team.penalty_points));
    Value::Object(map)
}

// Only identity, role and price matter to the rules; names and colours
// are presentation.
fn players_value(players: &[Player]) -> Value {
    Value::Array(
        players
            .iter()
            .map(|p| {
                let mut m = Map::new();
                m.insert("id".to_string(), Value::from(p.id.as_str()));
                m.insert("position".to_string(), Value::from(p.position.code()));
                m.insert("price".to_string(), money_value(p.price));
                m.insert("club".to_string(), Value::from(p.club_id.as_str()));
                Value::Object(m)
            })
            .collect(),
    )
}

fn money_value(m: Money) -> Value {
    Value::from(m.tenths())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RuleConfig;
    use crate::squad::fixtures::{selection, squad};
    use crate::state::create_initial_state;

    #[test]
    fn test_hash_is_stable_and_hex() {
        let s = create_initial_state();
        let h1 = canonical_hash(&s);
        let h2 = canonical_hash(&s);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_version_first_and_no_floats() {
        let team = ManagedTeam::new(squad(), &RuleConfig::default());
        let bytes = canonical_serialize(&TeamState::Managing { team });
        let json = String::from_utf8(bytes).unwrap();
        assert!(json.starts_with(r#"{"ruleset_version":"#));
        assert!(json.contains(r#""bank":50"#));
        assert!(!json.contains(' '));
    }

    #[test]
    fn test_pick_order_matters_in_build_phase() {
        let a = TeamState::Building { selection: selection() };
        let mut reversed = selection();
        reversed.reverse();
        let b = TeamState::Building { selection: reversed };
        assert_ne!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn test_presentation_fields_do_not_affect_hash() {
        let mut renamed = selection();
        renamed[0].name = "Someone Else".to_string();
        renamed[0].club_color = Some("#ff0000".to_string());
        assert_eq!(
            canonical_hash(&TeamState::Building { selection: selection() }),
            canonical_hash(&TeamState::Building { selection: renamed })
        );
    }
}

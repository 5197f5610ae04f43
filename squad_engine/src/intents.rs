/// SquadEngine: Intent Definitions
///
/// Intents are pure data. They carry what the manager asked for and
/// contain no rule logic. The JSON form is internally tagged on `type`.

use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    // -- build phase --
    Select { player_id: PlayerId },
    Deselect { player_id: PlayerId },
    Toggle { player_id: PlayerId },
    AutoComplete,
    ResetSelection,
    Confirm,
    // -- managing phase --
    Swap { first: PlayerId, second: PlayerId },
    SetCaptain { player_id: PlayerId },
    Transfer { player_out: PlayerId, player_in: PlayerId },
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Select { .. } => "select",
            Intent::Deselect { .. } => "deselect",
            Intent::Toggle { .. } => "toggle",
            Intent::AutoComplete => "auto_complete",
            Intent::ResetSelection => "reset_selection",
            Intent::Confirm => "confirm",
            Intent::Swap { .. } => "swap",
            Intent::SetCaptain { .. } => "set_captain",
            Intent::Transfer { .. } => "transfer",
        }
    }

    /// Parse a JSON array of intents.
    pub fn list_from_json(json: &str) -> Result<Vec<Intent>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

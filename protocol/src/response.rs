use serde::{Serialize, Deserialize};
use crate::{BinCodeMessage, JsonMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Setup,
    Reveal,
    Discuss,
}

/// The secret box on the reveal screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretView {
    /// "Round N"
    pub title: String,
    /// Player name while concealed, topic or imposter label while shown.
    pub prompt: String,
    /// Hint line, only ever present for the imposter.
    pub text: Option<String>,
    pub concealed: bool,
    pub next_enabled: bool,
}

/// A full snapshot of what the renderer should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub screen: Screen,
    pub players: Vec<String>,
    /// Inline message under the name field.
    pub player_error: Option<String>,
    /// Blocking message, e.g. refused round start.
    pub alert: Option<String>,
    pub can_start: bool,
    pub entry_enabled: bool,
    pub round: u32,
    pub secret: Option<SecretView>,
    /// Who opens the discussion, when announced.
    pub starter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientResponse {
    View(View),
}

impl BinCodeMessage<'_> for ClientResponse {}
impl JsonMessage<'_> for ClientResponse {}

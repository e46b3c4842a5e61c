use serde::{Deserialize, Serialize};
use crate::{BinCodeMessage, JsonMessage};

/// Everything a renderer can ask the room to do.
#[derive(Deserialize, Serialize, PartialEq, Eq, Debug, Clone)]
pub enum ClientRequest {
    AddPlayer {
        name: String,
    },
    RemovePlayer {
        index: usize,
    },
    /// Drag and drop: splice-move `from` to `to`.
    MovePlayer {
        from: usize,
        to: usize,
    },
    StartRound,
    /// Press/hold on the secret box.
    ShowSecret,
    /// Release or pointer leaving the secret box.
    HideSecret,
    NextPlayer,
    NewRound,
    Reset,
}

impl BinCodeMessage<'_> for ClientRequest {}
impl JsonMessage<'_> for ClientRequest {}

use thiserror::Error;

/// Why the room refused an action. The first four carry the wording shown to
/// players when the strict variant surfaces them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("Please enter a name.")]
    EmptyName,
    #[error("Player names must be unique.")]
    DuplicateName,
    #[error("Add at least 3 players.")]
    NotEnoughPlayers,
    #[error("Topics not loaded.")]
    CatalogNotLoaded,

    #[error("no player at index {0}")]
    NoSuchPlayer(usize),
    #[error("the roster cannot change during a round")]
    RosterLocked,
    #[error("{action} is not available on the {stage} screen")]
    WrongStage {
        action: &'static str,
        stage: &'static str,
    },
    #[error("hide the secret before handing over")]
    SecretShown,
}

pub type RoomResult<T> = Result<T, ErrorKind>;

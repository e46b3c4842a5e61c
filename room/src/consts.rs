pub const MIN_PLAYERS: usize = 3;

pub const HB_DURATION: tokio::time::Duration = tokio::time::Duration::from_secs(10);

pub const PORT: u16 = 9000;
pub const PLAY_PATH: &str = "/play";
pub const LEX_SERVER: &str = "http://127.0.0.1:3030/topics.json";

pub const STORAGE_KEY_PLAYERS: &str = "loopedInPlayers";
pub const STORE_PATH: &str = "loopedin-store.json";

pub const IMPOSTER_LABEL: &str = "YOU ARE THE IMPOSTER";
pub const HINT_PREFIX: &str = "Hint: ";

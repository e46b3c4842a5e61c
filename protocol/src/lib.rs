pub mod request;
pub mod response;
pub mod lexicon;

pub use response::*;
pub use request::*;
pub use lexicon::{Topic, normalize_topics};

use serde::{Serialize, Deserialize};
use bincode::{serialize, deserialize, ErrorKind};
use tokio_tungstenite::tungstenite::Message;

/// Binary frames carry bincode.
pub trait BinCodeMessage<'a>: Serialize + Deserialize<'a>{
    fn deser(bin: &'a [u8]) -> Result<Self, Box<ErrorKind>> {
        deserialize::<Self>(&bin)
    }

    fn ser(&self) -> Result<Message, Box<ErrorKind>> {
        let bin = serialize(&self)?;
        Ok(Message::Binary(bin))
    }
}

/// Text frames carry JSON, using serde's externally tagged enum layout:
/// `"StartRound"`, `{"AddPlayer":{"name":"Amy"}}`.
pub trait JsonMessage<'a>: Serialize + Deserialize<'a> {
    fn deser_text(text: &'a str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(text)
    }

    fn ser_text(&self) -> serde_json::Result<Message> {
        let text = serde_json::to_string(&self)?;
        Ok(Message::Text(text))
    }
}

/// Which frame kind a client talks in. The room answers in kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Binary,
    Text,
}

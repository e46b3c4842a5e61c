use protocol::{Screen, SecretView, View};

use super::config::{GameConfig, Validation};
use super::error::ErrorKind;
use super::state::{Game, Shown, Stage};
use crate::consts::{HINT_PREFIX, IMPOSTER_LABEL};

/// A refusal worth showing to whoever caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    PlayerError(String),
    Alert(String),
}

impl Feedback {
    /// Strict games explain name and start refusals; lenient games stay quiet.
    /// Everything else is never surfaced.
    pub fn from_error(err: &ErrorKind, config: &GameConfig) -> Option<Self> {
        if config.validation == Validation::Lenient {
            return None;
        }
        match err {
            ErrorKind::EmptyName | ErrorKind::DuplicateName => {
                Some(Feedback::PlayerError(err.to_string()))
            }
            ErrorKind::NotEnoughPlayers | ErrorKind::CatalogNotLoaded => {
                Some(Feedback::Alert(err.to_string()))
            }
            _ => None,
        }
    }
}

pub fn render(game: &Game, feedback: Option<Feedback>) -> View {
    let (player_error, alert) = match feedback {
        Some(Feedback::PlayerError(msg)) => (Some(msg), None),
        Some(Feedback::Alert(msg)) => (None, Some(msg)),
        None => (None, None),
    };
    let screen = match game.stage {
        Stage::Setup => Screen::Setup,
        Stage::Reveal { .. } => Screen::Reveal,
        Stage::Discuss { .. } => Screen::Discuss,
    };
    let starter = match game.stage {
        Stage::Discuss { starter: Some(idx) } => game.roster.get(idx).map(str::to_string),
        _ => None,
    };

    View {
        screen,
        players: game.roster.names().to_vec(),
        player_error,
        alert,
        can_start: game.can_start(),
        entry_enabled: screen == Screen::Setup,
        round: game.rounds,
        secret: render_secret(game),
        starter,
    }
}

fn render_secret(game: &Game) -> Option<SecretView> {
    let shown = match &game.stage {
        Stage::Reveal { shown } => shown,
        _ => return None,
    };
    let round = game.round.as_ref()?;
    let title = format!("Round {}", round.number);
    let secret = match shown {
        None => SecretView {
            title,
            prompt: game.roster.get(round.current).unwrap_or_default().to_string(),
            text: None,
            concealed: true,
            next_enabled: true,
        },
        Some(Shown::Topic) => SecretView {
            title,
            prompt: round.topic.topic.clone(),
            text: None,
            concealed: false,
            next_enabled: false,
        },
        Some(Shown::Imposter { hint }) => SecretView {
            title,
            prompt: IMPOSTER_LABEL.to_string(),
            text: hint.as_ref().map(|h| format!("{}{}", HINT_PREFIX, h)),
            concealed: false,
            next_enabled: false,
        },
    };
    Some(secret)
}

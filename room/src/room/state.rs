use protocol::Topic;
use rand::Rng;
use rand::seq::SliceRandom;

use super::config::GameConfig;
use super::error::{ErrorKind, RoomResult};
use super::roster::Roster;
use crate::consts::MIN_PLAYERS;

/// What the current holder sees while pressing the secret box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Topic,
    Imposter { hint: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Setup,
    Reveal { shown: Option<Shown> },
    /// `starter` indexes the player announced to open the discussion.
    Discuss { starter: Option<usize> },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Setup => "setup",
            Stage::Reveal { .. } => "reveal",
            Stage::Discuss { .. } => "discuss",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub number: u32,
    pub imposter: usize,
    pub topic: Topic,
    /// Whose turn it is to look.
    pub current: usize,
}

impl Round {
    pub fn is_imposter_turn(&self) -> bool {
        self.current == self.imposter
    }
}

/// Everything a session knows: players, topics, and the round in progress.
#[derive(Debug, Clone)]
pub struct Game {
    pub config: GameConfig,
    pub roster: Roster,
    catalog: Vec<Topic>,
    catalog_loaded: bool,
    pub rounds: u32,
    pub round: Option<Round>,
    pub stage: Stage,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            roster: Roster::default(),
            catalog: Vec::new(),
            catalog_loaded: false,
            rounds: 0,
            round: None,
            stage: Stage::Setup,
        }
    }

    /// Back to a fresh setup screen with `roster`. The catalog is kept.
    pub fn restart(&mut self, roster: Roster) {
        self.roster = roster;
        self.clear_round();
    }

    /// Installs the catalog once; later loads are ignored. Returns whether
    /// it was taken.
    pub fn load_catalog(&mut self, topics: Vec<Topic>) -> bool {
        if self.catalog_loaded || topics.is_empty() {
            return false;
        }
        self.catalog = topics;
        self.catalog_loaded = true;
        true
    }

    pub fn catalog_loaded(&self) -> bool {
        self.catalog_loaded
    }

    pub fn catalog(&self) -> &[Topic] {
        &self.catalog
    }

    /// The one answer to "may a round begin", used by the start guard and
    /// by the start control alike.
    pub fn eligibility(&self) -> RoomResult<()> {
        if self.roster.len() < MIN_PLAYERS {
            return Err(ErrorKind::NotEnoughPlayers);
        }
        if self.catalog.is_empty() {
            return Err(ErrorKind::CatalogNotLoaded);
        }
        Ok(())
    }

    pub fn can_start(&self) -> bool {
        self.eligibility().is_ok()
    }

    fn expect_setup(&self) -> RoomResult<()> {
        match self.stage {
            Stage::Setup => Ok(()),
            _ => Err(ErrorKind::RosterLocked),
        }
    }

    pub fn add_player(&mut self, raw: &str) -> RoomResult<()> {
        self.expect_setup()?;
        self.roster.add(raw, self.config.validation)
    }

    pub fn remove_player(&mut self, idx: usize) -> RoomResult<()> {
        self.expect_setup()?;
        self.roster.remove(idx).map(|_| ())
    }

    pub fn move_player(&mut self, from: usize, to: usize) -> RoomResult<()> {
        self.expect_setup()?;
        self.roster.reorder(from, to)
    }

    pub fn start_round<R: Rng>(&mut self, rng: &mut R) -> RoomResult<()> {
        match self.stage {
            Stage::Setup => self.begin_round(rng),
            _ => Err(self.wrong_stage("start round")),
        }
    }

    pub fn new_round<R: Rng>(&mut self, rng: &mut R) -> RoomResult<()> {
        match self.stage {
            Stage::Discuss { .. } => self.begin_round(rng),
            _ => Err(self.wrong_stage("new round")),
        }
    }

    fn begin_round<R: Rng>(&mut self, rng: &mut R) -> RoomResult<()> {
        self.eligibility()?;
        let topic = match self.catalog.choose(rng) {
            Some(topic) => topic.clone(),
            None => return Err(ErrorKind::CatalogNotLoaded),
        };
        self.rounds += 1;
        self.round = Some(Round {
            number: self.rounds,
            imposter: rng.gen_range(0..self.roster.len()),
            topic,
            current: 0,
        });
        self.stage = Stage::Reveal { shown: None };
        Ok(())
    }

    /// Press: the current player looks at their secret. Each press draws a
    /// fresh hint for the imposter.
    pub fn show_secret<R: Rng>(&mut self, rng: &mut R) -> RoomResult<()> {
        let round = match (&self.stage, &self.round) {
            (Stage::Reveal { .. }, Some(round)) => round,
            _ => return Err(self.wrong_stage("show secret")),
        };
        let shown = if round.is_imposter_turn() {
            Shown::Imposter {
                hint: round.topic.hints.choose(rng).cloned(),
            }
        } else {
            Shown::Topic
        };
        self.stage = Stage::Reveal { shown: Some(shown) };
        Ok(())
    }

    /// Release: conceal again. Harmless when already concealed.
    pub fn hide_secret(&mut self) -> RoomResult<()> {
        match self.stage {
            Stage::Reveal { .. } => {
                self.stage = Stage::Reveal { shown: None };
                Ok(())
            }
            _ => Err(self.wrong_stage("hide secret")),
        }
    }

    /// Hands the device to the next player, or moves on to the discussion
    /// after the last one.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> RoomResult<()> {
        match self.stage {
            Stage::Reveal { shown: None } => {}
            Stage::Reveal { shown: Some(_) } => return Err(ErrorKind::SecretShown),
            _ => return Err(self.wrong_stage("next player")),
        }
        let players = self.roster.len();
        let announce = self.config.announce_starter;
        let round = self.round.as_mut().ok_or(ErrorKind::WrongStage {
            action: "next player",
            stage: "reveal",
        })?;
        if round.current + 1 < players {
            round.current += 1;
        } else {
            let starter = if announce {
                Some(rng.gen_range(0..players))
            } else {
                None
            };
            self.stage = Stage::Discuss { starter };
        }
        Ok(())
    }

    /// Full reset back to setup. Returns whether the roster was emptied.
    pub fn reset(&mut self) -> bool {
        self.clear_round();
        if self.config.reset_clears_roster {
            self.roster.clear();
            true
        } else {
            false
        }
    }

    fn clear_round(&mut self) {
        self.rounds = 0;
        self.round = None;
        self.stage = Stage::Setup;
    }

    fn wrong_stage(&self, action: &'static str) -> ErrorKind {
        ErrorKind::WrongStage {
            action,
            stage: self.stage.name(),
        }
    }
}

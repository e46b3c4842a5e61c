use std::path::PathBuf;

use clap::ArgEnum;

use super::catalog::CatalogSource;
use crate::store::{FileStore, MemoryStore, Store};

/// How the name field treats bad input.
#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Keep names as typed, tell the player what was wrong.
    Strict,
    /// Capitalize names, silently drop bad ones.
    Lenient,
}

/// How long the saved roster lives.
#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceScope {
    /// In memory, for as long as the room process runs.
    Session,
    /// On disk, across room restarts.
    Window,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub validation: Validation,
    pub announce_starter: bool,
    pub reset_clears_roster: bool,
}

impl GameConfig {
    /// Inline errors, alerts on refused starts, no starter announcement.
    pub fn strict() -> Self {
        Self {
            validation: Validation::Strict,
            announce_starter: false,
            reset_clears_roster: true,
        }
    }

    /// Silent refusals, capitalized names, announces who opens the discussion.
    pub fn lenient() -> Self {
        Self {
            validation: Validation::Lenient,
            announce_starter: true,
            reset_clears_roster: true,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::strict()
    }
}

pub struct Config {
    pub game: GameConfig,
    pub catalog: CatalogSource,
    pub persistence: PersistenceScope,
    pub store_path: PathBuf,
}

impl Config {
    pub fn new(catalog: CatalogSource) -> Self {
        Self {
            game: GameConfig::default(),
            catalog,
            persistence: PersistenceScope::Session,
            store_path: PathBuf::from(crate::consts::STORE_PATH),
        }
    }

    pub fn open_store(&self) -> Box<dyn Store> {
        match self.persistence {
            PersistenceScope::Session => Box::new(MemoryStore::default()),
            PersistenceScope::Window => Box::new(FileStore::new(self.store_path.clone())),
        }
    }
}

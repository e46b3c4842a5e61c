pub mod config;
pub mod catalog;
mod state;
mod roster;
mod render;
mod error;

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc::{Sender, Receiver, channel};
use tracing::{debug, info, warn};

use protocol::{ClientRequest, ClientResponse, Encoding, Topic};

use config::Config;
use catalog::CatalogError;
use state::Game;
use render::{render, Feedback};
use error::RoomResult;
use roster::Roster;

use crate::client::Client;
use crate::consts::*;
use crate::store::{Store, StoreError};
use crate::types::*;

#[derive(Debug)]
pub enum RoomReq {
    ClientLogin {
        ws_stream: WsStream,
    },
    ClientReq(usize, ClientRequest, Encoding),
    ClientLogout(usize),

    CatalogLoaded(Result<Vec<Topic>, CatalogError>),
}

/// The single game room. Owns the session and applies every request to it in
/// arrival order, then pushes a fresh view to every renderer.
pub struct Room {
    config: Config,
    game: Game,
    store: Box<dyn Store>,
    rng: StdRng,

    clients: HashMap<usize, Client>,
    next_client: usize,
    fetching: bool,

    rm_rx: Receiver<RoomReq>,
    loopback: Sender<RoomReq>,
}

impl Room {
    pub fn new(config: Config) -> Self {
        let store = config.open_store();
        Self::with_parts(config, store, StdRng::from_entropy())
    }

    pub(crate) fn with_parts(config: Config, store: Box<dyn Store>, rng: StdRng) -> Self {
        let (loopback, rm_rx) = channel::<RoomReq>(32);
        let game = Game::new(config.game.clone());
        Self {
            config,
            game,
            store,
            rng,

            clients: HashMap::new(),
            next_client: 0,
            fetching: false,

            rm_rx,
            loopback,
        }
    }

    pub fn get_tx(&self) -> Sender<RoomReq> {
        self.loopback.clone()
    }

    pub async fn run(&mut self) {
        self.fetch_catalog();
        while let Some(req) = self.rm_rx.recv().await {
            self.handle(req).await;
        }
    }

    pub(crate) async fn handle(&mut self, req: RoomReq) {
        match req {
            RoomReq::ClientLogin { ws_stream } => {
                let id = self.next_client;
                let client = Client::new(id, ws_stream, self.get_tx());
                self.attach(client).await;
            }
            RoomReq::ClientReq(id, req, encoding) => {
                if let Some(client) = self.clients.get_mut(&id) {
                    client.encoding = encoding;
                    self.on_request(id, req).await;
                }
            }
            RoomReq::ClientLogout(id) => self.detach(id),
            RoomReq::CatalogLoaded(result) => {
                self.fetching = false;
                match result {
                    Ok(topics) => {
                        if self.game.load_catalog(topics) {
                            info!("Loaded {} topics", self.game.catalog().len());
                        }
                    }
                    Err(err) => warn!("Error loading topics: {}", err),
                }
                self.broadcast(None, None).await;
            }
        }
    }

    pub(crate) async fn attach(&mut self, client: Client) -> usize {
        let id = self.next_client;
        self.next_client += 1;
        if self.clients.is_empty() {
            self.begin_session();
        }
        info!("client {} joined", id);
        client.send(ClientResponse::View(render(&self.game, None))).await;
        self.clients.insert(id, client);
        id
    }

    fn detach(&mut self, id: usize) {
        if let Some(client) = self.clients.remove(&id) {
            client.abort();
            info!("client {} left", id);
            if self.clients.is_empty() {
                self.end_session();
            }
        }
    }

    /// First renderer in: reload the saved roster and start from setup,
    /// retrying the catalog if it never arrived.
    fn begin_session(&mut self) {
        let stored = match self.store.get(STORAGE_KEY_PLAYERS) {
            Ok(stored) => stored,
            Err(err) => {
                warn!("Unable to load saved players: {}", err);
                None
            }
        };
        self.game.restart(Roster::from_stored(stored.as_deref()));
        info!("session started with {} players", self.game.roster.len());
        if !self.game.catalog_loaded() && !self.fetching {
            self.fetch_catalog();
        }
    }

    /// The store outlives the session, so a reconnecting renderer finds its
    /// roster again.
    fn end_session(&mut self) {
        info!("session ended");
    }

    fn fetch_catalog(&mut self) {
        if self.fetching {
            return;
        }
        self.fetching = true;
        let source = self.config.catalog.clone();
        let loopback = self.get_tx();
        tokio::spawn(async move {
            let result = source.fetch().await;
            loopback.send(RoomReq::CatalogLoaded(result)).await.unwrap_or_default();
        });
    }

    async fn on_request(&mut self, id: usize, req: ClientRequest) {
        let feedback = match self.dispatch(req) {
            Ok(()) => None,
            Err(err) => {
                debug!("client {} refused: {}", id, err);
                Feedback::from_error(&err, &self.game.config)
            }
        };
        self.broadcast(Some(id), feedback).await;
    }

    fn dispatch(&mut self, req: ClientRequest) -> RoomResult<()> {
        match req {
            ClientRequest::AddPlayer { name } => {
                self.game.add_player(&name)?;
                self.persist();
            }
            ClientRequest::RemovePlayer { index } => {
                self.game.remove_player(index)?;
                self.persist();
            }
            ClientRequest::MovePlayer { from, to } => {
                self.game.move_player(from, to)?;
                self.persist();
            }
            ClientRequest::StartRound => self.game.start_round(&mut self.rng)?,
            ClientRequest::ShowSecret => self.game.show_secret(&mut self.rng)?,
            ClientRequest::HideSecret => self.game.hide_secret()?,
            ClientRequest::NextPlayer => self.game.advance(&mut self.rng)?,
            ClientRequest::NewRound => self.game.new_round(&mut self.rng)?,
            ClientRequest::Reset => {
                if self.game.reset() {
                    self.persist();
                }
            }
        }
        Ok(())
    }

    /// Never fails the caller; storage trouble is only logged.
    fn persist(&mut self) {
        let saved = self.game.roster.to_stored()
            .map_err(StoreError::from)
            .and_then(|value| self.store.set(STORAGE_KEY_PLAYERS, value));
        if let Err(err) = saved {
            warn!("Unable to save players: {}", err);
        }
    }

    /// Feedback only goes to the client whose request caused it.
    async fn broadcast(&self, origin: Option<usize>, feedback: Option<Feedback>) {
        for (id, client) in &self.clients {
            let feedback = if Some(*id) == origin { feedback.clone() } else { None };
            client.send(ClientResponse::View(render(&self.game, feedback))).await;
        }
    }
}

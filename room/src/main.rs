mod logger;
mod types;
mod consts;
mod store;
mod room;
mod client;

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::consts::*;
use crate::room::catalog::CatalogSource;
use crate::room::config::{Config, GameConfig, PersistenceScope, Validation};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, default_value_t = PORT)]
    port: u16,
    /// Topic catalog: an http(s) URL or a local JSON file.
    #[clap(short, long, default_value = LEX_SERVER)]
    catalog: String,
    #[clap(long, arg_enum, default_value = "strict")]
    validation: Validation,
    #[clap(long, arg_enum, default_value = "window")]
    persistence: PersistenceScope,
    /// Roster file used by the window scope.
    #[clap(long, default_value = STORE_PATH)]
    store: PathBuf,
    /// Name a random player to open each discussion.
    #[clap(long)]
    announce_starter: bool,
    /// Reset starts over with the same players.
    #[clap(long)]
    keep_roster_on_reset: bool,
    #[clap(long, default_value = "info")]
    log: String,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::new(CatalogSource::parse(&self.catalog));
        config.game = GameConfig {
            validation: self.validation,
            announce_starter: self.announce_starter,
            reset_clears_roster: !self.keep_roster_on_reset,
        };
        config.persistence = self.persistence;
        config.store_path = self.store.clone();
        config
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init(&args.log);
    if let Err(err) = run_on_port(args.port, args.config()).await {
        warn!("room stopped: {}", err);
    }
}


async fn run_on_port(port: u16, config: Config) -> std::io::Result<()> {
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("listening on port {}", port);
    let mut room = room::Room::new(config);
    let room_tx = room.get_tx();
    let _handle_room = tokio::spawn(async move {room.run().await});

    while let Ok((stream, addr)) = listener.accept().await {
        let room_tx_clone = room_tx.clone();
        tokio::spawn(async move {
            match tokio_tungstenite::accept_hdr_async(stream, PathCallback).await {
                Ok(ws_stream) => {
                    info!("renderer connected from {}", addr);
                    room_tx_clone.send(room::RoomReq::ClientLogin{ws_stream}).await.unwrap_or_default();
                }
                Err(err) => warn!("handshake with {} failed: {}", addr, err),
            }
        });
    }

    Ok(())
}

use tokio_tungstenite::tungstenite::handshake::server::Request as HsReq;
use tokio_tungstenite::tungstenite::handshake::server::Response as HsResp;
use tokio_tungstenite::tungstenite::handshake::server::ErrorResponse as HsError;
use tokio_tungstenite::tungstenite::handshake::server::Callback as HsCallback;
use tokio_tungstenite::tungstenite::http::StatusCode;

/// Only `/play` upgrades.
struct PathCallback;

impl HsCallback for PathCallback {
    fn on_request(self, req: &HsReq, resp: HsResp) -> Result<HsResp, HsError> {
        if req.uri().path() == PLAY_PATH {
            return Ok(resp);
        }
        let mut err = HsError::new(Some("PathError".to_string()));
        *err.status_mut() = StatusCode::NOT_FOUND;
        Err(err)
    }
}

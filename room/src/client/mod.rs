use crate::consts::*;
use crate::types::*;
use crate::room::RoomReq;
use protocol::{BinCodeMessage, ClientRequest, ClientResponse, Encoding, JsonMessage};
use tokio::sync::{mpsc};
use tokio::task::JoinHandle;
use tokio::time;
use futures::{StreamExt, SinkExt};
use tracing::{debug, warn};

/// One connected renderer. Three tasks pump its socket: inbound frames to the
/// room, room output to the socket, and a heartbeat ping.
#[derive(Debug)]
pub struct Client {
    pub(crate) encoding: Encoding,
    pub(crate) ws_from_room_tx: mpsc::Sender<WsMsg>,
    pub(crate) handles: Vec<JoinHandle<()>>,
}

impl Client {

    pub(crate) fn new(id: usize, stream: WsStream, room_tx: mpsc::Sender<RoomReq>) -> Self {

        let (mut ws_tx, mut ws_rx) = stream.split();
        let (ws_from_room_tx, mut ws_from_room_rx) = mpsc::channel::<WsMsg>(128);

        let tx_ping = ws_from_room_tx.clone();
        let ping_handle = tokio::spawn(async move {
            loop {
                if tx_ping.send(WsMsg::Ping(Vec::new())).await.is_err() {
                    break;
                }
                time::sleep(HB_DURATION).await;
            }
        });

        let room_transmit_tx = room_tx.clone();
        let rx_handle = tokio::spawn(
            async move {
                while let Some(Ok(ws_msg)) = ws_rx.next().await {
                    let req = match ws_msg {
                        WsMsg::Text(text) => ClientRequest::deser_text(&text)
                            .map(|req| (req, Encoding::Text))
                            .map_err(|e| e.to_string()),
                        WsMsg::Binary(bin) => ClientRequest::deser(&bin)
                            .map(|req| (req, Encoding::Binary))
                            .map_err(|e| e.to_string()),
                        WsMsg::Close(_) => break,
                        _ => continue,
                    };
                    match req {
                        Ok((req, encoding)) => {
                            room_transmit_tx.send(RoomReq::ClientReq(id, req, encoding)).await.unwrap_or_default();
                        }
                        Err(err) => debug!("client {} sent an unreadable frame: {}", id, err),
                    }
                }
                room_transmit_tx.send(RoomReq::ClientLogout(id)).await.unwrap_or_default();
            }
        );

        let logout_reminder = room_tx.clone();
        let tx_handle = tokio::spawn(
            async move {
                while let Some(ws_msg) = ws_from_room_rx.recv().await {
                    if let Err(err) = ws_tx.send(ws_msg).await {
                        debug!("client {} socket closed: {}", id, err);
                        logout_reminder.send(RoomReq::ClientLogout(id)).await.unwrap_or_default();
                        break;
                    }
                }
            }
        );

        Self {
            encoding: Encoding::Binary,
            ws_from_room_tx,
            handles: vec![ping_handle, rx_handle, tx_handle],
        }
    }

    /// A client with no socket behind it; whatever the room sends lands in
    /// the returned receiver.
    #[cfg(test)]
    pub(crate) fn detached() -> (Self, mpsc::Receiver<WsMsg>) {
        let (ws_from_room_tx, rx) = mpsc::channel::<WsMsg>(128);
        let client = Self {
            encoding: Encoding::Binary,
            ws_from_room_tx,
            handles: Vec::new(),
        };
        (client, rx)
    }

    pub(crate) async fn send(&self, resp: ClientResponse) {
        let msg = match self.encoding {
            Encoding::Binary => resp.ser().map_err(|e| e.to_string()),
            Encoding::Text => resp.ser_text().map_err(|e| e.to_string()),
        };
        match msg {
            Ok(msg) => self.ws_from_room_tx.send(msg).await.unwrap_or_default(),
            Err(err) => warn!("cannot encode response: {}", err),
        }
    }

    pub(crate) fn abort(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

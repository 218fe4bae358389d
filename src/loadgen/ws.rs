//! WebSocket load client

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info};

use crate::error::{BookError, Result};
use super::{random_book, random_id, ticker, Schedule};

/// Sends `write`/`read` actions over one long-lived socket
pub struct WsLoad {
    endpoint: String,
}

impl WsLoad {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `{ "action": "write", "data": <random record> }`
    pub fn write_message() -> Value {
        json!({ "action": "write", "data": random_book() })
    }

    /// `{ "action": "read" }`
    pub fn read_all_message() -> Value {
        json!({ "action": "read" })
    }

    /// `{ "action": "read", "id": <known id> }`
    pub fn read_by_id_message() -> Value {
        json!({ "action": "read", "id": random_id() })
    }

    /// Connect and send on `schedule` until the server closes the socket
    pub async fn run(&self, schedule: Schedule) -> Result<()> {
        let (socket, _) = connect_async(self.endpoint.as_str())
            .await
            .map_err(|e| BookError::Network(format!("connect to {} failed: {}", self.endpoint, e)))?;
        info!("WebSocket connection established.");

        let (mut sink, mut source) = socket.split();

        let reader = tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<Value>(&text) {
                        Ok(event) => info!("Received from WS server: {}", event),
                        Err(_) => info!("Received from WS server: {}", text),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                }
            }
            info!("WebSocket connection closed.");
        });

        let mut writes = ticker(schedule.write);
        let mut reads = ticker(schedule.read_all);
        let mut lookups = ticker(schedule.read_by_id);

        loop {
            let message = tokio::select! {
                _ = writes.tick() => {
                    info!("Sending write request");
                    Self::write_message()
                }
                _ = reads.tick() => {
                    info!("Sending read request for all records");
                    Self::read_all_message()
                }
                _ = lookups.tick() => {
                    let message = Self::read_by_id_message();
                    info!("Sending read request with id '{}'", message["id"]);
                    message
                }
            };

            if reader.is_finished() {
                return Ok(());
            }
            if let Err(e) = sink.send(Message::Text(message.to_string())).await {
                error!("WebSocket send failed: {}", e);
                return Err(BookError::Network(e.to_string()));
            }
        }
    }
}

//! Connection Handler
//!
//! Runs one WebSocket session against the Books resource.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::future;
use futures::{SinkExt, StreamExt};

use crate::error::Result;
use crate::protocol::Payload;
use crate::resource::BooksResource;

/// Handles a single WebSocket client
pub struct Connection {
    socket: WebSocket,

    /// Reference to the shared resource
    resource: Arc<BooksResource>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    pub fn new(socket: WebSocket, resource: Arc<BooksResource>, peer_addr: String) -> Self {
        Self {
            socket,
            resource,
            peer_addr,
        }
    }

    /// Handle the session until the client goes away
    ///
    /// Text and binary frames are fed to the resource in order; binary
    /// frames must hold UTF-8 JSON. The resource's events go back as text
    /// frames. A close frame or read error ends the inbound side, which in
    /// turn ends the session.
    pub async fn handle(self) -> Result<()> {
        let Connection {
            socket,
            resource,
            peer_addr,
        } = self;
        tracing::debug!("WebSocket session opened from {}", peer_addr);

        let (mut sender, receiver) = socket.split();

        let inbound_peer = peer_addr.clone();
        let inbound = receiver
            .take_while(move |frame| {
                let open = match frame {
                    Ok(Message::Close(_)) => false,
                    Ok(_) => true,
                    Err(e) => {
                        tracing::debug!("Read error from {}: {}", inbound_peer, e);
                        false
                    }
                };
                future::ready(open)
            })
            .filter_map(|frame| {
                future::ready(match frame {
                    Ok(Message::Text(text)) => Some(Payload::Text(text)),
                    Ok(Message::Binary(bytes)) => Some(Payload::Bytes(bytes)),
                    _ => None,
                })
            });

        let events = resource.connect(inbound);
        futures::pin_mut!(events);

        while let Some(event) = events.next().await {
            tracing::trace!("Sending to {}: {:?}", peer_addr, event);
            let text = event.to_json()?;

            if let Err(e) = sender.send(Message::Text(text)).await {
                // Client left before the event could be delivered
                tracing::debug!("Client {} disconnected: {}", peer_addr, e);
                return Ok(());
            }
        }

        tracing::debug!("Client {} disconnected", peer_addr);
        if let Err(e) = sender.close().await {
            tracing::debug!("Closing socket to {} failed: {}", peer_addr, e);
        }
        Ok(())
    }
}

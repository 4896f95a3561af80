//! Client session: one WebSocket connection attached to one room.
//!
//! The session runs two duties against the split socket:
//!
//! - inbound: reads frames under an idle timeout and posts chat content to the
//!   hub. It owns the session lifecycle and always emits the leave.
//! - outbound: drains the client's outbound buffer to the socket and sends
//!   keepalive pings. It ends when the hub closes the buffer, a write fails or
//!   the session is cancelled.
//!
//! Whichever duty ends first cancels the session token so the other follows.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, close_code},
};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::time::{Instant, interval_at, timeout};
use tokio_util::sync::CancellationToken;

use crate::{
    config::SessionConfig,
    domain::{ClientId, MemberProfile},
    hub::{Departure, HubHandle, InboundMessage, OutboundReceiver},
    infrastructure::dto::websocket::decode_inbound,
    ui::state::AppState,
};

type Sink = SplitSink<WebSocket, Message>;

/// Why the outbound duty stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterExit {
    /// The hub closed the outbound buffer (leave, replacement or eviction)
    BufferClosed,
    /// The session or the server was cancelled
    Cancelled,
    /// A write or ping failed or timed out
    WriteFailed,
}

pub(crate) async fn run(socket: WebSocket, profile: MemberProfile, state: Arc<AppState>) {
    let config = state.session;
    let hub = state.hub.clone();

    let registration = match hub.join(profile.clone()).await {
        Ok(registration) => registration,
        Err(error) => {
            tracing::warn!(
                room_id = %profile.room_id,
                user_id = %profile.user_id,
                %error,
                "could not register connection"
            );
            let (mut sink, _) = socket.split();
            send_close(&mut sink, close_code::AWAY, "server shutting down", config.write_wait)
                .await;
            return;
        }
    };
    let client_id = registration.client_id;

    tracing::info!(
        room_id = %profile.room_id,
        user_id = %profile.user_id,
        %client_id,
        "session started"
    );

    let cancel = state.shutdown.child_token();
    let (sink, stream) = socket.split();

    let writer = tokio::spawn(write_outbound(
        sink,
        registration.outbound,
        config,
        cancel.clone(),
    ));

    read_inbound(stream, &hub, client_id, &profile, config.pong_wait, &cancel).await;
    cancel.cancel();

    hub.leave(Departure {
        room_id: profile.room_id.clone(),
        user_id: profile.user_id.clone(),
        client_id,
    })
    .await;

    let exit = writer.await;
    tracing::info!(
        room_id = %profile.room_id,
        user_id = %profile.user_id,
        %client_id,
        writer = ?exit.ok(),
        "session ended"
    );
}

/// Inbound duty. Returns when the connection is dead, closed or cancelled.
async fn read_inbound(
    mut stream: SplitStream<WebSocket>,
    hub: &HubHandle,
    client_id: ClientId,
    profile: &MemberProfile,
    pong_wait: Duration,
    cancel: &CancellationToken,
) {
    loop {
        // A fresh timeout per read: any frame, including a pong, resets it
        let next = tokio::select! {
            _ = cancel.cancelled() => return,
            next = timeout(pong_wait, stream.next()) => next,
        };

        let frame = match next {
            Err(_) => {
                tracing::info!(%client_id, "idle timeout, closing connection");
                return;
            }
            Ok(None) => return,
            Ok(Some(Err(error))) => {
                tracing::debug!(%client_id, %error, "read error");
                return;
            }
            Ok(Some(Ok(frame))) => frame,
        };

        let payload = match &frame {
            Message::Text(text) => text.as_bytes(),
            Message::Binary(bytes) => bytes.as_ref(),
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => {
                tracing::debug!(%client_id, "client requested close");
                return;
            }
        };

        let inbound = match decode_inbound(payload) {
            Ok(inbound) => inbound,
            Err(error) => {
                tracing::warn!(%client_id, %error, "undecodable frame, closing connection");
                return;
            }
        };

        let message = InboundMessage {
            client_id,
            profile: profile.clone(),
            content: inbound.content,
        };
        if hub.post(message).await.is_err() {
            return;
        }
    }
}

/// Outbound duty
async fn write_outbound(
    mut sink: Sink,
    mut outbound: OutboundReceiver,
    config: SessionConfig,
    cancel: CancellationToken,
) -> WriterExit {
    let mut ping = interval_at(Instant::now() + config.ping_period, config.ping_period);

    let exit = loop {
        tokio::select! {
            biased;
            payload = outbound.recv() => {
                let Some(first) = payload else {
                    send_close(&mut sink, close_code::NORMAL, "", config.write_wait).await;
                    break WriterExit::BufferClosed;
                };
                if write_batch(&mut sink, &mut outbound, Some(first), config.write_wait).await.is_err() {
                    break WriterExit::WriteFailed;
                }
            }
            _ = cancel.cancelled() => {
                // Flush what the hub already queued, then say goodbye
                if write_batch(&mut sink, &mut outbound, None, config.write_wait).await.is_ok() {
                    send_close(&mut sink, close_code::AWAY, "", config.write_wait).await;
                }
                break WriterExit::Cancelled;
            }
            _ = ping.tick() => {
                let sent = timeout(config.write_wait, sink.send(Message::Ping(Bytes::new()))).await;
                if !matches!(sent, Ok(Ok(()))) {
                    break WriterExit::WriteFailed;
                }
            }
        }
    };

    cancel.cancel();
    exit
}

/// Write `first` plus everything already queued, flushing once
async fn write_batch(
    sink: &mut Sink,
    outbound: &mut OutboundReceiver,
    first: Option<Utf8Bytes>,
    write_wait: Duration,
) -> Result<(), ()> {
    let queued = outbound.len();
    let batch = async {
        if let Some(first) = first {
            sink.feed(Message::Text(first)).await?;
        }
        for _ in 0..queued {
            match outbound.try_recv() {
                Ok(payload) => sink.feed(Message::Text(payload)).await?,
                Err(_) => break,
            }
        }
        sink.flush().await
    };

    match timeout(write_wait, batch).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(error)) => {
            tracing::debug!(%error, "write failed");
            Err(())
        }
        Err(_) => {
            tracing::debug!("write timed out");
            Err(())
        }
    }
}

/// Send a WebSocket close frame with a code and reason.
async fn send_close(sink: &mut Sink, code: u16, reason: &str, write_wait: Duration) {
    let close = Message::Close(Some(CloseFrame {
        code,
        reason: reason.to_string().into(),
    }));
    if let Ok(Err(error)) = timeout(write_wait, sink.send(close)).await {
        tracing::debug!(%error, "failed to send close frame");
    }
}

//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use hiroma_server::{
    domain::value_object::MAX_CONTENT_CHARS, infrastructure::dto::websocket::OutboundMessage,
};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};
use url::Url;

use crate::{
    domain::{InputRejection, prepare_input},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Run one connection until the user quits (`Ok`) or the connection is lost
///
/// # Arguments
///
/// * `url` - Full connection URL including room and user segments
/// * `user_id` - The current user's ID (used for the prompt and "me" marks)
/// * `input_rx` - Lines typed by the user; closed when stdin ends
/// * `max_frame_bytes` - Frame limit of the server; longer frames are not sent
pub async fn run_client_session(
    url: &Url,
    user_id: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    max_frame_bytes: usize,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url.as_str()).await.map_err(|e| match e {
        WsError::Http(response) if response.status().is_client_error() => {
            ClientError::Rejected(response.status().to_string())
        }
        WsError::Url(e) => ClientError::InvalidUrl(e.to_string()),
        other => ClientError::ConnectionError(other.to_string()),
    })?;

    tracing::info!(%url, "Connected to chat server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+D to exit.\n",
        user_id
    );
    redisplay_prompt(user_id);

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            message = read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        let formatted = match serde_json::from_str::<OutboundMessage>(text.as_str()) {
                            Ok(message) => MessageFormatter::format_outbound(&message, user_id),
                            Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                        };
                        print!("{}", formatted);
                        redisplay_prompt(user_id);
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "Server closed the connection");
                        return Err(ClientError::ConnectionError("Connection closed by server".to_string()));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        return Err(ClientError::ConnectionError(e.to_string()));
                    }
                    None => {
                        return Err(ClientError::ConnectionError("Connection lost".to_string()));
                    }
                }
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // stdin ended: leave the room cleanly
                    write.send(Message::Close(None)).await.ok();
                    return Ok(());
                };

                let frame = match prepare_input(&line, max_frame_bytes) {
                    Ok(frame) => frame,
                    Err(InputRejection::Empty) => {
                        redisplay_prompt(user_id);
                        continue;
                    }
                    Err(InputRejection::TooLong { chars }) => {
                        println!(
                            "Message not sent: {} characters (max {})",
                            chars, MAX_CONTENT_CHARS
                        );
                        redisplay_prompt(user_id);
                        continue;
                    }
                    Err(InputRejection::FrameTooLarge { bytes, max }) => {
                        println!(
                            "Message not sent: {} bytes once encoded (server limit {})",
                            bytes, max
                        );
                        redisplay_prompt(user_id);
                        continue;
                    }
                };

                if let Err(e) = write.send(Message::text(frame)).await {
                    tracing::warn!("Failed to send message: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            }
        }
    }
}

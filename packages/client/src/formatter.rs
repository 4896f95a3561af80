//! Message formatting utilities for client display.

use hiroma_server::infrastructure::dto::websocket::{OutboundMessage, UserDto};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any frame received from the server
    ///
    /// # Arguments
    ///
    /// * `message` - The decoded frame
    /// * `current_user_id` - The current user's ID (to mark as "me")
    pub fn format_outbound(message: &OutboundMessage, current_user_id: &str) -> String {
        match message {
            OutboundMessage::Message {
                user_id,
                username,
                content,
                timestamp,
                ..
            } => Self::format_chat_message(username, user_id, content, timestamp),
            OutboundMessage::UserJoined {
                username, data, ..
            } => format!(
                "\n+ {} joined\n{}",
                username,
                Self::format_member_list(data, current_user_id)
            ),
            OutboundMessage::UserLeft {
                username, data, ..
            } => format!(
                "\n- {} left\n{}",
                username,
                Self::format_member_list(data, current_user_id)
            ),
        }
    }

    /// Format the member list carried by presence events
    pub fn format_member_list(members: &[UserDto], current_user_id: &str) -> String {
        let mut output = String::new();
        output.push_str("============================================================\n");
        output.push_str(&format!("Members ({}):\n", members.len()));

        if members.is_empty() {
            output.push_str("(No members)\n");
        } else {
            for member in members {
                let me_suffix = if member.id == current_user_id {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!("{} [{}]{}\n", member.username, member.id, me_suffix));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a chat message
    pub fn format_chat_message(username: &str, user_id: &str, content: &str, sent_at: &str) -> String {
        format!(
            "\n\n------------------------------------------------------------\n\
             @{} [{}]: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            username, user_id, content, sent_at
        )
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

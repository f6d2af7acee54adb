// src/models/chat.rs
use serde::Serialize;
use sqlx::FromRow;

/// One stored exchange: what the user sent and what the model answered.
///
/// Rows are append-only. `id` is assigned by SQLite and only used for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ConversationTurn {
    pub id: i64,
    pub user_name: String,
    pub user_input: String,
    pub chatbot_response: String,
}

impl ConversationTurn {
    /// The `(user_input, chatbot_response)` pair, without identity or ordering.
    pub fn exchange(&self) -> (&str, &str) {
        (&self.user_input, &self.chatbot_response)
    }
}

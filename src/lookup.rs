// src/lookup.rs
//! Offline inspection of stored conversations, used by the `get_history` binary.

use crate::models::ConversationTurn;
use crate::services::history;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::io::{self, Write};
use std::str::FromStr;

/// Every turn stored for `user_name`, or an empty list if the database cannot
/// be opened or read. Failures are logged, never returned.
pub async fn get_conversation_history(database_url: &str, user_name: &str) -> Vec<ConversationTurn> {
    match fetch(database_url, user_name).await {
        Ok(turns) => turns,
        Err(e) => {
            tracing::error!(error = %e, user_name = %user_name, "Database error");
            Vec::new()
        }
    }
}

async fn fetch(database_url: &str, user_name: &str) -> Result<Vec<ConversationTurn>, sqlx::Error> {
    // no create_if_missing: a missing file is reported, not created
    let mut conn = SqliteConnectOptions::from_str(database_url)?.connect().await?;
    let turns = history::load(&mut conn, user_name).await;
    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "failed to close database connection");
    }
    turns
}

/// Writes the report the `get_history` binary prints.
pub fn write_report<W: Write>(
    out: &mut W,
    user_name: &str,
    turns: &[ConversationTurn],
) -> io::Result<()> {
    if turns.is_empty() {
        return writeln!(out, "No conversation history found for user: {}", user_name);
    }

    writeln!(out, "\nConversation History for User: {}\n", user_name)?;
    for turn in turns {
        writeln!(out, "User: {}", turn.user_input)?;
        writeln!(out, "Chatbot: {}", turn.chatbot_response)?;
        writeln!(out, "{}", "-".repeat(20))?;
    }
    Ok(())
}

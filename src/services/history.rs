// src/services/history.rs
//! Append-only conversation history, one row per turn, keyed by the exact
//! `user_name` string.
//!
//! Every function takes the caller's connection, so a web request and the
//! lookup tool each decide when a connection is opened and released.

use crate::models::ConversationTurn;
use sqlx::SqliteConnection;

const CREATE_CONVERSATIONS: &str = "
    CREATE TABLE IF NOT EXISTS conversations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_name TEXT,
        user_input TEXT,
        chatbot_response TEXT
    )
";

/// Creates the `conversations` table if it is absent. Safe to call repeatedly.
pub async fn ensure_schema(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_CONVERSATIONS).execute(&mut *conn).await?;
    Ok(())
}

/// All turns for `user_name`, oldest first. Unknown names yield an empty list.
pub async fn load(
    conn: &mut SqliteConnection,
    user_name: &str,
) -> Result<Vec<ConversationTurn>, sqlx::Error> {
    let turns = sqlx::query_as::<_, ConversationTurn>(
        "SELECT id, user_name, user_input, chatbot_response \
         FROM conversations WHERE user_name = ?1 ORDER BY id ASC",
    )
    .bind(user_name)
    .fetch_all(&mut *conn)
    .await?;

    tracing::debug!(user_name = %user_name, turns = turns.len(), "loaded conversation history");
    Ok(turns)
}

/// Inserts one turn and returns the id SQLite assigned to it.
///
/// The insert is a single autocommitted statement, so it is durable once this
/// returns and nothing is written if it fails.
pub async fn append(
    conn: &mut SqliteConnection,
    user_name: &str,
    user_input: &str,
    chatbot_response: &str,
) -> Result<i64, sqlx::Error> {
    let id = sqlx::query(
        "INSERT INTO conversations (user_name, user_input, chatbot_response) \
         VALUES (?1, ?2, ?3)",
    )
    .bind(user_name)
    .bind(user_input)
    .bind(chatbot_response)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    tracing::debug!(user_name = %user_name, id, "appended conversation turn");
    Ok(id)
}

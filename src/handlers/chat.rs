// src/handlers/chat.rs
use crate::error::AppError;
use crate::prompt::{format_transcript, push_turn};
use crate::services::history;
use crate::views::chat_url;
use crate::AppState;
use axum::{
    extract::{rejection::FormRejection, Extension, Form, Query},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub const NAME_ENTRY_PATH: &str = "/get_user_name";

#[derive(Deserialize)]
pub struct MessageForm {
    user_input: String,
}

#[derive(Deserialize)]
pub struct UserNameForm {
    user_name: String,
}

/// First `user_name` in the query string. Repeated keys are allowed and the
/// later values ignored.
fn first_user_name(params: Vec<(String, String)>) -> Option<String> {
    params
        .into_iter()
        .find(|(key, _)| key == "user_name")
        .map(|(_, value)| value)
}

pub fn chat_routes() -> Router {
    Router::new()
        .route("/", get(show_chat).post(send_message))
        .route(NAME_ENTRY_PATH, get(name_entry_page).post(submit_user_name))
}

async fn show_chat(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let Some(user_name) = first_user_name(params) else {
        return Ok(Redirect::to(NAME_ENTRY_PATH).into_response());
    };

    let mut conn = state.db_pool.acquire().await?;
    let turns = history::load(&mut conn, &user_name).await?;

    let html = state
        .views
        .chat(&user_name, &format_transcript(&turns), None)?;
    Ok(Html(html).into_response())
}

async fn send_message(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
    form: Result<Form<MessageForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Some(user_name) = first_user_name(params) else {
        return Ok(Redirect::to(NAME_ENTRY_PATH).into_response());
    };
    let Form(MessageForm { user_input }) = form?;

    let mut conn = state.db_pool.acquire().await?;
    let turns = history::load(&mut conn, &user_name).await?;
    // no connection is held while waiting on the model
    drop(conn);

    let prompt = state.prompt_builder.build(&user_name, &turns, &user_input);
    let chatbot_response = state.generator.generate(&prompt).await?;

    let mut conn = state.db_pool.acquire().await?;
    let id = history::append(&mut conn, &user_name, &user_input, &chatbot_response).await?;
    drop(conn);
    tracing::info!(user_name = %user_name, turn_id = id, "💬 conversation turn saved");

    let mut transcript = format_transcript(&turns);
    push_turn(&mut transcript, &user_input, &chatbot_response);

    let html = state
        .views
        .chat(&user_name, &transcript, Some(&chatbot_response))?;
    Ok(Html(html).into_response())
}

async fn name_entry_page(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, AppError> {
    Ok(Html(state.views.name_entry()?))
}

async fn submit_user_name(
    form: Result<Form<UserNameForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(UserNameForm { user_name }) = form?;
    Ok(Redirect::to(&chat_url(&user_name)))
}

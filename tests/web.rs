use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use fleet_advisor::gemini_client::GeminiError;
use fleet_advisor::generator::ResponseGenerator;
use fleet_advisor::prompt::FullTranscript;
use fleet_advisor::services::history;
use fleet_advisor::views::Views;
use fleet_advisor::{app, db, AppState};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tower::ServiceExt;

/// Replies from a fixed script and remembers every prompt it was given.
#[derive(Default)]
struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn with_replies(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::default(),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(GeminiError::EmptyResponse)
    }
}

/// Parks every call until released, so a request can be held mid-generation.
#[derive(Default)]
struct GatedGenerator {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl ResponseGenerator for GatedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GeminiError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("Fireworks delivered.".to_string())
    }
}

async fn state_with(generator: Arc<dyn ResponseGenerator>) -> Arc<AppState> {
    Arc::new(AppState {
        db_pool: db::create_pool("sqlite::memory:").await.unwrap(),
        generator,
        prompt_builder: Arc::new(FullTranscript),
        views: Views::new().unwrap(),
    })
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn root_without_user_name_redirects_to_name_entry() {
    let router = app(state_with(ScriptedGenerator::with_replies(&[])).await);

    let response = send(&router, get("/")).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/get_user_name");

    let response = send(&router, post_form("/", "user_input=hello")).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/get_user_name");
}

#[tokio::test]
async fn name_entry_renders_form() {
    let router = app(state_with(ScriptedGenerator::with_replies(&[])).await);

    let response = send(&router, get("/get_user_name")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"name="user_name""#));
}

#[tokio::test]
async fn name_submission_redirects_with_user_name() {
    let router = app(state_with(ScriptedGenerator::with_replies(&[])).await);

    let response = send(&router, post_form("/get_user_name", "user_name=bob")).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/?user_name=bob");

    let response = send(&router, post_form("/get_user_name", "user_name=Jita+Local")).await;
    assert_eq!(location(&response), "/?user_name=Jita%20Local");
}

#[tokio::test]
async fn chat_page_for_new_user_has_no_response() {
    let router = app(state_with(ScriptedGenerator::with_replies(&[])).await);

    let response = send(&router, get("/?user_name=alice")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("alice"));
    assert!(!html.contains("Latest advice"));
}

#[tokio::test]
async fn submissions_are_stored_and_replayed_in_order() {
    let generator = ScriptedGenerator::with_replies(&["hello", "stable"]);
    let router = app(state_with(generator.clone()).await);

    let response = send(&router, post_form("/?user_name=carol", "user_input=hi")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("User: hi\nChatbot: hello\n"));
    assert!(html.contains("Latest advice"));

    let response = send(&router, post_form("/?user_name=carol", "user_input=status%3F")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("User: hi\nChatbot: hello\nUser: status?\nChatbot: stable\n"));

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("Previous conversation for user carol:\n\n"));
    assert!(prompts[0].ends_with("User: hi\nChatbot: "));
    assert!(prompts[1].contains("Previous conversation for user carol:\nUser: hi\nChatbot: hello\n"));
    assert!(prompts[1].ends_with("User: status?\nChatbot: "));

    let response = send(&router, get("/history/carol")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    let first = html.find("User: hi").unwrap();
    let second = html.find("User: status?").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn histories_do_not_leak_between_users() {
    let router = app(state_with(ScriptedGenerator::with_replies(&["o7"])).await);

    let response = send(&router, post_form("/?user_name=alice", "user_input=scout+fleet+spotted")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(send(&router, get("/history/bob")).await).await;
    assert!(!html.contains("scout fleet spotted"));
    assert!(html.contains("No conversation history found for user: bob"));

    let html = body_text(send(&router, get("/?user_name=bob")).await).await;
    assert!(!html.contains("scout fleet spotted"));
}

#[tokio::test]
async fn missing_user_input_fails_without_storing() {
    let generator = ScriptedGenerator::with_replies(&["unused"]);
    let state = state_with(generator.clone()).await;
    let router = app(state.clone());

    let response = send(&router, post_form("/?user_name=dave", "")).await;
    assert!(response.status().is_client_error());
    assert!(generator.prompts().is_empty());

    let mut conn = state.db_pool.acquire().await.unwrap();
    assert!(history::load(&mut conn, "dave").await.unwrap().is_empty());
}

#[tokio::test]
async fn generator_failure_is_a_server_error_and_nothing_is_stored() {
    let state = state_with(ScriptedGenerator::with_replies(&[])).await;
    let router = app(state.clone());

    let response = send(&router, post_form("/?user_name=erin", "user_input=help")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let mut conn = state.db_pool.acquire().await.unwrap();
    assert!(history::load(&mut conn, "erin").await.unwrap().is_empty());
}

#[tokio::test]
async fn history_page_decodes_path_segment() {
    let state = state_with(ScriptedGenerator::with_replies(&[])).await;
    {
        let mut conn = state.db_pool.acquire().await.unwrap();
        history::append(&mut conn, "Jita Local", "gate camp?", "Marvellous fireworks.")
            .await
            .unwrap();
    }
    let router = app(state);

    let response = send(&router, get("/history/Jita%20Local")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("User: gate camp?"));
}

#[tokio::test]
async fn repeated_user_name_uses_the_first_value() {
    let router = app(state_with(ScriptedGenerator::with_replies(&[])).await);

    let response = send(&router, get("/?user_name=a&user_name=b")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"action="/?user_name=a""#));
}

#[tokio::test]
async fn missing_table_fails_web_reads_with_server_error() {
    let state = state_with(ScriptedGenerator::with_replies(&["unused"])).await;
    {
        let mut conn = state.db_pool.acquire().await.unwrap();
        sqlx::query("DROP TABLE conversations")
            .execute(&mut *conn)
            .await
            .unwrap();
    }
    let router = app(state);

    let response = send(&router, get("/?user_name=x")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = send(&router, get("/history/x")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = send(&router, post_form("/?user_name=x", "user_input=hi")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn slow_generation_does_not_hold_a_connection() {
    // the in-memory pool has a single connection, so a held one would starve the reads
    let generator = Arc::new(GatedGenerator::default());
    let state = state_with(generator.clone()).await;
    let router = app(state.clone());

    let pending = tokio::spawn({
        let router = router.clone();
        async move { send(&router, post_form("/?user_name=frank", "user_input=undock?")).await }
    });
    generator.entered.notified().await;

    let response = tokio::time::timeout(Duration::from_secs(5), send(&router, get("/history/someone")))
        .await
        .expect("history request waited on the pool");
    assert_eq!(response.status(), StatusCode::OK);

    let response = tokio::time::timeout(Duration::from_secs(5), send(&router, get("/?user_name=someone")))
        .await
        .expect("chat page waited on the pool");
    assert_eq!(response.status(), StatusCode::OK);

    generator.release.notify_one();
    let response = pending.await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut conn = state.db_pool.acquire().await.unwrap();
    let turns = history::load(&mut conn, "frank").await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].chatbot_response, "Fireworks delivered.");
}

// src/views.rs
//! Server-rendered pages. Templates are embedded at compile time and every
//! `.html` template is HTML-escaped by minijinja.

use minijinja::{context, Environment, Value};

/// Link back to the chat page for `user_name`.
///
/// Percent-encoding leaves no HTML-special characters, so both URL helpers
/// are inserted into templates unescaped.
pub fn chat_url(user_name: &str) -> String {
    format!("/?user_name={}", urlencoding::encode(user_name))
}

/// Link to the read-only history page for `user_name`.
pub fn history_url(user_name: &str) -> String {
    format!("/history/{}", urlencoding::encode(user_name))
}

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../templates/base.html"))?;
        env.add_template("get_user_name.html", include_str!("../templates/get_user_name.html"))?;
        env.add_template("index.html", include_str!("../templates/index.html"))?;
        env.add_template("history.html", include_str!("../templates/history.html"))?;
        Ok(Self { env })
    }

    pub fn name_entry(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("get_user_name.html")?.render(context! {})
    }

    /// The chat page. `chatbot_response` is only set right after a submission.
    pub fn chat(
        &self,
        user_name: &str,
        conversation_history: &str,
        chatbot_response: Option<&str>,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("index.html")?.render(context! {
            user_name,
            conversation_history,
            chatbot_response,
            chat_url => Value::from_safe_string(chat_url(user_name)),
            history_url => Value::from_safe_string(history_url(user_name)),
        })
    }

    pub fn history(
        &self,
        user_name: &str,
        conversation_history: &str,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("history.html")?.render(context! {
            user_name,
            conversation_history,
            chat_url => Value::from_safe_string(chat_url(user_name)),
        })
    }
}

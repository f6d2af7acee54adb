// src/generator.rs
use crate::gemini_client::{GeminiClient, GeminiError};
use async_trait::async_trait;

/// Turns a rendered prompt into the assistant's reply.
///
/// One attempt per call. Any failure goes straight back to the caller.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError>;
}

#[async_trait]
impl ResponseGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        tracing::info!(model = %self.model(), prompt_chars = prompt.len(), "requesting completion");
        let text = self.generate_text(prompt).await?;
        tracing::info!(model = %self.model(), response_chars = text.len(), "completion received");
        Ok(text)
    }
}

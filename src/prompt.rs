// src/prompt.rs
use crate::models::ConversationTurn;

/// Persona and grounding instructions placed ahead of every prompt.
pub const PERSONA: &str = "You are an AI assistant to the fleet commanders in the online game Eve Online. You will give short advice on how to act or react in scenarios given by the user. Your main advice should be founded on Eve Online universe but can be extended with general adivce. Your style is ironic, hyperoptimistic and with an urge to praise the beautiful explosions that happen in this game.";

/// Appends one turn to `transcript` as `User: ...\nChatbot: ...\n`.
pub fn push_turn(transcript: &mut String, user_input: &str, chatbot_response: &str) {
    transcript.push_str("User: ");
    transcript.push_str(user_input);
    transcript.push_str("\nChatbot: ");
    transcript.push_str(chatbot_response);
    transcript.push('\n');
}

/// The whole history as one transcript, oldest turn first.
pub fn format_transcript(turns: &[ConversationTurn]) -> String {
    let mut transcript = String::new();
    for turn in turns {
        push_turn(&mut transcript, &turn.user_input, &turn.chatbot_response);
    }
    transcript
}

/// Fills the fixed template. Inputs are inserted verbatim: nothing is escaped,
/// trimmed or truncated.
pub fn render(history_text: &str, user_input: &str, user_name: &str) -> String {
    format!(
        "{PERSONA}\n\nPrevious conversation for user {user_name}:\n{history_text}\n\nUser: {user_input}\nChatbot: "
    )
}

/// Decides how much history goes into a prompt and how it is laid out.
pub trait PromptBuilder: Send + Sync {
    fn build(&self, user_name: &str, history: &[ConversationTurn], user_input: &str) -> String;
}

/// Resends every stored turn on every request. Prompt size grows with the
/// conversation; there is no windowing or summarisation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullTranscript;

impl PromptBuilder for FullTranscript {
    fn build(&self, user_name: &str, history: &[ConversationTurn], user_input: &str) -> String {
        render(&format_transcript(history), user_input, user_name)
    }
}

//! Quote suggestion proxy.
//!
//! Pure call-and-parse: build a chat-completion payload for the configured
//! language-model endpoint, send it, and pull a structured quote/author pair
//! out of the first choice. No retries, no streaming.
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{config::Config, error::AppError};

pub const SUGGEST_PROMPT: &str = "You suggest quotes in a melancholic, poetic voice for a board \
of unsent messages. Reply with a single JSON object of the shape \
{\"quote\": string, \"author\": string or omitted} containing a poignant quote about longing, \
what was left unsaid, or gentle sorrow. Omit the author when unknown.";

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Neutral,
}

impl Emotion {
    fn as_str(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub emotion: Emotion,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestedQuote {
    pub quote: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Deserialize)]
struct ChatReply {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatTurn,
}

#[derive(Deserialize)]
struct ChatTurn {
    content: String,
}

pub fn build_payload(model: &str, emotion: Emotion) -> serde_json::Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SUGGEST_PROMPT },
            { "role": "user", "content": format!("Suggest a {} quote.", emotion.as_str()) },
        ],
        "response_format": { "type": "json_object" },
    })
}

pub fn parse_suggestion(body: &str) -> Result<SuggestedQuote, AppError> {
    let reply: ChatReply = serde_json::from_str(body)?;

    let choice = reply
        .choices
        .into_iter()
        .next()
        .ok_or(AppError::EmptySuggestion)?;

    Ok(serde_json::from_str(&choice.message.content)?)
}

pub async fn suggest_quote(
    http: &reqwest::Client,
    config: &Config,
    emotion: Emotion,
) -> Result<SuggestedQuote, AppError> {
    let key = config
        .suggest_key
        .as_deref()
        .ok_or(AppError::Misconfigured("SUGGEST_API_KEY"))?;

    let body = http
        .post(&config.suggest_url)
        .bearer_auth(key)
        .json(&build_payload(&config.suggest_model, emotion))
        .send()
        .await?
        .text()
        .await?;

    parse_suggestion(&body)
}

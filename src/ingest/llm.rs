/// OpenAI chat-completions client.
///
///   POST {base_url}/chat/completions
///
/// Sends one system message and one user message and returns the first
/// choice's content. When JSON output is requested the call sets
/// `response_format: {"type": "json_object"}`. The reply is untrusted
/// either way.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{SourceError, TextGenerator, read_body};

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

pub fn build_chat_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

pub fn build_chat_body(model: &str, system: &str, prompt: &str, json_output: bool) -> Value {
    let mut body = json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": prompt },
        ],
        "temperature": 0.7,
    });
    if json_output {
        body["response_format"] = json!({ "type": "json_object" });
    }
    body
}

/// # Errors
/// `SourceError::Parse` for malformed bodies; `SourceError::NoAnswer` when
/// there is no choice or its content is empty.
pub fn parse_chat_response(json: &str) -> Result<String, SourceError> {
    let response: ChatResponse = serde_json::from_str(json).map_err(|e| SourceError::Parse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(SourceError::NoAnswer)
}

pub struct OpenAiGenerator {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiGenerator {
    pub fn new(
        client: reqwest::blocking::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        OpenAiGenerator {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }
}

impl TextGenerator for OpenAiGenerator {
    fn complete(&self, system: &str, prompt: &str, json_output: bool) -> Result<String, SourceError> {
        let body = build_chat_body(&self.model, system, prompt, json_output);
        debug!(model = %self.model, json_output, "Requesting chat completion");

        let response = self
            .client
            .post(build_chat_url(&self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        parse_chat_response(&read_body(response)?)
    }
}

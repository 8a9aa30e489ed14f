use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use super::{AdvisorError, ProviderConfig};

const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone, Copy)]
pub(super) struct ChatOptions {
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

/// Single-turn call against an OpenAI-compatible chat-completions endpoint.
///
/// Returns the trimmed content of the first choice.
pub(super) async fn chat_completion(
    http: &reqwest::Client,
    provider: &ProviderConfig,
    system_prompt: &str,
    user_prompt: &str,
    options: ChatOptions,
) -> Result<String, AdvisorError> {
    let request = ChatRequest {
        model: &provider.model,
        messages: vec![
            Message {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            },
        ],
        temperature: TEMPERATURE,
        max_tokens: options.max_tokens,
    };

    let response = http
        .post(&provider.endpoint)
        .header(AUTHORIZATION, format!("Bearer {}", provider.api_key))
        .timeout(options.timeout)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AdvisorError::Status {
            provider: provider.tag,
            status: status.as_u16(),
        });
    }

    let body: ChatResponse = response.json().await?;
    let content = body
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .map(|message| message.content.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(AdvisorError::EmptyContent(provider.tag));
    }
    Ok(content)
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Advisor, ProviderTag};

const FINBOT_SYSTEM_PROMPT: &str = "You are FinBot, an expert financial AI assistant.\n\n\
Traits:\n\
- Professional but approachable\n\
- Concise answers (max 2-3 sentences unless asked for detail)\n\
- Focus on startups, investing, and portfolio management\n\n\
Current user context:\n\
- The user is using BuildSim, a financial simulation platform.\n\
- If they ask about \"my portfolio\", give general advice or ask for specific details, \
as you have no access to their live data.";

const OFFLINE_REPLY: &str = "System Status: Offline Mode. \n\n\
I am currently operating in limited demo mode because I cannot connect to the external AI \
network. \n\nPlease check your internet connection or API keys to enable full intelligence.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub content: String,
    pub provider: ProviderTag,
}

impl Advisor {
    /// Single-turn FinBot answer; no history is kept between calls.
    pub async fn chat(&self, message: &str) -> ChatReply {
        let options = self.options(None, Duration::ZERO);
        let outcome = self
            .complete(FINBOT_SYSTEM_PROMPT, message, options, |text| {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            })
            .await;

        match outcome {
            Ok((content, provider)) => ChatReply { content, provider },
            Err(err) => {
                tracing::warn!(error = %err, "FinBot using offline reply");
                ChatReply {
                    content: OFFLINE_REPLY.to_string(),
                    provider: ProviderTag::Fallback,
                }
            }
        }
    }
}

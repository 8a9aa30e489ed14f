use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinSet;

use super::agents::{PERSONAS, Persona};
use super::{Advisor, ProviderTag};

/// Panel members that argue, in speaking order.
const DEBATERS: [&str; 3] = ["cfo", "vc", "trader"];

const DEBATE_SYSTEM_PROMPT: &str = "You are a helpful financial AI assistant.";

const OPENING_FALLBACK: &str = "I'm analyzing the numbers...";
const REBUTTAL_FALLBACK: &str = "That's ridiculous.";
const CONSENSUS_FALLBACK: &str = "Procedural consensus: Diversify and mitigate risks.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateMessage {
    pub agent: String,
    pub role: String,
    pub icon: String,
    pub color: String,
    pub message: String,
    pub round: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replying_to: Option<String>,
    pub provider: ProviderTag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Debate {
    /// Opening statements first, then rebuttals, each in speaking order.
    pub rounds: Vec<DebateMessage>,
    pub consensus: String,
}

fn debaters() -> Vec<Persona> {
    PERSONAS
        .into_iter()
        .filter(|persona| DEBATERS.contains(&persona.id))
        .collect()
}

fn opening_prompt(persona: &Persona, scenario: &str) -> String {
    format!(
        "You are playing the role of a {name} ({role}).\n\
         Your personality: {outlook}\n\n\
         The user has presented this scenario: \"{scenario}\"\n\n\
         Give your initial, strong opinion on this in 2 short sentences. \
         Be true to your persona.",
        name = persona.name,
        role = persona.role,
        outlook = persona.outlook,
    )
}

fn rebuttal_prompt(persona: &Persona, target: &DebateMessage) -> String {
    format!(
        "You are a {name}.\n\
         The {target_role} just said: \"{said}\".\n\n\
         You completely disagree. Attack their logic based on your {role} perspective.\n\
         Keep it punchy, strictly 1 sentence.",
        name = persona.name,
        target_role = target.role,
        said = target.message,
        role = persona.role,
    )
}

fn consensus_prompt(scenario: &str, openings: &[DebateMessage]) -> String {
    let opinions = openings
        .iter()
        .map(|m| format!("{}: {}", m.role, m.message))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Analyze these opinions on \"{scenario}\":\n{opinions}\n\n\
         Synthesize a balanced, final verdict that acknowledges the risks but provides \
         a clear path forward.\nMax 2 sentences."
    )
}

fn message(
    persona: &Persona,
    round: u8,
    reply: Option<(String, ProviderTag)>,
    fallback: &str,
) -> DebateMessage {
    let (text, provider) = reply.unwrap_or_else(|| (fallback.to_string(), ProviderTag::Fallback));
    DebateMessage {
        agent: persona.name.to_string(),
        role: persona.role.to_string(),
        icon: persona.icon.to_string(),
        color: persona.color.to_string(),
        message: text,
        round,
        replying_to: None,
        provider,
    }
}

impl Advisor {
    /// Plain-text answer from the first provider that says anything.
    async fn speak(&self, prompt: &str) -> Option<(String, ProviderTag)> {
        let options = self.options(None, Duration::ZERO);
        let outcome = self
            .complete(DEBATE_SYSTEM_PROMPT, prompt, options, |text| {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            })
            .await;
        match outcome {
            Ok(reply) => Some(reply),
            Err(err) => {
                tracing::debug!(error = %err, "debate line using fallback");
                None
            }
        }
    }

    /// Sends every prompt concurrently; replies come back in prompt order.
    async fn speak_all(
        self: &Arc<Self>,
        prompts: Vec<String>,
    ) -> Vec<Option<(String, ProviderTag)>> {
        let mut tasks = JoinSet::new();
        let count = prompts.len();
        for (index, prompt) in prompts.into_iter().enumerate() {
            let advisor = Arc::clone(self);
            tasks.spawn(async move { (index, advisor.speak(&prompt).await) });
        }

        let mut replies = vec![None; count];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, reply)) => replies[index] = reply,
                Err(err) => tracing::error!(error = %err, "debate task failed"),
            }
        }
        replies
    }

    /// Two-round debate between the CFO, the VC and the trader.
    ///
    /// Each debater opens, then rebuts the next speaker's opening (the last
    /// one rebuts the first). A consensus is drawn from the openings.
    pub async fn debate(self: &Arc<Self>, scenario: &str) -> Debate {
        let panel = debaters();

        let openings: Vec<DebateMessage> = self
            .speak_all(panel.iter().map(|p| opening_prompt(p, scenario)).collect())
            .await
            .into_iter()
            .zip(&panel)
            .map(|(reply, persona)| message(persona, 1, reply, OPENING_FALLBACK))
            .collect();

        let target = |index: usize| &openings[(index + 1) % openings.len()];
        let rebuttals: Vec<DebateMessage> = self
            .speak_all(
                panel
                    .iter()
                    .enumerate()
                    .map(|(index, persona)| rebuttal_prompt(persona, target(index)))
                    .collect(),
            )
            .await
            .into_iter()
            .zip(panel.iter().enumerate())
            .map(|(reply, (index, persona))| DebateMessage {
                replying_to: Some(target(index).role.clone()),
                ..message(persona, 2, reply, REBUTTAL_FALLBACK)
            })
            .collect();

        let consensus = self
            .speak(&consensus_prompt(scenario, &openings))
            .await
            .map_or_else(|| CONSENSUS_FALLBACK.to_string(), |(text, _)| text);

        Debate {
            rounds: openings.into_iter().chain(rebuttals).collect(),
            consensus,
        }
    }
}

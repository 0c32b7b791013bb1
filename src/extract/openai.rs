//! Chat-completions extractor — the production `Extractor` over any
//! OpenAI-compatible endpoint.
//!
//! Both calls use JSON-object response mode and parse the returned content
//! as a typed payload. Requests carry a hard timeout; a missing API key
//! fails fast without a network call.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{ExtractError, Extractor};
use crate::config::ModelConfig;
use crate::tasks::{MeetingSummary, RawTask};

const EXTRACTION_TEMPERATURE: f64 = 0.3;
const EXTRACTION_MAX_TOKENS: u32 = 2000;
const SUMMARY_TEMPERATURE: f64 = 0.4;
const SUMMARY_MAX_TOKENS: u32 = 1000;

const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a precise task extraction AI. Extract actionable tasks from meeting notes.

EXTRACTION RULES:
1. Extract ONLY actionable tasks (things that need to be done)
2. Ignore general discussion, decisions, or background info
3. For each task, identify:
   - task_name: Clear, concise description (10-50 words)
   - owner: Person responsible (use "Self" if unclear or if it says "I", "me", "we need to")
   - due_date: Deadline as text (e.g., "Today", "Tomorrow", "Friday", "Next Week", "Dec 15", "Needs Review")
   - priority: High / Medium / Low

OUTPUT FORMAT:
Return ONLY valid JSON:
{"tasks": [{"task_name": "string", "owner": "string", "due_date": "string", "priority": "High|Medium|Low"}]}

If no tasks found, return: {"tasks": []}"#;

const SUMMARY_SYSTEM_PROMPT: &str = r#"You are a meeting summarization expert. Generate a crisp meeting summary.

Extract:
1. Summary: 2-3 sentence overview of the meeting
2. Key Decisions: important decisions made
3. Blockers: any obstacles or blockers mentioned
4. Risks: potential risks or concerns
5. Participants: people mentioned in the meeting

Return JSON format:
{"summary": "string", "key_decisions": ["string"], "blockers": ["string"], "risks": ["string"], "participants": ["string"]}"#;

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct TaskPayload {
    #[serde(default)]
    tasks: Vec<RawTask>,
}

// ─── Extractor ────────────────────────────────────────────────────────────────

/// `Extractor` backed by an OpenAI-compatible chat-completions API.
pub struct OpenAiExtractor {
    client: reqwest::Client,
    config: ModelConfig,
}

impl OpenAiExtractor {
    pub fn new(config: ModelConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("build model HTTP client")?;
        Ok(Self { client, config })
    }

    /// One chat-completions round trip, returning the raw message content.
    async fn chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, ExtractError> {
        let api_key = self.config.api_key.as_deref().ok_or(ExtractError::NotConfigured)?;

        let url = format!("{}/chat/completions", self.config.api_base_url);
        let payload = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "response_format": {"type": "json_object"},
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ExtractError::Parse("response carried no choices".to_string()))
    }
}

#[async_trait]
impl Extractor for OpenAiExtractor {
    async fn extract_tasks(&self, meeting_text: &str) -> Result<Vec<RawTask>, ExtractError> {
        let user_prompt = format!(
            "Extract all actionable tasks from this meeting summary:\n\n{meeting_text}\n\nRemember: Return ONLY the JSON object, nothing else."
        );

        let content = self
            .chat(
                EXTRACTION_SYSTEM_PROMPT,
                &user_prompt,
                EXTRACTION_TEMPERATURE,
                EXTRACTION_MAX_TOKENS,
            )
            .await?;

        let tasks = parse_task_payload(&content)?;
        debug!(count = tasks.len(), "model extracted tasks");
        Ok(tasks)
    }

    async fn summarize(&self, meeting_text: &str) -> Result<MeetingSummary, ExtractError> {
        let user_prompt = format!("Summarize this meeting:\n\n{meeting_text}");

        let content = self
            .chat(
                SUMMARY_SYSTEM_PROMPT,
                &user_prompt,
                SUMMARY_TEMPERATURE,
                SUMMARY_MAX_TOKENS,
            )
            .await?;

        parse_summary_payload(&content)
    }
}

// ─── Payload parsing ──────────────────────────────────────────────────────────

fn parse_task_payload(content: &str) -> Result<Vec<RawTask>, ExtractError> {
    let payload: TaskPayload =
        serde_json::from_str(content).map_err(|e| ExtractError::Parse(e.to_string()))?;
    Ok(payload.tasks)
}

fn parse_summary_payload(content: &str) -> Result<MeetingSummary, ExtractError> {
    serde_json::from_str(content).map_err(|e| ExtractError::Parse(e.to_string()))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

//! The model collaborator seam.
//!
//! Semantic extraction is delegated to a chat-completions model behind the
//! `Extractor` trait. Callers must treat every failure as a degraded
//! result (empty task list, placeholder summary) — extraction errors never
//! fail a note.

pub mod openai;

use async_trait::async_trait;

use crate::tasks::{MeetingSummary, RawTask};

/// Failures at the model seam. All of them degrade at the call site.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("model API key is not configured")]
    NotConfigured,
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("model response could not be parsed: {0}")]
    Parse(String),
}

/// Task extraction and summarization over one meeting note.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract actionable tasks from free-text meeting notes.
    async fn extract_tasks(&self, meeting_text: &str) -> Result<Vec<RawTask>, ExtractError>;

    /// Produce a short structured summary of the meeting.
    async fn summarize(&self, meeting_text: &str) -> Result<MeetingSummary, ExtractError>;
}

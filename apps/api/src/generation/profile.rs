//! Profile text generation and summarization over a [`CompletionService`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{
    GENERATE_PROMPT_TEMPLATE, PROFILE_SYSTEM, SUMMARIZE_PROMPT_TEMPLATE,
};
use crate::llm_client::CompletionService;

pub const EMPTY_PROMPT_MESSAGE: &str = "Please enter a prompt for the AI.";

/// Target length of a profile summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }
}

/// Expands a free-form prompt into profile body text.
pub async fn generate_profile(
    prompt: &str,
    llm: &dyn CompletionService,
) -> Result<String, AppError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Validation(EMPTY_PROMPT_MESSAGE.to_string()));
    }

    let request = GENERATE_PROMPT_TEMPLATE.replace("{prompt}", prompt);
    let profile = llm
        .complete(&request, PROFILE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Profile generation failed: {e}")))?;

    info!(chars = profile.len(), "Generated profile text");
    Ok(profile)
}

/// Summarizes existing profile text to the requested length.
pub async fn summarize_profile(
    profile: &str,
    length: SummaryLength,
    llm: &dyn CompletionService,
) -> Result<String, AppError> {
    if profile.trim().is_empty() {
        return Err(AppError::Validation("profile cannot be empty".to_string()));
    }

    let request = SUMMARIZE_PROMPT_TEMPLATE
        .replace("{length}", length.as_str())
        .replace("{profile}", profile.trim());

    llm.complete(&request, PROFILE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Profile summarization failed: {e}")))
}

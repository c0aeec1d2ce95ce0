//! Follow-up question generation for a research description.

use tracing::info;

use super::ReviewError;
use super::list_parse::parse_list_items;
use crate::llm::LlmChat;
use crate::llm::types::CompletionOptions;

const QUESTIONS_TEMPERATURE: f32 = 0.5;
const QUESTIONS_MAX_TOKENS: u32 = 500;
const QUESTIONS_SEED: u64 = 0;

/// Build the prompt asking for clarifying questions about `description`.
#[must_use]
pub fn build_questions_prompt(description: &str) -> String {
    format!(
        "You are an assistant for a medical reviewer conducting a systematic literature review. \
         Based on the following description, generate a list of follow-up questions that will help \
         you better understand the research needs and generate a more accurate PubMed query. \
         The questions should be clear, concise, and aimed at clarifying the research scope. \
         Ask maximum 3 questions, that cannot exceed 30 words each.\n\n\
         Description:\n{description}\nQuestions:"
    )
}

#[must_use]
pub fn questions_options(model: &str) -> CompletionOptions {
    CompletionOptions {
        model: model.to_owned(),
        temperature: QUESTIONS_TEMPERATURE,
        max_tokens: QUESTIONS_MAX_TOKENS,
        seed: Some(QUESTIONS_SEED),
    }
}

/// Ask the model for follow-up questions and split its reply into a list.
///
/// # Errors
///
/// Returns [`ReviewError::EmptyInput`] for a blank description and
/// [`ReviewError::Llm`] when the model call fails.
pub async fn generate_questions(llm: &dyn LlmChat, model: &str, description: &str) -> Result<Vec<String>, ReviewError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ReviewError::EmptyInput("query"));
    }

    let prompt = build_questions_prompt(description);
    let completion = llm.complete(&prompt, &questions_options(model)).await?;
    let questions = parse_list_items(&completion.text);
    info!(count = questions.len(), model, "generated follow-up questions");
    Ok(questions)
}

#[cfg(test)]
#[path = "questions_test.rs"]
mod tests;

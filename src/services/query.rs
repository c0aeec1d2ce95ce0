//! PubMed boolean query synthesis.

use serde_json::{Map, Value};
use tracing::info;

use super::ReviewError;
use crate::llm::LlmChat;
use crate::llm::types::CompletionOptions;

const QUERY_TEMPERATURE: f32 = 0.0;
const QUERY_MAX_TOKENS: u32 = 1000;
const QUERY_SEED: u64 = 0;

/// One-line format example shown to the model.
pub const QUERY_EXAMPLE: &str = "(Physical Activity OR exercise OR physical activity) AND \
     (Type 2 Diabetes Mellitus OR type 2 diabetes OR T2DM) AND (Adult OR middle-aged OR aged)";

/// Build the query-synthesis prompt from a description and question answers.
#[must_use]
pub fn build_query_prompt(description: &str, answers: &Map<String, Value>) -> String {
    let answers_json = Value::Object(answers.clone()).to_string();
    format!(
        "Work as an assistant for a medical reviewer doing a literature review. Using the following \
         description and answers to follow-up questions, please generate a relevant PubMed query for \
         the topic. Don't only use basic keywords, include synonyms.\n\n\
         Description:\n{description}\n\n\
         Please strictly provide a query that can be used in a PubMed search, with AND and OR operators. \
         Limit your answer to the query only as shown in the example.\n\
         Output example and format:\n\n{QUERY_EXAMPLE}\n\n\
         Answers:\n{answers_json}"
    )
}

#[must_use]
pub fn query_options(model: &str) -> CompletionOptions {
    CompletionOptions {
        model: model.to_owned(),
        temperature: QUERY_TEMPERATURE,
        max_tokens: QUERY_MAX_TOKENS,
        seed: Some(QUERY_SEED),
    }
}

/// Ask the model for a PubMed query. The trimmed reply is the query.
///
/// # Errors
///
/// Returns [`ReviewError::EmptyInput`] for a blank description and
/// [`ReviewError::Llm`] when the model call fails.
pub async fn generate_pubmed_query(
    llm: &dyn LlmChat,
    model: &str,
    description: &str,
    answers: &Map<String, Value>,
) -> Result<String, ReviewError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ReviewError::EmptyInput("query"));
    }

    let prompt = build_query_prompt(description, answers);
    let completion = llm.complete(&prompt, &query_options(model)).await?;
    let query = completion.text.trim().to_owned();
    info!(len = query.len(), answers = answers.len(), model, "generated PubMed query");
    Ok(query)
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;

//! Concept extraction and synonym expansion for a PubMed query.
//!
//! Each innermost parenthesized group of the query is one concept. For every
//! concept the model is asked twice: once for a short abstraction label and
//! once for a list of synonyms. Calls run sequentially in concept order.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::ReviewError;
use super::list_parse::parse_synonym_list;
use crate::llm::LlmChat;
use crate::llm::types::CompletionOptions;

const ABSTRACTION_TEMPERATURE: f32 = 0.3;
const ABSTRACTION_MAX_TOKENS: u32 = 10;
const SYNONYMS_TEMPERATURE: f32 = 0.3;
const SYNONYMS_MAX_TOKENS: u32 = 500;
const SYNONYMS_SEED: u64 = 0;

static CONCEPT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^()]+)\)").expect("valid concept regex"));

/// A query concept with its abstraction label and alternative terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynonymGroup {
    pub concept: String,
    pub abstraction: String,
    pub synonyms: Vec<String>,
}

/// Context of the review, shared by every synonym prompt.
#[derive(Debug, Clone, Copy)]
pub struct ReviewContext<'a> {
    pub description: &'a str,
    pub questions: &'a [Value],
    pub answers: &'a Map<String, Value>,
}

/// Every innermost parenthesized group of `query`, in order of appearance.
#[must_use]
pub fn extract_concepts(query: &str) -> Vec<String> {
    CONCEPT_RE
        .captures_iter(query)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|c| !c.is_empty())
        .collect()
}

#[must_use]
pub fn build_abstraction_prompt(concept: &str) -> String {
    format!(
        "Given the following group of related terms, provide a single word or short phrase \
         (maximum 3 words) that best represents the overall concept:\n\n\
         Terms: {concept}\n\n\
         Concept abstraction:"
    )
}

#[must_use]
pub fn build_synonyms_prompt(ctx: &ReviewContext<'_>, concept: &str) -> String {
    let questions = Value::Array(ctx.questions.to_vec());
    let answers = Value::Object(ctx.answers.clone());
    format!(
        "Based on the following information about a medical literature review, generate a list of \
         relevant synonyms for the following concept from the PubMed query. Provide 3-5 synonyms that \
         could be useful for expanding the search.\n\n\
         Description: {description}\n\n\
         Questions: {questions}\n\n\
         Answers: {answers}\n\n\
         Concept: {concept}\n\n\
         Please provide the synonyms as a list of strings. Strictly do not include any other text than the list.\n\n\
         Example: [\"synonym1\", \"synonym2\", \"synonym3\"]",
        description = ctx.description,
    )
}

fn abstraction_options(model: &str) -> CompletionOptions {
    CompletionOptions {
        model: model.to_owned(),
        temperature: ABSTRACTION_TEMPERATURE,
        max_tokens: ABSTRACTION_MAX_TOKENS,
        seed: Some(SYNONYMS_SEED),
    }
}

fn synonyms_options(model: &str) -> CompletionOptions {
    CompletionOptions {
        model: model.to_owned(),
        temperature: SYNONYMS_TEMPERATURE,
        max_tokens: SYNONYMS_MAX_TOKENS,
        seed: Some(SYNONYMS_SEED),
    }
}

/// Expand every concept of `query` into a [`SynonymGroup`].
///
/// A query without parenthesized groups yields an empty list.
///
/// # Errors
///
/// Returns [`ReviewError::EmptyInput`] for a blank query and
/// [`ReviewError::Llm`] when any model call fails.
pub async fn generate_synonyms(
    llm: &dyn LlmChat,
    model: &str,
    ctx: &ReviewContext<'_>,
    query: &str,
) -> Result<Vec<SynonymGroup>, ReviewError> {
    if query.trim().is_empty() {
        return Err(ReviewError::EmptyInput("query"));
    }

    let concepts = extract_concepts(query);
    let mut groups = Vec::with_capacity(concepts.len());
    for concept in concepts {
        let abstraction = llm
            .complete(&build_abstraction_prompt(&concept), &abstraction_options(model))
            .await?
            .text
            .trim()
            .to_owned();

        let reply = llm
            .complete(&build_synonyms_prompt(ctx, &concept), &synonyms_options(model))
            .await?;
        let synonyms = parse_synonym_list(&reply.text);
        debug!(%concept, %abstraction, count = synonyms.len(), "expanded concept");

        groups.push(SynonymGroup { concept, abstraction, synonyms });
    }

    info!(groups = groups.len(), model, "generated synonym groups");
    Ok(groups)
}

#[cfg(test)]
#[path = "synonyms_test.rs"]
mod tests;

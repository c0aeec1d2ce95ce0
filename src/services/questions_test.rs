use super::*;
use crate::llm::types::LlmError;
use crate::state::test_helpers::MockLlm;

#[test]
fn prompt_embeds_description() {
    let prompt = build_questions_prompt("exercise in type 2 diabetes");
    assert!(prompt.contains("Description:\nexercise in type 2 diabetes\nQuestions:"));
    assert!(prompt.contains("Ask maximum 3 questions"));
    assert!(prompt.contains("30 words"));
}

#[test]
fn options_are_fixed() {
    let opts = questions_options("open-mistral-7b");
    assert_eq!(opts.model, "open-mistral-7b");
    assert!((opts.temperature - 0.5).abs() < f32::EPSILON);
    assert_eq!(opts.max_tokens, 500);
    assert_eq!(opts.seed, Some(0));
}

#[tokio::test]
async fn generates_parsed_questions() {
    let llm = MockLlm::new(vec!["1. Which population?\n2. Which outcomes?\n\n3. Which period?"]);
    let questions = generate_questions(&llm, "open-mistral-7b", "  exercise and diabetes  ").await.unwrap();
    assert_eq!(questions, vec!["Which population?", "Which outcomes?", "Which period?"]);

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Description:\nexercise and diabetes\n"));
    assert_eq!(llm.options()[0], questions_options("open-mistral-7b"));
}

#[tokio::test]
async fn blank_description_skips_the_model() {
    let llm = MockLlm::new(vec![]);
    let err = generate_questions(&llm, "m", "   ").await.unwrap_err();
    assert!(matches!(err, ReviewError::EmptyInput("query")));
    assert!(llm.prompts().is_empty());
}

#[tokio::test]
async fn model_failure_is_propagated() {
    let llm = MockLlm::with_results(vec![Err(LlmError::ApiRequest("timeout".into()))]);
    let err = generate_questions(&llm, "m", "topic").await.unwrap_err();
    assert!(matches!(err, ReviewError::Llm(LlmError::ApiRequest(_))));
}

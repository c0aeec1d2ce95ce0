use super::*;
use crate::llm::types::CompletionOptions;

#[test]
fn new_state_uses_config_ttl_for_sessions() {
    let config = AppConfig { token_ttl: std::time::Duration::from_secs(90), ..AppConfig::default() };
    let state = AppState::new(config, None, TaskModels::default());
    assert_eq!(state.sessions.ttl(), std::time::Duration::from_secs(90));
    assert!(state.llm.is_none());
}

#[tokio::test]
async fn clones_share_sessions() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_helpers::test_app_state(tmp.path());
    let token = state.sessions.create_session("reviewer").await;
    assert!(state.clone().sessions.validate_session(&token).await.is_some());
}

#[tokio::test]
async fn mock_llm_replays_and_records() {
    let mock = test_helpers::MockLlm::new(vec!["first"]);
    let options = CompletionOptions { model: "m".into(), temperature: 0.0, max_tokens: 1, seed: None };
    assert_eq!(mock.complete("p1", &options).await.unwrap().text, "first");
    assert_eq!(mock.complete("p2", &options).await.unwrap().text, "");
    assert_eq!(mock.prompts(), vec!["p1", "p2"]);
}

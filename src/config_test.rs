use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_without_environment() {
    let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.port, 8000);
    assert_eq!(config.output_dir, PathBuf::from("static"));
    assert!(config.credentials.is_none());
    assert_eq!(config.token_ttl, Duration::from_secs(30 * 60));
}

#[test]
fn overrides_are_applied() {
    let config = AppConfig::from_lookup(lookup_from(&[
        ("PORT", "9000"),
        ("OUTPUT_DIR", "/var/lib/litreview"),
        ("ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
    ]))
    .unwrap();
    assert_eq!(config.port, 9000);
    assert_eq!(config.output_dir, PathBuf::from("/var/lib/litreview"));
    assert_eq!(config.token_ttl, Duration::from_secs(300));
}

#[test]
fn invalid_port_is_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
}

#[test]
fn zero_or_garbage_ttl_is_rejected() {
    for raw in ["0", "-5", "soon"] {
        let err = AppConfig::from_lookup(lookup_from(&[("ACCESS_TOKEN_EXPIRE_MINUTES", raw)])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ACCESS_TOKEN_EXPIRE_MINUTES", .. }), "{raw}");
    }
}

#[test]
fn clear_text_password_is_hashed() {
    let config =
        AppConfig::from_lookup(lookup_from(&[("AUTH_USERNAME", "reviewer"), ("AUTH_PASSWORD", "hunter2")])).unwrap();
    let creds = config.credentials.unwrap();
    assert_eq!(creds.username, "reviewer");
    assert!(creds.verify("reviewer", "hunter2").is_ok());
}

#[test]
fn digest_takes_precedence_over_password() {
    let digest = Credentials::from_password("x", "from-digest").password_digest_hex();
    let config = AppConfig::from_lookup(lookup_from(&[
        ("AUTH_USERNAME", "reviewer"),
        ("AUTH_PASSWORD_SHA256", digest.as_str()),
        ("AUTH_PASSWORD", "from-clear"),
    ]))
    .unwrap();
    let creds = config.credentials.unwrap();
    assert!(creds.verify("reviewer", "from-digest").is_ok());
    assert!(creds.verify("reviewer", "from-clear").is_err());
}

#[test]
fn malformed_digest_is_rejected_without_echo() {
    let err = AppConfig::from_lookup(lookup_from(&[("AUTH_USERNAME", "reviewer"), ("AUTH_PASSWORD_SHA256", "abc")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "AUTH_PASSWORD_SHA256", .. }));
    assert!(!err.to_string().contains("abc"));
}

#[test]
fn username_without_password_is_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[("AUTH_USERNAME", "reviewer")])).unwrap_err();
    assert!(matches!(err, ConfigError::MissingPassword));
}

use crate::*;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

// ========== Config ==========

#[test]
fn test_default_config() {
    let cfg = CantiConfig::default();
    assert_eq!(cfg.upstream.model, "gpt-3.5-turbo");
    assert_eq!(cfg.upstream.base_url, "https://api.openai.com");
    assert!(cfg.upstream.request_timeout_secs.is_none());
    assert_eq!(cfg.bind_addr(), "0.0.0.0:3000");
}

#[test]
fn test_env_overlay() {
    let cfg = CantiConfig::from_lookup(lookup(&[
        ("OPENAI_API_KEY", "sk-test"),
        ("OPENAI_BASE_URL", "http://localhost:9999/"),
        ("CANTI_MODEL", "gpt-4o-mini"),
        ("CANTI_PORT", "8081"),
        ("CANTI_REQUEST_TIMEOUT_SECS", "30"),
        ("CANTI_LOG_FORMAT", "json"),
    ]))
    .unwrap();
    assert_eq!(cfg.upstream.api_key, "sk-test");
    assert_eq!(cfg.upstream.base_url, "http://localhost:9999");
    assert_eq!(cfg.upstream.model, "gpt-4o-mini");
    assert_eq!(cfg.upstream.request_timeout_secs, Some(30));
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.logging.format, "json");
}

#[test]
fn test_missing_api_key_is_not_an_error() {
    let cfg = CantiConfig::from_lookup(lookup(&[])).unwrap();
    assert!(cfg.upstream.api_key.is_empty());
}

#[test]
fn test_empty_values_ignored() {
    let cfg = CantiConfig::from_lookup(lookup(&[("CANTI_MODEL", "  ")])).unwrap();
    assert_eq!(cfg.upstream.model, "gpt-3.5-turbo");
}

#[test]
fn test_invalid_port() {
    let err = CantiConfig::from_lookup(lookup(&[("CANTI_PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, CantiError::Config(_)));
    assert!(err.to_string().contains("CANTI_PORT"));
}

#[test]
fn test_api_key_redacted() {
    let cfg = CantiConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-secret")])).unwrap();
    let debug = format!("{:?}", cfg);
    assert!(!debug.contains("sk-secret"));
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(!json.contains("sk-secret"));
}

// ========== Errors ==========

#[test]
fn test_error_display() {
    let err = CantiError::InvalidRequest("sessionId must be an integer".into());
    assert_eq!(err.to_string(), "Invalid request: sessionId must be an integer");
    assert_eq!(CantiError::Upstream("timeout".into()).to_string(), "Upstream failure: timeout");
}

#[test]
fn test_error_from_serde() {
    let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
    let err: CantiError = parse.unwrap_err().into();
    assert!(matches!(err, CantiError::Serialization(_)));
}

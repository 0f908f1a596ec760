use mw_domain::config::{Config, ConfigSeverity};

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
}

#[test]
fn explicit_zero_host_parses() {
    let toml_str = r#"
[server]
host = "0.0.0.0"
port = 3210
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
}

#[test]
fn default_cors_allows_only_localhost() {
    let config = Config::default();
    assert!(!config.server.cors.allowed_origins.is_empty());
    assert!(config.server.cors.allowed_origins.contains(&"http://localhost:*".to_string()));
    assert!(config.server.cors.allowed_origins.contains(&"http://127.0.0.1:*".to_string()));
}

#[test]
fn default_retrieval_depth_is_three() {
    let config = Config::default();
    assert_eq!(config.knowledge.top_k, 3);
}

#[test]
fn empty_config_validates_without_errors() {
    // Defaults are dev-friendly: escalation contacts missing only matters
    // once escalation is enabled with real numbers at deploy time — the
    // default config reports it as an error because enabled defaults true.
    let config = Config::default();
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|i| i.field == "escalation.emergency_contact"));
}

#[test]
fn validate_flags_zero_top_k_as_error() {
    let toml_str = r#"
[knowledge]
top_k = 0
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|i| i.field == "knowledge.top_k" && i.severity == ConfigSeverity::Error));
}

#[test]
fn validate_flags_out_of_range_temperature() {
    let toml_str = r#"
[llm]
temperature = 3.5
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|i| i.field == "llm.temperature" && i.severity == ConfigSeverity::Error));
}

#[test]
fn disabled_escalation_is_a_warning_not_an_error() {
    let toml_str = r#"
[escalation]
enabled = false
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    let issue = issues
        .iter()
        .find(|i| i.field == "escalation.enabled")
        .expect("disabled escalation should surface");
    assert_eq!(issue.severity, ConfigSeverity::Warning);
}

#[test]
fn fully_populated_escalation_passes_validation() {
    let toml_str = r#"
[escalation]
enabled = true
from_number = "+15550100"
emergency_contact = "+15550199"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert!(!issues.iter().any(|i| i.severity == ConfigSeverity::Error));
}

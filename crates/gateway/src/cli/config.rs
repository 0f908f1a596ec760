//! `mindwell config` — validate and show the resolved configuration.

use mw_domain::config::{Config, ConfigSeverity};

/// Validate the config and print every issue. Returns `false` when any
/// issue is an error (the caller exits non-zero).
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("{config_path}: OK");
        return true;
    }

    for issue in &issues {
        println!("{issue}");
    }

    !issues.iter().any(|i| i.severity == ConfigSeverity::Error)
}

/// Dump the resolved configuration (defaults applied) as TOML.
pub fn show(config: &Config) {
    match toml::to_string_pretty(config) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("failed to render config: {e}"),
    }
}

// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use clap::Parser;

use devcommit::cli::Cli;
use devcommit::config::{Config, Provider};
use devcommit::domain::{CommitMode, CommitStyle};
use devcommit::error::Error;

// ─── Default values ──────────────────────────────────────────────────────────

#[test]
fn default_config_values() {
    let config = Config::default();
    assert_eq!(config.provider, Provider::Gemini);
    assert_eq!(config.model_name(), "gemini-2.0-flash");
    assert!(config.api_key.is_none());
    assert_eq!(config.locale, "en-US");
    assert_eq!(config.max_candidates, 1);
    assert_eq!(config.commit_type, CommitStyle::General);
    assert_eq!(config.commit_mode, CommitMode::Auto);
    assert!(config.exclude_files.is_empty());
    assert_eq!(config.max_diff_chars, 24_000);
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.timeout_secs, 300);
    assert!(config.validate().is_ok());
}

// ─── TOML deserialization ────────────────────────────────────────────────────

#[test]
fn load_from_valid_toml() {
    let toml_str = r#"
provider = "openai"
model = "gpt-4o"
locale = "de-DE"
max_candidates = 3
commit_type = "conventional"
commit_mode = "directory"
exclude_files = ["*.lock", "dist/**"]
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.provider, Provider::OpenAI);
    assert_eq!(config.model_name(), "gpt-4o");
    assert_eq!(config.locale, "de-DE");
    assert_eq!(config.max_candidates, 3);
    assert_eq!(config.commit_type, CommitStyle::Conventional);
    assert_eq!(config.commit_mode, CommitMode::Directory);
    assert_eq!(config.exclude_files, vec!["*.lock", "dist/**"]);
}

#[test]
fn exclude_files_accepts_comma_separated_string() {
    let config: Config = toml::from_str(r#"exclude_files = "*.lock, *.min.js,,""#).unwrap();
    assert_eq!(config.exclude_files, vec!["*.lock", "*.min.js"]);
}

#[test]
fn empty_toml_uses_all_defaults() {
    let config: Config = toml::from_str("").unwrap();
    let default = Config::default();
    assert_eq!(config.provider, default.provider);
    assert_eq!(config.model, default.model);
    assert_eq!(config.max_diff_chars, default.max_diff_chars);
}

#[test]
fn unknown_commit_mode_is_rejected() {
    let result: std::result::Result<Config, _> = toml::from_str(r#"commit_mode = "sometimes""#);
    assert!(result.is_err());
}

#[test]
fn invalid_toml_returns_error() {
    let result: std::result::Result<Config, _> = toml::from_str("provider = [invalid");
    assert!(result.is_err(), "invalid TOML should return an error");
}

// ─── Provider ────────────────────────────────────────────────────────────────

#[test]
fn provider_display_format() {
    assert_eq!(format!("{}", Provider::Gemini), "gemini");
    assert_eq!(format!("{}", Provider::OpenAI), "openai");
    assert_eq!(format!("{}", Provider::Groq), "groq");
    assert_eq!(format!("{}", Provider::Anthropic), "anthropic");
    assert_eq!(format!("{}", Provider::Ollama), "ollama");
}

#[test]
fn base_url_override_drops_trailing_slash() {
    let config = Config {
        provider: Provider::OpenAI,
        base_url: Some("http://localhost:8080/v1/".into()),
        ..Config::default()
    };
    assert_eq!(config.endpoint(), "http://localhost:8080/v1");

    let default = Config {
        provider: Provider::Groq,
        ..Config::default()
    };
    assert_eq!(default.endpoint(), "https://api.groq.com/openai/v1");
}

// ─── Validation ──────────────────────────────────────────────────────────────

fn assert_config_error(config: Config, needle: &str) {
    match config.validate() {
        Err(Error::Config(message)) => assert!(message.contains(needle), "message: {message}"),
        other => panic!("expected config error mentioning {needle}, got {other:?}"),
    }
}

#[test]
fn out_of_range_values_are_rejected() {
    assert_config_error(
        Config {
            max_candidates: 0,
            ..Config::default()
        },
        "max_candidates",
    );
    assert_config_error(
        Config {
            max_attempts: 11,
            ..Config::default()
        },
        "max_attempts",
    );
    assert_config_error(
        Config {
            temperature: 2.5,
            ..Config::default()
        },
        "temperature",
    );
    assert_config_error(
        Config {
            locale: "  ".into(),
            ..Config::default()
        },
        "locale",
    );
}

#[test]
fn non_http_base_url_is_rejected() {
    assert_config_error(
        Config {
            base_url: Some("ftp://example.com".into()),
            ..Config::default()
        },
        "base_url",
    );
}

// ─── Command-line layer ──────────────────────────────────────────────────────

#[test]
fn cli_options_override_file_values() {
    let mut config: Config = toml::from_str(
        r#"
max_candidates = 2
locale = "fr-FR"
commit_type = "gitmoji"
exclude_files = ["*.lock"]
"#,
    )
    .unwrap();
    let cli = Cli::try_parse_from([
        "devcommit",
        "-g",
        "5",
        "-l",
        "es-ES",
        "-t",
        "conventional",
        "-e",
        "*.lock,*.snap",
    ])
    .unwrap();

    config.apply_cli(&cli);

    assert_eq!(config.max_candidates, 5);
    assert_eq!(config.locale, "es-ES");
    assert_eq!(config.commit_type, CommitStyle::Conventional);
    assert_eq!(config.exclude_files, vec!["*.lock", "*.snap"]);
}

#[test]
fn generation_options_follow_config() {
    let config = Config {
        max_candidates: 4,
        locale: "ja-JP".into(),
        commit_type: CommitStyle::Gitmoji,
        ..Config::default()
    };
    let options = config.generation_options();
    assert_eq!(options.count, 4);
    assert_eq!(options.locale, "ja-JP");
    assert_eq!(options.style, CommitStyle::Gitmoji);
    assert_eq!(options.model, "gemini-2.0-flash");
}

#[test]
fn redacted_config_hides_the_key() {
    let config = Config {
        api_key: Some("sk-secret".into()),
        ..Config::default()
    };
    let shown = toml::to_string_pretty(&config.redacted()).unwrap();
    assert!(!shown.contains("sk-secret"));
    assert!(shown.contains("********"));
}

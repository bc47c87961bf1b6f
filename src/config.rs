// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::domain::{CommitMode, CommitStyle, GenerationOptions};
use crate::error::{Error, Result};

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    #[value(name = "openai")]
    #[serde(rename = "openai")]
    OpenAI,
    Groq,
    Anthropic,
    Ollama,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.0-flash",
            Self::OpenAI => "gpt-4o-mini",
            Self::Groq => "llama-3.3-70b-versatile",
            Self::Anthropic => "claude-3-haiku-20240307",
            Self::Ollama => "llama3",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::Ollama => "http://localhost:11434",
        }
    }

    /// Provider-specific environment variable holding the API key.
    pub fn key_env_var(&self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Groq => Some("GROQ_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Ollama => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAI => write!(f, "openai"),
            Self::Groq => write!(f, "groq"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: Provider,

    /// Model name; each provider has its own default
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Override the provider endpoint (OpenAI-compatible servers, proxies)
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_locale")]
    pub locale: String,

    /// Number of candidate messages requested per commit
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    #[serde(default)]
    pub commit_type: CommitStyle,

    #[serde(default)]
    pub commit_mode: CommitMode,

    /// Glob patterns removed from every diff (list or comma-separated string)
    #[serde(default, deserialize_with = "string_or_list")]
    pub exclude_files: Vec<String>,

    /// Diff characters sent per request; larger diffs are summarized
    #[serde(default = "default_max_diff_chars")]
    pub max_diff_chars: usize,

    /// Generation attempts per commit, regenerations included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Request timeout in seconds (default 300)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// LLM temperature (0.0-2.0, default 0.7)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_locale() -> String {
    "en-US".into()
}
fn default_max_candidates() -> usize {
    1
}
fn default_max_diff_chars() -> usize {
    24_000
}
fn default_max_attempts() -> usize {
    3
}
fn default_timeout_secs() -> u64 {
    300
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    let patterns = match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) => s.split(',').map(str::to_string).collect(),
        StringOrList::Many(v) => v,
    };

    Ok(patterns
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            api_key: None,
            base_url: None,
            locale: default_locale(),
            max_candidates: default_max_candidates(),
            commit_type: CommitStyle::default(),
            commit_mode: CommitMode::default(),
            exclude_files: Vec::new(),
            max_diff_chars: default_max_diff_chars(),
            max_attempts: default_max_attempts(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Config {
    /// Load with priority: CLI options > config file > ENV > defaults.
    ///
    /// The commit-mode flag is not part of this chain; it is resolved
    /// against `commit_mode` by the strategy resolver.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            // DEVCOMMIT_MODEL, DEVCOMMIT_EXCLUDE_FILES, ...
            .merge(Env::prefixed("DEVCOMMIT_"));

        for path in Self::file_layers(cli) {
            figment = figment.merge(Toml::file(&path));
        }

        let mut config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        if config.api_key.is_none() {
            config.api_key = config
                .provider
                .key_env_var()
                .and_then(|var| std::env::var(var).ok())
                .filter(|key| !key.trim().is_empty());
        }

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Config files in merge order; an explicit `--config` replaces lookup.
    fn file_layers(cli: &Cli) -> Vec<PathBuf> {
        if let Some(ref explicit) = cli.config {
            return vec![explicit.clone()];
        }

        let mut layers = Vec::new();
        if let Some(path) = Self::config_path() {
            if path.exists() {
                layers.push(path);
            }
        }
        // Project-level config (.devcommit.toml in the working directory)
        if let Ok(cwd) = std::env::current_dir() {
            let project_config = cwd.join(".devcommit.toml");
            if project_config.exists() {
                layers.push(project_config);
            }
        }
        layers
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "devcommit").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(provider) = cli.provider {
            if provider != self.provider {
                // A key configured for another provider is useless here
                self.api_key = provider.key_env_var().and_then(|var| std::env::var(var).ok());
            }
            self.provider = provider;
        }
        if let Some(ref m) = cli.model {
            self.model = Some(m.clone());
        }
        if let Some(ref locale) = cli.locale {
            self.locale = locale.clone();
        }
        if let Some(count) = cli.generate {
            self.max_candidates = usize::from(count);
        }
        if let Some(style) = cli.commit_type {
            self.commit_type = style;
        }
        for pattern in &cli.exclude_files {
            if !self.exclude_files.contains(pattern) {
                self.exclude_files.push(pattern.clone());
            }
        }
    }

    pub fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn endpoint(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            locale: self.locale.clone(),
            style: self.commit_type,
            count: self.max_candidates,
            model: self.model_name().to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.max_candidates) {
            return Err(Error::Config(format!(
                "max_candidates must be 1–10, got {}",
                self.max_candidates
            )));
        }

        if !(1..=10).contains(&self.max_attempts) {
            return Err(Error::Config(format!(
                "max_attempts must be 1–10, got {}",
                self.max_attempts
            )));
        }

        if !(1_000..=200_000).contains(&self.max_diff_chars) {
            return Err(Error::Config(format!(
                "max_diff_chars must be 1000–200000, got {}",
                self.max_diff_chars
            )));
        }

        if !(1..=3600).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "timeout_secs must be 1–3600, got {}",
                self.timeout_secs
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be 0.0–2.0, got {}",
                self.temperature
            )));
        }

        if self.locale.trim().is_empty() {
            return Err(Error::Config("locale cannot be empty".into()));
        }

        let endpoint = url::Url::parse(self.endpoint())
            .map_err(|e| Error::Config(format!("base_url '{}' is invalid: {e}", self.endpoint())))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.endpoint()
            )));
        }

        Ok(())
    }

    /// Copy suitable for display: the API key is masked.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }

    /// Create default config file with secure permissions
    pub fn create_default() -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        if path.exists() {
            return Err(Error::Config(format!(
                "{} already exists; edit it instead",
                path.display()
            )));
        }

        let content = r#"# devcommit configuration
#
# Precedence: command-line options > this file > DEVCOMMIT_* environment > defaults

# Generation service: gemini, openai, groq, anthropic, ollama
provider = "gemini"

# Model name (defaults per provider when unset)
# model = "gemini-2.0-flash"

# API key (or set GEMINI_API_KEY / OPENAI_API_KEY / GROQ_API_KEY / ANTHROPIC_API_KEY)
# api_key = ""

# Language of the generated messages
locale = "en-US"

# Candidate messages to generate per commit
max_candidates = 1

# Message style: general, conventional, gitmoji
commit_type = "general"

# auto: ask when changes span several directories
# directory: one commit per top-level directory
# global: a single commit for everything
commit_mode = "auto"

# Glob patterns left out of commits and prompts
exclude_files = []

# Generation attempts per commit, regenerations included
max_attempts = 3
"#;

        fs::write(&path, content)?;

        // Set secure permissions (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}

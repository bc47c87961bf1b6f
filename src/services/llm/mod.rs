// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;

use crate::config::{Config, Provider};
use crate::error::{Error, Result};

/// A text-generation service.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one request and return the raw completion text.
    async fn generate(&self, system: &str, prompt: &str, cancel: CancellationToken)
    -> Result<String>;

    fn name(&self) -> &str;
}

pub fn create_provider(config: &Config) -> Result<Box<dyn LlmProvider>> {
    match config.provider {
        Provider::Gemini => Ok(Box::new(gemini::GeminiProvider::new(
            config,
            require_key(config)?,
        ))),
        Provider::OpenAI | Provider::Groq => Ok(Box::new(openai::OpenAiProvider::new(
            config,
            require_key(config)?,
        ))),
        Provider::Anthropic => Ok(Box::new(anthropic::AnthropicProvider::new(
            config,
            require_key(config)?,
        ))),
        Provider::Ollama => Ok(Box::new(ollama::OllamaProvider::new(config))),
    }
}

fn require_key(config: &Config) -> Result<SecretString> {
    match config.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(SecretString::from(key.to_string())),
        _ => {
            let hint = config
                .provider
                .key_env_var()
                .map(|var| format!("set {var} or "))
                .unwrap_or_default();
            Err(Error::Config(format!(
                "{} requires an API key; {hint}add api_key to the config file",
                config.provider
            )))
        }
    }
}

pub(crate) fn http_client(config: &Config) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Send `request`, racing it against `cancel`, and decode the JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
    cancel: &CancellationToken,
) -> Result<T> {
    let exchange = async {
        let response = request.send().await.map_err(|e| request_error(provider, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(provider, status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::GenerationUnavailable {
                provider: provider.into(),
                message: format!("malformed response: {e}"),
            })
    };

    tokio::select! {
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = exchange => result,
    }
}

fn request_error(provider: &str, e: &reqwest::Error) -> Error {
    let message = if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("cannot connect ({e})")
    } else {
        e.to_string()
    };
    Error::GenerationUnavailable {
        provider: provider.into(),
        message,
    }
}

/// Credential and rate-limit rejections are quota errors; anything else
/// means the service is unavailable.
pub(crate) fn status_error(provider: &str, status: StatusCode, body: &str) -> Error {
    let body: String = body.trim().chars().take(300).collect();
    let message = format!("HTTP {status}: {body}");
    debug!(provider, %status, "generation request rejected");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            Error::GenerationQuota {
                provider: provider.into(),
                message,
            }
        }
        _ => Error::GenerationUnavailable {
            provider: provider.into(),
            message,
        },
    }
}

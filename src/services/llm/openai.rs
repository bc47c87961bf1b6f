// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{LlmProvider, http_client, send_json};
use crate::config::Config;
use crate::error::Result;

/// Any OpenAI-compatible chat completions endpoint (OpenAI, Groq, proxies).
pub struct OpenAiProvider {
    client: Client,
    name: String,
    base_url: String,
    model: String,
    api_key: SecretString,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: &Config, api_key: SecretString) -> Self {
        Self {
            client: http_client(config),
            name: config.provider.to_string(),
            base_url: config.endpoint().to_string(),
            model: config.model_name().to_string(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        cancel: CancellationToken,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&ChatRequest {
                model: &self.model,
                messages: vec![
                    Message {
                        role: "system",
                        content: system,
                    },
                    Message {
                        role: "user",
                        content: prompt,
                    },
                ],
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                stream: false,
            });

        let response: ChatResponse = send_json(&self.name, request, &cancel).await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

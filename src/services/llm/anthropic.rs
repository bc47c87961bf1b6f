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

const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

impl AnthropicProvider {
    pub fn new(config: &Config, api_key: SecretString) -> Self {
        Self {
            client: http_client(config),
            base_url: config.endpoint().to_string(),
            model: config.model_name().to_string(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        cancel: CancellationToken,
    ) -> Result<String> {
        let url = format!("{}/messages", self.base_url);

        let request = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&MessagesRequest {
                model: &self.model,
                system,
                messages: vec![Message {
                    role: "user",
                    content: prompt,
                }],
                // Anthropic caps temperature at 1.0
                temperature: self.temperature.min(1.0),
                max_tokens: self.max_tokens,
            });

        let response: MessagesResponse = send_json("anthropic", request, &cancel).await?;

        let text: String = response
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect();

        Ok(text.trim().to_string())
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

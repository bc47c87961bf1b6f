// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{LlmProvider, http_client, send_json};
use crate::config::Config;
use crate::error::Result;

pub struct OllamaProvider {
    client: Client,
    host: String,
    model: String,
    temperature: f32,
    num_predict: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            client: http_client(config),
            host: config.endpoint().to_string(),
            model: config.model_name().to_string(),
            temperature: config.temperature,
            num_predict: config.max_tokens,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        cancel: CancellationToken,
    ) -> Result<String> {
        let url = format!("{}/api/generate", self.host);

        let request = self.client.post(&url).json(&GenerateRequest {
            model: &self.model,
            system,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.num_predict,
            },
        });

        let response: GenerateResponse = send_json("ollama", request, &cancel).await?;
        Ok(response.response.trim().to_string())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

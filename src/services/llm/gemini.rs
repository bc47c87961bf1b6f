// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{LlmProvider, http_client, send_json};
use crate::config::Config;
use crate::error::Result;

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiProvider {
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
impl LlmProvider for GeminiProvider {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        cancel: CancellationToken,
    ) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&GenerateContentRequest {
                system_instruction: Content {
                    role: None,
                    parts: vec![Part { text: system }],
                },
                contents: vec![Content {
                    role: Some("user"),
                    parts: vec![Part { text: prompt }],
                }],
                generation_config: GenerationConfig {
                    temperature: self.temperature,
                    max_output_tokens: self.max_tokens,
                    top_p: 0.9,
                    top_k: 40,
                },
            });

        let response: GenerateContentResponse = send_json("gemini", request, &cancel).await?;

        // blocked or empty generations come back without content
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        Ok(text.trim().to_string())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// Atelier LLM Bridge
//
// One client for all text-completion providers. OpenAI and DeepSeek speak
// the same /chat/completions dialect; Anthropic gets its own payload shape.
// Provider is picked per request, falling back to the configured default.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;
use std::str::FromStr;
use tracing::{info, warn};

use crate::config::{LlmSettings, ANTHROPIC_BASE_URL, DEEPSEEK_BASE_URL, OPENAI_BASE_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    DeepSeek,
    Anthropic,
}

impl Provider {
    fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4",
            Provider::DeepSeek => "deepseek-chat",
            Provider::Anthropic => "claude-3-haiku-20240307",
        }
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "deepseek" => Ok(Provider::DeepSeek),
            "anthropic" => Ok(Provider::Anthropic),
            other => bail!("unsupported LLM provider: {}", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 2000,
            temperature: 0.7,
        }
    }
}

impl CompletionOptions {
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

pub struct LlmClient {
    client: reqwest::Client,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(settings: &LlmSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings: settings.clone(),
        }
    }

    /// Complete a prompt with the given provider, or the configured default.
    pub async fn complete(
        &self,
        prompt: &str,
        provider: Option<Provider>,
        options: &CompletionOptions,
    ) -> Result<String> {
        let provider = match provider {
            Some(p) => p,
            None => self.settings.default_provider.parse()?,
        };

        info!(
            "[LLM] Completing via {:?} ({} chars of prompt)",
            provider,
            prompt.len()
        );

        match provider {
            Provider::OpenAi => {
                let key = self
                    .settings
                    .openai_key
                    .as_deref()
                    .ok_or_else(|| anyhow!("OpenAI API key not configured"))?;
                self.chat_completions(OPENAI_BASE_URL, key, provider, prompt, options)
                    .await
            }
            Provider::DeepSeek => {
                let key = self
                    .settings
                    .deepseek_key
                    .as_deref()
                    .ok_or_else(|| anyhow!("DeepSeek API key not configured"))?;
                self.chat_completions(DEEPSEEK_BASE_URL, key, provider, prompt, options)
                    .await
            }
            Provider::Anthropic => {
                let key = self
                    .settings
                    .anthropic_key
                    .as_deref()
                    .ok_or_else(|| anyhow!("Anthropic API key not configured"))?;
                self.anthropic_messages(key, prompt, options).await
            }
        }
    }

    async fn chat_completions(
        &self,
        base_url: &str,
        api_key: &str,
        provider: Provider,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let model = options
            .model
            .as_deref()
            .unwrap_or_else(|| provider.default_model());

        let payload = json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": options.max_tokens,
            "temperature": options.temperature,
        });

        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .context("LLM request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            warn!("[LLM] Backend returned {}", status);
            bail!("LLM backend error: {}", status);
        }

        let body: serde_json::Value = resp.json().await.context("Decoding LLM response")?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("LLM response had no message content"))?;
        Ok(content.to_string())
    }

    async fn anthropic_messages(
        &self,
        api_key: &str,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let model = options
            .model
            .as_deref()
            .unwrap_or_else(|| Provider::Anthropic.default_model());

        let payload = json!({
            "model": model,
            "max_tokens": options.max_tokens,
            "temperature": options.temperature,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let endpoint = format!("{}/v1/messages", ANTHROPIC_BASE_URL);
        let resp = self
            .client
            .post(&endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&payload)
            .send()
            .await
            .context("LLM request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            warn!("[LLM] Backend returned {}", status);
            bail!("LLM backend error: {}", status);
        }

        let body: serde_json::Value = resp.json().await.context("Decoding LLM response")?;
        let content = body["content"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow!("LLM response had no text content"))?;
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parsing_is_case_insensitive() {
        assert_eq!("DeepSeek".parse::<Provider>().unwrap(), Provider::DeepSeek);
        assert_eq!("OPENAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert!("mistral".parse::<Provider>().is_err());
    }
}

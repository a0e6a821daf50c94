//! OpenAI-compatible Chat Completions client.
//!
//! Implements [`CompletionClient`] against `/v1/chat/completions` with a
//! single non-streaming request per call. There is no retry and no client
//! side timeout; failures are returned as-is.

use anyhow::{Context, anyhow};

use super::provider::AuthStyle;
use super::{CompletionClient, LlmSettings, Message};

/// Client for the Chat Completions API.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("base_url", &self.settings.base_url)
            .field("model", &self.settings.model)
            .field("provider", &self.settings.provider)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionsClient {
    /// Create a new client with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn request_body(&self, system_instruction: &str, messages: &[Message]) -> serde_json::Value {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(serde_json::json!({
            "role": "system",
            "content": system_instruction,
        }));
        wire.extend(messages.iter().map(|m| {
            serde_json::json!({
                "role": m.role.as_str(),
                "content": m.content,
            })
        }));

        serde_json::json!({
            "model": self.settings.model,
            "stream": false,
            "messages": wire,
        })
    }
}

#[async_trait::async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(
        &self,
        system_instruction: &str,
        messages: &[Message],
    ) -> anyhow::Result<String> {
        let url = self.settings.provider.build_chat_url(&self.settings.base_url);
        let body = self.request_body(system_instruction, messages);

        let mut rb = self.http.post(&url).json(&body);
        if let Some(key) = &self.settings.api_key {
            rb = match self.settings.provider.auth_style() {
                AuthStyle::Bearer => rb.bearer_auth(key),
                AuthStyle::ApiKeyHeader => rb.header("api-key", key),
            };
        }

        tracing::debug!(
            url = %url,
            model = %self.settings.model,
            message_count = messages.len(),
            "Sending chat completion request"
        );

        let resp = rb
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("completion API returned {status}: {text}"));
        }

        let v: serde_json::Value = resp
            .json()
            .await
            .context("completion API returned invalid JSON")?;

        extract_reply(&v)
    }
}

/// Pull the assistant text out of a chat completion response.
fn extract_reply(v: &serde_json::Value) -> anyhow::Result<String> {
    v["choices"][0]["message"]["content"]
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| anyhow!("malformed completion response: missing choices[0].message.content"))
}

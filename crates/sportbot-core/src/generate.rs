//! Text-generation service adapter.
//!
//! Narrow capability boundary: prompt in, text out, bounded latency.
//! The adapter fails closed: any transport or API error degrades to a
//! fixed apology string so committed database effects of the surrounding
//! handler are never rolled back by a generation failure.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::{Error, Result};

/// Fixed fail-closed reply when the generation service is unavailable.
pub const FALLBACK_REPLY: &str =
    "Извините, возникла проблема при обработке вашего запроса. Пожалуйста, попробуйте позже.";

/// A completion capability with bounded latency.
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt` with optional system context. Implementations
    /// degrade to a fallback string instead of surfacing errors.
    fn complete(&self, prompt: &str, system: Option<&str>)
    -> impl Future<Output = String> + Send;
}

impl<T: TextGenerator> TextGenerator for std::sync::Arc<T> {
    fn complete(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> impl Future<Output = String> + Send {
        (**self).complete(prompt, system)
    }
}

/// Chat-completions client for a Mistral-compatible endpoint.
pub struct MistralClient {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl MistralClient {
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Generation(e.to_string()))?;
        Ok(Self { client, config })
    }

    async fn try_complete(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt.to_string(),
        });

        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Generation(format!(
                "completion endpoint returned {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Generation("no choices in completion response".to_string()))
    }
}

impl TextGenerator for MistralClient {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> String {
        match self.try_complete(prompt, system).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "text generation failed, using fallback");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

/// Canned generator for tests and offline runs. Counts calls so tests can
/// assert the service was not contacted.
pub struct StaticGenerator {
    reply: String,
    calls: AtomicUsize,
}

impl StaticGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many completions were requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextGenerator for StaticGenerator {
    async fn complete(&self, _prompt: &str, _system: Option<&str>) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

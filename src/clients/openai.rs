use async_trait::async_trait;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use openai::Credentials;
use secrecy::ExposeSecret;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::prompt::GenerationPrompt;
use crate::services::generation::TextGenerator;

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiClient {
    creds: Credentials,
    model: String,
    debug_raw: bool,
}

impl OpenAiClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .generation_api_key
            .as_ref()
            .ok_or_else(|| AppError::Config("Missing GENERATION_API_KEY".into()))?;
        Ok(Self {
            creds: Credentials::new(
                api_key.expose_secret().clone(),
                config.generation_base_url.clone(),
            ),
            model: config.generation_model.clone(),
            debug_raw: config.debug_generation_raw,
        })
    }

    pub async fn complete(&self, prompt: &GenerationPrompt) -> Result<String> {
        if self.debug_raw {
            debug_log_preview(&prompt.system, &prompt.user);
        }
        let mut messages = Vec::with_capacity(2);
        if !prompt.system.trim().is_empty() {
            messages.push(message(ChatCompletionMessageRole::System, &prompt.system));
        }
        messages.push(message(ChatCompletionMessageRole::User, &prompt.user));

        let completion_res = ChatCompletion::builder(&self.model, messages)
            .temperature(prompt.temperature)
            .max_tokens(prompt.max_tokens)
            .credentials(self.creds.clone())
            .create()
            .await;

        match completion_res {
            Ok(resp) => {
                let assistant = resp
                    .choices
                    .first()
                    .and_then(|c| c.message.content.as_ref())
                    .map(|c| c.to_string())
                    .unwrap_or_default();
                if self.debug_raw {
                    debug!(
                        reply.len = assistant.len(),
                        reply.preview = %preview(&assistant),
                        "generation reply"
                    );
                }
                Ok(assistant)
            }
            Err(e) => {
                error!(model = %self.model, error = %e, "generation request failed");
                Err(AppError::Upstream(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<String> {
        self.complete(prompt).await
    }
}

fn message(role: ChatCompletionMessageRole, content: &str) -> ChatCompletionMessage {
    ChatCompletionMessage {
        role,
        content: Some(content.to_string()),
        name: None,
        function_call: None,
        tool_calls: None,
        tool_call_id: None,
    }
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}

fn debug_log_preview(system: &str, user: &str) {
    debug!(
        system.len = system.len(),
        user.len = user.len(),
        system.preview = %preview(system),
        user.preview = %preview(user),
        "generation prompt"
    );
}

use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::config::ChatConfig;
use super::error::LlmError;
use super::json::extract_json_object;

/// A chat model that answers with a single JSON object.
#[derive(Clone)]
pub struct ChatModel {
    client: Client,
    config: ChatConfig,
}

impl std::fmt::Debug for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatModel")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChatModel {
    pub fn new(config: ChatConfig) -> Self {
        Self::with_client(Client::default(), config)
    }

    pub fn with_client(client: Client, config: ChatConfig) -> Self {
        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends one system + user exchange and returns the reply's raw text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)]);
        let options = ChatOptions::default().with_temperature(self.config.temperature);

        debug!(model = %self.config.model, prompt_chars = user.len(), "Sending chat request");

        let response = self
            .client
            .exec_chat(&self.config.model, request, Some(&options))
            .await?;

        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(LlmError::EmptyReply),
        }
    }

    /// Like [`complete`](Self::complete), then decodes the JSON object in the reply as `T`.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
    ) -> Result<T, LlmError> {
        let reply = self.complete(system, user).await?;
        parse_reply(&reply)
    }
}

pub(crate) fn parse_reply<T: DeserializeOwned>(reply: &str) -> Result<T, LlmError> {
    let object = extract_json_object(reply).ok_or(LlmError::NoJsonObject)?;
    Ok(serde_json::from_str(object)?)
}

use crate::constants::DEFAULT_CHAT_MODEL;

/// Model selection for [`ChatModel`](super::ChatModel).
///
/// Credentials are resolved by `genai` from the provider's usual environment
/// variable (e.g. `OPENAI_API_KEY`).
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub model: String,
    pub temperature: f64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.0,
        }
    }
}

impl ChatConfig {
    const ENV_MODEL: &'static str = "SHELFMATCH_CHAT_MODEL";
    const ENV_TEMPERATURE: &'static str = "SHELFMATCH_CHAT_TEMPERATURE";

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let model = std::env::var(Self::ENV_MODEL)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.model);

        let temperature = std::env::var(Self::ENV_TEMPERATURE)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.temperature);

        Self { model, temperature }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("chat model cannot be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "chat temperature must be within [0, 2], got {}",
                self.temperature
            ));
        }
        Ok(())
    }
}

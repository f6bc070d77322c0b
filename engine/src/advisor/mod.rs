//! AI coaching collaborator
//!
//! [`Advisor`] turns a profile snapshot into a coaching prompt and never
//! fails: every transport error or empty reply becomes a fixed fallback
//! message.

mod ollama;

pub use ollama::OllamaClient;

use crate::config::AiConfig;
use crate::error::{EngineError, EngineResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use vitality_shared::{BmiData, ChatMessage, UserProfile};

pub const ADVICE_FAILURE: &str =
    "Sorry, I'm having trouble connecting to the fitness database right now.";
pub const ADVICE_EMPTY: &str = "I couldn't generate advice at this moment. Please try again.";
pub const CHAT_FAILURE: &str = "I'm experiencing a temporary glitch. Let's try again later.";
pub const CHAT_EMPTY: &str = "I didn't quite catch that.";

/// Context line added to every advice prompt
pub const GOAL_CONTEXT: &str = "Improve general fitness and energy levels";

pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful, motivating fitness assistant named VitalityBot. \
Keep answers short (under 100 words) and focused on health, wellness, and exercise.";

/// Text-generation backend
#[async_trait]
pub trait AdviceClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> EngineResult<String>;

    async fn chat(&self, system: &str, history: &[ChatMessage], message: &str) -> EngineResult<String>;
}

/// Backend used when AI is switched off; every call fails
pub struct DisabledClient;

#[async_trait]
impl AdviceClient for DisabledClient {
    async fn generate(&self, _prompt: &str) -> EngineResult<String> {
        Err(EngineError::Collaborator("AI advice is disabled".to_string()))
    }

    async fn chat(&self, _system: &str, _history: &[ChatMessage], _message: &str) -> EngineResult<String> {
        Err(EngineError::Collaborator("AI advice is disabled".to_string()))
    }
}

#[derive(Clone)]
pub struct Advisor {
    client: Arc<dyn AdviceClient>,
}

impl Advisor {
    pub fn new(client: Arc<dyn AdviceClient>) -> Self {
        Self { client }
    }

    /// Build from config: Ollama when enabled, disabled otherwise
    pub fn from_config(config: &AiConfig) -> EngineResult<Self> {
        if !config.enabled {
            info!("AI advice disabled");
            return Ok(Self::new(Arc::new(DisabledClient)));
        }
        info!(url = %config.ollama_url, model = %config.model, "AI advice enabled");
        Ok(Self::new(Arc::new(OllamaClient::new(config)?)))
    }

    /// Opening line of every coaching conversation
    pub fn greeting(name: &str) -> ChatMessage {
        ChatMessage::model(format!(
            "Hi {}! I'm your AI fitness coach. How can I help you reach your goals today?",
            name
        ))
    }

    pub fn advice_prompt(profile: &UserProfile, bmi: &BmiData) -> String {
        let goal = profile.goal.as_str();
        let activity = profile.activity_level.as_str();
        format!(
            "You are an expert fitness and nutrition coach.\n\
             User Profile:\n\
             - Name: {name}\n\
             - Age: {age}\n\
             - Gender: {gender}\n\
             - BMI: {bmi:.1} ({category})\n\
             - Activity Level: {activity} (CRITICAL)\n\
             - Primary Goal: {goal} (Context: {context})\n\
             \n\
             Please provide a concise, actionable plan containing:\n\
             1. A 1-paragraph assessment of their current BMI health implication.\n\
             2. 3 specific workout recommendations tailored to their goal ({goal}).\n\
             3. 3 specific nutritional adjustments.\n\
             \n\
             IMPORTANT: Explicitly explain how their '{activity}' activity level influences these \
             recommendations (e.g., calorie intake needs, recovery time, or workout intensity).\n\
             \n\
             Format the output in Markdown. Keep it encouraging but realistic.",
            name = profile.name,
            age = profile.age,
            gender = profile.gender.as_str(),
            bmi = bmi.value,
            category = bmi.category.as_str(),
            activity = activity,
            goal = goal,
            context = GOAL_CONTEXT,
        )
    }

    /// Personalised plan, or a fallback message
    pub async fn advice(&self, profile: &UserProfile, bmi: &BmiData) -> String {
        match self.client.generate(&Self::advice_prompt(profile, bmi)).await {
            Ok(text) if text.trim().is_empty() => ADVICE_EMPTY.to_string(),
            Ok(text) => text,
            Err(e) => {
                warn!("Advice request failed: {}", e);
                ADVICE_FAILURE.to_string()
            }
        }
    }

    /// Reply to a chat message, or a fallback message
    pub async fn chat(&self, history: &[ChatMessage], message: &str) -> String {
        match self.client.chat(CHAT_SYSTEM_PROMPT, history, message).await {
            Ok(text) if text.trim().is_empty() => CHAT_EMPTY.to_string(),
            Ok(text) => text,
            Err(e) => {
                warn!("Chat request failed: {}", e);
                CHAT_FAILURE.to_string()
            }
        }
    }
}

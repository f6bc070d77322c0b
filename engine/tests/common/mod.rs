//! Common test utilities for integration tests
//!
//! Builds a controller over an in-memory store with a clock the test can move.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::FirstName;
use fake::Fake;
use std::sync::{Arc, Mutex};
use vitality_engine::advisor::{AdviceClient, Advisor, DisabledClient};
use vitality_engine::auth::{JwtService, LocalIdentityProvider};
use vitality_engine::config::AppConfig;
use vitality_engine::repositories::MemoryStore;
use vitality_engine::{AppController, EngineError, EngineResult};
use vitality_shared::{ActivityLevel, ChatMessage, FitnessGoal, Gender, NewProfileInput};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Test application wrapper
pub struct TestApp {
    pub app: AppController,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<LocalIdentityProvider>,
    clock: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl TestApp {
    /// Controller with AI disabled, starting 2026-04-06 09:00 UTC+2
    pub fn new() -> Self {
        Self::with_advisor(Advisor::new(Arc::new(DisabledClient)))
    }

    pub fn with_advisor(advisor: Advisor) -> Self {
        Self::build(Arc::new(MemoryStore::new()), advisor)
    }

    /// Second controller over the same store, as after an app restart
    pub fn restart(&self) -> Self {
        Self::build(self.store.clone(), Advisor::new(Arc::new(DisabledClient)))
    }

    fn build(store: Arc<MemoryStore>, advisor: Advisor) -> Self {
        let identity = Arc::new(LocalIdentityProvider::new(
            store.clone(),
            JwtService::new("integration-test-secret-key-32-chars", 3600),
        ));
        let clock = Arc::new(Mutex::new(local(2026, 4, 6, 9)));
        let reader = clock.clone();
        let app = AppController::with_clock(
            test_config(),
            store.clone(),
            identity.clone(),
            advisor,
            Arc::new(move || *reader.lock().unwrap()),
        );
        Self {
            app,
            store,
            identity,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        *self.clock.lock().unwrap()
    }

    pub fn set_time(&self, at: DateTime<FixedOffset>) {
        *self.clock.lock().unwrap() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut clock = self.clock.lock().unwrap();
        *clock = *clock + by;
    }

    /// Sign up a random user and return their email
    pub async fn sign_up(&mut self) -> String {
        let email: String = SafeEmail().fake();
        self.app
            .sign_up(&email, TEST_PASSWORD)
            .await
            .expect("sign up failed");
        email
    }

    /// Sign up and finish onboarding with the given profile input
    pub async fn onboard(&mut self, input: NewProfileInput) {
        self.sign_up().await;
        self.app
            .complete_onboarding(input)
            .await
            .expect("onboarding failed");
    }

    pub fn xp(&self) -> u64 {
        self.app.state().profile.as_ref().map(|p| p.xp).unwrap_or(0)
    }

    pub fn level(&self) -> u32 {
        self.app.state().profile.as_ref().map(|p| p.level).unwrap_or(0)
    }
}

pub fn local(year: i32, month: u32, day: u32, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .unwrap()
}

pub fn profile_input() -> NewProfileInput {
    NewProfileInput {
        name: FirstName().fake(),
        age: (18..70).fake(),
        gender: Gender::Female,
        height_cm: 170.0,
        weight_kg: 82.0,
        target_weight_kg: Some(78.0),
        activity_level: ActivityLevel::Moderate,
        goal: FitnessGoal::LoseWeight,
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.persist_retries = 2;
    config.storage.retry_backoff_ms = 1;
    config
}

/// Advice client that answers with fixed text and records what it was sent
pub struct ScriptedClient {
    pub reply: String,
    pub chats: Mutex<Vec<(Vec<ChatMessage>, String)>>,
}

impl ScriptedClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            chats: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AdviceClient for ScriptedClient {
    async fn generate(&self, _prompt: &str) -> EngineResult<String> {
        Ok(self.reply.clone())
    }

    async fn chat(&self, _system: &str, history: &[ChatMessage], message: &str) -> EngineResult<String> {
        if message.is_empty() {
            return Err(EngineError::Collaborator("empty".to_string()));
        }
        self.chats
            .lock()
            .unwrap()
            .push((history.to_vec(), message.to_string()));
        Ok(self.reply.clone())
    }
}

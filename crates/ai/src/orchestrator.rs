//! Provider selection and generation orchestration.
//!
//! The orchestrator owns the registry of configured vendor clients. It is
//! built once at process start and handed to request handlers through shared
//! state; tests substitute stub clients via [`Orchestrator::with_provider`].

use std::collections::HashMap;
use std::sync::Arc;

use planner_core::planning::{GeneratedPlanning, PlanningContext, ProviderKind};

use crate::config::AiConfig;
use crate::error::AiError;
use crate::prompt;
use crate::provider::CompletionProvider;
use crate::providers::{ClaudeClient, GeminiClient, OpenAiClient};
use crate::response;

pub struct Orchestrator {
    providers: HashMap<ProviderKind, Arc<dyn CompletionProvider>>,
    default_provider: ProviderKind,
}

impl Orchestrator {
    /// An orchestrator with no providers registered. Combine with
    /// [`with_provider`](Self::with_provider).
    pub fn new(default_provider: ProviderKind) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider,
        }
    }

    /// Build the production orchestrator: one client per configured
    /// credential. Unconfigured vendors are absent, not stubbed.
    pub fn from_config(config: &AiConfig) -> Self {
        let mut orchestrator = Self::new(config.default_provider);

        if let Some(key) = &config.openai_api_key {
            orchestrator = orchestrator.with_provider(Arc::new(OpenAiClient::new(key.clone())));
        }
        if let Some(key) = &config.gemini_api_key {
            orchestrator = orchestrator.with_provider(Arc::new(GeminiClient::new(key.clone())));
        }
        if let Some(key) = &config.claude_api_key {
            orchestrator = orchestrator.with_provider(Arc::new(ClaudeClient::new(key.clone())));
        }

        for kind in orchestrator.configured_providers() {
            tracing::info!(provider = %kind, "AI provider configured");
        }
        orchestrator
    }

    /// Register a provider client under its own kind, replacing any existing
    /// registration for that kind.
    pub fn with_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    /// Providers that are usable, in configuration order.
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.providers.contains_key(kind))
            .collect()
    }

    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// Generate a planning sheet payload for the given context.
    ///
    /// The effective provider is `provider` when given, otherwise the
    /// configured default. An unconfigured provider fails immediately,
    /// before any prompt is built or network call attempted. A single failed
    /// attempt is a failed generation: no retries, no fallback provider.
    pub async fn generate(
        &self,
        context: &PlanningContext,
        provider: Option<ProviderKind>,
    ) -> Result<GeneratedPlanning, AiError> {
        let kind = provider.unwrap_or(self.default_provider);
        let client = self
            .providers
            .get(&kind)
            .ok_or(AiError::NotConfigured(kind))?;

        let prompt = prompt::build_prompt(context);
        tracing::debug!(
            provider = %kind,
            course = %context.course_code,
            week = context.week_number,
            prompt_chars = prompt.len(),
            "Dispatching planning generation",
        );

        let raw = client.complete(&prompt).await.map_err(|e| {
            tracing::error!(provider = %kind, error = %e, "Provider call failed");
            AiError::Generation(e.to_string())
        })?;

        response::normalize(&raw, kind)
    }

    /// Connectivity self-test for one provider. An unconfigured provider
    /// reports `false` without any network attempt.
    pub async fn test_provider(&self, kind: ProviderKind) -> bool {
        let Some(client) = self.providers.get(&kind) else {
            return false;
        };
        match client.test_connection().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(provider = %kind, error = %e, "Provider self-test failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use planner_core::planning::{DifficultyMix, GenerationPreferences};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records calls and replies with a canned result.
    struct StubProvider {
        kind: ProviderKind,
        reply: Result<String, String>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn replying(kind: ProviderKind, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                kind,
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(kind: ProviderKind, message: &str) -> Arc<Self> {
            Arc::new(Self {
                kind,
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(ProviderError::Api {
                    provider: self.kind,
                    status: 500,
                    body: message.clone(),
                }),
            }
        }

        async fn test_connection(&self) -> Result<(), ProviderError> {
            self.complete("").await.map(|_| ())
        }
    }

    fn context() -> PlanningContext {
        PlanningContext {
            course_code: "CS101".to_string(),
            course_name: "Intro".to_string(),
            week_number: 3,
            materials: vec!["**Notes** (lecture_notes): Recursion".to_string()],
            preferences: GenerationPreferences {
                session_duration: 90,
                number_of_questions: 2,
                difficulty_mix: DifficultyMix {
                    easy: 30,
                    medium: 50,
                    hard: 20,
                },
                assessment_preferences: vec!["Quick Quiz".to_string()],
                teaching_style: "interactive".to_string(),
                additional_instructions: None,
            },
            previous_weeks_topics: vec![],
        }
    }

    fn valid_reply() -> String {
        json!({
            "weeklyAbstract": "Recursion.",
            "learningObjectives": ["Understand recursion"],
            "questions": [
                {"questionText": "Base case?", "difficulty": "easy", "estimatedTime": 5},
                {"questionText": "Write factorial.", "difficulty": "medium", "estimatedTime": 10}
            ],
            "assessmentMethods": [
                {"methodName": "Quick Quiz", "description": "Short quiz.", "duration": 10}
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_unconfigured_provider_fails_without_any_call() {
        let stub = StubProvider::replying(ProviderKind::Openai, &valid_reply());
        let orchestrator =
            Orchestrator::new(ProviderKind::Openai).with_provider(stub.clone());

        let result = orchestrator
            .generate(&context(), Some(ProviderKind::Gemini))
            .await;

        assert!(matches!(
            result,
            Err(AiError::NotConfigured(ProviderKind::Gemini))
        ));
        assert_eq!(stub.call_count(), 0, "no client may be invoked");
    }

    #[tokio::test]
    async fn test_default_provider_used_without_override() {
        let stub = StubProvider::replying(ProviderKind::Claude, &valid_reply());
        let orchestrator =
            Orchestrator::new(ProviderKind::Claude).with_provider(stub.clone());

        let planning = orchestrator
            .generate(&context(), None)
            .await
            .expect("generation should succeed");

        assert_eq!(stub.call_count(), 1);
        assert_eq!(planning.questions.len(), 2);
    }

    #[tokio::test]
    async fn test_provider_error_wrapped_uniformly() {
        let stub = StubProvider::failing(ProviderKind::Openai, "rate limit exceeded");
        let orchestrator = Orchestrator::new(ProviderKind::Openai).with_provider(stub);

        let err = orchestrator.generate(&context(), None).await.unwrap_err();
        match err {
            AiError::Generation(message) => {
                assert!(message.contains("rate limit exceeded"));
            }
            other => panic!("expected Generation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_reply_is_format_error() {
        let stub = StubProvider::replying(ProviderKind::Openai, "not json at all");
        let orchestrator = Orchestrator::new(ProviderKind::Openai).with_provider(stub);

        let err = orchestrator.generate(&context(), None).await.unwrap_err();
        assert!(matches!(err, AiError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn test_fenced_reply_normalized() {
        let fenced = format!("```json\n{}\n```", valid_reply());
        let stub = StubProvider::replying(ProviderKind::Gemini, &fenced);
        let orchestrator = Orchestrator::new(ProviderKind::Gemini).with_provider(stub);

        let planning = orchestrator
            .generate(&context(), Some(ProviderKind::Gemini))
            .await
            .expect("fenced reply should normalize");
        assert_eq!(planning.weekly_abstract, "Recursion.");
    }

    #[tokio::test]
    async fn test_test_provider_unconfigured_is_false() {
        let orchestrator = Orchestrator::new(ProviderKind::Openai);
        assert!(!orchestrator.test_provider(ProviderKind::Openai).await);
    }

    #[tokio::test]
    async fn test_test_provider_reports_self_test_result() {
        let ok = StubProvider::replying(ProviderKind::Openai, "{\"status\": \"ok\"}");
        let broken = StubProvider::failing(ProviderKind::Claude, "bad credentials");
        let orchestrator = Orchestrator::new(ProviderKind::Openai)
            .with_provider(ok)
            .with_provider(broken);

        assert!(orchestrator.test_provider(ProviderKind::Openai).await);
        assert!(!orchestrator.test_provider(ProviderKind::Claude).await);
    }

    #[test]
    fn test_configured_providers_listing() {
        let orchestrator = Orchestrator::new(ProviderKind::Openai)
            .with_provider(StubProvider::replying(ProviderKind::Claude, "{}"));
        assert_eq!(
            orchestrator.configured_providers(),
            vec![ProviderKind::Claude]
        );
        assert!(!orchestrator.is_configured(ProviderKind::Openai));
    }
}

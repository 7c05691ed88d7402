use planner_core::planning::ProviderKind;

/// AI provider credentials and default selection, loaded from environment
/// variables.
///
/// A provider with no API key is treated as absent: it is never constructed
/// and never attempted.
#[derive(Debug, Clone, Default)]
pub struct AiConfig {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub claude_api_key: Option<String>,
    /// Provider used when neither the request nor the course preferences
    /// name one (default: `openai`).
    pub default_provider: ProviderKind,
}

impl AiConfig {
    /// Load AI configuration from environment variables.
    ///
    /// | Env Var               | Default  |
    /// |-----------------------|----------|
    /// | `OPENAI_API_KEY`      | unset    |
    /// | `GEMINI_API_KEY`      | unset    |
    /// | `CLAUDE_API_KEY`      | unset    |
    /// | `DEFAULT_AI_PROVIDER` | `openai` |
    ///
    /// # Panics
    ///
    /// Panics if `DEFAULT_AI_PROVIDER` is set to an unknown provider name.
    pub fn from_env() -> Self {
        let default_provider = std::env::var("DEFAULT_AI_PROVIDER")
            .map(|s| {
                s.parse()
                    .unwrap_or_else(|e: String| panic!("Invalid DEFAULT_AI_PROVIDER: {e}"))
            })
            .unwrap_or_default();

        Self {
            openai_api_key: non_empty_env("OPENAI_API_KEY"),
            gemini_api_key: non_empty_env("GEMINI_API_KEY"),
            claude_api_key: non_empty_env("CLAUDE_API_KEY"),
            default_provider,
        }
    }

    /// API key for the given provider, if configured.
    pub fn api_key(&self, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::Openai => self.openai_api_key.as_deref(),
            ProviderKind::Gemini => self.gemini_api_key.as_deref(),
            ProviderKind::Claude => self.claude_api_key.as_deref(),
        }
    }

    /// Whether the given provider has a credential.
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.api_key(kind).is_some()
    }

    /// Providers that have credentials, in declaration order.
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.is_configured(*kind))
            .collect()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

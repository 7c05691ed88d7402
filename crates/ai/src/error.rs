use planner_core::planning::ProviderKind;

/// The single error shape callers of the AI layer see.
///
/// Vendor-specific failures are wrapped into [`AiError::Generation`] at the
/// orchestrator boundary; malformed replies become [`AiError::InvalidFormat`].
/// Raw vendor content is logged server-side, never embedded here.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The requested provider has no credential configured.
    #[error("AI provider \"{0}\" is not configured")]
    NotConfigured(ProviderKind),

    /// The provider call itself failed (network, auth, vendor rejection).
    #[error("Failed to generate planning: {0}")]
    Generation(String),

    /// The provider replied, but the content failed JSON parsing or schema
    /// validation.
    #[error("Invalid AI response format: {0}")]
    InvalidFormat(String),
}

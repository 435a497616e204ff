//! Summary provider trait
//!
//! The abstraction the orchestrator generates through. Object-safe so it can
//! be injected as `Arc<dyn SummaryProvider>` and stubbed in tests.

use async_trait::async_trait;

use super::error::LlmError;

/// A text-completion backend that turns a prompt into onboarding prose.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Provider identifier (e.g. "gemini").
    fn name(&self) -> &'static str;

    /// Generate a completion for the prompt.
    ///
    /// Expected to take multiple seconds; callers must not await this inside
    /// a request/response cycle unless the endpoint is explicitly synchronous.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

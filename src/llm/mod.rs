//! Language model boundary
//!
//! The planner only needs "prompt in, text out". Everything provider-specific
//! lives behind [`LanguageModel`].

use async_trait::async_trait;

use crate::error::ProviderError;

mod gemini;

pub use gemini::GeminiClient;

/// Stateless text completion; each call is independent
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short provider/model label used in logs
    fn name(&self) -> &str;

    /// Complete a single prompt
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

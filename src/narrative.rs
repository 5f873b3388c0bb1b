//! Cultural and historical context for a destination
//!
//! The narrative is decoration, never a blocker: any model failure, timeout
//! or empty answer is replaced by a fixed paragraph.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::ProviderError;
use crate::llm::LanguageModel;
use crate::models::Provenance;

/// Cultural context text together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub text: String,
    pub provenance: Provenance,
}

/// Wraps a language model behind a single bounded attempt
#[derive(Clone)]
pub struct NarrativeGenerator {
    model: Option<Arc<dyn LanguageModel>>,
    timeout: Duration,
}

impl NarrativeGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self {
            model: Some(model),
            timeout,
        }
    }

    /// A generator with no model; always answers with the fallback paragraph
    #[must_use]
    pub fn fallback_only() -> Self {
        Self {
            model: None,
            timeout: Duration::ZERO,
        }
    }

    /// Whether a language model backs this generator
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Describe the destination's cultural and historical significance
    pub async fn describe(&self, destination: &str) -> Narrative {
        let Some(model) = &self.model else {
            debug!("No language model configured, using fallback narrative");
            return Self::fallback(destination);
        };

        let prompt = prompt_for(destination);
        let outcome = match timeout(self.timeout, model.complete(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(text) if !text.trim().is_empty() => {
                info!(model = model.name(), "Generated cultural context");
                Narrative {
                    text: text.trim().to_string(),
                    provenance: Provenance::Live,
                }
            }
            Ok(_) => {
                warn!(model = model.name(), "Language model returned an empty narrative, using fallback");
                Self::fallback(destination)
            }
            Err(e) => {
                warn!(model = model.name(), error = %e, "Narrative generation failed, using fallback");
                Self::fallback(destination)
            }
        }
    }

    fn fallback(destination: &str) -> Narrative {
        Narrative {
            text: fallback_text(destination),
            provenance: Provenance::Fallback,
        }
    }
}

fn prompt_for(destination: &str) -> String {
    format!(
        "Write a concise, informative paragraph (4-6 sentences) about the cultural and \
         historical significance of {destination}.\n\
         Include:\n\
         - Historical importance\n\
         - Cultural highlights\n\
         - What makes it unique\n\
         - Why travelers should visit\n\n\
         Keep it engaging and informative."
    )
}

/// Generic paragraph used whenever the model cannot answer
#[must_use]
pub fn fallback_text(destination: &str) -> String {
    format!(
        "{destination} is a remarkable destination known for its rich cultural heritage and \
         historical significance. The city offers a unique blend of tradition and modernity, \
         making it an ideal destination for travelers seeking authentic experiences. Visitors \
         can explore numerous historical sites, immerse themselves in local culture, and enjoy \
         the vibrant atmosphere that {destination} has to offer."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    enum Behaviour {
        Answer(&'static str),
        Fail,
        Hang,
    }

    struct ScriptedModel(Behaviour);

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
            assert!(prompt.contains("Kyoto"));
            match self.0 {
                Behaviour::Answer(text) => Ok(text.to_string()),
                Behaviour::Fail => Err(ProviderError::Status {
                    status: 500,
                    message: "boom".to_string(),
                }),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok("too late".to_string())
                }
            }
        }
    }

    fn generator(behaviour: Behaviour) -> NarrativeGenerator {
        NarrativeGenerator::new(
            Arc::new(ScriptedModel(behaviour)),
            Duration::from_millis(50),
        )
    }

    #[tokio::test]
    async fn test_model_answer_is_used() {
        let narrative = generator(Behaviour::Answer(" Kyoto was the imperial capital. "))
            .describe("Kyoto")
            .await;
        assert_eq!(narrative.text, "Kyoto was the imperial capital.");
        assert_eq!(narrative.provenance, Provenance::Live);
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let narrative = generator(Behaviour::Fail).describe("Kyoto").await;
        assert_eq!(narrative.text, fallback_text("Kyoto"));
        assert_eq!(narrative.provenance, Provenance::Fallback);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let narrative = generator(Behaviour::Hang).describe("Kyoto").await;
        assert_eq!(narrative.provenance, Provenance::Fallback);
        assert!(narrative.text.contains("Kyoto"));
    }

    #[tokio::test]
    async fn test_empty_answer_falls_back() {
        let narrative = generator(Behaviour::Answer("   ")).describe("Kyoto").await;
        assert_eq!(narrative.provenance, Provenance::Fallback);
        assert!(!narrative.text.is_empty());
    }

    #[tokio::test]
    async fn test_without_model_uses_fallback() {
        let narrative = NarrativeGenerator::fallback_only().describe("Lisbon").await;
        assert_eq!(narrative.text, fallback_text("Lisbon"));
    }
}

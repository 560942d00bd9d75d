//! NLP backend abstractions: entity recognition and part-of-speech tagging.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod http;
pub mod lexicon;
pub mod noop;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("not implemented")]
    NotImplemented,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

impl Entity {
    /// Organization, person or geopolitical entity.
    pub fn is_named_party(&self) -> bool {
        matches!(self.label.as_str(), "ORG" | "PERSON" | "GPE")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn is_proper_noun(&self) -> bool {
        matches!(self.tag.as_str(), "NNP" | "NNPS")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NlpAnalysis {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub tokens: Vec<TaggedToken>,
}

impl NlpAnalysis {
    pub fn has_named_party(&self) -> bool {
        self.entities.iter().any(Entity::is_named_party)
    }

    pub fn proper_noun_ratio(&self) -> f32 {
        if self.tokens.is_empty() {
            return 0.0;
        }
        let proper = self.tokens.iter().filter(|t| t.is_proper_noun()).count();
        proper as f32 / self.tokens.len() as f32
    }
}

/// A backend that can annotate a short candidate string.
///
/// `probe` is called once when a classifier is built; `analyze` once per
/// candidate and must respect the backend's own timeout.
pub trait NlpBackend: Send + Sync {
    fn name(&self) -> &str;
    fn probe(&self) -> Result<(), ProviderError>;
    fn analyze(&self, text: &str) -> Result<NlpAnalysis, ProviderError>;
}

#[derive(Default, Clone)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn NlpBackend>>,
    pub preferred: Option<String>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, name: &str, backend: Arc<dyn NlpBackend>) -> Self {
        self.backends.insert(name.to_string(), backend);
        self
    }

    pub fn set_preferred(mut self, name: &str) -> Self {
        self.preferred = Some(name.to_string());
        self
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.backends.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn backend(&self, name: Option<&str>) -> Result<Arc<dyn NlpBackend>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred.clone())
            .ok_or_else(|| ProviderError::UnknownProvider("no nlp backend configured".into()))?;
        self.backends
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(key))
    }
}

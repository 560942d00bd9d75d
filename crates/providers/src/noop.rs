use crate::{NlpAnalysis, NlpBackend, ProviderError};

/// Stands in when no NLP backend is installed; always fails its probe.
#[derive(Debug, Default)]
pub struct NoopBackend;

impl NlpBackend for NoopBackend {
    fn name(&self) -> &str {
        "noop"
    }

    fn probe(&self) -> Result<(), ProviderError> {
        Err(ProviderError::NotImplemented)
    }

    fn analyze(&self, _text: &str) -> Result<NlpAnalysis, ProviderError> {
        Err(ProviderError::NotImplemented)
    }
}

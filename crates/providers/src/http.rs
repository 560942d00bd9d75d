//! Remote NLP service (e.g. a spaCy/NLTK sidecar) reached over HTTP.
//!
//! Expects `GET {base_url}/health` to answer 2xx and
//! `POST {base_url}/analyze` with `{"text": ...}` to return an `NlpAnalysis`.

use crate::{NlpAnalysis, NlpBackend, ProviderError};
use reqwest::blocking::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct HttpNlpConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Clone)]
pub struct HttpNlpBackend {
    client: Client,
    cfg: Arc<HttpNlpConfig>,
}

impl HttpNlpBackend {
    pub fn new(cfg: HttpNlpConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            cfg: Arc::new(cfg),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), route)
    }

    fn map_err(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.cfg.timeout_ms)
        } else {
            ProviderError::RequestFailed(err.to_string())
        }
    }
}

impl NlpBackend for HttpNlpBackend {
    fn name(&self) -> &str {
        "http"
    }

    fn probe(&self) -> Result<(), ProviderError> {
        let mut req = self.client.get(self.url("health"));
        if let Some(key) = &self.cfg.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().map_err(|e| self.map_err(e))?;
        debug!(status = %resp.status(), url = %self.cfg.base_url, "nlp health check");
        if !resp.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "health check returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    fn analyze(&self, text: &str) -> Result<NlpAnalysis, ProviderError> {
        #[derive(Serialize)]
        struct AnalyzeRequest<'a> {
            text: &'a str,
        }

        let mut req = self
            .client
            .post(self.url("analyze"))
            .json(&AnalyzeRequest { text });
        if let Some(key) = &self.cfg.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().map_err(|e| self.map_err(e))?;
        if !resp.status().is_success() {
            return Err(ProviderError::RequestFailed(format!(
                "analyze returned {}",
                resp.status()
            )));
        }
        resp.json::<NlpAnalysis>().map_err(|e| self.map_err(e))
    }
}

//! Compiled form of the detection configuration. Built once per analyzer and
//! rebuilt when the configuration changes.

use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::exclusion::{compile_pattern, ExclusionFilter, PathFilter};
use crate::vocabulary::{DOCUMENT_PATTERNS, TECHNICAL_PATTERNS, TECHNICAL_TERMS, VERSION_PATTERNS};
use regex::Regex;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub exclusion: ExclusionFilter,
    pub paths: PathFilter,
    indicators: Vec<Regex>,
    version: Vec<Regex>,
    technical: Vec<Regex>,
    document: Vec<Regex>,
    technical_terms: HashSet<&'static str>,
    known_companies: HashSet<String>,
    exclude_words: HashSet<String>,
    pub min_name_length: usize,
    pub max_name_length: usize,
    pub confidence_threshold: f32,
}

fn compile_all(
    kind: &'static str,
    patterns: impl IntoIterator<Item = impl AsRef<str>>,
) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .into_iter()
        .map(|p| compile_pattern(kind, p.as_ref(), false))
        .collect()
}

impl CompiledRules {
    pub fn compile(config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            exclusion: ExclusionFilter::new(&config.patterns.exclude)?,
            paths: PathFilter::new(&config.analysis.exclude_paths)?,
            indicators: compile_all("company indicator", &config.patterns.company_indicators)?,
            version: compile_all("version", VERSION_PATTERNS)?,
            technical: compile_all("technical", TECHNICAL_PATTERNS)?,
            document: compile_all("document", DOCUMENT_PATTERNS)?,
            technical_terms: TECHNICAL_TERMS.iter().copied().collect(),
            known_companies: config.lexicon.known_companies.iter().cloned().collect(),
            exclude_words: config.lexicon.exclude_words.iter().cloned().collect(),
            min_name_length: config.analysis.min_name_length,
            max_name_length: config.analysis.max_name_length,
            confidence_threshold: config.analysis.confidence_threshold,
        })
    }

    pub fn is_version(&self, name: &str) -> bool {
        self.version.iter().any(|re| re.is_match(name))
    }

    pub fn is_document_structure(&self, name: &str) -> bool {
        self.document.iter().any(|re| re.is_match(name))
    }

    /// Share of whitespace tokens found in the technical vocabulary.
    pub fn technical_ratio(&self, name: &str) -> f32 {
        let tokens: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return 0.0;
        }
        let hits = tokens
            .iter()
            .filter(|t| self.technical_terms.contains(t.as_str()))
            .count();
        hits as f32 / tokens.len() as f32
    }

    pub fn is_technical_reference(&self, name: &str) -> bool {
        self.technical.iter().any(|re| re.is_match(name)) || self.technical_ratio(name) > 0.3
    }

    pub fn is_known_company(&self, name: &str) -> bool {
        self.known_companies.contains(name)
    }

    pub fn is_excluded_word(&self, word: &str) -> bool {
        self.exclude_words.contains(word)
    }

    pub fn first_indicator(&self, name: &str) -> Option<&Regex> {
        self.indicators.iter().find(|re| re.is_match(name))
    }
}

use crate::config::NlpConfig;
use crate::error::ClassificationDegraded;
use crate::patterns::CompiledRules;
use providers::{BackendRegistry, NlpAnalysis, NlpBackend};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    TooShort,
    TechnicalFile,
    VersionNumber,
    TechnicalReference,
    DocumentStructure,
    KnownCompany,
    CompanyIndicator,
    MultipleCapitalized,
    SingleProperNoun,
    EntityOrganization,
    HighProperNouns,
    HighTechnicalTerms,
    SpecialCharacters,
    NoCompanySignal,
    BackendFallback,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::TooShort => "too_short",
            Reason::TechnicalFile => "technical_file",
            Reason::VersionNumber => "version_number",
            Reason::TechnicalReference => "technical_reference",
            Reason::DocumentStructure => "document_structure",
            Reason::KnownCompany => "known_company",
            Reason::CompanyIndicator => "company_indicator",
            Reason::MultipleCapitalized => "multiple_capitalized",
            Reason::SingleProperNoun => "single_proper_noun",
            Reason::EntityOrganization => "entity_organization",
            Reason::HighProperNouns => "high_proper_nouns",
            Reason::HighTechnicalTerms => "high_technical_terms",
            Reason::SpecialCharacters => "special_characters",
            Reason::NoCompanySignal => "no_company_signal",
            Reason::BackendFallback => "backend_fallback",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Basic,
    Enhanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_company: bool,
    /// `raw_score` clamped to `0.0..=1.0`.
    pub confidence: f32,
    pub raw_score: f32,
    /// Tags in the order they were established.
    pub reasons: Vec<Reason>,
    pub variant: Variant,
}

impl ClassificationResult {
    fn reject(reason: Reason, variant: Variant) -> Self {
        Self {
            is_company: false,
            confidence: 0.0,
            raw_score: 0.0,
            reasons: vec![reason],
            variant,
        }
    }

    fn known_company(variant: Variant) -> Self {
        Self {
            is_company: true,
            confidence: 1.0,
            raw_score: 1.0,
            reasons: vec![Reason::KnownCompany],
            variant,
        }
    }
}

/// Which variant a classifier runs, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantSelection {
    pub requested: String,
    pub variant: Variant,
    pub backend: Option<String>,
    pub degraded: Option<ClassificationDegraded>,
}

pub struct Classifier {
    rules: Arc<CompiledRules>,
    backend: Option<Arc<dyn NlpBackend>>,
    selection: VariantSelection,
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl Classifier {
    /// Pattern-only classifier.
    pub fn basic(rules: Arc<CompiledRules>) -> Self {
        Self {
            rules,
            backend: None,
            selection: VariantSelection {
                requested: "basic".into(),
                variant: Variant::Basic,
                backend: None,
                degraded: None,
            },
        }
    }

    /// Look up and probe the configured backend. Any failure degrades to
    /// Basic and is recorded in the selection.
    pub fn build(rules: Arc<CompiledRules>, nlp: &NlpConfig, registry: &BackendRegistry) -> Self {
        let requested = nlp.provider.clone();
        if requested.eq_ignore_ascii_case("basic") || requested.is_empty() {
            return Self::basic(rules);
        }
        let probed = registry
            .backend(Some(&requested))
            .and_then(|backend| backend.probe().map(|_| backend));
        match probed {
            Ok(backend) => {
                info!(backend = backend.name(), "enhanced classifier enabled");
                let selection = VariantSelection {
                    requested,
                    variant: Variant::Enhanced,
                    backend: Some(backend.name().to_string()),
                    degraded: None,
                };
                Self {
                    rules,
                    backend: Some(backend),
                    selection,
                }
            }
            Err(err) => {
                let degraded = ClassificationDegraded {
                    backend: requested.clone(),
                    reason: err.to_string(),
                };
                warn!(%degraded, "falling back to basic classifier");
                Self {
                    rules,
                    backend: None,
                    selection: VariantSelection {
                        requested,
                        variant: Variant::Basic,
                        backend: None,
                        degraded: Some(degraded),
                    },
                }
            }
        }
    }

    pub fn selection(&self) -> &VariantSelection {
        &self.selection
    }

    pub fn variant(&self) -> Variant {
        self.selection.variant
    }

    pub fn classify(&self, name: &str) -> ClassificationResult {
        let variant = self.variant();
        if let Some(rejected) = self.gate(name, variant) {
            return rejected;
        }
        match &self.backend {
            Some(backend) => match backend.analyze(name) {
                Ok(analysis) => self.enhanced(name, &analysis),
                Err(err) => {
                    warn!(candidate = name, error = %err, "nlp backend failed; using basic rules");
                    let mut result = self.basic_decision(name);
                    result.reasons.push(Reason::BackendFallback);
                    result
                }
            },
            None => self.basic_decision(name),
        }
    }

    /// Rejections and acceptances shared by both variants.
    fn gate(&self, name: &str, variant: Variant) -> Option<ClassificationResult> {
        let rules = &*self.rules;
        let reject = |reason| Some(ClassificationResult::reject(reason, variant));
        if name.is_empty() || name.chars().count() < rules.min_name_length {
            return reject(Reason::TooShort);
        }
        if rules.exclusion.is_excluded(name) {
            return reject(Reason::TechnicalFile);
        }
        if rules.is_version(name) {
            return reject(Reason::VersionNumber);
        }
        if rules.is_technical_reference(name) {
            return reject(Reason::TechnicalReference);
        }
        if rules.is_document_structure(name) {
            return reject(Reason::DocumentStructure);
        }
        if rules.is_known_company(name) {
            return Some(ClassificationResult::known_company(variant));
        }
        None
    }

    fn basic_decision(&self, name: &str) -> ClassificationResult {
        let reasons = if self.rules.first_indicator(name).is_some() {
            vec![Reason::CompanyIndicator]
        } else {
            match self.capitalization(name) {
                Some(reason) => vec![reason],
                None => {
                    return ClassificationResult::reject(rejection_tag(name), Variant::Basic);
                }
            }
        };
        ClassificationResult {
            is_company: true,
            confidence: 1.0,
            raw_score: 1.0,
            reasons,
            variant: Variant::Basic,
        }
    }

    fn enhanced(&self, name: &str, analysis: &NlpAnalysis) -> ClassificationResult {
        let mut score = 0.0f32;
        let mut reasons = Vec::new();

        if analysis.has_named_party() {
            score += 0.4;
            reasons.push(Reason::EntityOrganization);
        }
        if analysis.proper_noun_ratio() > 0.7 {
            score += 0.3;
            reasons.push(Reason::HighProperNouns);
        }
        if self.token_technical_ratio(analysis) > 0.3 {
            score -= 0.4;
            reasons.push(Reason::HighTechnicalTerms);
        }
        if self.rules.first_indicator(name).is_some() {
            score += 0.2;
            reasons.push(Reason::CompanyIndicator);
        }
        match self.capitalization(name) {
            Some(Reason::MultipleCapitalized) => {
                score += 0.2;
                reasons.push(Reason::MultipleCapitalized);
            }
            Some(reason) => {
                score += 0.1;
                reasons.push(reason);
            }
            None => {}
        }

        let is_company = score > self.rules.confidence_threshold;
        if !is_company && reasons.is_empty() {
            reasons.push(rejection_tag(name));
        }
        ClassificationResult {
            is_company,
            confidence: score.clamp(0.0, 1.0),
            raw_score: score,
            reasons,
            variant: Variant::Enhanced,
        }
    }

    fn token_technical_ratio(&self, analysis: &NlpAnalysis) -> f32 {
        if analysis.tokens.is_empty() {
            return 0.0;
        }
        let joined = analysis
            .tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.rules.technical_ratio(&joined)
    }

    fn capitalization(&self, name: &str) -> Option<Reason> {
        let words: Vec<&str> = name.split_whitespace().collect();
        match words.as_slice() {
            [] => None,
            [word] => {
                let len = word.chars().count();
                let shaped = is_capitalized_word(word)
                    && (3..=self.rules.max_name_length).contains(&len)
                    && !self.rules.is_excluded_word(word);
                shaped.then_some(Reason::SingleProperNoun)
            }
            _ => words
                .iter()
                .all(|w| is_capitalized_word(w))
                .then_some(Reason::MultipleCapitalized),
        }
    }
}

fn is_capitalized_word(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(chars.next(), Some(c) if c.is_uppercase()) && word.chars().all(char::is_alphabetic)
}

fn rejection_tag(name: &str) -> Reason {
    let special = name
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '\'' | '.' | ',' | '-'));
    if special {
        Reason::SpecialCharacters
    } else {
        Reason::NoCompanySignal
    }
}

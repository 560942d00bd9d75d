use crate::aggregator::Aggregator;
use crate::categorizer::{Category, CategoryAssignment, NameCategorizer};
use crate::classifier::{ClassificationResult, Classifier, Reason, VariantSelection};
use crate::cleaner::NameCleaner;
use crate::config::{AppConfig, FilterType};
use crate::error::AnalysisError;
use crate::ingest::{stream_batches, TextEncoding};
use crate::models::{AnalysisStatistics, CompanyRecord, RawEntry};
use crate::patterns::CompiledRules;
use chrono::{DateTime, Utc};
use providers::http::{HttpNlpBackend, HttpNlpConfig};
use providers::lexicon::LexiconBackend;
use providers::noop::NoopBackend;
use providers::BackendRegistry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cooperative cancellation flag, checked between batches.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a cancelled run returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialPolicy {
    /// Return `AnalysisError::Cancelled`.
    #[default]
    Discard,
    /// Return the report built so far, marked `cancelled`.
    Retain,
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub cancel: CancelToken,
    pub partial: PartialPolicy,
    /// Overrides `analysis.batch_size`.
    pub batch_size: Option<usize>,
    /// Overrides `analysis.filter_type`.
    pub filter_type: Option<FilterType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub source: String,
    pub encoding: TextEncoding,
    pub batch_size: usize,
    pub filter_type: FilterType,
    pub classifier: VariantSelection,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub frequencies: BTreeMap<String, u64>,
    pub details: BTreeMap<String, CompanyRecord>,
    pub categories: BTreeMap<String, CategoryAssignment>,
    pub statistics: AnalysisStatistics,
    pub metadata: RunMetadata,
}

impl AnalysisReport {
    /// Highest frequencies first; ties by name.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked = self.ranked(|_| true);
        ranked.truncate(n);
        ranked
    }

    /// Case-insensitive substring search, ranked like `top`.
    pub fn search(&self, query: &str) -> Vec<(&str, u64)> {
        let needle = query.to_lowercase();
        self.ranked(|name| name.to_lowercase().contains(&needle))
    }

    pub fn category_summary(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for assignment in self.categories.values() {
            *counts.entry(assignment.category).or_insert(0) += 1;
        }
        counts
    }

    fn ranked(&self, keep: impl Fn(&str) -> bool) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .frequencies
            .iter()
            .filter(|(name, _)| keep(name))
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Registry with the offline backends plus the HTTP backend when a URL is
/// configured (`nlp.url` or `ORGSCAN_NLP_URL`).
pub fn build_registry(config: &AppConfig) -> BackendRegistry {
    let lexicon = LexiconBackend::default().with_org_names(&config.lexicon.known_companies);
    let mut reg = BackendRegistry::new()
        .with_backend("noop", Arc::new(NoopBackend))
        .with_backend("lexicon", Arc::new(lexicon));

    let url = config
        .nlp
        .url
        .clone()
        .or_else(|| std::env::var("ORGSCAN_NLP_URL").ok());
    if let Some(base_url) = url {
        match HttpNlpBackend::new(HttpNlpConfig {
            base_url,
            api_key: std::env::var("ORGSCAN_NLP_API_KEY").ok(),
            timeout_ms: config.nlp.timeout_ms,
        }) {
            Ok(backend) => reg = reg.with_backend("http", Arc::new(backend)),
            Err(err) => warn!(error = %err, "http nlp backend not registered"),
        }
    }

    reg.set_preferred(&config.nlp.provider)
}

/// One configured analysis engine. Owns its compiled rules and classifier.
pub struct Analyzer {
    config: AppConfig,
    registry: BackendRegistry,
    rules: Arc<CompiledRules>,
    cleaner: NameCleaner,
    classifier: Classifier,
    categorizer: NameCategorizer,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("backends", &self.registry.names())
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    pub fn new(config: AppConfig, registry: &BackendRegistry) -> Result<Self, AnalysisError> {
        let rules = Arc::new(CompiledRules::compile(&config)?);
        let classifier = Classifier::build(rules.clone(), &config.nlp, registry);
        let categorizer = NameCategorizer::new(&config)?;
        debug!(backends = ?registry.names(), "analyzer ready");
        Ok(Self {
            cleaner: NameCleaner::new(&config.cleaning),
            registry: registry.clone(),
            config,
            rules,
            classifier,
            categorizer,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn selection(&self) -> &VariantSelection {
        self.classifier.selection()
    }

    /// Recompile everything from `config`. On error the analyzer keeps its
    /// previous configuration.
    pub fn reload(&mut self, config: AppConfig) -> Result<(), AnalysisError> {
        *self = Analyzer::new(config, &self.registry)?;
        info!("analyzer configuration reloaded");
        Ok(())
    }

    pub fn clean(&self, name: &str) -> String {
        self.cleaner.clean(name)
    }

    /// Clean and classify a single raw name.
    pub fn classify(&self, name: &str) -> ClassificationResult {
        self.classifier.classify(&self.cleaner.clean(name))
    }

    pub fn categorize(&self, name: &str) -> CategoryAssignment {
        self.categorizer.categorize(name)
    }

    pub fn categorizer(&self) -> &NameCategorizer {
        &self.categorizer
    }

    pub fn analyze(
        &self,
        path: &Path,
        opts: &AnalyzeOptions,
    ) -> Result<AnalysisReport, AnalysisError> {
        let started_at = Utc::now();
        let batch_size = opts.batch_size.unwrap_or(self.config.analysis.batch_size).max(1);
        let filter_type = opts.filter_type.unwrap_or(self.config.analysis.filter_type);
        info!(
            source = %path.display(),
            batch_size,
            %filter_type,
            variant = ?self.classifier.variant(),
            "starting analysis"
        );

        let mut reader = stream_batches(path, batch_size, &self.config.columns)?;
        let encoding = reader.encoding();
        let mut stats = AnalysisStatistics::default();
        let mut aggregator = Aggregator::new();
        let mut cancelled = false;

        loop {
            if opts.cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let Some(batch) = reader.next() else {
                break;
            };
            let batch = batch?;
            stats.batches += 1;
            for entry in &batch {
                self.process_row(entry, filter_type, &mut stats, &mut aggregator);
            }
            debug!(
                batch = stats.batches,
                rows = batch.len(),
                accepted = aggregator.accepted(),
                unique = aggregator.unique_names(),
                "batch processed"
            );
        }
        stats.rows_malformed = reader.malformed_rows();

        if cancelled {
            warn!(batches = stats.batches, "analysis cancelled");
            if opts.partial == PartialPolicy::Discard {
                return Err(AnalysisError::Cancelled);
            }
        }

        let snapshot = aggregator.finalize()?;
        stats.unique_names = snapshot.frequencies.len() as u64;
        let categories = snapshot
            .frequencies
            .keys()
            .map(|name| (name.clone(), self.categorizer.categorize(name)))
            .collect();

        info!(
            rows = stats.rows_processed,
            accepted = stats.accepted_rows,
            unique = stats.unique_names,
            excluded = stats.excluded_by_pattern,
            malformed = stats.rows_malformed,
            fallbacks = stats.enhanced_fallbacks,
            "analysis complete"
        );

        Ok(AnalysisReport {
            frequencies: snapshot.frequencies,
            details: snapshot.details,
            categories,
            statistics: stats,
            metadata: RunMetadata {
                source: path.display().to_string(),
                encoding,
                batch_size,
                filter_type,
                classifier: self.classifier.selection().clone(),
                started_at,
                finished_at: Utc::now(),
                cancelled,
            },
        })
    }

    fn process_row(
        &self,
        entry: &RawEntry,
        filter_type: FilterType,
        stats: &mut AnalysisStatistics,
        aggregator: &mut Aggregator,
    ) {
        stats.rows_processed += 1;
        if self.rules.exclusion.is_excluded(&entry.name) {
            stats.excluded_by_pattern += 1;
            return;
        }
        if !filter_type.admits(&entry.item_type) {
            stats.excluded_by_type += 1;
            return;
        }
        if self.rules.paths.is_excluded(&entry.path) {
            stats.excluded_by_path += 1;
            return;
        }
        // "US 2021 Plan" is excluded through its "2021 Plan" stage.
        let mut stages = self.cleaner.stages(&entry.name);
        if stages.iter().any(|s| self.rules.exclusion.is_excluded(s)) {
            stats.excluded_by_pattern += 1;
            return;
        }
        let cleaned = stages.pop().unwrap_or_default();
        let result = self.classifier.classify(&cleaned);
        if result.reasons.contains(&Reason::BackendFallback) {
            stats.enhanced_fallbacks += 1;
        }
        if result.is_company {
            aggregator.accept(&cleaned, entry);
            stats.accepted_rows += 1;
        } else {
            stats.rejected_by_classifier += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn basic_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.nlp.provider = "basic".into();
        cfg
    }

    fn write_csv(dir: &Path, rows: &[(&str, &str, &str)]) -> std::path::PathBuf {
        let mut body = String::from("Name,Path,Modified By,Item Type\n");
        for (name, path, kind) in rows {
            body.push_str(&format!("\"{name}\",{path},kim,{kind}\n"));
        }
        let file = dir.join("listing.csv");
        fs::write(&file, body).unwrap();
        file
    }

    #[test]
    fn analyze_counts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_csv(
            dir.path(),
            &[
                ("Acme Industries", "/clients/acme", "Folder"),
                ("AU Acme Industries", "/clients/acme/au", "Folder"),
                ("NEM12#123.csv", "/data", "Item"),
                ("Globex", "/clients/globex", "Item"),
                ("PROP & VAR", "/x", "Folder"),
            ],
        );
        let analyzer = Analyzer::new(basic_config(), &BackendRegistry::new()).unwrap();
        let report = analyzer.analyze(&file, &AnalyzeOptions::default()).unwrap();

        assert_eq!(report.frequencies["Acme Industries"], 2);
        assert_eq!(report.frequencies["Globex"], 1);
        assert_eq!(report.statistics.rows_processed, 5);
        assert_eq!(report.statistics.excluded_by_pattern, 1);
        assert_eq!(report.statistics.rejected_by_classifier, 1);
        assert_eq!(report.statistics.accepted_rows, 3);
        assert_eq!(report.statistics.unique_names, 2);
        assert_eq!(report.details["Acme Industries"].raw_names.len(), 2);
        assert_eq!(
            report.categories["Acme Industries"].category,
            Category::PotentialCompany
        );
        assert!(!report.metadata.cancelled);
        assert_eq!(report.top(1), vec![("Acme Industries", 2)]);
        assert_eq!(report.search("GLOB"), vec![("Globex", 1)]);
    }

    #[test]
    fn filter_type_and_path_globs() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_csv(
            dir.path(),
            &[
                ("Acme Industries", "/clients/acme", "Folder"),
                ("Globex", "/clients/globex", "Item"),
                ("Initech", "/old/initech", "Folder"),
            ],
        );
        let mut cfg = basic_config();
        cfg.analysis.exclude_paths = vec!["/old/**".into()];
        let analyzer = Analyzer::new(cfg, &BackendRegistry::new()).unwrap();
        let opts = AnalyzeOptions {
            filter_type: Some(FilterType::Folders),
            ..AnalyzeOptions::default()
        };
        let report = analyzer.analyze(&file, &opts).unwrap();
        assert_eq!(report.frequencies.len(), 1);
        assert_eq!(report.statistics.excluded_by_type, 1);
        assert_eq!(report.statistics.excluded_by_path, 1);
        assert_eq!(report.metadata.filter_type, FilterType::Folders);
    }

    #[test]
    fn cancellation_respects_partial_policy() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_csv(dir.path(), &[("Acme Industries", "/a", "Folder")]);
        let analyzer = Analyzer::new(basic_config(), &BackendRegistry::new()).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();

        let opts = AnalyzeOptions {
            cancel: cancel.clone(),
            ..AnalyzeOptions::default()
        };
        assert!(matches!(
            analyzer.analyze(&file, &opts),
            Err(AnalysisError::Cancelled)
        ));

        let opts = AnalyzeOptions {
            cancel,
            partial: PartialPolicy::Retain,
            ..AnalyzeOptions::default()
        };
        let report = analyzer.analyze(&file, &opts).unwrap();
        assert!(report.metadata.cancelled);
        assert!(report.frequencies.is_empty());
    }

    #[test]
    fn prefix_stripping_cannot_bypass_exclusions() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_csv(
            dir.path(),
            &[
                ("US 2021 Plan", "/a", "Folder"),
                ("AU Acme Industries", "/b", "Folder"),
            ],
        );
        let analyzer = Analyzer::new(basic_config(), &BackendRegistry::new()).unwrap();
        let report = analyzer.analyze(&file, &AnalyzeOptions::default()).unwrap();
        assert!(!report.frequencies.contains_key("Plan"));
        assert_eq!(report.frequencies["Acme Industries"], 1);
        assert_eq!(report.statistics.excluded_by_pattern, 1);
    }

    #[test]
    fn overlong_rows_are_reported_as_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ragged.csv");
        fs::write(&file, "Name,Path\nAcme Industries,/a\nGlobex,/g,x,y\n").unwrap();
        let analyzer = Analyzer::new(basic_config(), &BackendRegistry::new()).unwrap();
        let report = analyzer.analyze(&file, &AnalyzeOptions::default()).unwrap();
        assert_eq!(report.statistics.rows_malformed, 1);
        assert_eq!(report.statistics.rows_processed, 1);
        assert_eq!(report.frequencies.len(), 1);
    }

    #[test]
    fn cancelled_run_reads_no_further_batches() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ragged.csv");
        // a read would count the overlong first row
        fs::write(&file, "Name,Path\nGlobex,/g,x,y\nAcme Industries,/a\n").unwrap();
        let analyzer = Analyzer::new(basic_config(), &BackendRegistry::new()).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let opts = AnalyzeOptions {
            cancel,
            partial: PartialPolicy::Retain,
            batch_size: Some(1),
            ..AnalyzeOptions::default()
        };
        let report = analyzer.analyze(&file, &opts).unwrap();
        assert!(report.metadata.cancelled);
        assert_eq!(report.statistics.batches, 0);
        assert_eq!(report.statistics.rows_processed, 0);
        assert_eq!(report.statistics.rows_malformed, 0);
    }

    #[test]
    fn registry_selects_lexicon_by_default() {
        let cfg = AppConfig::default();
        let registry = build_registry(&cfg);
        assert!(registry.names().contains(&"lexicon".to_string()));
        let analyzer = Analyzer::new(cfg, &registry).unwrap();
        assert_eq!(analyzer.selection().backend.as_deref(), Some("lexicon"));
        assert!(analyzer.selection().degraded.is_none());
        assert!(analyzer.classify("2021 Acme Industries").is_company);
    }

    #[test]
    fn reload_recompiles_rules() {
        let mut analyzer = Analyzer::new(basic_config(), &BackendRegistry::new()).unwrap();
        assert!(analyzer.classify("Globex").is_company);

        let mut cfg = basic_config();
        cfg.patterns.exclude.push("Globex".into());
        analyzer.reload(cfg).unwrap();
        assert!(!analyzer.classify("Globex").is_company);

        let mut bad = basic_config();
        bad.analysis.batch_size = 0;
        assert!(analyzer.reload(bad).is_err());
        assert!(!analyzer.classify("Globex").is_company);
    }
}

use orgscan_core::categorizer::Category;
use orgscan_core::classifier::Reason;
use orgscan_core::config::AppConfig;
use orgscan_core::pipeline::build_registry;
use orgscan_core::{AnalysisError, AnalyzeOptions, Analyzer};
use providers::BackendRegistry;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const POOL: &[&str] = &[
    "Acme Industries",
    "AU Acme Industries",
    "Microsoft Corporation",
    "Globex",
    "Initech Consulting",
    "Jewish Care",
    "Boston Properties",
    "Northwind Traders",
    "NEM12#9981.csv",
    "v2.1.3",
    "PROP & VAR",
    "Customer Database",
    "Weekly Timesheet",
    "Umbrella Holdings",
    "Stark Logistics",
    "Wayne Enterprises",
    "Figure 7",
    "_scratch",
    "Hooli",
    "Cyberdyne Systems",
];

fn basic_analyzer() -> Analyzer {
    let mut cfg = AppConfig::default();
    cfg.nlp.provider = "basic".into();
    Analyzer::new(cfg, &BackendRegistry::new()).unwrap()
}

fn write_listing(dir: &Path, rows: usize) -> PathBuf {
    let mut body = String::from("filename,full_path,author,type,size,last_modified\n");
    for i in 0..rows {
        // skewed distribution so the top list has distinct counts
        let name = POOL[(i * i + i / 7) % POOL.len()];
        let kind = if i % 4 == 0 { "Item" } else { "Folder" };
        writeln!(
            body,
            "\"{name}\",/sites/shared/{}/{name},user{},{kind},{},2024-01-0{}",
            i % 17,
            i % 5,
            i * 10,
            1 + i % 9
        )
        .unwrap();
    }
    let file = dir.join("export.csv");
    fs::write(&file, body).unwrap();
    file
}

fn with_batch(size: usize) -> AnalyzeOptions {
    AnalyzeOptions {
        batch_size: Some(size),
        ..AnalyzeOptions::default()
    }
}

#[test]
fn batch_size_does_not_change_results() {
    let dir = tempdir().unwrap();
    let file = write_listing(dir.path(), 2_000);
    let analyzer = basic_analyzer();

    let small = analyzer.analyze(&file, &with_batch(10)).unwrap();
    let large = analyzer.analyze(&file, &with_batch(10_000)).unwrap();

    assert_eq!(small.frequencies, large.frequencies);
    assert_eq!(small.details, large.details);
    assert_eq!(small.statistics.batches, 200);
    assert_eq!(large.statistics.batches, 1);
    assert_eq!(small.statistics.rows_processed, 2_000);
}

#[test]
fn fifty_thousand_rows_agree_across_batch_sizes() {
    let dir = tempdir().unwrap();
    let file = write_listing(dir.path(), 50_000);
    let analyzer = basic_analyzer();

    let a = analyzer.analyze(&file, &with_batch(1_000)).unwrap();
    let b = analyzer.analyze(&file, &with_batch(25_000)).unwrap();

    let total_a: u64 = a.frequencies.values().sum();
    let total_b: u64 = b.frequencies.values().sum();
    assert_eq!(total_a, total_b);
    assert_eq!(total_a, a.statistics.accepted_rows);
    assert_eq!(a.top(10), b.top(10));
    assert_eq!(a.statistics.rows_processed, 50_000);
}

#[test]
fn frequency_never_exceeds_matching_rows() {
    let dir = tempdir().unwrap();
    let file = write_listing(dir.path(), 500);
    let analyzer = basic_analyzer();
    let report = analyzer.analyze(&file, &AnalyzeOptions::default()).unwrap();

    for (name, count) in &report.frequencies {
        let rows = (0..500)
            .map(|i| POOL[(i * i + i / 7) % POOL.len()])
            .filter(|raw| analyzer.clean(raw) == *name)
            .count() as u64;
        assert!(*count <= rows, "{name}: {count} > {rows}");
    }
    // "AU Acme Industries" folds into "Acme Industries"
    assert!(!report.frequencies.contains_key("AU Acme Industries"));
    assert!(report.frequencies.contains_key("Acme Industries"));
}

#[test]
fn scenario_names() {
    let analyzer = basic_analyzer();

    let ms = analyzer.classify("Microsoft Corporation");
    assert!(ms.is_company);
    assert_eq!(ms.confidence, 1.0);
    assert_eq!(ms.reasons, vec![Reason::KnownCompany]);

    assert_eq!(
        analyzer.classify("NEM12#123.csv").reasons,
        vec![Reason::TechnicalFile]
    );

    let prop = analyzer.classify("PROP & VAR");
    assert!(!prop.is_company);
    let cat = analyzer.categorize("PROP & VAR");
    assert_eq!(cat.category, Category::Abbreviation);
    assert_eq!(cat.description, "Proposal and Variation");

    assert_eq!(
        analyzer.classify("v2.1.3").reasons,
        vec![Reason::VersionNumber]
    );
    assert_eq!(analyzer.categorize("v2.1.3").category, Category::VersionNumber);

    let acme = analyzer.classify("Acme Industries");
    assert!(acme.is_company);
    assert_eq!(acme.reasons, vec![Reason::MultipleCapitalized]);
}

#[test]
fn known_companies_are_always_accepted() {
    let cfg = AppConfig::default();
    let known = cfg.lexicon.known_companies.clone();
    let analyzer = Analyzer::new(cfg.clone(), &build_registry(&cfg)).unwrap();
    for name in known {
        let r = analyzer.classify(&name);
        assert!(r.is_company, "{name}");
        assert_eq!(r.confidence, 1.0, "{name}");
    }
}

#[test]
fn categorize_is_total_and_deterministic() {
    let analyzer = basic_analyzer();
    for name in ["", " ", "@@@", "ÄÖÜ", "12", "a b c d e f", "Zürich Versicherung"] {
        let first = analyzer.categorize(name);
        assert_eq!(first, analyzer.categorize(name));
        assert!(!first.description.is_empty());
    }
}

#[test]
fn enhanced_run_records_variant() {
    let dir = tempdir().unwrap();
    let file = write_listing(dir.path(), 200);
    let cfg = AppConfig::default();
    let analyzer = Analyzer::new(cfg.clone(), &build_registry(&cfg)).unwrap();
    let report = analyzer.analyze(&file, &AnalyzeOptions::default()).unwrap();
    assert_eq!(report.metadata.classifier.backend.as_deref(), Some("lexicon"));
    assert_eq!(report.statistics.enhanced_fallbacks, 0);
    assert!(report.frequencies.contains_key("Microsoft Corporation"));
}

#[test]
fn degraded_backend_is_recorded_not_fatal() {
    let dir = tempdir().unwrap();
    let file = write_listing(dir.path(), 50);
    let mut cfg = AppConfig::default();
    cfg.nlp.provider = "noop".into();
    let analyzer = Analyzer::new(cfg.clone(), &build_registry(&cfg)).unwrap();
    let report = analyzer.analyze(&file, &AnalyzeOptions::default()).unwrap();
    let degraded = report.metadata.classifier.degraded.as_ref().unwrap();
    assert_eq!(degraded.backend, "noop");
    assert!(!report.frequencies.is_empty());
}

#[test]
fn missing_source_is_a_validation_error() {
    let dir = tempdir().unwrap();
    let analyzer = basic_analyzer();
    let err = analyzer
        .analyze(&dir.path().join("nope.csv"), &AnalyzeOptions::default())
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Validation { .. }));
}

#[test]
fn latin1_cells_under_utf8_header() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("latin.csv");
    let mut bytes = b"Name,Path\n".to_vec();
    bytes.extend_from_slice(b"Soci\xe9t\xe9 G\xe9n\xe9rale,/x\n");
    fs::write(&file, bytes).unwrap();

    let analyzer = basic_analyzer();
    let report = analyzer.analyze(&file, &AnalyzeOptions::default()).unwrap();
    assert_eq!(report.frequencies.get("Société Générale"), Some(&1));
}

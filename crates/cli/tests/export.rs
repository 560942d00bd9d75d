use chrono::{Local, TimeZone};
use cli::export::{export_report, text_summary, ExportFormat, ExportOptions};
use orgscan_core::config::AppConfig;
use orgscan_core::{AnalysisReport, AnalyzeOptions, Analyzer};
use orgscan_core::pipeline::build_registry;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn basic_analyzer() -> Analyzer {
    let mut cfg = AppConfig::default();
    cfg.nlp.provider = "basic".into();
    Analyzer::new(cfg.clone(), &build_registry(&cfg)).unwrap()
}

fn sample_report(dir: &Path) -> AnalysisReport {
    let file = dir.join("listing.csv");
    fs::write(
        &file,
        "Name,Path,Modified By,Item Type\n\
         Acme Industries,/c/acme,kim,Folder\n\
         AU Acme Industries,/c/acme/au,lee,Folder\n\
         Globex,/c/globex,kim,Folder\n\
         PROP & VAR,/c/x,kim,Folder\n\
         budget.xlsx,/c/acme,kim,Item\n",
    )
    .unwrap();
    basic_analyzer()
        .analyze(&file, &AnalyzeOptions::default())
        .unwrap()
}

#[test]
fn writes_all_formats_with_timestamped_names() {
    let dir = tempdir().unwrap();
    let report = sample_report(dir.path());
    let out = dir.path().join("out");
    let now = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
    let opts = ExportOptions {
        dir: out.clone(),
        base_filename: "companies".into(),
        formats: ExportFormat::parse_list(&["all".into()]).unwrap(),
        top: 10,
    };

    let written = export_report(&report, &opts, now).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "companies_20240305_140709.json",
            "companies_detailed_20240305_140709.json",
            "companies_20240305_140709.csv",
            "companies_20240305_140709.txt",
        ]
    );

    let basic: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(basic["Acme Industries"], 2);
    assert_eq!(basic["Globex"], 1);

    let detailed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[1]).unwrap()).unwrap();
    assert_eq!(detailed["statistics"]["rows_processed"], 5);
    assert_eq!(detailed["metadata"]["encoding"], "utf-8");
    assert_eq!(
        detailed["categories"]["Acme Industries"]["category"],
        "Potential Company"
    );

    let mut rdr = csv::Reader::from_path(&written[2]).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["Name", "Folder_Count", "Category", "Description"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "Acme Industries");
    assert_eq!(&rows[0][1], "2");
    assert_eq!(&rows[1][0], "Globex");

    let txt = fs::read_to_string(&written[3]).unwrap();
    assert!(txt.contains("COMPANY ANALYSIS REPORT"));
    assert!(txt.contains("Total companies found: 2"));
}

#[test]
fn text_summary_lists_top_names_and_buckets() {
    let dir = tempdir().unwrap();
    let report = sample_report(dir.path());
    let txt = text_summary(&report, 1, Local::now());
    assert!(txt.contains("  1. Acme Industries"));
    assert!(!txt.contains("  2. Globex"));
    assert!(txt.contains("Companies with 1 folder:        1"));
    assert!(txt.contains("Companies with 2-5 folders:     1"));
}

#[test]
fn empty_report_still_has_csv_header() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("noise.csv");
    fs::write(&file, "Name\nbudget.xlsx\n_tmp\n").unwrap();
    let report = basic_analyzer()
        .analyze(&file, &AnalyzeOptions::default())
        .unwrap();
    assert!(report.frequencies.is_empty());

    let opts = ExportOptions {
        dir: dir.path().to_path_buf(),
        base_filename: "empty".into(),
        formats: vec![ExportFormat::Csv],
        top: 5,
    };
    let written = export_report(&report, &opts, Local::now()).unwrap();
    let body = fs::read_to_string(&written[0]).unwrap();
    assert_eq!(body.trim(), "Name,Folder_Count,Category,Description");
}

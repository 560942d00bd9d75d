//! Flat-file exports of an analysis report: JSON, CSV and a text summary.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use orgscan_core::AnalysisReport;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
}

impl ExportFormat {
    pub fn parse(label: &str) -> Result<Self> {
        match label.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "txt" | "text" => Ok(ExportFormat::Txt),
            "all" => bail!("'all' must be expanded by the caller"),
            other => bail!("unknown export format '{other}' (expected json, csv, txt)"),
        }
    }

    /// Parses a list of labels; `all` selects every format.
    pub fn parse_list(labels: &[String]) -> Result<Vec<Self>> {
        if labels.iter().any(|l| l.trim().eq_ignore_ascii_case("all")) {
            return Ok(vec![ExportFormat::Json, ExportFormat::Csv, ExportFormat::Txt]);
        }
        let mut formats = Vec::new();
        for label in labels {
            let f = Self::parse(label)?;
            if !formats.contains(&f) {
                formats.push(f);
            }
        }
        Ok(formats)
    }
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub dir: PathBuf,
    pub base_filename: String,
    pub formats: Vec<ExportFormat>,
    pub top: usize,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Folder_Count")]
    folder_count: u64,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
}

pub fn timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Writes every requested format and returns the created paths.
pub fn export_report(
    report: &AnalysisReport,
    opts: &ExportOptions,
    now: DateTime<Local>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&opts.dir)
        .with_context(|| format!("creating output dir {}", opts.dir.display()))?;
    let stamp = timestamp(now);
    let mut written = Vec::new();
    for format in &opts.formats {
        match format {
            ExportFormat::Json => {
                let basic = opts.dir.join(format!("{}_{stamp}.json", opts.base_filename));
                write_json(&basic, &report.frequencies)?;
                written.push(basic);
                let detailed = opts
                    .dir
                    .join(format!("{}_detailed_{stamp}.json", opts.base_filename));
                write_json(&detailed, report)?;
                written.push(detailed);
            }
            ExportFormat::Csv => {
                let path = opts.dir.join(format!("{}_{stamp}.csv", opts.base_filename));
                write_csv(&path, report)?;
                written.push(path);
            }
            ExportFormat::Txt => {
                let path = opts.dir.join(format!("{}_{stamp}.txt", opts.base_filename));
                fs::write(&path, text_summary(report, opts.top, now))
                    .with_context(|| format!("writing {}", path.display()))?;
                written.push(path);
            }
        }
    }
    Ok(written)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))
}

fn write_csv(path: &Path, report: &AnalysisReport) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Name", "Folder_Count", "Category", "Description"])?;
    for (name, count) in report.top(usize::MAX) {
        let (category, description) = match report.categories.get(name) {
            Some(a) => (a.category.label(), a.description.as_str()),
            None => ("Unclassified", ""),
        };
        writer.serialize(CsvRow {
            name,
            folder_count: count,
            category,
            description,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn text_summary(report: &AnalysisReport, top: usize, now: DateTime<Local>) -> String {
    let stats = &report.statistics;
    let meta = &report.metadata;
    let mut out = String::new();
    let _ = writeln!(out, "COMPANY ANALYSIS REPORT");
    let _ = writeln!(out, "{}\n", "=".repeat(60));
    let _ = writeln!(out, "Generated: {}", now.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Source: {}", meta.source);
    let _ = writeln!(out, "Encoding: {}", meta.encoding.label());
    let _ = writeln!(out, "Filter type: {}", meta.filter_type);
    let _ = writeln!(out, "Classifier: {:?}", meta.classifier.variant);
    if let Some(degraded) = &meta.classifier.degraded {
        let _ = writeln!(out, "  degraded: {degraded}");
    }
    if meta.cancelled {
        let _ = writeln!(out, "Run was cancelled; results are partial.");
    }
    let _ = writeln!(out, "Rows processed: {}", stats.rows_processed);
    let _ = writeln!(out, "Excluded by pattern: {}", stats.excluded_by_pattern);
    let _ = writeln!(out, "Excluded by type: {}", stats.excluded_by_type);
    let _ = writeln!(out, "Excluded by path: {}", stats.excluded_by_path);
    let _ = writeln!(out, "Malformed rows: {}", stats.rows_malformed);
    let _ = writeln!(out, "Total companies found: {}", stats.unique_names);
    let _ = writeln!(out, "Total folder entries: {}\n", stats.accepted_rows);

    let _ = writeln!(out, "TOP COMPANIES BY FOLDER COUNT:");
    let _ = writeln!(out, "{}", "-".repeat(40));
    for (i, (name, count)) in report.top(top).into_iter().enumerate() {
        let _ = writeln!(out, "{:3}. {:<40} ({:3} folders)", i + 1, name, count);
    }

    let counts: Vec<u64> = report.frequencies.values().copied().collect();
    let bucket = |lo: u64, hi: u64| counts.iter().filter(|c| **c >= lo && **c <= hi).count();
    let _ = writeln!(out, "\nDISTRIBUTION ANALYSIS:");
    let _ = writeln!(out, "{}", "-".repeat(30));
    let _ = writeln!(out, "Companies with 1 folder:      {:3}", bucket(1, 1));
    let _ = writeln!(out, "Companies with 2-5 folders:   {:3}", bucket(2, 5));
    let _ = writeln!(out, "Companies with 6-10 folders:  {:3}", bucket(6, 10));
    let _ = writeln!(out, "Companies with 11-20 folders: {:3}", bucket(11, 20));
    let _ = writeln!(out, "Companies with 21+ folders:   {:3}", bucket(21, u64::MAX));

    let _ = writeln!(out, "\nCATEGORIES:");
    let _ = writeln!(out, "{}", "-".repeat(30));
    for (category, count) in report.category_summary() {
        let _ = writeln!(out, "{:<28} {:3}", category.label(), count);
    }
    out
}

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use cli::export::{export_report, ExportFormat, ExportOptions};
use cli::sources::csv_exports;
use orgscan_core::categorizer::NameCategorizer;
use orgscan_core::config::{self, AppConfig, FilterType};
use orgscan_core::ingest::inspect_columns;
use orgscan_core::pipeline::build_registry;
use orgscan_core::rules;
use orgscan_core::{AnalysisReport, AnalyzeOptions, Analyzer, CancelToken, PartialPolicy};
use std::path::PathBuf;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orgscan")]
#[command(about = "Find organization names in file-listing exports", long_about = None)]
struct Cli {
    /// Path to config file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct RunArgs {
    /// Rows per batch (overrides analysis.batch_size)
    #[arg(long)]
    batch_size: Option<usize>,
    /// Row filter: all, folders or files
    #[arg(long)]
    filter_type: Option<FilterType>,
    /// Output directory (overrides output.dir)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Export formats, comma-separated: json, csv, txt or all
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    format: Vec<String>,
    /// Entries in the top list
    #[arg(long)]
    top: Option<usize>,
    /// Keep the partial report when interrupted
    #[arg(long, default_value_t = false)]
    keep_partial: bool,
    /// Skip writing export files
    #[arg(long, default_value_t = false)]
    no_export: bool,
    /// Output JSON summary
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one listing export
    Analyze {
        file: PathBuf,
        /// Print names containing this text after the run
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Analyze every CSV export under a directory
    Batch {
        dir: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Classify names as company / not company
    Classify {
        #[arg(required = true)]
        names: Vec<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Assign a category and description to names
    Categorize {
        #[arg(required = true)]
        names: Vec<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show detected columns and a suggested mapping for an export
    Columns {
        file: PathBuf,
        /// Rows to sample
        #[arg(long, default_value_t = 5)]
        sample: usize,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref()).context("loading configuration")?;
    let applied = rules::apply_rule_dir(&mut cfg).context("loading rule files")?;
    if applied > 0 {
        info!(rule_files = applied, "rule files applied");
    }

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received; stopping after the current batch");
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Commands::Analyze { file, search, run } => {
            run_analyze(cfg, file, search, run, cancel).await
        }
        Commands::Batch { dir, run } => run_batch(cfg, dir, run, cancel).await,
        Commands::Classify { names, json } => run_classify(cfg, names, json).await,
        Commands::Categorize { names, json } => run_categorize(cfg, names, json).await,
        Commands::Columns { file, sample, json } => run_columns(cfg, file, sample, json).await,
    }
}

fn analyze_options(run: &RunArgs, cancel: CancelToken) -> AnalyzeOptions {
    AnalyzeOptions {
        cancel,
        partial: if run.keep_partial {
            PartialPolicy::Retain
        } else {
            PartialPolicy::Discard
        },
        batch_size: run.batch_size,
        filter_type: run.filter_type,
    }
}

fn export_options(cfg: &AppConfig, run: &RunArgs, base_filename: String) -> Result<ExportOptions> {
    let formats = if run.format.is_empty() {
        ExportFormat::parse_list(&cfg.output.formats)?
    } else {
        ExportFormat::parse_list(&run.format)?
    };
    Ok(ExportOptions {
        dir: run
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&cfg.output.dir)),
        base_filename,
        formats,
        top: run.top.unwrap_or(cfg.output.top),
    })
}

/// Build a fresh analyzer and run it on the blocking pool; the HTTP backend
/// uses a blocking client.
async fn analyze_blocking(
    cfg: AppConfig,
    file: PathBuf,
    opts: AnalyzeOptions,
) -> Result<AnalysisReport> {
    tokio::task::spawn_blocking(move || -> Result<AnalysisReport> {
        let registry = build_registry(&cfg);
        let analyzer = Analyzer::new(cfg, &registry)?;
        let report = analyzer
            .analyze(&file, &opts)
            .with_context(|| format!("analyzing {}", file.display()))?;
        Ok(report)
    })
    .await
    .context("analysis task failed")?
}

fn write_exports(
    cfg: &AppConfig,
    run: &RunArgs,
    report: &AnalysisReport,
    base: String,
) -> Result<Vec<PathBuf>> {
    if run.no_export {
        return Ok(Vec::new());
    }
    let opts = export_options(cfg, run, base)?;
    export_report(report, &opts, Local::now())
}

async fn run_analyze(
    cfg: AppConfig,
    file: PathBuf,
    search: Option<String>,
    run: RunArgs,
    cancel: CancelToken,
) -> Result<()> {
    let report = analyze_blocking(cfg.clone(), file, analyze_options(&run, cancel)).await?;
    let files = write_exports(&cfg, &run, &report, cfg.output.base_filename.clone())?;
    let top = run.top.unwrap_or(cfg.output.top);
    let matches = search.as_deref().map(|q| report.search(q));

    if run.json {
        let out = serde_json::json!({
            "success": true,
            "message": summary_line(&report),
            "files": files,
            "statistics": report.statistics,
            "classifier": report.metadata.classifier,
            "top": report.top(top),
            "matches": matches,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("success: {}", summary_line(&report));
    if let Some(degraded) = &report.metadata.classifier.degraded {
        println!("note: {degraded}");
    }
    for (i, (name, count)) in report.top(top).into_iter().enumerate() {
        let category = report
            .categories
            .get(name)
            .map(|c| c.category.label())
            .unwrap_or("Unclassified");
        println!("{:3}. {:<40} {:>5}  {}", i + 1, name, count, category);
    }
    if let (Some(q), Some(found)) = (search.as_deref(), &matches) {
        println!("\nmatches for '{q}': {}", found.len());
        for (name, count) in found {
            println!("  {name} ({count})");
        }
    }
    for f in &files {
        println!("wrote {}", f.display());
    }
    Ok(())
}

fn summary_line(report: &AnalysisReport) -> String {
    let s = &report.statistics;
    let mut line = format!(
        "{} companies from {} accepted rows ({} rows read)",
        s.unique_names, s.accepted_rows, s.rows_processed
    );
    if report.metadata.cancelled {
        line.push_str(", cancelled");
    }
    line
}

async fn run_batch(cfg: AppConfig, dir: PathBuf, run: RunArgs, cancel: CancelToken) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }
    let export_dir = run
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.output.dir));
    let files = csv_exports(&dir, Some(&export_dir));
    info!(count = files.len(), dir = %dir.display(), "batch analysis");

    let mut tasks = JoinSet::new();
    for file in files {
        let cfg = cfg.clone();
        let opts = analyze_options(&run, cancel.clone());
        tasks.spawn(async move {
            let result = analyze_blocking(cfg, file.clone(), opts).await;
            (file, result)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (file, result) = joined.context("batch task failed")?;
        let outcome = match result {
            Ok(report) => {
                let stem = file
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("export")
                    .to_string();
                let base = format!("{}_{stem}", cfg.output.base_filename);
                match write_exports(&cfg, &run, &report, base) {
                    Ok(written) => serde_json::json!({
                        "file": file,
                        "success": true,
                        "message": summary_line(&report),
                        "exports": written,
                    }),
                    Err(err) => serde_json::json!({
                        "file": file,
                        "success": false,
                        "message": format!("{err:#}"),
                    }),
                }
            }
            Err(err) => {
                error!(file = %file.display(), error = %format!("{err:#}"), "analysis failed");
                serde_json::json!({
                    "file": file,
                    "success": false,
                    "message": format!("{err:#}"),
                })
            }
        };
        results.push(outcome);
    }
    results.sort_by(|a, b| a["file"].as_str().cmp(&b["file"].as_str()));

    let ok = results.iter().filter(|r| r["success"] == true).count();
    if run.json {
        let out = serde_json::json!({
            "success": ok == results.len(),
            "message": format!("{ok} of {} exports analyzed", results.len()),
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for r in &results {
            let flag = if r["success"] == true { "ok" } else { "failed" };
            println!(
                "{flag}: {} - {}",
                r["file"].as_str().unwrap_or_default(),
                r["message"].as_str().unwrap_or_default()
            );
        }
        println!("{ok} of {} exports analyzed", results.len());
    }
    Ok(())
}

async fn run_classify(cfg: AppConfig, names: Vec<String>, json: bool) -> Result<()> {
    let rows = tokio::task::spawn_blocking(move || -> Result<Vec<serde_json::Value>> {
        let registry = build_registry(&cfg);
        let analyzer = Analyzer::new(cfg, &registry)?;
        Ok(names
            .iter()
            .map(|name| {
                let cleaned = analyzer.clean(name);
                let result = analyzer.classify(name);
                serde_json::json!({
                    "name": name,
                    "cleaned": cleaned,
                    "is_company": result.is_company,
                    "confidence": result.confidence,
                    "raw_score": result.raw_score,
                    "reasons": result.reasons,
                    "variant": result.variant,
                })
            })
            .collect())
    })
    .await
    .context("classification task failed")??;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for r in &rows {
            let verdict = if r["is_company"] == true { "company" } else { "not a company" };
            let reasons: Vec<&str> = r["reasons"]
                .as_array()
                .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
                .unwrap_or_default();
            println!(
                "{}: {verdict} ({:.2}) [{}]",
                r["name"].as_str().unwrap_or_default(),
                r["confidence"].as_f64().unwrap_or_default(),
                reasons.join(", ")
            );
        }
    }
    Ok(())
}

async fn run_categorize(cfg: AppConfig, names: Vec<String>, json: bool) -> Result<()> {
    let categorizer = NameCategorizer::new(&cfg)?;
    let assignments = categorizer.categorize_all(names.iter().map(String::as_str));
    if json {
        let rows: Vec<_> = assignments
            .iter()
            .map(|(name, a)| {
                serde_json::json!({
                    "name": name,
                    "category": a.category,
                    "description": a.description,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for (name, a) in &assignments {
            println!("{name}: {} - {}", a.category, a.description);
        }
    }
    Ok(())
}

async fn run_columns(cfg: AppConfig, file: PathBuf, sample: usize, json: bool) -> Result<()> {
    let proposal = inspect_columns(&file, sample, &cfg.columns)
        .with_context(|| format!("inspecting {}", file.display()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&proposal)?);
        return Ok(());
    }
    println!("encoding: {}", proposal.encoding.label());
    println!("headers: {}", proposal.headers.join(" | "));
    for (field, header) in &proposal.suggested {
        println!("  {:<12} <- {header}", field.canonical_header());
    }
    for field in &proposal.missing {
        println!("  {:<12} (not mapped)", field.canonical_header());
    }
    for entry in &proposal.sample {
        println!("  sample: {} | {} | {}", entry.name, entry.path, entry.item_type);
    }
    Ok(())
}

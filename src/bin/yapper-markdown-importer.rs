//! yapper-markdown-importer - Turn markdown files into OpenYapper content drafts
//!
//! Usage:
//!   yapper-markdown-importer -f post.md -o post.json
//!   yapper-markdown-importer -f post.md --suffix random --report report.txt --report-format text
//!   yapper-markdown-importer -d ./posts -o ./drafts
//!   cat post.md | yapper-markdown-importer > post.json

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context};
use clap::{Parser as ClapParser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use yapper_import::importer::{
    validate, ImportCandidate, ImportError, ImportOptions, ImportOutcome, ImportReport,
    MarkdownParser, SlugSuffix,
};

#[derive(ValueEnum, Clone, Debug)]
enum SuffixArg {
    /// Current time in milliseconds
    Timestamp,
    /// Random 8 character token
    Random,
}

#[derive(ValueEnum, Clone, Debug)]
enum ReportFormat {
    /// JSON format
    Json,
    /// Human-readable text
    Text,
}

#[derive(ClapParser)]
#[command(
    version,
    about = "Convert markdown files to OpenYapper content drafts",
    long_about = "Validates markdown files and extracts title, body, excerpt, slug and meta title \
                  as a JSON draft for the content API.\n\n\
                  The document must contain exactly one level-1 heading (`# Title`).\n\
                  If no input file is specified, reads from stdin.\n\
                  If no output file is specified, writes to stdout."
)]
struct Cli {
    /// Input markdown file (reads from stdin if not specified)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output JSON file, or output directory in batch mode
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Batch import a directory
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// File pattern for batch import
    #[arg(long, default_value = "*.md")]
    pattern: String,

    /// Slug suffix strategy (overrides the config file)
    #[arg(long, value_enum)]
    suffix: Option<SuffixArg>,

    /// TOML config file with an [import] section
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write an import report
    #[arg(long, value_name = "REPORT_FILE")]
    report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    report_format: ReportFormat,

    /// Parse and report without writing drafts
    #[arg(long)]
    dry_run: bool,

    /// debug log file
    #[arg(long, value_name = "FILE")]
    debuglogfile: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn init_logger(filter_level: log::LevelFilter, logfile: Option<&Path>) -> anyhow::Result<()> {
    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = Vec::new();
    loggers.push(simplelog::TermLogger::new(
        filter_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ));
    if let Some(filename) = logfile {
        let file = File::create(filename)
            .with_context(|| format!("cannot create log file {}", filename.display()))?;
        loggers.push(simplelog::WriteLogger::new(
            filter_level,
            simplelog::Config::default(),
            file,
        ));
    }
    simplelog::CombinedLogger::init(loggers)?;
    Ok(())
}

fn load_options(args: &Cli) -> anyhow::Result<ImportOptions> {
    let mut options = match &args.config {
        Some(path) => ImportOptions::load(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => ImportOptions::default(),
    };
    if let Some(suffix) = &args.suffix {
        options = options.with_suffix(match suffix {
            SuffixArg::Timestamp => SlugSuffix::Timestamp,
            SuffixArg::Random => SlugSuffix::Random,
        });
    }
    Ok(options)
}

/// Human readable form of an import failure, with the classification key
/// when there is one.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ImportError>() {
        Some(import_err) => format!("[{}] {}", import_err.key(), import_err),
        None => format!("{:#}", err),
    }
}

fn import_path(parser: &MarkdownParser, path: &Path) -> anyhow::Result<ImportOutcome> {
    let candidate = ImportCandidate::from_path(path)
        .with_context(|| format!("cannot stat {}", path.display()))?;
    validate(&candidate)?;
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(parser.import(&content, &path.display().to_string())?)
}

fn write_report(content: String, path: &Path) -> anyhow::Result<()> {
    fs::write(path, content).with_context(|| format!("cannot write report {}", path.display()))?;
    log::info!("✓ Report written to {}", path.display());
    Ok(())
}

fn render_report(report: &ImportReport, format: &ReportFormat) -> anyhow::Result<String> {
    Ok(match format {
        ReportFormat::Json => report.to_json()?,
        ReportFormat::Text => report.to_text(),
    })
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logger(
        args.verbose.log_level_filter(),
        args.debuglogfile.as_deref(),
    )?;

    let parser = MarkdownParser::new(load_options(&args)?);

    if let Some(ref dir) = args.directory {
        return batch_import(&parser, dir, &args);
    }

    let outcome = match &args.file {
        Some(path) => import_path(&parser, path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            parser.import(&buffer, "stdin").map_err(anyhow::Error::from)
        }
    };
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("✗ {}", describe(&e));
            std::process::exit(1);
        }
    };

    for warning in &outcome.report.warnings {
        log::warn!("⚠ {}", warning);
    }

    if args.dry_run {
        eprintln!("\n{}", outcome.report.to_text());
    } else {
        let json = serde_json::to_string_pretty(&outcome.draft)?;
        match &args.output {
            Some(path) => {
                let mut writer = BufWriter::new(
                    File::create(path)
                        .with_context(|| format!("cannot create {}", path.display()))?,
                );
                writeln!(writer, "{}", json)?;
                writer.flush()?;
                log::info!(
                    "✓ Imported {} as {} ({})",
                    outcome.report.source,
                    path.display(),
                    outcome.draft.slug
                );
            }
            None => {
                let stdout = io::stdout();
                let mut writer = BufWriter::new(stdout.lock());
                writeln!(writer, "{}", json)?;
                writer.flush()?;
            }
        }
    }

    if let Some(report_path) = &args.report {
        write_report(
            render_report(&outcome.report, &args.report_format)?,
            report_path,
        )?;
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct BatchReport {
    input_directory: String,
    output_directory: Option<String>,
    files_processed: usize,
    files_succeeded: usize,
    files_failed: usize,
    total_warnings: usize,
    duration_ms: u64,
    files: Vec<FileReport>,
}

#[derive(serde::Serialize)]
struct FileReport {
    input: String,
    output: Option<String>,
    status: String,
    /// Classification key or message of the failure
    error: Option<String>,
    warnings: usize,
}

fn batch_import(parser: &MarkdownParser, dir: &Path, args: &Cli) -> anyhow::Result<()> {
    let output_dir = match (&args.output, args.dry_run) {
        (Some(out), _) => Some(out.as_path()),
        (None, true) => None,
        (None, false) => return Err(anyhow!("output directory required for batch import")),
    };

    if let Some(output_dir) = output_dir {
        if !args.dry_run && !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }
    }

    let start_time = Instant::now();
    let pattern = format!("{}/{}", dir.display(), args.pattern);
    let entries: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| anyhow!("invalid pattern: {}", e))?
        .filter_map(|e| e.ok())
        .collect();

    let mut files = Vec::with_capacity(entries.len());
    for input_path in entries {
        let output_path = output_dir.map(|out| {
            out.join(
                input_path
                    .strip_prefix(dir)
                    .unwrap_or(&input_path)
                    .with_extension("json"),
            )
        });
        log::debug!("importing {}", input_path.display());

        let result = import_path(parser, &input_path).and_then(|outcome| {
            if let (Some(path), false) = (&output_path, args.dry_run) {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, serde_json::to_string_pretty(&outcome.draft)?)
                    .with_context(|| format!("cannot write {}", path.display()))?;
            }
            Ok(outcome)
        });

        let file_report = match result {
            Ok(outcome) => {
                for warning in &outcome.report.warnings {
                    log::warn!("  ⚠ {}: {}", input_path.display(), warning);
                }
                FileReport {
                    input: input_path.display().to_string(),
                    output: output_path.map(|p| p.display().to_string()),
                    status: if outcome.report.warnings.is_empty() {
                        "success".to_string()
                    } else {
                        "success_with_warnings".to_string()
                    },
                    error: None,
                    warnings: outcome.report.warnings.len(),
                }
            }
            Err(e) => {
                log::error!(
                    "✗ Failed to import {}: {}",
                    input_path.display(),
                    describe(&e)
                );
                FileReport {
                    input: input_path.display().to_string(),
                    output: None,
                    status: "failed".to_string(),
                    error: Some(describe(&e)),
                    warnings: 0,
                }
            }
        };
        files.push(file_report);
    }

    let failed = files.iter().filter(|f| f.status == "failed").count();
    let batch_report = BatchReport {
        input_directory: dir.display().to_string(),
        output_directory: output_dir.map(|p| p.display().to_string()),
        files_processed: files.len(),
        files_succeeded: files.len() - failed,
        files_failed: failed,
        total_warnings: files.iter().map(|f| f.warnings).sum(),
        duration_ms: start_time.elapsed().as_millis() as u64,
        files,
    };

    eprintln!("\nBatch Import Summary");
    eprintln!("====================");
    eprintln!("Files processed: {}", batch_report.files_processed);
    eprintln!("Succeeded:       {}", batch_report.files_succeeded);
    eprintln!("Failed:          {}", batch_report.files_failed);
    eprintln!("Total warnings:  {}", batch_report.total_warnings);
    eprintln!("Duration:        {}ms", batch_report.duration_ms);
    if args.dry_run {
        eprintln!("\n(Dry run - no files were written)");
    }

    if let Some(report_path) = &args.report {
        let content = match args.report_format {
            ReportFormat::Json => serde_json::to_string_pretty(&batch_report)?,
            ReportFormat::Text => format_batch_report_text(&batch_report),
        };
        write_report(content, report_path)?;
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn format_batch_report_text(report: &BatchReport) -> String {
    let mut output = String::new();

    output.push_str("Batch Import Report\n");
    output.push_str("===================\n");
    output.push_str(&format!("Input directory:  {}\n", report.input_directory));
    if let Some(output_dir) = &report.output_directory {
        output.push_str(&format!("Output directory: {}\n", output_dir));
    }
    output.push_str(&format!("Duration:         {}ms\n\n", report.duration_ms));

    output.push_str("Summary\n");
    output.push_str("-------\n");
    output.push_str(&format!("Files processed:  {}\n", report.files_processed));
    output.push_str(&format!("Succeeded:        {}\n", report.files_succeeded));
    output.push_str(&format!("Failed:           {}\n", report.files_failed));
    output.push_str(&format!("Total warnings:   {}\n\n", report.total_warnings));

    output.push_str("Files\n");
    output.push_str("-----\n");
    for file in &report.files {
        match (&file.error, &file.output) {
            (Some(error), _) => output.push_str(&format!("✗ {} ({})\n", file.input, error)),
            (None, Some(out)) => output.push_str(&format!(
                "{} {} -> {} ({} warnings)\n",
                if file.warnings == 0 { "✓" } else { "⚠" },
                file.input,
                out,
                file.warnings
            )),
            (None, None) => output.push_str(&format!(
                "{} {} ({} warnings)\n",
                if file.warnings == 0 { "✓" } else { "⚠" },
                file.input,
                file.warnings
            )),
        }
    }

    output
}

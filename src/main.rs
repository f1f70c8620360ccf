use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use photodup::core::analysis::{
    AnalysisOutcome, AnalysisPhase, AnalysisReport, Analyzer, SourceDocument,
};
use photodup::export::{self, ExportDocument};
use photodup::AnalysisConfig;

#[derive(Parser, Debug)]
#[command(
    name = "photodup",
    version,
    about = "Detect duplicate photos across PDF inspection reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the duplicate check and print the findings
    Check(CheckArgs),

    /// Run the duplicate check and write the results to a file
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// PDF report files to analyze
    #[arg(value_name = "PDF")]
    files: Vec<PathBuf>,

    /// Also analyze every PDF found under this directory
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Minimum photo width in pixels (smaller images are treated as
    /// icons or logos and ignored)
    #[arg(long, default_value_t = 650)]
    min_width: u32,

    /// Minimum photo height in pixels
    #[arg(long, default_value_t = 450)]
    min_height: u32,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Print the full report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    out: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Which table to write when the format is CSV
    #[arg(long, value_enum, default_value_t = ExportTable::Duplicates)]
    table: ExportTable,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportTable {
    Photos,
    Duplicates,
    Groups,
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Export(args) => run_export(args),
    }
}

fn run_check(args: CheckArgs) -> Result<ExitCode> {
    let documents = gather_documents(&args.input)?;
    let report = analyze(&args.input, &documents)?;

    if args.json {
        let doc = ExportDocument::from_report(&report);
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(exit_code_for(&report.outcome()));
    }

    for skip in &report.skipped {
        eprintln!("⚠️ Skipped {}: {}", skip.name, skip.reason);
    }

    write_findings(&mut io::stdout().lock(), &report, documents.len())?;

    Ok(exit_code_for(&report.outcome()))
}

/// Text rendering of one run: the extracted-photo listing (shown on
/// every run that found photos, duplicates or not), then the
/// outcome-specific findings.
fn write_findings<W: Write>(
    out: &mut W,
    report: &AnalysisReport,
    document_count: usize,
) -> io::Result<()> {
    let photos = export::record_rows(report);
    if !photos.is_empty() {
        writeln!(out, "📸 Extracted inspection photos:")?;
        for row in &photos {
            writeln!(
                out,
                "   {} — page {} ({}x{}) {}",
                row.file, row.page, row.width, row.height, row.fingerprint
            )?;
        }
        writeln!(out)?;
    }

    match report.outcome() {
        AnalysisOutcome::NoPhotos => {
            writeln!(
                out,
                "No inspection photos found in {document_count} report(s)."
            )?;
        }
        AnalysisOutcome::NoDuplicates { photo_count } => {
            writeln!(
                out,
                "No duplicate inspection photos detected among {photo_count} photo(s)."
            )?;
        }
        AnalysisOutcome::DuplicatesFound {
            photo_count,
            set_count,
        } => {
            writeln!(
                out,
                "🚨 Duplicate inspection photos detected: {set_count} set(s) among {photo_count} photo(s)."
            )?;
            for (i, set) in report.duplicate_sets.iter().enumerate() {
                writeln!(out, "\n▶ Duplicate set {} — {}", i + 1, set.fingerprint)?;
                for rec in &set.records {
                    writeln!(
                        out,
                        "   {} — page {} ({}x{})",
                        rec.source, rec.page_index, rec.width, rec.height
                    )?;
                }
            }
            writeln!(out, "\n▶ Related report groups:")?;
            for (i, group) in report.report_groups.iter().enumerate() {
                writeln!(out, "   Group {}: {}", i + 1, group.members.join(", "))?;
            }
        }
    }
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<ExitCode> {
    let documents = gather_documents(&args.input)?;
    let report = analyze(&args.input, &documents)?;

    let out = File::create(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;
    match args.format {
        ExportFormat::Csv => match args.table {
            ExportTable::Photos => export::write_csv(&export::record_rows(&report), out)?,
            ExportTable::Duplicates => export::write_csv(&export::duplicate_rows(&report), out)?,
            ExportTable::Groups => export::write_csv(&export::group_rows(&report), out)?,
        },
        ExportFormat::Json => {
            serde_json::to_writer_pretty(out, &ExportDocument::from_report(&report))?;
        }
    }
    println!("▶ Wrote {}", args.out.display());

    Ok(exit_code_for(&report.outcome()))
}

fn analyze(input: &InputArgs, documents: &[SourceDocument]) -> Result<AnalysisReport> {
    let config = AnalysisConfig::new(input.min_width, input.min_height);

    let bar = ProgressBar::new(documents.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40.green} {pos}/{len} {msg}",
    )?);
    let progress_bar = bar.clone();
    let analyzer = Analyzer::new(config).with_progress(Box::new(move |progress| {
        progress_bar.set_position(progress.documents_processed as u64);
        if progress.phase == AnalysisPhase::Extracting {
            progress_bar.set_message(progress.current_document);
        }
    }));

    let report = analyzer.run(documents)?;
    bar.finish_and_clear();
    Ok(report)
}

/// Gather PDFs from explicit paths plus an optional directory scan.
/// Document names are the file names, which the analyzer requires to be
/// unique within the batch.
fn gather_documents(input: &InputArgs) -> Result<Vec<SourceDocument>> {
    let mut paths = input.files.clone();
    if let Some(dir) = &input.dir {
        let mut found = Vec::new();
        for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
            let path = entry.path();
            if path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
            {
                found.push(path.to_path_buf());
            }
        }
        found.sort();
        paths.extend(found);
    }

    let mut documents = Vec::with_capacity(paths.len());
    for path in &paths {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(SourceDocument::new(name, bytes));
    }
    Ok(documents)
}

fn exit_code_for(outcome: &AnalysisOutcome) -> ExitCode {
    // Duplicates get a distinct exit code so scripts can branch on it.
    match outcome {
        AnalysisOutcome::DuplicatesFound { .. } => ExitCode::from(2),
        _ => ExitCode::SUCCESS,
    }
}

//! CLI binary for pdf-link-scan.
//!
//! A thin shim over the library crate that maps CLI flags to `ScanConfig`,
//! drives one upload, and prints the report.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_link_scan::{
    download_report, open_image, open_link, report_json, FailedImages, FileCandidate,
    HttpBackend, PdfFile, ReportOptions, ReportView, ScanConfig, ScanError, ScanEvents,
    ScanSession, SystemOpener, UploadForm, DEFAULT_ENDPOINT,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI event sink using indicatif ───────────────────────────────────────────

/// Terminal event sink: a spinner while the upload is in flight and
/// coloured one-line notices on stderr.
struct CliEvents {
    spinner: Mutex<Option<ProgressBar>>,
    show_progress: bool,
    quiet: bool,
}

impl CliEvents {
    fn new(show_progress: bool, quiet: bool) -> Arc<Self> {
        Arc::new(Self {
            spinner: Mutex::new(None),
            show_progress,
            quiet,
        })
    }

    fn start_spinner(&self) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Scanning");
        bar.set_message("Analyzing your PDF file…");
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }
}

impl ScanEvents for CliEvents {
    fn on_file_accepted(&self, name: &str) {
        if !self.quiet {
            eprintln!("{} Selected: {}", cyan("◆"), bold(name));
        }
    }

    fn on_notice(&self, error: &ScanError) {
        // Notices are the user-facing error channel, so they print even in quiet mode.
        eprintln!("{} {}", red("✘"), red(&error.to_string()));
    }

    fn on_loading_changed(&self, loading: bool) {
        if !self.show_progress {
            return;
        }
        let mut slot = match self.spinner.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if loading {
            *slot = Some(self.start_spinner());
        } else if let Some(bar) = slot.take() {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Scan a PDF and print the full report
  pdfscan invoice.pdf

  # Only images carrying clickable links, plus the raw backend answer
  pdfscan --view security invoice.pdf

  # Save report.json next to the PDF
  pdfscan --save-report --report-dir . invoice.pdf

  # Check which extracted images the backend can actually serve
  pdfscan --probe-images invoice.pdf

  # Open the second detected link in the default browser
  pdfscan --open-link 2 invoice.pdf

  # Is the backend up?
  pdfscan --health

VIEWS:
  full       all images, statistics, link details (default)
  gallery    all images with badges only
  security   clickable images only, statistics, link details, raw JSON

ENVIRONMENT VARIABLES:
  PDFSCAN_ENDPOINT        Analysis endpoint URL (default: http://localhost:8000/upload)
  PDFSCAN_FIELD           Multipart field name (default: file)
  PDFSCAN_TIMEOUT         Request timeout in seconds (default: none)
  RUST_LOG                Override log filter (e.g. pdf_link_scan=debug)
"#;

/// Upload PDFs to an image-link analysis backend and report clickable images.
#[derive(Parser, Debug)]
#[command(
    name = "pdfscan",
    version,
    about = "Upload a PDF to the analysis backend and report images with clickable links",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to scan.
    #[arg(required_unless_present = "health")]
    input: Option<PathBuf>,

    /// Analysis endpoint URL.
    #[arg(long, env = "PDFSCAN_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Multipart field name carrying the PDF.
    #[arg(long, env = "PDFSCAN_FIELD", default_value = "file")]
    field: String,

    /// Request timeout in seconds (default: wait indefinitely).
    #[arg(long, env = "PDFSCAN_TIMEOUT")]
    timeout: Option<u64>,

    /// Report layout preset.
    #[arg(long, env = "PDFSCAN_VIEW", value_enum, default_value = "full")]
    view: ViewArg,

    /// Show only images flagged with a clickable link.
    #[arg(long)]
    clickable_only: bool,

    /// Hide the statistics line.
    #[arg(long)]
    no_stats: bool,

    /// Hide per-link details.
    #[arg(long)]
    no_link_details: bool,

    /// Append the raw backend result as JSON.
    #[arg(long)]
    raw: bool,

    /// Print the result as JSON on stdout instead of the text report.
    #[arg(long, env = "PDFSCAN_JSON")]
    json: bool,

    /// Save the full result as report.json.
    #[arg(long)]
    save_report: bool,

    /// Directory to save report.json into.
    #[arg(long, env = "PDFSCAN_REPORT_DIR", default_value = ".")]
    report_dir: PathBuf,

    /// Fetch every extracted image and mark the ones that fail to load.
    #[arg(long)]
    probe_images: bool,

    /// Concurrent image fetches when probing.
    #[arg(long, default_value_t = 8)]
    probe_concurrency: usize,

    /// Open the N-th listed image (1-based) with the system opener.
    #[arg(long, value_name = "N")]
    open_image: Option<usize>,

    /// Open the N-th listed link (1-based) with the system opener.
    #[arg(long, value_name = "N")]
    open_link: Option<usize>,

    /// Only check whether the backend is reachable.
    #[arg(long)]
    health: bool,

    /// Disable the spinner.
    #[arg(long, env = "PDFSCAN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSCAN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the report and errors.
    #[arg(short, long, env = "PDFSCAN_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ViewArg {
    Full,
    Gallery,
    Security,
}

impl From<ViewArg> for ReportOptions {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::Full => ReportOptions::default(),
            ViewArg::Gallery => ReportOptions::gallery(),
            ViewArg::Security => ReportOptions::security(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let events = CliEvents::new(show_progress, cli.quiet);
    let config = build_config(&cli, Arc::clone(&events))?;

    // ── Health-only mode ─────────────────────────────────────────────────
    if cli.health {
        let backend = HttpBackend::from_config(&config).context("Invalid endpoint")?;
        let url = backend.health_url()?;
        return match backend.health().await {
            Ok(true) => {
                println!("{} backend healthy  {}", green("✔"), dim(&url));
                Ok(ExitCode::SUCCESS)
            }
            Ok(false) => {
                println!("{} backend answered but is not healthy  {}", red("✘"), dim(&url));
                Ok(ExitCode::FAILURE)
            }
            Err(e) => {
                eprintln!("{} {}", red("✘"), e);
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let input = cli
        .input
        .clone()
        .context("A PDF file is required unless --health is given")?;

    // ── Select + submit ──────────────────────────────────────────────────
    // Rejections are already printed as notices by the event sink.
    let mut submitted: Option<PdfFile> = None;
    {
        let mut form = UploadForm::new(|file| submitted = Some(file)).with_events(events.clone());
        if form.select(FileCandidate::from_path(&input)).is_err() {
            return Ok(ExitCode::FAILURE);
        }
        form.submit().context("Nothing to submit")?;
    }
    let file = submitted.context("Upload form did not hand over a file")?;

    // ── Upload ───────────────────────────────────────────────────────────
    let mut session = ScanSession::new(&config).context("Failed to set up session")?;
    if session.upload(file).await.is_err() {
        return Ok(ExitCode::FAILURE);
    }
    let result = session
        .result()
        .context("Upload succeeded but no result was stored")?;

    // ── Image probing ────────────────────────────────────────────────────
    let mut failed = FailedImages::new();
    if cli.probe_images {
        let failures = failed
            .probe(session.backend().as_ref(), result, config.probe_concurrency)
            .await;
        if !cli.quiet && !failures.is_empty() {
            eprintln!(
                "{} {} image(s) failed to load",
                cyan("⚠"),
                bold(&failures.len().to_string())
            );
        }
    }

    // ── Output ───────────────────────────────────────────────────────────
    let view = ReportView::build(result, &config.report, &failed)?;
    if cli.json {
        println!("{}", report_json(result)?);
    } else {
        print!("{view}");
    }

    if cli.save_report {
        let path = download_report(result, &cli.report_dir).context("Failed to save report")?;
        if !cli.quiet {
            eprintln!("{} Report saved to {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    // ── Open actions ─────────────────────────────────────────────────────
    if let Some(n) = cli.open_image {
        let card = view
            .sections
            .iter()
            .flat_map(|s| s.cards.iter())
            .nth(n.saturating_sub(1))
            .with_context(|| format!("No image #{n} in the report"))?;
        open_image(&SystemOpener, card)?;
    }
    if let Some(n) = cli.open_link {
        let button = view
            .sections
            .iter()
            .flat_map(|s| s.cards.iter())
            .flat_map(|c| c.links.iter())
            .nth(n.saturating_sub(1))
            .with_context(|| format!("No link #{n} in the report"))?;
        open_link(&SystemOpener, button)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Map CLI args to `ScanConfig`.
fn build_config(cli: &Cli, events: Arc<CliEvents>) -> Result<ScanConfig> {
    let mut report: ReportOptions = cli.view.into();
    if cli.clickable_only {
        report.clickable_only = true;
    }
    if cli.no_stats {
        report.show_stats = false;
    }
    if cli.no_link_details {
        report.show_link_details = false;
    }
    if cli.raw {
        report.show_raw = true;
    }

    let mut builder = ScanConfig::builder()
        .endpoint(&cli.endpoint)
        .field_name(&cli.field)
        .probe_concurrency(cli.probe_concurrency)
        .report(report)
        .events(events);
    if let Some(secs) = cli.timeout {
        builder = builder.timeout_secs(secs);
    }

    builder.build().context("Invalid configuration")
}

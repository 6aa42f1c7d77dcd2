//! CLI binary for edgequake-pdf2jpg.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig`, runs the conversion and writes the images.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2jpg::{
    convert, deliver_all, inspect, ConversionConfig, ConversionProgressCallback, DeliveryMode,
    DirectorySink, PageSelection, ProgressCallback, QualityTier, TracingProgressCallback,
    ZipPackager,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live progress bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Starts as a spinner; `on_conversion_start` turns it into a bar once
    /// the number of selected pages is known.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Rendering");
        self.bar.reset_eta();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, current: usize, total: usize, page_num: usize, jpeg_bytes: usize) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  page {:<4}  {}",
            green("✓"),
            current,
            total,
            page_num,
            dim(&format!("{:.1} KiB", jpeg_bytes as f64 / 1024.0)),
        ));
        self.bar.set_position(current as u64);
    }

    fn on_page_error(&self, page_num: usize, _total: usize, error: &str) {
        self.bar.println(format!("  {} page {}  {}", red("✗"), page_num, red(error)));
        self.bar.abandon();
    }

    fn on_conversion_complete(&self, _total_pages: usize, _success_count: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every page at medium quality into the current directory
  pdf2jpg report.pdf

  # Selected pages, high quality, into ./images
  pdf2jpg --pages "1-3, 5, 7-10" --quality high report.pdf -o images

  # All pages bundled as report.zip
  pdf2jpg --zip report.pdf -o out

  # Inspect PDF metadata
  pdf2jpg --inspect-only report.pdf

PAGE SELECTION:
  Comma-separated pages and inclusive ranges, e.g. "1-3, 5, 7-10".
  Tokens that are not numbers or fall outside the document are ignored.

QUALITY:
  high     2.0× scale, JPEG quality 95
  medium   1.5× scale, JPEG quality 85 (default)
  low      1.0× scale, JPEG quality 75

OUTPUT NAMES:
  {name}_page_{n}.jpg per page, or {name}.zip with --zip, where {name}
  is the input file name without its extension.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory)
"#;

/// Convert PDF pages to JPEG images.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2jpg",
    version,
    about = "Convert PDF pages to JPEG images",
    long_about = "Render selected pages of a PDF to JPEG images at a chosen quality, \
written one file per page or bundled as a single zip archive.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Directory to write images into.
    #[arg(short, long, env = "PDF2JPG_OUTPUT", default_value = ".")]
    output: PathBuf,

    /// Page selection: all, or e.g. "1-3, 5, 7-10".
    #[arg(long, env = "PDF2JPG_PAGES", default_value = "all")]
    pages: String,

    /// Output quality: high, medium, low.
    #[arg(long, env = "PDF2JPG_QUALITY", value_enum, default_value = "medium")]
    quality: QualityArg,

    /// Bundle all pages into one {name}.zip instead of separate files.
    #[arg(long, env = "PDF2JPG_ZIP")]
    zip: bool,

    /// Pause between individual files, in milliseconds.
    #[arg(long, env = "PDF2JPG_PACE_MS", default_value_t = 300)]
    pace_ms: u64,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2JPG_PASSWORD")]
    password: Option<String>,

    /// Print a JSON summary instead of human-readable output.
    #[arg(long, env = "PDF2JPG_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2JPG_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long, env = "PDF2JPG_INSPECT_ONLY")]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2JPG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2JPG_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum QualityArg {
    High,
    Medium,
    Low,
}

impl From<QualityArg> for QualityTier {
    fn from(v: QualityArg) -> Self {
        match v {
            QualityArg::High => QualityTier::High,
            QualityArg::Medium => QualityTier::Medium,
            QualityArg::Low => QualityTier::Low,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs are noise while the progress bar is drawing.
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

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input, cli.password.as_deref())
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ConversionProgressCallback>)
    } else if !cli.quiet && !cli.json {
        // --no-progress: per-page events go to the log instead.
        Some(Arc::new(TracingProgressCallback))
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // Ctrl-C stops the run before the next page.
    let cancel = config.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    // ── Run conversion ───────────────────────────────────────────────────
    let mut output = convert(&cli.input, &config)
        .await
        .context("Conversion failed")?;
    output.pages.release_previews();

    if output.pages.is_empty() {
        if !cli.quiet {
            eprintln!(
                "{} No pages matched '{}' (document has {} pages); nothing to do.",
                cyan("⚠"),
                cli.pages,
                output.stats.total_pages
            );
        }
        return Ok(());
    }

    // ── Deliver ──────────────────────────────────────────────────────────
    let mode = if config.as_archive {
        DeliveryMode::Archive
    } else {
        DeliveryMode::Individual {
            pace: config.download_pace(),
        }
    };
    let sink = DirectorySink::new(&cli.output);
    let files = deliver_all(&output.pages, &output.base_name, mode, &sink, &ZipPackager)
        .await
        .with_context(|| format!("Failed to write images to {}", cli.output.display()))?;

    if cli.json {
        let summary = serde_json::json!({
            "input": cli.input,
            "output_dir": cli.output,
            "pages": output.pages.page_numbers(),
            "files": files,
            "stats": output.stats,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {}/{} pages  {} quality  {}ms  →  {}",
            green("✔"),
            output.stats.converted_pages,
            output.stats.total_pages,
            output.stats.quality,
            output.stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        for file in &files {
            eprintln!("   {}", dim(file));
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .quality(cli.quality.clone().into())
        .pages(parse_pages(&cli.pages))
        .as_archive(cli.zip)
        .download_pace_ms(cli.pace_ms);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Map `--pages` onto a selection. Anything but "all" is parsed once the
/// page count is known.
fn parse_pages(s: &str) -> PageSelection {
    if s.trim().eq_ignore_ascii_case("all") {
        PageSelection::All
    } else {
        PageSelection::Expression(s.to_string())
    }
}

//! CLI binary for arxiv2drive.
//!
//! A thin shim over the library crate: one invocation is one "save this
//! page" command. Flags map to `UploadConfig`; the outcome is printed as a
//! summary line or as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use arxiv2drive::{
    resolve_url, CommandHandler, CommandOutcome, CommandTokenProvider, FilenameStyle,
    PageReference, Resolution, StaticTokenProvider, TitleFallback, TokenProvider, UploadConfig,
    UploadProgressCallback, UploadResult, UploadStage,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner that shows the current upload stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let callback = Self::with_bar(ProgressBar::new_spinner());
        callback.bar.enable_steady_tick(Duration::from_millis(80));
        callback
    }

    fn with_bar(bar: ProgressBar) -> Arc<Self> {
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("arXiv → Drive");
        bar.set_message("resolving page…");
        Arc::new(Self { bar })
    }

    /// Remove the spinner line, whatever the outcome was.
    fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl UploadProgressCallback for CliProgressCallback {
    fn on_stage(&self, stage: UploadStage) {
        match stage {
            UploadStage::Idle | UploadStage::Done | UploadStage::Failed => {}
            _ => self.bar.set_message(format!("{stage}…")),
        }
    }

    fn on_failed(&self, stage: UploadStage, _error: &str) {
        self.finish();
        eprintln!("{} {}", red("✘"), red(&format!("failed while {stage}")));
    }

    fn on_complete(&self, _result: &UploadResult) {
        self.finish();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Save the paper behind an abstract page
  arxiv2drive https://arxiv.org/abs/1706.03762

  # From a PDF page, into a different folder
  arxiv2drive --folder papers https://arxiv.org/pdf/1706.03762v7.pdf

  # Only show what would be uploaded (no Google account needed)
  arxiv2drive --resolve-only https://arxiv.org/abs/2301.01234

  # Fall back to the page title shown in the browser if arXiv has none
  arxiv2drive --title-fallback tab-title --tab-title "[2301.01234] Example" \
      https://arxiv.org/abs/2301.01234

AUTHENTICATION:
  The Drive API needs an OAuth access token with a Drive scope.
  --token / GOOGLE_DRIVE_TOKEN   use this token as-is
  --token-command                run a command and read the token from stdout
                                 (default: gcloud auth print-access-token)

ENVIRONMENT VARIABLES:
  GOOGLE_DRIVE_TOKEN            OAuth access token
  ARXIV2DRIVE_TOKEN_COMMAND     Token command
  ARXIV2DRIVE_FOLDER            Drive folder name (default: arXiv)
  RUST_LOG                      Overrides the log filter
"#;

/// Save arXiv papers to a Google Drive folder.
#[derive(Parser, Debug)]
#[command(
    name = "arxiv2drive",
    version,
    about = "Save the arXiv paper behind an abstract or PDF page to Google Drive",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// arXiv abstract or PDF page URL.
    url: String,

    /// Title the page is displayed with (used by --title-fallback tab-title).
    #[arg(long)]
    tab_title: Option<String>,

    /// OAuth access token for the Drive API.
    #[arg(long, env = "GOOGLE_DRIVE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Command printing an access token on stdout.
    #[arg(long, env = "ARXIV2DRIVE_TOKEN_COMMAND", conflicts_with = "token")]
    token_command: Option<String>,

    /// Drive folder the paper is saved into.
    #[arg(long, env = "ARXIV2DRIVE_FOLDER", default_value = "arXiv")]
    folder: String,

    /// Filename policy: title or id-prefixed.
    #[arg(long, env = "ARXIV2DRIVE_FILENAME_STYLE", value_enum, default_value = "title")]
    filename_style: FilenameStyleArg,

    /// What to do when arXiv yields no title: abort or tab-title.
    #[arg(long, env = "ARXIV2DRIVE_TITLE_FALLBACK", value_enum, default_value = "abort")]
    title_fallback: TitleFallbackArg,

    /// Override the arXiv origin (mirrors, testing).
    #[arg(long, env = "ARXIV2DRIVE_ARXIV_BASE", default_value = "https://arxiv.org")]
    arxiv_base: String,

    /// Per-request timeout in seconds (default: none).
    #[arg(long, env = "ARXIV2DRIVE_TIMEOUT")]
    timeout: Option<u64>,

    /// Resolve the PDF URL and filename only; do not authenticate or upload.
    #[arg(long)]
    resolve_only: bool,

    /// Print the outcome as JSON.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "ARXIV2DRIVE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FilenameStyleArg {
    Title,
    IdPrefixed,
}

impl From<FilenameStyleArg> for FilenameStyle {
    fn from(v: FilenameStyleArg) -> Self {
        match v {
            FilenameStyleArg::Title => FilenameStyle::Title,
            FilenameStyleArg::IdPrefixed => FilenameStyle::IdPrefixed,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum TitleFallbackArg {
    Abort,
    TabTitle,
}

impl From<TitleFallbackArg> for TitleFallback {
    fn from(v: TitleFallbackArg) -> Self {
        match v {
            TitleFallbackArg::Abort => TitleFallback::Abort,
            TitleFallbackArg::TabTitle => TitleFallback::TabTitle,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner carries the stage feedback; keep INFO logs out of its way.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.resolve_only;
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

    let progress = show_progress.then(CliProgressCallback::new);
    let config = build_config(&cli, progress.clone())?;

    // ── Resolve-only mode ────────────────────────────────────────────────
    if cli.resolve_only {
        let resolution = resolve_url(&cli.url, &config)
            .await
            .context("Failed to resolve page")?;
        match resolution {
            Resolution::Resolved(doc) if cli.json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&doc).context("Failed to serialise document")?
                );
            }
            Resolution::Resolved(doc) => {
                println!("Paper:     {}", doc.paper_id);
                println!("PDF:       {}", doc.pdf_url);
                println!("Abstract:  {}", doc.abs_url);
                println!("Filename:  {}", doc.filename);
            }
            Resolution::NotApplicable => print_not_applicable(&cli, &cli.url)?,
        }
        return Ok(());
    }

    // ── Run the command ──────────────────────────────────────────────────
    let tokens = token_provider(&cli)?;
    let handler = CommandHandler::new(config, tokens).context("Invalid configuration")?;
    let mut page = PageReference::new(&cli.url).with_id("cli");
    if let Some(ref title) = cli.tab_title {
        page = page.with_title(title);
    }

    let outcome = handler.on_command("save-to-drive", &page).await;
    if let Some(ref p) = progress {
        p.finish();
    }
    let outcome = outcome.context("Upload failed")?;

    match outcome {
        CommandOutcome::NotApplicable { ref url } => print_not_applicable(&cli, url)?,
        CommandOutcome::Uploaded(_) if cli.json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome).context("Failed to serialise result")?
            );
        }
        CommandOutcome::Uploaded(ref result) => {
            if !cli.quiet {
                eprintln!(
                    "{}  {}  →  {}/{}  {}",
                    green("✔"),
                    bold(&result.file.filename),
                    cli.folder,
                    dim(&result.remote_file_id),
                    dim(&format!(
                        "{} KiB, {}ms",
                        result.size_bytes / 1024,
                        result.duration_ms
                    )),
                );
                if result.folder.created {
                    eprintln!("   {}", dim(&format!("created folder '{}'", cli.folder)));
                }
            }
        }
    }

    Ok(())
}

/// Map CLI args to `UploadConfig`.
fn build_config(
    cli: &Cli,
    progress: Option<Arc<CliProgressCallback>>,
) -> Result<UploadConfig> {
    let mut builder = UploadConfig::builder()
        .arxiv_base(cli.arxiv_base.clone())
        .folder_name(cli.folder.clone())
        .filename_style(cli.filename_style.clone().into())
        .title_fallback(cli.title_fallback.clone().into());

    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Pick the token source: explicit token, then token command, then gcloud.
fn token_provider(cli: &Cli) -> Result<Arc<dyn TokenProvider>> {
    if let Some(ref token) = cli.token {
        return Ok(Arc::new(StaticTokenProvider::new(token)));
    }
    match cli.token_command {
        Some(ref line) => Ok(Arc::new(
            CommandTokenProvider::from_command_line(line).context("Invalid --token-command")?,
        )),
        None => Ok(Arc::new(CommandTokenProvider::default())),
    }
}

fn print_not_applicable(cli: &Cli, url: &str) -> Result<()> {
    if cli.json {
        let outcome = CommandOutcome::NotApplicable {
            url: url.to_string(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialise result")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{} {} is not an arXiv abstract or PDF page; nothing to do",
            dim("–"),
            url
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_is_cleared_when_nothing_was_uploaded() {
        let progress = CliProgressCallback::with_bar(ProgressBar::hidden());
        progress.on_stage(UploadStage::Idle);
        assert!(!progress.bar.is_finished());

        progress.finish();
        assert!(progress.bar.is_finished());
    }

    #[test]
    fn finishing_twice_is_harmless() {
        let progress = CliProgressCallback::with_bar(ProgressBar::hidden());
        progress.on_stage(UploadStage::Uploading);
        progress.finish();
        progress.finish();
        assert!(progress.bar.is_finished());
    }

    #[test]
    fn cli_parses_policies() {
        let cli = Cli::try_parse_from([
            "arxiv2drive",
            "--filename-style",
            "id-prefixed",
            "--title-fallback",
            "tab-title",
            "https://arxiv.org/abs/2301.01234",
        ])
        .unwrap();
        assert!(matches!(cli.filename_style, FilenameStyleArg::IdPrefixed));
        assert!(matches!(cli.title_fallback, TitleFallbackArg::TabTitle));
        assert_eq!(cli.folder, "arXiv");
    }
}

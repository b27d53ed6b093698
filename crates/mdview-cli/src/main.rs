use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use mdview_editor_core::{
    ApplyOutcome, CursorPosition, DocumentStats, EditorConfig, Theme,
};
use mdview_editor_sync::{
    EditorSession, ExportFormat, HttpRenderer, SessionUpdate, read_markdown_file,
};
use miette::{IntoDiagnostic, Result, miette};
use serde::Serialize;

#[derive(Parser)]
#[command(version, about = "mdview - live markdown preview, headless", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a .json or .toml config file
    #[arg(long, global = true, env = "MDVIEW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file to HTML through the conversion service
    Render {
        /// Markdown file to render
        input: PathBuf,

        /// Write HTML here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Override the configured preview theme
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        /// Override the configured renderer endpoint
        #[arg(long, env = "MDVIEW_RENDERER")]
        endpoint: Option<String>,

        /// Seconds to wait for the renderer
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Write an export artifact for a markdown file
    Export {
        input: PathBuf,

        /// Artifact format. Only markdown has a built-in converter; pdf and
        /// word need one registered by an embedding host
        #[arg(short, long, default_value = "markdown", value_parser = builtin_export_format)]
        format: ExportFormat,

        /// Directory to write the artifact into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print word, line and character counts
    Stats {
        input: PathBuf,

        /// Also report the line/column of this character offset
        #[arg(long)]
        offset: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette()?;
    init_tracing();

    let cli = Cli::parse();
    let config = EditorConfig::load_or_default(cli.config.or_else(default_config_path))?;

    match cli.command {
        Commands::Render {
            input,
            out,
            theme,
            endpoint,
            timeout,
        } => {
            let mut config = config;
            if let Some(theme) = theme {
                config.theme = theme.into();
            }
            if let Some(endpoint) = endpoint {
                config.renderer_endpoint = endpoint;
            }
            render(config, input, out, Duration::from_secs(timeout)).await?;
        }
        Commands::Export {
            input,
            format,
            out_dir,
        } => {
            export(config, input, format, out_dir).await?;
        }
        Commands::Stats {
            input,
            offset,
            json,
        } => {
            stats(config, input, offset, json).await?;
        }
    }

    Ok(())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mdview").join("config.toml"))
}

async fn render(
    config: EditorConfig,
    input: PathBuf,
    out: Option<PathBuf>,
    timeout: Duration,
) -> Result<()> {
    let text = read_markdown_file(&input, config.max_import_bytes).await?;
    let renderer = HttpRenderer::new(config.renderer_endpoint.clone());
    tracing::info!(endpoint = %config.renderer_endpoint, input = %input.display(), "rendering");

    let mut session = EditorSession::new(config, renderer, &text);
    session.flush();

    tokio::time::timeout(timeout, wait_for_preview(&mut session))
        .await
        .map_err(|_| miette!("renderer did not answer within {}s", timeout.as_secs()))??;

    if let Some(message) = session.preview().error() {
        return Err(miette!("render failed: {message}"));
    }

    let html = session.preview().html();
    match out {
        Some(path) => {
            tokio::fs::write(&path, html).await.into_diagnostic()?;
            tracing::info!(path = %path.display(), bytes = html.len(), "html written");
        }
        None => println!("{html}"),
    }
    Ok(())
}

async fn wait_for_preview(session: &mut EditorSession) -> Result<()> {
    while let Some(event) = session.next_event().await {
        if let SessionUpdate::Preview(ApplyOutcome::Applied) = session.handle_event(event) {
            return Ok(());
        }
    }
    Err(miette!("render pipeline closed before a result arrived"))
}

/// Parse an export format this binary can actually produce.
fn builtin_export_format(value: &str) -> Result<ExportFormat, String> {
    match value.parse::<ExportFormat>()? {
        ExportFormat::Markdown => Ok(ExportFormat::Markdown),
        other => Err(format!(
            "no built-in converter for {other}; only markdown can be exported from the command line"
        )),
    }
}

async fn export(
    config: EditorConfig,
    input: PathBuf,
    format: ExportFormat,
    out_dir: PathBuf,
) -> Result<()> {
    let text = read_markdown_file(&input, config.max_import_bytes).await?;
    let renderer = HttpRenderer::new(config.renderer_endpoint.clone());
    let session = EditorSession::new(config, renderer, &text);

    let artifact = session.export(format)?;
    let path = artifact.write_to(&out_dir).await.into_diagnostic()?;
    println!("Wrote {} ({})", path.display(), artifact.mime);
    Ok(())
}

#[derive(Serialize)]
struct StatsReport {
    #[serde(flatten)]
    stats: DocumentStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<CursorPosition>,
}

async fn stats(
    config: EditorConfig,
    input: PathBuf,
    offset: Option<usize>,
    json: bool,
) -> Result<()> {
    let text = read_markdown_file(&input, config.max_import_bytes).await?;
    let report = StatsReport {
        stats: DocumentStats::of(text.as_str()),
        cursor: offset.map(|offset| CursorPosition::locate(text.as_str(), offset)),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).into_diagnostic()?
        );
    } else {
        println!("words: {}", report.stats.words);
        println!("lines: {}", report.stats.lines);
        println!("chars: {}", report.stats.chars);
        if let Some(cursor) = report.cursor {
            println!("{cursor}");
        }
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn init_miette() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();
    Ok(())
}

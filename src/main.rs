//! XDB connector
//!
//! Command-line host for the XDB tools: every API command is dispatched
//! through the same tool registry an agent would use.

mod cli;
mod register;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use tracing::{debug, error};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use xdb_client::transcript;
use xdb_core::ToolRegistry;
use xdb_protocols::tool::{ToolContext, ToolResult};

use crate::cli::{Cli, Commands, ToolFormat};

/// `~/.xdb`, or `./.xdb` when there is no home directory.
fn xdb_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".xdb")
}

fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = xdb_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("xdb")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop, so it must outlive main.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        // stdout carries command output only
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("Logging to file disabled: {}", e);
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run one command; `Ok(false)` means the command ran but reported failure.
async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let work_dir = match cli.work_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    if let Commands::Inspect { path, content } = &cli.command {
        inspect(&work_dir.join(path), *content)?;
        return Ok(true);
    }

    let config = register::load_config(cli.config.as_deref())?;
    let registry = register::build_registry(config, work_dir.clone()).await?;

    let (tool, params) = match cli.command {
        Commands::Health => ("health_check".to_string(), json!({})),
        Commands::List {
            user_key,
            tokens,
            query,
        } => (
            "list_memories".to_string(),
            json!({"user_key": user_key, "tokens": tokens, "query": query}),
        ),
        Commands::Remember {
            user_key,
            content,
            tag,
            session,
        } => (
            "create_memory".to_string(),
            json!({"user_key": user_key, "content": content, "tag": tag, "session_id": session}),
        ),
        Commands::Remind {
            user_key,
            content,
            tag,
            session,
        } => (
            "create_reminder".to_string(),
            json!({"user_key": user_key, "content": content, "tag": tag, "session_id": session}),
        ),
        Commands::Ingest {
            user_key,
            path,
            tag,
        } => (
            "process_transcript".to_string(),
            json!({"user_key": user_key, "path": path, "tag": tag}),
        ),
        Commands::Tools { format } => {
            print_tools(&registry, format)?;
            return Ok(true);
        }
        Commands::Call { tool, params } => (tool, serde_json::from_str(&params)?),
        Commands::Inspect { .. } => unreachable!("handled before the registry is built"),
    };

    let result = call_tool(&registry, &tool, params, work_dir).await?;
    Ok(result.success)
}

async fn call_tool(
    registry: &ToolRegistry,
    tool: &str,
    params: serde_json::Value,
    work_dir: PathBuf,
) -> Result<ToolResult, Box<dyn std::error::Error>> {
    let ctx = ToolContext::new("cli", work_dir);
    debug!(tool = %tool, correlation_id = %ctx.correlation_id, "Dispatching CLI command");

    let result = registry.call(tool, params, ctx).await?;
    if result.success {
        println!("{}", result.text());
    } else {
        eprintln!("{}", result.text());
    }
    Ok(result)
}

fn print_tools(registry: &ToolRegistry, format: ToolFormat) -> Result<(), serde_json::Error> {
    let tools: Vec<serde_json::Value> = registry
        .list()
        .iter()
        .map(|def| match format {
            ToolFormat::Openai => def.to_openai_function(),
            ToolFormat::Anthropic => def.to_anthropic_tool(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}

fn inspect(path: &Path, show_content: bool) -> Result<(), Box<dyn std::error::Error>> {
    let info = transcript::classify(path)?;
    let mut report = serde_json::to_value(&info)?;
    report["transcript_format"] = json!(transcript::detect_transcript_format(path)?);
    report["is_transcript"] = json!(transcript::is_transcript_file(path));
    report["validation"] = json!(transcript::validate_file_content(path)?);
    if show_content {
        report["content"] = json!(transcript::extract_content(path)?);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

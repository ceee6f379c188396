//! CLI definitions for the XDB connector.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// XDB connector CLI.
#[derive(Parser)]
#[command(name = "xdb")]
#[command(about = "Signed client and agent tools for the XDB memory API")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file (TOML or JSON); XDB_* environment variables are used when omitted
    #[arg(short, long, global = true, env = "XDB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Working directory for relative transcript paths
    #[arg(short, long, global = true)]
    pub work_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Check that the API is reachable
    Health,

    /// List memories for a user
    List {
        /// User key
        user_key: String,

        /// Filter token (repeatable)
        #[arg(short, long = "token")]
        tokens: Vec<String>,

        /// Search query
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Store a memory
    Remember {
        user_key: String,
        content: String,

        #[arg(long, default_value = "")]
        tag: String,

        /// Session id (defaults to the current hour)
        #[arg(long)]
        session: Option<String>,
    },

    /// Store a reminder
    Remind {
        user_key: String,
        content: String,

        #[arg(long, default_value = "")]
        tag: String,

        /// Session id (defaults to the current hour)
        #[arg(long)]
        session: Option<String>,
    },

    /// Submit a transcript file for memory extraction
    Ingest {
        user_key: String,
        path: PathBuf,

        #[arg(long)]
        tag: String,
    },

    /// Show file metadata and the detected transcript format
    Inspect {
        path: PathBuf,

        /// Also print the extracted content
        #[arg(long)]
        content: bool,
    },

    /// Print the tool definitions for an agent framework
    Tools {
        #[arg(long, value_enum, default_value_t = ToolFormat::Openai)]
        format: ToolFormat,
    },

    /// Invoke a tool by id with JSON parameters
    Call {
        tool: String,

        /// Parameters as a JSON object
        #[arg(default_value = "{}")]
        params: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ToolFormat {
    Openai,
    Anthropic,
}

//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// LLM-assisted CSV to typed JSON converter
#[derive(Parser)]
#[command(name = "ingot")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a CSV file to typed JSON via an inference provider
    Convert {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the JSON artifact (default: converted_data.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Inference provider to use
        #[arg(long, default_value = "gemini")]
        provider: ProviderChoice,

        /// Model override, provider-specific
        #[arg(long)]
        model: Option<String>,

        /// Print the canonical JSON to stdout as well
        #[arg(long)]
        print: bool,

        /// Admit any file extension instead of requiring .csv
        #[arg(long)]
        any_extension: bool,
    },

    /// Show the bounded preview of a CSV file without converting it
    Preview {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Emit the preview as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Inference provider selectable on the command line.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ProviderChoice {
    /// Google Gemini (requires GEMINI_API_KEY)
    #[default]
    Gemini,
    /// Anthropic Claude (requires ANTHROPIC_API_KEY)
    Anthropic,
    /// Offline mock, replies with an empty array
    Mock,
}

impl std::str::FromStr for ProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderChoice::Gemini),
            "anthropic" | "claude" => Ok(ProviderChoice::Anthropic),
            "mock" => Ok(ProviderChoice::Mock),
            _ => Err(format!(
                "unknown provider '{}' (expected: gemini, anthropic, mock)",
                s
            )),
        }
    }
}

impl std::fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderChoice::Gemini => write!(f, "gemini"),
            ProviderChoice::Anthropic => write!(f, "anthropic"),
            ProviderChoice::Mock => write!(f, "mock"),
        }
    }
}

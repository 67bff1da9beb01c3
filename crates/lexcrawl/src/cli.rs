use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use lexcrawl_logging::DEFAULT_LOG_FILE;

#[derive(Parser, Debug)]
#[command(name = "lexcrawl")]
#[command(about = "Fetch legal publications and store their main text as Markdown")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to FILE (lexcrawl.log when no value is given)
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_LOG_FILE
    )]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Crawl settings that can come from the command line. Anything left unset
/// falls back to the config file, then to the built-in defaults.
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct SettingsArgs {
    /// RON file with crawl settings
    #[arg(long, global = true, value_name = "FILE", env = "LEXCRAWL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory that receives the Markdown files
    #[arg(short, long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Pause between two batch items, in seconds
    #[arg(long, global = true, value_name = "SECS", allow_negative_numbers = true)]
    pub delay_secs: Option<f64>,

    /// Per-request timeout, in seconds
    #[arg(long, global = true, value_name = "SECS", allow_negative_numbers = true)]
    pub timeout_secs: Option<f64>,

    /// Extra attempts after a timeout, network error or 5xx
    #[arg(long, global = true, value_name = "N")]
    pub retries: Option<u32>,

    /// Minimum visible characters for a page to count as a document
    #[arg(long, global = true, value_name = "N")]
    pub min_content_chars: Option<usize>,

    /// Value of the `source` front matter field
    #[arg(long, global = true, value_name = "LABEL")]
    pub source_label: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long, global = true, value_name = "UA")]
    pub user_agent: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one URL and write it as a Markdown document
    Fetch { url: String },

    /// Process a list of URLs one after another
    Batch {
        /// URLs to process, in order
        urls: Vec<String>,

        /// File with one URL per line (blank lines and `#` comments ignored)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Write the batch report as JSON to FILE
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },
}

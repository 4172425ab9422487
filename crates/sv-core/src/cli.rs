//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sv_common::OutputFormat;
use sv_core::MagicWordCondition;

#[derive(Debug, Parser)]
#[command(
    name = "serials-validator",
    version,
    about = "Resolve validation policy and check holdings dates for serials holdings files"
)]
pub struct Cli {
    /// Validator configuration file (JSON).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also append logs to a daily file in this folder.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Emit logs as JSON on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve fields and issues for every input file in a folder (headless prep).
    Plan {
        /// Folder holding the input files.
        #[arg(default_value = "input")]
        input_dir: PathBuf,

        /// Folder holding JSTOR ISSN lists.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Resolve fields and issues for the named input files.
    Resolve {
        /// Input file names (only the name is used; files are not opened).
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Check a holdings year against a bibliographic year.
    Years(YearsArgs),

    /// Look for completeness, binding, or non-print words in holdings text.
    Classify {
        #[arg(long)]
        holdings: Option<String>,

        #[arg(long)]
        nonpublic_note: Option<String>,

        #[arg(long)]
        public_note: Option<String>,

        /// Only check this condition.
        #[arg(long, value_parser = parse_condition)]
        condition: Option<MagicWordCondition>,
    },

    /// Print the built-in disqualifying issues.
    Defaults,

    /// Print an unused output path derived from PATH.
    UniquePath { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Boundary {
    /// Holdings start against bibliographic start.
    Start,
    /// Holdings end against bibliographic end.
    End,
}

#[derive(Debug, Args)]
pub struct YearsArgs {
    /// Which boundary to compare.
    #[arg(value_enum)]
    pub boundary: Boundary,

    #[arg(long)]
    pub bib_year: String,

    /// Text the bibliographic year came from (defaults to the year itself).
    #[arg(long)]
    pub bib_text: Option<String>,

    #[arg(long)]
    pub holdings_year: String,

    /// Holdings statement the year came from (defaults to the year itself).
    #[arg(long)]
    pub holdings_text: Option<String>,
}

fn parse_condition(value: &str) -> Result<MagicWordCondition, String> {
    value.parse().map_err(|e: sv_core::magic_words::UnknownCondition| e.to_string())
}

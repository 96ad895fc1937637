//! CLI argument definitions for the harmonization tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use harmonize_model::DEFAULT_MAX_UNIQUE_VALUES;

#[derive(Parser)]
#[command(
    name = "harmonize",
    version,
    about = "Harmonize tabular datasets against a target schema",
    long_about = "Match source columns to a target schema, match their values to the \
                  target value domains and materialize a harmonized table.\n\n\
                  Targets are either a built-in vocabulary identifier (gdc) or a CSV file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow dataset values to appear in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match source columns to target columns.
    Columns(ColumnsArgs),

    /// Match source values to target value domains.
    Values(ValuesArgs),

    /// Build a harmonization plan and write the harmonized table.
    Apply(ApplyArgs),

    /// Show source and target value domains side by side.
    Preview(PreviewArgs),

    /// List built-in vocabularies.
    Vocabularies,

    /// List registered column and value matching methods.
    Methods,
}

#[derive(Args)]
pub struct ColumnsArgs {
    /// Source dataset (CSV).
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Target vocabulary identifier or target CSV file.
    #[arg(long = "target", default_value = "gdc")]
    pub target: String,

    /// Column matching method.
    #[arg(long = "method", default_value = "jaro_winkler")]
    pub method: String,

    /// Write the column mappings as JSON.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValuesArgs {
    /// Source dataset (CSV).
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Target vocabulary identifier or target CSV file.
    #[arg(long = "target", default_value = "gdc")]
    pub target: String,

    /// Column mappings as JSON or CSV with `source` and `target` fields.
    #[arg(long = "mappings", value_name = "PATH", conflicts_with = "pairs")]
    pub mappings: Option<PathBuf>,

    /// Column pairs given inline as SOURCE:TARGET.
    #[arg(long = "pair", value_name = "SOURCE:TARGET", value_parser = parse_pair)]
    pub pairs: Vec<(String, String)>,

    /// Match columns first with this method when no mappings are given.
    #[arg(long = "column-method", default_value = "jaro_winkler")]
    pub column_method: String,

    /// Value matching method.
    #[arg(long = "method", default_value = "edit_distance")]
    pub method: String,

    /// Skip source columns with more distinct values than this.
    #[arg(long = "max-unique-values", default_value_t = DEFAULT_MAX_UNIQUE_VALUES)]
    pub max_unique_values: usize,

    /// Write the value matching results as JSON.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Source dataset (CSV).
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// User mapping records (JSON array or CSV with source/target columns).
    #[arg(long = "mappings", value_name = "PATH")]
    pub mappings: Option<PathBuf>,

    /// Value matching results produced by `harmonize values --output`.
    #[arg(long = "computed", value_name = "PATH")]
    pub computed: Option<PathBuf>,

    /// Reject entries present in both the computed and user lists.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Output CSV path.
    #[arg(long = "output", value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Source dataset (CSV).
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Column pair given as SOURCE:TARGET.
    #[arg(long = "pair", value_name = "SOURCE:TARGET", value_parser = parse_pair)]
    pub pair: (String, String),

    /// Target vocabulary identifier or target CSV file.
    #[arg(long = "target", default_value = "gdc")]
    pub target: String,

    /// Maximum number of rows to show.
    #[arg(long = "limit")]
    pub limit: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((source, target)) if !source.trim().is_empty() && !target.trim().is_empty() => {
            Ok((source.trim().to_string(), target.trim().to_string()))
        }
        _ => Err(format!("expected SOURCE:TARGET, got `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_column_pair() {
        assert_eq!(
            parse_pair("sex : gender"),
            Ok(("sex".to_string(), "gender".to_string()))
        );
        assert!(parse_pair("sex").is_err());
        assert!(parse_pair(":gender").is_err());
    }

    #[test]
    fn parses_apply_command() {
        let cli = Cli::try_parse_from([
            "harmonize",
            "apply",
            "data.csv",
            "--mappings",
            "mappings.json",
            "--strict",
            "--output",
            "out.csv",
            "--log-data",
        ])
        .expect("parse");
        assert!(cli.log_data);
        match cli.command {
            Command::Apply(args) => {
                assert!(args.strict);
                assert_eq!(args.output, PathBuf::from("out.csv"));
                assert!(args.computed.is_none());
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn values_defaults() {
        let cli = Cli::try_parse_from(["harmonize", "values", "data.csv", "--pair", "sex:gender"])
            .expect("parse");
        match cli.command {
            Command::Values(args) => {
                assert_eq!(args.target, "gdc");
                assert_eq!(args.method, "edit_distance");
                assert_eq!(args.max_unique_values, DEFAULT_MAX_UNIQUE_VALUES);
                assert_eq!(args.pairs, vec![("sex".to_string(), "gender".to_string())]);
            }
            _ => panic!("expected values"),
        }
    }
}

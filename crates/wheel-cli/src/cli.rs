//! CLI argument definitions for the wheel import tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use wheel_model::ImportMode;

#[derive(Parser)]
#[command(
    name = "wheel-import",
    version,
    about = "Bulk-import planning data into a year wheel",
    long_about = "Import spreadsheet planning data into a year wheel.\n\n\
                  Parses CSV and Excel files, maps columns with the AI analysis\n\
                  service, applies review overrides and submits the result as an\n\
                  asynchronous import job."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the import service.
    #[arg(
        long = "service-url",
        value_name = "URL",
        env = "WHEEL_SERVICE_URL",
        global = true
    )]
    pub service_url: Option<String>,

    /// Bearer token for the import service.
    #[arg(
        long = "token",
        value_name = "TOKEN",
        env = "WHEEL_SERVICE_TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub token: Option<String>,

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
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline: parse, analyze, build, submit and track.
    Import(ImportArgs),

    /// Parse a file and print the analysis suggestion without importing.
    Analyze(AnalyzeArgs),

    /// Submit a previously saved structure without re-running analysis.
    Submit(SubmitArgs),

    /// Show an import job's status, optionally tracking it live.
    Status(StatusArgs),

    /// Request cancellation of a running import job.
    Cancel(CancelArgs),
}

#[derive(Args)]
pub struct ImportArgs {
    /// Planning data file (.csv, .xlsx, .xlsm, .xls or .ods).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Import mode. Replace deletes the wheel's existing rings, groups,
    /// labels and activities before inserting; pages are preserved.
    #[arg(long = "mode", value_enum, default_value = "append")]
    pub mode: ImportModeArg,

    /// Review overrides to apply (JSON document).
    #[arg(long = "overrides", value_name = "PATH")]
    pub overrides: Option<PathBuf>,

    /// Skip confirmation prompts.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,

    /// Email address to notify when the job finishes.
    #[arg(long = "notify-email", value_name = "EMAIL")]
    pub notify_email: Option<String>,

    /// Exit after submission instead of tracking the job.
    #[arg(long = "detach")]
    pub detach: bool,

    /// Write the finalized structure JSON for later `submit`.
    #[arg(long = "structure-out", value_name = "PATH")]
    pub structure_out: Option<PathBuf>,

    /// Year for the fallback page when no start date parses.
    #[arg(long = "fallback-year", value_name = "YEAR")]
    pub fallback_year: Option<i32>,

    /// Seconds between job status polls.
    #[arg(long = "poll-interval", value_name = "SECS", default_value_t = 2)]
    pub poll_interval: u64,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Planning data file (.csv, .xlsx, .xlsm, .xls or .ods).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Column hints forwarded to the analysis service (JSON document,
    /// same shape as the `columns` section of an override document).
    #[arg(long = "hints", value_name = "PATH")]
    pub hints: Option<PathBuf>,
}

#[derive(Args)]
pub struct SubmitArgs {
    /// Structure JSON written by `import --structure-out`.
    #[arg(value_name = "STRUCTURE")]
    pub structure: PathBuf,

    /// Import mode for the resubmission.
    #[arg(long = "mode", value_enum, default_value = "append")]
    pub mode: ImportModeArg,

    /// Source name recorded with the job.
    #[arg(long = "source-name", value_name = "NAME")]
    pub source_name: Option<String>,

    /// Skip confirmation prompts.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,

    /// Email address to notify when the job finishes.
    #[arg(long = "notify-email", value_name = "EMAIL")]
    pub notify_email: Option<String>,

    /// Exit after submission instead of tracking the job.
    #[arg(long = "detach")]
    pub detach: bool,

    /// Seconds between job status polls.
    #[arg(long = "poll-interval", value_name = "SECS", default_value_t = 2)]
    pub poll_interval: u64,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Import job id.
    #[arg(value_name = "JOB_ID")]
    pub job_id: String,

    /// Track the job live until it reaches a terminal state.
    #[arg(long = "watch")]
    pub watch: bool,

    /// Seconds between job status polls.
    #[arg(long = "poll-interval", value_name = "SECS", default_value_t = 2)]
    pub poll_interval: u64,
}

#[derive(Args)]
pub struct CancelArgs {
    /// Import job id.
    #[arg(value_name = "JOB_ID")]
    pub job_id: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ImportModeArg {
    Replace,
    Append,
}

impl From<ImportModeArg> for ImportMode {
    fn from(arg: ImportModeArg) -> Self {
        match arg {
            ImportModeArg::Replace => Self::Replace,
            ImportModeArg::Append => Self::Append,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

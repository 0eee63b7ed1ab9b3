//! CLI argument definitions for the medication substitution engine.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use medsub_model::SubstitutionReason;

#[derive(Parser)]
#[command(
    name = "medsub",
    version,
    about = "Medication substitution - rank substitutes for allergies and shortages",
    long_about = "Recommend a substitute for a patient's current medication.\n\n\
                  Resolves free-text medication names against the catalog, scores the\n\
                  recorded substitutes against the patient's notes and diagnosis, and\n\
                  falls back to therapeutic alternatives when none is safe."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub data: DataArgs,

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

    /// Allow patient notes in log output (redacted by default).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Recommend a substitute for a patient's medication.
    Recommend(RecommendArgs),

    /// Show how a medication name resolves against the catalog.
    Resolve(ResolveArgs),

    /// Look up the side effects of a medication.
    Effects(EffectsArgs),

    /// Evaluate the recorded clinical cases and report response times.
    Batch(BatchArgs),
}

/// Dataset location. Each file can be overridden individually.
#[derive(Args)]
pub struct DataArgs {
    /// Directory holding the standard dataset layout.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Medication catalog CSV (default: <DATA_DIR>/BaseConocimiento/medicamentos_info.csv).
    #[arg(long = "medications", value_name = "PATH", global = true)]
    pub medications: Option<PathBuf>,

    /// Substitute table CSV (default: <DATA_DIR>/BaseConocimiento/sustitutos_medicamentos.csv).
    #[arg(long = "substitutes", value_name = "PATH", global = true)]
    pub substitutes: Option<PathBuf>,

    /// Allergen vocabulary CSV (default: <DATA_DIR>/ReglasClinicas/posibles_alergenos.csv).
    #[arg(long = "allergens", value_name = "PATH", global = true)]
    pub allergens: Option<PathBuf>,

    /// Recorded clinical cases CSV (default: <DATA_DIR>/01Hechos/clinical_data.csv).
    #[arg(long = "clinical", value_name = "PATH", global = true)]
    pub clinical: Option<PathBuf>,
}

/// Scoring and search options shared by `recommend` and `batch`.
#[derive(Args)]
pub struct EngineArgs {
    /// Minimum similarity (0-1) accepted by fuzzy name matching.
    #[arg(long = "fuzzy-threshold", value_name = "RATIO", default_value_t = 0.6)]
    pub fuzzy_threshold: f64,

    /// Maximum alternatives taken from the diagnosis search.
    #[arg(long = "diagnosis-pool", value_name = "N", default_value_t = 10)]
    pub diagnosis_pool: usize,

    /// Maximum alternatives taken from the therapeutic-class search.
    #[arg(long = "class-pool", value_name = "N", default_value_t = 5)]
    pub class_pool: usize,

    /// Skip the note about side effects overlapping the patient's symptoms.
    #[arg(long = "no-symptom-warnings")]
    pub no_symptom_warnings: bool,
}

#[derive(Args)]
pub struct RecommendArgs {
    /// Current medication: brand name, local name or composition.
    #[arg(value_name = "MEDICATION")]
    pub medication: String,

    /// Patient diagnosis.
    #[arg(long = "diagnosis", value_name = "TEXT")]
    pub diagnosis: String,

    /// Current symptoms.
    #[arg(long = "symptoms", value_name = "TEXT", default_value = "")]
    pub symptoms: String,

    /// Relevant medical history.
    #[arg(long = "history", value_name = "TEXT", default_value = "")]
    pub history: String,

    /// Known allergies.
    #[arg(long = "allergies", value_name = "TEXT", default_value = "")]
    pub allergies: String,

    /// Free-text clinical notes (replaces --symptoms/--history/--allergies).
    #[arg(
        long = "notes",
        value_name = "TEXT",
        conflicts_with_all = ["symptoms", "history", "allergies"]
    )]
    pub notes: Option<String>,

    /// Why the medication must be replaced.
    #[arg(long = "reason", value_enum, default_value = "unspecified")]
    pub reason: ReasonArg,

    /// Print the full result as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Also list rejected substitutes and every justification.
    #[arg(long = "detailed")]
    pub detailed: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Medication name or composition to resolve.
    #[arg(value_name = "MEDICATION")]
    pub medication: String,

    /// Minimum similarity (0-1) accepted by fuzzy name matching.
    #[arg(long = "fuzzy-threshold", value_name = "RATIO", default_value_t = 0.6)]
    pub fuzzy_threshold: f64,
}

#[derive(Args)]
pub struct EffectsArgs {
    /// Medication name.
    #[arg(value_name = "MEDICATION")]
    pub medication: String,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Evaluate at most this many cases.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Substitution reason applied to every case.
    #[arg(long = "reason", value_enum, default_value = "allergy")]
    pub reason: ReasonArg,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// CLI substitution reason choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ReasonArg {
    Allergy,
    Shortage,
    Unspecified,
}

impl From<ReasonArg> for SubstitutionReason {
    fn from(value: ReasonArg) -> Self {
        match value {
            ReasonArg::Allergy => Self::Allergy,
            ReasonArg::Shortage => Self::Shortage,
            ReasonArg::Unspecified => Self::Unspecified,
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

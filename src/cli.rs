use std::path::PathBuf;

use clap::{Parser, Subcommand};
use notos_calendar::Frequency;
use notos_dist::Family;
use notos_index::IndexKind;
use notos_series::Aggregation;
use notos_standardize::{SiConfig, SiMethod};

/// Notos standardized drought index toolkit.
#[derive(Parser)]
#[command(
    name = "notos",
    version,
    about = "Standardized drought indices (SPI, SPEI, SGI, SSFI) from CSV series"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Compute standardized scores and write them as CSV.
    Compute(ComputeArgs),
    /// Fit per-group distributions and report parameters and fit quality.
    Check(CheckArgs),
}

/// Arguments for the `compute` subcommand.
#[derive(clap::Args)]
pub struct ComputeArgs {
    /// Path to input CSV (date,value columns, ISO dates).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path for the score CSV output.
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub fit: FitArgs,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to input CSV (date,value columns, ISO dates).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Reject fits whose KS p-value falls below this threshold.
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,

    #[command(flatten)]
    pub fit: FitArgs,
}

/// Fit settings shared by `compute` and `check`.
#[derive(clap::Args)]
pub struct FitArgs {
    /// Named index preset (spi, spei, sgi, ssfi).
    #[arg(long, conflicts_with_all = ["family", "normal_scores"])]
    pub index: Option<IndexKind>,

    /// Distribution family for a custom run (gamma, lognormal, normal).
    #[arg(long, conflicts_with = "normal_scores")]
    pub family: Option<Family>,

    /// Use rank-based normal scores instead of a parametric fit.
    #[arg(long)]
    pub normal_scores: bool,

    /// Rolling window length in native frequency steps.
    #[arg(short, long, default_value_t = 1)]
    pub timescale: usize,

    /// Aggregate rolling windows by mean instead of sum.
    #[arg(long)]
    pub mean: bool,

    /// Calendar grouping frequency (daily, monthly); inferred when omitted.
    #[arg(long)]
    pub fit_frequency: Option<Frequency>,

    /// Circular window of neighboring calendar groups pooled per fit,
    /// in ring steps.
    #[arg(long, default_value_t = 0)]
    pub fit_window: usize,

    /// Model exact zeros as an explicit probability mass.
    #[arg(long)]
    pub prob_zero: bool,

    /// Minimum finite observations per calendar group.
    #[arg(long, default_value_t = 8)]
    pub min_group_size: usize,

    /// Abort on any unfittable group instead of producing NaN scores.
    #[arg(long)]
    pub strict: bool,
}

impl FitArgs {
    /// Resolves the flags into an engine configuration. A preset supplies
    /// the distribution choices; the remaining flags override or extend it.
    pub fn to_config(&self) -> SiConfig {
        let mut config = match self.index {
            Some(kind) => kind.config(self.timescale),
            None if self.normal_scores => SiConfig::new()
                .with_timescale(self.timescale)
                .with_method(SiMethod::NormalScores),
            None => SiConfig::new()
                .with_timescale(self.timescale)
                .with_method(SiMethod::Parametric(self.family.unwrap_or(Family::Gamma))),
        };
        if self.mean {
            config = config.with_aggregation(Aggregation::Mean);
        }
        if let Some(frequency) = self.fit_frequency {
            config = config.with_fit_frequency(frequency);
        }
        if self.prob_zero {
            config = config.with_prob_zero(true);
        }
        config
            .with_fit_window(self.fit_window)
            .with_min_group_size(self.min_group_size)
            .with_strict(self.strict)
    }
}

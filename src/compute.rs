use anyhow::{Context, Result};
use tracing::{info, warn};

use notos_standardize::SiEngine;

use crate::cli::ComputeArgs;

/// Runs the `compute` subcommand: read, standardize, write scores.
pub fn run(args: ComputeArgs) -> Result<()> {
    let config = args.fit.to_config();
    let series = notos_io::read_series(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    info!(n = series.len(), "input series loaded");

    let engine = SiEngine::fit(&series, config)?;
    let result = engine.standardize();

    let diagnostics = result.diagnostics();
    info!(
        groups = engine.fitted().len(),
        skipped = diagnostics.skipped().len(),
        undersampled = diagnostics.undersampled().len(),
        clipped = diagnostics.n_clipped(),
        "standardization finished"
    );
    for (key, reason) in diagnostics.skipped() {
        warn!(
            group = key.label(),
            %reason,
            "group not fit, its scores are NaN"
        );
    }

    notos_io::write_series(&args.output, result.scores())
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(())
}

use anyhow::{Context, Result};

use notos_dist::FittedDistribution;
use notos_standardize::SiEngine;

use crate::cli::CheckArgs;

/// Runs the `check` subcommand: fit per-group distributions and report
/// their parameters and Kolmogorov-Smirnov fit quality.
pub fn run(args: CheckArgs) -> Result<()> {
    let config = args.fit.to_config();
    let series = notos_io::read_series(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let engine = SiEngine::fit(&series, config)?;
    println!(
        "grouping: {} ({} of {} groups fit)",
        engine.fit_frequency(),
        engine.fitted().len(),
        engine.fit_frequency().ring_size(),
    );

    let mut rejected = 0usize;
    for (key, dist) in engine.fitted() {
        let p = dist.ks_test();
        let flag = if p < args.alpha {
            rejected += 1;
            "  <- rejected"
        } else {
            ""
        };
        println!(
            "group {:>3}  n={:<5} {:<44} ks_p={:.3}{}",
            key.label(),
            dist.sample().len(),
            describe(dist),
            p,
            flag
        );
    }
    for (key, reason) in engine.diagnostics().skipped() {
        println!("group {:>3}  not fit: {}", key.label(), reason);
    }
    for key in engine.diagnostics().undersampled() {
        println!("group {:>3}  undersampled", key.label());
    }

    if rejected > 0 {
        println!(
            "{rejected} group(s) rejected at alpha = {}; consider another family or a wider fit window",
            args.alpha
        );
    }
    Ok(())
}

fn describe(dist: &FittedDistribution) -> String {
    match (dist.family(), dist.params()) {
        (Some(family), Some(params)) => {
            let shape = params
                .shape()
                .map(|v| format!("shape={v:.4}, "))
                .unwrap_or_default();
            let p0 = dist
                .p0()
                .map(|v| format!(", p0={v:.3}"))
                .unwrap_or_default();
            format!(
                "{family}({shape}loc={:.4}, scale={:.4}{p0})",
                params.loc(),
                params.scale()
            )
        }
        _ => "normal-scores".to_string(),
    }
}

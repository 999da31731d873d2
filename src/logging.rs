use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Crates sharing the notos log namespace. Dependency noise stays out of
/// the default output because the filter names these targets explicitly.
const TARGETS: [&str; 7] = [
    "notos",
    "notos_calendar",
    "notos_dist",
    "notos_index",
    "notos_io",
    "notos_series",
    "notos_standardize",
];

/// Level selected by the number of `-v` flags, warn when absent.
fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global tracing subscriber.
///
/// A `RUST_LOG` environment variable takes precedence over the verbosity
/// flag; otherwise every notos crate logs at the flag-selected level.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level_for(verbosity);
        let directives = TARGETS.map(|target| format!("{target}={level}"));
        EnvFilter::new(directives.join(","))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

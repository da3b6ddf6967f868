use tracing_subscriber::EnvFilter;

/// Target the library logs under.
const CRATE_TARGET: &str = "expression_matrix";

/// Level for this crate's target at a given verbosity.
///
/// Mapping:
/// - 0 -> warn
/// - 1 -> info
/// - 2 -> debug
/// - 3+ -> trace
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a `fmt` subscriber for this crate's log output.
///
/// `RUST_LOG` overrides the verbosity if set. Returns `false` when a global
/// subscriber was already installed, in which case nothing changes.
pub fn init(verbosity: u8) -> bool {
    let default_filter = format!("{CRATE_TARGET}={}", level_for(verbosity));

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects debug output (one
/// summary line per step) over the default of warnings only.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let env = Env::default().default_filter_or(level.to_string());
    // `try_init` only fails if a logger is already installed.
    let _ = Builder::from_env(env).try_init();
}

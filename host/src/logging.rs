use env_logger::{Builder, Env};
use log::LevelFilter;

/// Install the global logger.
///
/// `verbose` turns on debug output (per-frame positions, load progress). Otherwise
/// `RUST_LOG` decides, defaulting to info.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    if verbose {
        builder.filter_level(level);
    }

    // Fails only when a logger is already installed, which tests do repeatedly.
    let _ = builder.try_init();
}

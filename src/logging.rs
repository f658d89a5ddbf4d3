use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global tracing subscriber. The `-v` count raises the level
/// over the configured one; `RUST_LOG` wins when set.
pub fn init(cfg: &LoggingConfig, verbose: u8) {
    let level = match verbose {
        0 => cfg.level.clone(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if cfg.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

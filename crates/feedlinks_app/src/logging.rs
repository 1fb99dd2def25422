//! Terminal logging for the feedlinks binary.
//!
//! Errors and warnings go to stderr, everything else to stdout, so the only
//! file the binary writes is its JSON output.

use log::LevelFilter;
use simplelog::{ColorChoice, Config, ConfigBuilder, TermLogger, TerminalMode};

/// Initialize the global logger at `level`. A second call is a no-op.
pub fn initialize(level: LevelFilter) {
    let _ = TermLogger::init(level, build_config(), TerminalMode::Mixed, ColorChoice::Auto);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

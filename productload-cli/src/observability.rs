//! Tracing setup for the binary.

use std::env;
use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

use crate::config::{Config, LogFormat};

/// Installs the global tracing subscriber writing to stderr.
pub fn init_tracing(config: &Config) {
    let (level, env_filter) = parse_rust_log(config.logging.level);

    let pretty = match config.logging.format {
        LogFormat::Auto => std::io::stderr().is_terminal(),
        LogFormat::Pretty => true,
        LogFormat::Simplified => false,
    };

    let format = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(pretty);
    let format = if pretty {
        format.pretty().boxed()
    } else {
        format.compact().boxed()
    };

    tracing_subscriber::registry()
        .with(format.with_filter(level))
        .with(env_filter)
        .init();
}

/// Determines the effective level and per-target filter.
///
/// A plain level in `RUST_LOG` replaces the configured level. Anything else is used as a literal
/// filter directive.
pub fn parse_rust_log(configured: LevelFilter) -> (LevelFilter, EnvFilter) {
    let level = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) => match value.parse::<LevelFilter>() {
            Ok(level) => level,
            Err(_) => return (LevelFilter::TRACE, EnvFilter::new(value)),
        },
        Err(_) => configured,
    };

    // Maximum verbosity per target; the layer filter narrows this down to `level`.
    let env_filter = EnvFilter::new(
        "INFO,\
        tower_http=TRACE,\
        productload=TRACE,\
        productload_cli=TRACE,\
        productload_engine=TRACE,\
        productload_client=TRACE,\
        productload_server=TRACE,\
        ",
    );

    (level, env_filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rust_log_level_wins() {
        figment::Jail::expect_with(|jail| {
            jail.set_env(EnvFilter::DEFAULT_ENV, "debug");

            let (level, _) = parse_rust_log(LevelFilter::WARN);
            assert_eq!(level, LevelFilter::DEBUG);
            Ok(())
        });
    }

    #[test]
    fn rust_log_directives_are_used_literally() {
        figment::Jail::expect_with(|jail| {
            jail.set_env(EnvFilter::DEFAULT_ENV, "productload_engine=debug");

            let (level, _) = parse_rust_log(LevelFilter::WARN);
            assert_eq!(level, LevelFilter::TRACE);
            Ok(())
        });
    }
}

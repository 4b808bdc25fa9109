//! Logging configuration for mcs150.
//!
//! Diagnostics go to stderr through `tracing`; stdout is reserved for command
//! output so that `--format json` can be piped. Tokens and passwords are
//! never passed to a log macro.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How chatty the client is on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// `-q`: errors only.
    Quiet,
    /// Warnings and errors.
    #[default]
    Normal,
    /// `-v`: backend requests and wizard transitions.
    Verbose,
    /// `-vv`: everything, including slot reads and writes.
    Trace,
}

impl Verbosity {
    /// Build from the `-q` and `-v` command-line flags. `-q` wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    /// Most detailed level that is emitted.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directive(self) -> String {
        format!("mcs150={}", self.level())
    }
}

/// Install the stderr subscriber.
///
/// Call once at start-up. `RUST_LOG` takes precedence over `verbosity`;
/// a second call is a no-op.
///
/// # Examples
///
/// ```no_run
/// use mcs150::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= Verbosity::Verbose)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init();
}

/// Route test logs through the test harness's captured output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("mcs150=debug")
        .with_test_writer()
        .try_init();
}

//! Tracing subscriber setup for the CLI.
//!
//! Filter priority: `REVIEW_QUOTA_LOG`, then `RUST_LOG`, then the `-v`/`-q`
//! flags, then `warn`. Logs go to stderr so report output stays clean.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "REVIEW_QUOTA_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// Verbose wins when both flags are given.
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Installs the global subscriber. Call once, before loading config.
pub fn init_subscriber(verbosity: Verbosity) {
    let stderr_is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(stderr_is_tty)
        .with_target(false)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(layer)
        .init();
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    let project = std::env::var(LOG_ENV).ok();
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    select_filter(project.as_deref(), rust_log.as_deref(), verbosity)
}

/// Blank or unparseable directives fall through to the next source.
fn select_filter(project: Option<&str>, rust_log: Option<&str>, verbosity: Verbosity) -> EnvFilter {
    for directives in [project, rust_log].into_iter().flatten() {
        if directives.trim().is_empty() {
            continue;
        }
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return filter;
        }
    }

    let level = verbosity.default_level();
    EnvFilter::new(level.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Verbose);
    }

    #[test]
    fn levels_follow_verbosity() {
        assert_eq!(Verbosity::Quiet.default_level(), Level::ERROR);
        assert_eq!(Verbosity::Normal.default_level(), Level::WARN);
        assert_eq!(Verbosity::Verbose.default_level(), Level::DEBUG);
    }

    fn hint(project: Option<&str>, rust_log: Option<&str>, verbosity: Verbosity) -> Option<LevelFilter> {
        select_filter(project, rust_log, verbosity).max_level_hint()
    }

    #[test]
    fn project_variable_beats_rust_log_and_flags() {
        assert_eq!(
            hint(Some("trace"), Some("info"), Verbosity::Quiet),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn rust_log_beats_flags() {
        assert_eq!(hint(None, Some("info"), Verbosity::Verbose), Some(LevelFilter::INFO));
        assert_eq!(hint(Some("  "), Some("info"), Verbosity::Quiet), Some(LevelFilter::INFO));
    }

    #[test]
    fn invalid_directives_fall_through() {
        assert_eq!(
            hint(Some("review_quota_tracker=loud"), Some("info"), Verbosity::Normal),
            Some(LevelFilter::INFO)
        );
        assert_eq!(
            hint(Some("=loud"), Some("=louder"), Verbosity::Verbose),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn flags_apply_without_environment() {
        assert_eq!(hint(None, None, Verbosity::Quiet), Some(LevelFilter::ERROR));
        assert_eq!(hint(None, None, Verbosity::Normal), Some(LevelFilter::WARN));
        assert_eq!(hint(None, None, Verbosity::Verbose), Some(LevelFilter::DEBUG));
    }
}

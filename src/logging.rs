//! Logging setup
//!
//! Perch logs through the `log` facade and installs `env_logger` once at
//! startup. The command line picks a default level; `RUST_LOG` overrides it.

use log::LevelFilter;

/// How chatty the compositor is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only
    #[default]
    Error,
    /// `--verbose`
    Info,
    /// `--debug`
    Debug,
}

impl Verbosity {
    /// `--debug` wins over `--verbose`
    pub fn from_flags(debug: bool, verbose: bool) -> Self {
        if debug {
            Self::Debug
        } else if verbose {
            Self::Info
        } else {
            Self::Error
        }
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
        }
    }

    fn default_filter(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

/// Install the global logger. Later calls are ignored.
pub fn init(verbosity: Verbosity) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(verbosity.default_filter()),
    )
    .format_timestamp_millis()
    .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_to_verbosity() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Error);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Info);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Debug);
        assert_eq!(Verbosity::Debug.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(Verbosity::Debug);
        init(Verbosity::Error);
    }
}

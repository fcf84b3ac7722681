// Logging and verbosity control

use std::sync::atomic::{AtomicU8, Ordering};

use tracing::Level;

/// Global verbosity level
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Quiet mode - errors only
    Quiet = 0,
    /// Normal mode - standard output
    Normal = 1,
    /// Verbose mode - detailed output
    Verbose = 2,
}

impl VerbosityLevel {
    /// Get the current verbosity level
    pub fn current() -> Self {
        match VERBOSITY.load(Ordering::Relaxed) {
            0 => VerbosityLevel::Quiet,
            1 => VerbosityLevel::Normal,
            _ => VerbosityLevel::Verbose,
        }
    }

    /// Set the verbosity level
    pub fn set(level: Self) {
        VERBOSITY.store(level as u8, Ordering::Relaxed);
    }

    /// Check if we should output at this level
    pub fn should_output(&self) -> bool {
        self <= &Self::current()
    }

    /// Verbosity selected by the global flags; `--quiet` wins
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            VerbosityLevel::Quiet
        } else if verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Diagnostic level for the tracing subscriber
///
/// `--quiet` and `--verbose` take precedence over the configured level.
/// Unknown configured levels fall back to `warn`.
pub fn tracing_level(verbosity: VerbosityLevel, configured: &str) -> Level {
    match verbosity {
        VerbosityLevel::Quiet => Level::ERROR,
        VerbosityLevel::Verbose => Level::DEBUG,
        VerbosityLevel::Normal => configured.parse().unwrap_or(Level::WARN),
    }
}

/// Initialize logging based on CLI flags and the configured level
///
/// Diagnostics go to stderr.
pub fn init_logging(verbose: bool, quiet: bool, configured_level: &str) {
    let verbosity = VerbosityLevel::from_flags(verbose, quiet);
    VerbosityLevel::set(verbosity);

    // A subscriber may already be installed (tests, embedding callers).
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_level(verbosity, configured_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

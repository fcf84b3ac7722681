//! GPGen configuration
//!
//! Static language tables (supported versions, package managers, default
//! commands, scanner severities) and the layered tool settings read from
//! config files and the environment.

pub mod error;
pub mod languages;
pub mod manager;
pub mod settings;

pub use error::{ConfigError, Result};
pub use languages::{Language, LanguageConfig, PackageManager, SEVERITY_LEVELS};
pub use manager::ConfigManager;
pub use settings::{GeneratorSettings, GpgenSettings, LoggingSettings, OutputSettings};

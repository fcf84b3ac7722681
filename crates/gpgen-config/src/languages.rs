//! Language tables backing the built-in templates
//!
//! Each supported toolchain has a fixed list of versions, package managers and
//! default commands. Templates derive their input definitions from these
//! tables, and `gpgen init` uses them to scaffold manifests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Severity thresholds accepted by the Trivy scan step
pub const SEVERITY_LEVELS: &[&str] = &[
    "CRITICAL",
    "HIGH",
    "MEDIUM",
    "LOW",
    "CRITICAL,HIGH",
    "CRITICAL,HIGH,MEDIUM",
];

/// Severity threshold used when a manifest does not pick one
pub const DEFAULT_SEVERITY: &str = "CRITICAL,HIGH";

/// Toolchains with a golden-path template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Go services
    Go,
    /// Node.js applications
    Node,
    /// Python applications
    Python,
}

impl Language {
    /// All supported languages
    pub const ALL: [Language; 3] = [Language::Go, Language::Node, Language::Python];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Node => "node",
            Language::Python => "python",
        }
    }

    /// Version and tooling table for this language
    pub fn config(&self) -> &'static LanguageConfig {
        match self {
            Language::Go => &GO,
            Language::Node => &NODE,
            Language::Python => &PYTHON,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "go" | "golang" => Ok(Language::Go),
            "node" | "nodejs" | "node.js" => Ok(Language::Node),
            "python" | "py" => Ok(Language::Python),
            _ => Err(ConfigError::Unknown {
                kind: "language",
                value: s.to_string(),
            }),
        }
    }
}

/// Package managers understood by the install steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// npm (installs with `npm ci`)
    Npm,
    /// Yarn
    Yarn,
    /// pnpm
    Pnpm,
    /// pip with a requirements file
    Pip,
    /// Poetry
    Poetry,
    /// Pipenv
    Pipenv,
}

impl PackageManager {
    /// Canonical command name
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Pip => "pip",
            PackageManager::Poetry => "poetry",
            PackageManager::Pipenv => "pipenv",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            "pnpm" => Ok(PackageManager::Pnpm),
            "pip" => Ok(PackageManager::Pip),
            "poetry" => Ok(PackageManager::Poetry),
            "pipenv" => Ok(PackageManager::Pipenv),
            _ => Err(ConfigError::Unknown {
                kind: "package manager",
                value: s.to_string(),
            }),
        }
    }
}

/// Tooling table for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Language this table describes
    pub language: Language,
    /// Name of the template input carrying the toolchain version
    pub version_input: &'static str,
    /// Supported toolchain versions, oldest first
    pub versions: &'static [&'static str],
    /// Version used when the manifest does not pick one
    pub default_version: &'static str,
    /// Supported package managers (empty when the toolchain has a single one)
    pub package_managers: &'static [PackageManager],
    /// Default package manager
    pub default_package_manager: Option<PackageManager>,
    /// Default test command
    pub test_command: &'static str,
    /// Default build command
    pub build_command: Option<&'static str>,
    /// Default lint command
    pub lint_command: Option<&'static str>,
    /// Default dependency manifest for pip installs
    pub requirements_file: Option<&'static str>,
}

impl LanguageConfig {
    /// Check whether a package manager can be used with this language
    pub fn supports_package_manager(&self, manager: PackageManager) -> bool {
        self.package_managers.contains(&manager)
    }

    /// Newest supported toolchain version
    pub fn latest_version(&self) -> &'static str {
        self.versions.last().copied().unwrap_or(self.default_version)
    }

    /// Package manager names in declaration order
    pub fn package_manager_names(&self) -> Vec<&'static str> {
        self.package_managers.iter().map(|pm| pm.as_str()).collect()
    }
}

static GO: LanguageConfig = LanguageConfig {
    language: Language::Go,
    version_input: "goVersion",
    versions: &["1.21", "1.22", "1.23", "1.24"],
    default_version: "1.21",
    package_managers: &[],
    default_package_manager: None,
    test_command: "go test ./...",
    build_command: Some("go build -o bin/service ./cmd/service"),
    lint_command: None,
    requirements_file: None,
};

static NODE: LanguageConfig = LanguageConfig {
    language: Language::Node,
    version_input: "nodeVersion",
    versions: &["16", "18", "20", "22"],
    default_version: "18",
    package_managers: &[PackageManager::Npm, PackageManager::Yarn, PackageManager::Pnpm],
    default_package_manager: Some(PackageManager::Npm),
    test_command: "npm test",
    build_command: Some("npm run build"),
    lint_command: None,
    requirements_file: None,
};

static PYTHON: LanguageConfig = LanguageConfig {
    language: Language::Python,
    version_input: "pythonVersion",
    versions: &["3.9", "3.10", "3.11", "3.12"],
    default_version: "3.11",
    package_managers: &[PackageManager::Pip, PackageManager::Poetry, PackageManager::Pipenv],
    default_package_manager: Some(PackageManager::Pip),
    test_command: "pytest",
    build_command: None,
    lint_command: Some("flake8"),
    requirements_file: Some("requirements.txt"),
};

/// Check whether a severity threshold is accepted by the scanner
pub fn is_valid_severity(severity: &str) -> bool {
    SEVERITY_LEVELS.contains(&severity)
}

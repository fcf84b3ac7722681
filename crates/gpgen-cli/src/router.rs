// Command routing and dispatch

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use gpgen_config::{ConfigManager, GpgenSettings};
use tracing::debug;

use crate::commands::*;
use crate::error::CliResult;

/// Default manifest path for `init`, `generate` and `validate`
pub const DEFAULT_MANIFEST: &str = "manifest.yaml";

/// GPGen - Golden Path Pipeline Generator
#[derive(Parser, Debug)]
#[command(name = "gpgen")]
#[command(bin_name = "gpgen")]
#[command(about = "Golden Path Pipeline Generator")]
#[command(
    long_about = "GPGen generates GitHub Actions workflows from pre-defined golden-path templates.\n\nTeams standardize their CI/CD pipelines while customizing them through a manifest:\n  • gpgen init          Create a manifest for a template\n  • gpgen validate      Check a manifest\n  • gpgen generate      Write workflows for every environment\n  • gpgen templates     List the available templates"
)]
#[command(version)]
#[command(author = "GPGen Contributors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings file to use instead of .gpgen.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new manifest
    #[command(about = "Initialize a new GPGen manifest for a template")]
    Init {
        /// Template to use (node-app, go-service, python-app)
        #[arg(short, long, default_value = "node-app")]
        template: String,

        /// Pipeline name (defaults to the current directory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Output file path
        #[arg(short, long, default_value = DEFAULT_MANIFEST)]
        output: PathBuf,

        /// Overwrite an existing manifest file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate workflows from a manifest
    #[command(about = "Generate GitHub Actions workflows from a manifest")]
    Generate {
        /// Manifest file
        #[arg(value_name = "MANIFEST", default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,

        /// Output directory (defaults to output.directory from settings)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate for one environment only (default: all environments)
        #[arg(short, long)]
        environment: Option<String>,

        /// Show what would be generated without writing files
        #[arg(short, long)]
        dry_run: bool,

        /// Overwrite existing workflow files
        #[arg(short = 'f', long)]
        overwrite: bool,
    },

    /// Validate a manifest
    #[command(about = "Validate a GPGen manifest file")]
    Validate {
        /// Manifest file
        #[arg(value_name = "MANIFEST", default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,

        /// Use strict validation mode
        #[arg(short, long)]
        strict: bool,
    },

    /// List or describe templates
    #[command(about = "List templates, or show the steps and inputs of one")]
    Templates {
        /// Template to describe
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse arguments, set up logging and run the command
    pub fn route() -> CliResult<()> {
        let cli = Cli::parse();

        let settings = Self::load_settings(&cli)?;
        crate::logging::init_logging(cli.verbose, cli.quiet, &settings.logging.level);
        debug!(?settings, "Loaded settings");

        Self::execute(&cli, &settings)
    }

    /// Load layered settings, honouring `--config`
    pub fn load_settings(cli: &Cli) -> CliResult<GpgenSettings> {
        let manager = match &cli.config {
            Some(path) => ConfigManager::new().with_path(path.clone()),
            None => ConfigManager::new(),
        };
        Ok(manager.load()?)
    }

    /// Execute a command
    pub fn execute(cli: &Cli, settings: &GpgenSettings) -> CliResult<()> {
        let Some(command) = &cli.command else {
            Cli::command().print_help()?;
            return Ok(());
        };

        match command {
            Commands::Init {
                template,
                name,
                output,
                force,
            } => InitCommand::new(template.clone())
                .with_name(name.clone())
                .with_output(output.clone())
                .with_force(*force)
                .execute(),
            Commands::Generate {
                manifest,
                output,
                environment,
                dry_run,
                overwrite,
            } => {
                let output_dir = output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(&settings.output.directory));
                GenerateCommand::new(manifest.clone(), output_dir)
                    .with_environment(environment.clone())
                    .with_dry_run(*dry_run)
                    .with_overwrite(*overwrite)
                    .with_settings(settings.generator.clone())
                    .execute()
            }
            Commands::Validate { manifest, strict } => {
                ValidateCommand::new(manifest.clone())
                    .with_strict(*strict)
                    .execute()
            }
            Commands::Templates { name } => TemplatesCommand::new(name.clone()).execute(),
            Commands::Completions { shell } => crate::completion::generate_completions(shell),
        }
    }
}

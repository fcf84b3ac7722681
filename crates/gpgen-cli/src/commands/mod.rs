// Command handlers for the gpgen CLI

pub mod generate;
pub mod init;
pub mod templates;
pub mod validate;

pub use generate::GenerateCommand;
pub use init::InitCommand;
pub use templates::TemplatesCommand;
pub use validate::{ValidateCommand, ValidationReport};

use crate::error::CliResult;

/// Trait for command handlers
pub trait Command {
    /// Execute the command
    fn execute(&self) -> CliResult<()>;
}

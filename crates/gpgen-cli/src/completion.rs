// Shell completion generation

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::error::{CliError, CliResult};
use crate::router::Cli;

/// Parse a shell name
pub fn parse_shell(shell: &str) -> CliResult<Shell> {
    match shell.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" | "pwsh" => Ok(Shell::PowerShell),
        "elvish" => Ok(Shell::Elvish),
        _ => Err(CliError::InvalidArgument {
            message: format!(
                "Unknown shell: {} (expected bash, zsh, fish, powershell or elvish)",
                shell
            ),
        }),
    }
}

/// Write a completion script for a shell
pub fn write_completions<W: Write>(shell: &str, out: &mut W) -> CliResult<()> {
    let shell = parse_shell(shell)?;
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "gpgen", out);
    Ok(())
}

/// Generate shell completions on stdout
pub fn generate_completions(shell: &str) -> CliResult<()> {
    write_completions(shell, &mut io::stdout())
}

// Output formatting and styling

use colored::Colorize;

use crate::logging::VerbosityLevel;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format info message
    pub fn info(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "ℹ".blue(), msg)
        } else {
            format!("ℹ {}", msg)
        }
    }

    /// Format a file path or command
    pub fn code(&self, code: &str) -> String {
        if self.use_colors {
            code.cyan().to_string()
        } else {
            code.to_string()
        }
    }

    /// Format header
    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format a section header
    pub fn section(&self, title: &str) -> String {
        if self.use_colors {
            format!(
                "\n{}\n{}",
                title.bold().underline(),
                "─".repeat(title.chars().count())
            )
        } else {
            format!("\n{}\n{}", title, "─".repeat(title.chars().count()))
        }
    }

    /// Format a list item
    pub fn list_item(&self, item: &str) -> String {
        format!("  • {}", item)
    }

    /// Format a numbered list item
    pub fn numbered_item(&self, number: usize, item: &str) -> String {
        format!("  {}. {}", number, item)
    }

    /// Format a key-value pair
    pub fn key_value(&self, key: &str, value: &str) -> String {
        if self.use_colors {
            format!("  {}: {}", key.bold(), value)
        } else {
            format!("  {}: {}", key, value)
        }
    }

    /// Format a tip/hint
    pub fn tip(&self, tip: &str) -> String {
        if self.use_colors {
            format!("{} {}", "💡".yellow(), tip)
        } else {
            format!("💡 {}", tip)
        }
    }
}

/// Print a line unless running quietly
pub fn print_line(line: &str) {
    if VerbosityLevel::Normal.should_output() {
        println!("{}", line);
    }
}

pub fn print_success(msg: &str) {
    print_line(&OutputStyle::default().success(msg));
}

/// Errors are always printed, to stderr
pub fn print_error(msg: &str) {
    let style = OutputStyle::default();
    eprintln!("{}", style.error(msg));
}

pub fn print_warning(msg: &str) {
    print_line(&OutputStyle::default().warning(msg));
}

pub fn print_info(msg: &str) {
    print_line(&OutputStyle::default().info(msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_style_without_colors() {
        let style = OutputStyle { use_colors: false };
        assert_eq!(style.success("test"), "✓ test");
        assert_eq!(style.error("test"), "✗ test");
        assert_eq!(style.warning("test"), "⚠ test");
        assert_eq!(style.info("test"), "ℹ test");
    }

    #[test]
    fn test_section_underline_matches_title() {
        let style = OutputStyle { use_colors: false };
        assert_eq!(style.section("Inputs"), "\nInputs\n──────");
    }

    #[test]
    fn test_list_formatting() {
        let style = OutputStyle { use_colors: false };
        assert_eq!(style.list_item("node-app"), "  • node-app");
        assert_eq!(style.numbered_item(2, "setup-node"), "  2. setup-node");
        assert_eq!(style.key_value("Template", "go-service"), "  Template: go-service");
    }

    #[test]
    fn test_tip_formatting() {
        let style = OutputStyle { use_colors: false };
        assert_eq!(
            style.tip("Run without --dry-run to write files"),
            "💡 Run without --dry-run to write files"
        );
    }
}

// GPGen CLI entry point

use gpgen_cli::{output, router::CommandRouter, VerbosityLevel};

fn main() {
    if let Err(e) = CommandRouter::route() {
        output::print_error(&e.user_message());
        if VerbosityLevel::Verbose.should_output() {
            eprintln!("\n{}", e.technical_details());
        }
        std::process::exit(1);
    }
}

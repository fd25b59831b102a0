use {anyhow::Result, clap::Subcommand};

use study_together_config::{Severity, ValidationResult, validate};

use crate::settings::Settings;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the configuration and report errors/warnings.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
}

pub fn handle_config(action: ConfigAction, settings: &Settings) -> Result<()> {
    match action {
        ConfigAction::Check { verbose } => check(settings, verbose),
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(settings: &Settings, verbose: bool) -> Result<()> {
    let (config, source) = settings.load_config()?;
    eprintln!("Checking {source}\n");

    let result = validate(&config);
    print_diagnostics(&result, verbose);

    eprintln!(
        "{} queue(s), {} command channel(s), capacity rule: {:?}",
        config.queues.len(),
        config.command_channels.len(),
        config.capacity_rule
    );

    if result.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_diagnostics(result: &ValidationResult, verbose: bool) {
    let mut shown = 0;
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
            Severity::Info => CYAN,
        };
        eprintln!(
            "  {BOLD}{color}{}{RESET} {}: {}",
            d.severity, d.path, d.message
        );
        shown += 1;
    }

    if shown > 0 {
        eprintln!();
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }
}

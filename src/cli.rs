//! Command-line interface module for clean-folder.
//!
//! This module handles:
//! - Argument parsing
//! - Asking for the directory when none was given
//! - Configuration and logging setup
//! - Running the organizer and printing its report

use crate::config::{Config, ConfigError};
use crate::file_organizer::{FileOrganizer, OrganizeError};
use crate::logging::init_logging;
use crate::output::OutputFormatter;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sort a directory into category folders, transliterate names and unpack
/// archives.
#[derive(Debug, Parser)]
#[command(name = "clean-folder", version, about)]
pub struct Cli {
    /// Directory to organize; asked for interactively when omitted.
    pub path: Option<PathBuf>,

    /// Configuration file (defaults to .cleanfolder.toml, then
    /// ~/.config/clean-folder/config.toml).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Errors reported to the user by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
    #[error("failed to read the directory path: {0}")]
    Prompt(#[source] io::Error),
    #[error("no directory given")]
    NoDirectory,
    #[error("failed to write the JSON report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Runs the application for parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use clean_folder::cli::{run_cli, Cli};
/// use clap::Parser;
///
/// let cli = Cli::parse_from(["clean-folder", "/home/user/Downloads"]);
/// if let Err(e) = run_cli(cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: Cli) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config.logging.level);
    let exclusions = config.exclusions()?;

    let root = match cli.path {
        Some(path) => path,
        None => {
            let stdin = io::stdin();
            ask_path(&mut stdin.lock(), &mut io::stdout())?
        }
    };

    let organizer = FileOrganizer::new(exclusions);
    if cli.json {
        let result = organizer.scan(&root)?;
        OutputFormatter::print_json(&root, &result)?;
    } else {
        organize_interactive(&organizer, &root)?;
    }
    Ok(())
}

fn organize_interactive(organizer: &FileOrganizer, root: &Path) -> Result<(), CliError> {
    let spinner = OutputFormatter::spinner(&format!("Organizing {}", root.display()));
    let result = organizer.scan(root);
    spinner.finish_and_clear();

    let result = result?;
    OutputFormatter::print_report(&result);
    OutputFormatter::summary_table(&result);
    Ok(())
}

/// Prompts for the directory to organize. An empty answer or end of input
/// means there is nothing to do.
pub fn ask_path(input: &mut impl BufRead, output: &mut impl Write) -> Result<PathBuf, CliError> {
    writeln!(output, "The directory can also be passed as an argument:")
        .map_err(CliError::Prompt)?;
    writeln!(output, "\n\tclean-folder <directory>\n").map_err(CliError::Prompt)?;
    write!(output, "Enter the directory path: ").map_err(CliError::Prompt)?;
    output.flush().map_err(CliError::Prompt)?;

    let mut answer = String::new();
    input.read_line(&mut answer).map_err(CliError::Prompt)?;

    let answer = answer.trim();
    if answer.is_empty() {
        return Err(CliError::NoDirectory);
    }
    Ok(PathBuf::from(answer))
}

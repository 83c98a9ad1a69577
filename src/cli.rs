//! Command-line interface: argument parsing and orchestration.
//!
//! The renaming pass always runs over the target directory; the sorting
//! pass runs afterwards only when an output directory is given.

use crate::config::TidyConfig;
use crate::file_renamer::{FileRenamer, RenameOptions};
use crate::media_sorter::MediaSorter;
use crate::output::{LOG_FILE, Reporter};
use crate::pipeline::RulePipeline;
use crate::truncate::Truncator;
use clap::Parser;
use std::path::PathBuf;

/// Rename media files to a canonical, human-readable form and optionally
/// sort them into type-based folders.
#[derive(Parser, Debug)]
#[command(name = "mediatidy", version, about)]
pub struct Cli {
    /// Directory to tidy
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Confirm every rename
    #[arg(short, long)]
    pub interactive: bool,

    /// Confirm renames per directory until one is accepted
    #[arg(short, long)]
    pub semi_interactive: bool,

    /// Show what would change without renaming anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Truncate normalized names longer than this many characters
    #[arg(short, long, value_name = "CHARS")]
    pub max_length: Option<usize>,

    /// Sort entries into type-based folders under this directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Mirror all messages to a log file in the target directory
    #[arg(short, long)]
    pub log: bool,

    /// Show every entry visited
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Run the tool with parsed arguments.
///
/// # Errors
///
/// Returns an error message when setup fails (configuration, rule
/// compilation, log file) or the sorting source cannot be read.
/// Per-entry failures during the walk are reported and do not abort.
pub fn run(cli: Cli) -> Result<(), String> {
    let mut config = TidyConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;

    if let Some(max_length) = cli.max_length {
        config.max_length = max_length;
    }
    if cli.log {
        // The log lives in the tree being renamed; never rename it
        config.skip.filenames.push(LOG_FILE.to_string());
    }

    let max_length = config.max_length;
    let skip = config
        .compile()
        .map_err(|e| format!("Error compiling skip rules: {}", e))?;
    let pipeline = RulePipeline::new().map_err(|e| format!("Error compiling rules: {}", e))?;

    let mut reporter = if cli.log {
        Reporter::with_log_file(cli.verbose, &cli.directory.join(LOG_FILE))
            .map_err(|e| format!("Error opening log file: {}", e))?
    } else {
        Reporter::new(cli.verbose)
    };

    let options = RenameOptions {
        dry_run: cli.dry_run,
        interactive: cli.interactive,
        semi_interactive: cli.semi_interactive,
    };
    let renamer = FileRenamer::new(pipeline, Truncator::new(max_length), skip, options);
    renamer.process(&cli.directory, &mut reporter);

    if let Some(output) = &cli.output {
        let sorter = MediaSorter::new(output.clone(), cli.dry_run, cli.interactive)
            .map_err(|e| format!("Error compiling type mappings: {}", e))?;
        sorter
            .sort(&cli.directory, &mut reporter)
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["mediatidy"]);
        assert_eq!(cli.directory, PathBuf::from("."));
        assert!(!cli.dry_run);
        assert!(!cli.interactive);
        assert_eq!(cli.max_length, None);
        assert_eq!(cli.output, None);
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::parse_from([
            "mediatidy",
            "/media/incoming",
            "-n",
            "-v",
            "--max-length",
            "80",
            "--output",
            "../sorted",
        ]);
        assert_eq!(cli.directory, PathBuf::from("/media/incoming"));
        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert_eq!(cli.max_length, Some(80));
        assert_eq!(cli.output, Some(PathBuf::from("../sorted")));
    }
}

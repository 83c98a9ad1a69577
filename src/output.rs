//! Output formatting, styling, and optional log file mirroring.
//!
//! All user-facing output goes through a [`Reporter`], which styles
//! console messages and, when a log file is attached, mirrors every
//! message there with a timestamp and level tag.

use chrono::Local;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Name of the log file written into the target directory with `--log`.
pub const LOG_FILE: &str = "mediatidy.log";

/// Styled console output with an optional log file mirror.
pub struct Reporter {
    verbose: bool,
    log: Option<File>,
}

impl Reporter {
    /// A reporter writing to the console only.
    pub fn new(verbose: bool) -> Self {
        Self { verbose, log: None }
    }

    /// A reporter that also appends every message to a log file.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened for appending.
    pub fn with_log_file(verbose: bool, path: &Path) -> std::io::Result<Self> {
        let log = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            verbose,
            log: Some(log),
        })
    }

    /// Prints a dimmed trace message, only in verbose mode.
    pub fn debug(&mut self, message: &str) {
        if !self.verbose {
            return;
        }
        println!("{}", message.dimmed());
        self.append("DEBUG", message);
    }

    /// Prints a regular message.
    pub fn info(&mut self, message: &str) {
        println!("{}", message);
        self.append("INFO", message);
    }

    /// Prints a success message in green with a checkmark.
    pub fn success(&mut self, message: &str) {
        println!("{} {}", "✓".green(), message);
        self.append("INFO", message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warn(&mut self, message: &str) {
        println!("{} {}", "⚠".yellow(), message);
        self.append("WARNING", message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(&mut self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
        self.append("ERROR", message);
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(&mut self, message: &str) {
        let notice = format!("[DRY RUN] {}", message);
        println!("{}", notice.yellow());
        self.append("INFO", &notice);
    }

    fn append(&mut self, level: &str, message: &str) {
        if let Some(file) = self.log.as_mut() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let _ = writeln!(file, "{} [{}]\t{}", timestamp, level, message);
        }
    }

    /// Creates and returns a progress bar for move operations.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_mirrors_messages_with_level_tags() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join(LOG_FILE);

        let mut reporter = Reporter::with_log_file(true, &log_path).unwrap();
        reporter.info("renamed a file");
        reporter.warn("truncated a name");
        reporter.debug("visited an entry");

        let contents = fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("[INFO]\trenamed a file"));
        assert!(contents.contains("[WARNING]\ttruncated a name"));
        assert!(contents.contains("[DEBUG]\tvisited an entry"));
    }

    #[test]
    fn test_debug_is_silent_without_verbose() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join(LOG_FILE);

        let mut reporter = Reporter::with_log_file(false, &log_path).unwrap();
        reporter.debug("hidden");
        reporter.info("shown");

        let contents = fs::read_to_string(&log_path).unwrap();
        assert!(!contents.contains("hidden"));
        assert!(contents.contains("shown"));
    }

    #[test]
    fn test_log_file_appends_across_reporters() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join(LOG_FILE);

        Reporter::with_log_file(false, &log_path)
            .unwrap()
            .info("first run");
        Reporter::with_log_file(false, &log_path)
            .unwrap()
            .info("second run");

        let contents = fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("first run"));
        assert!(contents.contains("second run"));
    }
}

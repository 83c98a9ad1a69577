//! Moves normalized entries into per-kind folders under an output
//! directory.
//!
//! Sorting runs over the top-level entries of the target directory only:
//! a directory is classified as a whole (by majority vote over its
//! contents) and moved as a unit.

use crate::config::ConfigError;
use crate::media_category::{MediaKind, MediaMapper};
use crate::output::Reporter;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Errors that can occur while sorting entries into kind folders.
#[derive(Debug)]
pub enum SortError {
    /// The source directory could not be read.
    ReadFailed {
        /// The directory that could not be read.
        path: PathBuf,
        /// The underlying IO error.
        source: io::Error,
    },
    /// A kind folder could not be created.
    DirectoryCreationFailed {
        /// The folder that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        source: io::Error,
    },
    /// An entry could not be moved.
    MoveFailed {
        /// The entry being moved.
        from: PathBuf,
        /// Where it was being moved to.
        to: PathBuf,
        /// The underlying IO error.
        source: io::Error,
    },
}

impl std::fmt::Display for SortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortError::ReadFailed { path, source } => {
                write!(f, "Unable to read {}: {}", path.display(), source)
            }
            SortError::DirectoryCreationFailed { path, source } => {
                write!(f, "Unable to create {}: {}", path.display(), source)
            }
            SortError::MoveFailed { from, to, source } => {
                write!(
                    f,
                    "Unable to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for SortError {}

/// Sorts files and directories into kind folders under an output root.
pub struct MediaSorter {
    mapper: MediaMapper,
    output: PathBuf,
    dry_run: bool,
    interactive: bool,
}

impl MediaSorter {
    /// Build a sorter targeting `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in type mappings fail to compile.
    pub fn new(output: PathBuf, dry_run: bool, interactive: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            mapper: MediaMapper::new()?,
            output,
            dry_run,
            interactive,
        })
    }

    /// Sort the top-level entries of `source` into kind folders.
    /// Failures on individual entries are reported and sorting continues.
    ///
    /// # Errors
    ///
    /// Returns an error only if `source` itself cannot be read.
    pub fn sort(&self, source: &Path, reporter: &mut Reporter) -> Result<(), SortError> {
        let mut names = Vec::new();
        let entries = fs::read_dir(source).map_err(|e| SortError::ReadFailed {
            path: source.to_path_buf(),
            source: e,
        })?;
        for entry in entries.flatten() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();

        let progress = if self.dry_run || self.interactive {
            None
        } else {
            Some(Reporter::create_progress_bar(names.len() as u64))
        };

        let mut moved = 0;
        for name in &names {
            let path = source.join(name);
            if path == self.output {
                continue;
            }
            let kind = self.kind_of(&path, name);
            let line = format!("[{:<7}] {}", kind, name);

            match &progress {
                Some(bar) => bar.suspend(|| reporter.info(&line)),
                None => reporter.info(&line),
            }

            let confirm = if self.dry_run {
                false
            } else if self.interactive {
                confirm_move()
            } else {
                true
            };

            if confirm {
                match self.move_entry(&path, kind) {
                    Ok(()) => moved += 1,
                    Err(e) => match &progress {
                        Some(bar) => bar.suspend(|| reporter.error(&e.to_string())),
                        None => reporter.error(&e.to_string()),
                    },
                }
            }

            if let Some(bar) = &progress {
                bar.inc(1);
            }
        }

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        if self.dry_run {
            reporter.dry_run_notice(&format!("{} entries would be sorted", names.len()));
        } else {
            reporter.success(&format!(
                "Moved {} of {} entries into {}",
                moved,
                names.len(),
                self.output.display()
            ));
        }

        Ok(())
    }

    fn kind_of(&self, path: &Path, name: &str) -> MediaKind {
        if path.is_dir() {
            self.mapper.directory_kind(path)
        } else {
            self.mapper.file_kind(name)
        }
    }

    fn move_entry(&self, path: &Path, kind: MediaKind) -> Result<(), SortError> {
        let kind_dir = self.output.join(kind.dir_name());
        fs::create_dir_all(&kind_dir).map_err(|e| SortError::DirectoryCreationFailed {
            path: kind_dir.clone(),
            source: e,
        })?;

        let file_name = path.file_name().unwrap_or(path.as_os_str());
        let destination = kind_dir.join(file_name);
        fs::rename(path, &destination).map_err(|e| SortError::MoveFailed {
            from: path.to_path_buf(),
            to: destination.clone(),
            source: e,
        })
    }
}

/// Ask whether to move the entry just listed.
fn confirm_move() -> bool {
    print!("Move? (Y/N) ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

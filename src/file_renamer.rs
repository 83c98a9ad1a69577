//! The rename walk: applies the rule pipeline to every entry under a
//! directory tree.
//!
//! The walk is depth-first and children-first: a directory's contents are
//! renamed before the directory itself, so recursion always works with
//! the paths that exist on disk. Entries are visited in sorted order for
//! stable output.

use crate::config::CompiledSkipList;
use crate::name_model::NameModel;
use crate::output::Reporter;
use crate::pipeline::RulePipeline;
use crate::truncate::Truncator;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Flags controlling how the walk confirms renames.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameOptions {
    /// Show what would change without renaming anything.
    pub dry_run: bool,
    /// Confirm every rename.
    pub interactive: bool,
    /// Confirm renames until one is accepted, then proceed without
    /// asking for the rest of that directory.
    pub semi_interactive: bool,
}

/// What the user answered at a confirmation prompt.
enum Answer {
    Yes,
    No,
    Edit(String),
}

/// Walks a directory tree and renames entries to their normalized form.
pub struct FileRenamer {
    pipeline: RulePipeline,
    truncator: Truncator,
    skip: CompiledSkipList,
    options: RenameOptions,
}

impl FileRenamer {
    pub fn new(
        pipeline: RulePipeline,
        truncator: Truncator,
        skip: CompiledSkipList,
        options: RenameOptions,
    ) -> Self {
        Self {
            pipeline,
            truncator,
            skip,
            options,
        }
    }

    /// Rename everything under `root`. Failures on individual entries
    /// are reported and the walk continues.
    pub fn process(&self, root: &Path, reporter: &mut Reporter) {
        self.visit(root, reporter);
    }

    fn visit(&self, dir: &Path, reporter: &mut Reporter) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                reporter.error(&format!("Unable to read {}: {}", dir.display(), e));
                return;
            }
        };

        let mut subdirs = Vec::new();
        let mut files = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => subdirs.push(name),
                Ok(file_type) if file_type.is_file() => files.push(name),
                _ => {}
            }
        }
        subdirs.sort();
        files.sort();

        // Contents first, then the directory's own name
        for subdir in &subdirs {
            self.visit(&dir.join(subdir), reporter);
            self.clean(NameModel::directory(dir, subdir), true, reporter);
        }

        let mut first_in_dir = true;
        for file in &files {
            if self.skip.should_skip(file) {
                reporter.debug(&format!("Skipping: {}", dir.join(file).display()));
                continue;
            }
            first_in_dir = self.clean(NameModel::file(dir, file), first_in_dir, reporter);
        }
    }

    /// Normalize one entry and rename it if confirmed. Returns whether
    /// the next entry in the same directory still counts as "first" for
    /// semi-interactive prompting.
    fn clean(&self, mut name: NameModel, first: bool, reporter: &mut Reporter) -> bool {
        reporter.debug(&format!("Visiting: {}", name.original_path().display()));

        self.pipeline.normalize(&mut name);
        if let Some(truncation) = self.truncator.truncate(&mut name) {
            reporter.warn(&format!(
                "Truncated name length from {} to {}: {}",
                truncation.from,
                truncation.to,
                name.original_name()
            ));
        }

        if !name.changed() || !name.original_path().exists() {
            return first;
        }

        reporter.info(&format!("{} =>", name.original_name()));
        reporter.info(&name.normalized());

        let mut confirm = !self.options.dry_run;
        let mut still_first = first;
        if !self.options.dry_run
            && (self.options.interactive || (first && self.options.semi_interactive))
        {
            match prompt(&name) {
                Answer::Yes => {
                    confirm = true;
                    still_first = false;
                }
                Answer::Edit(text) => {
                    name.edit(&text);
                    confirm = true;
                    still_first = true;
                }
                Answer::No => {
                    confirm = false;
                    still_first = true;
                }
            }
        }

        if confirm {
            self.rename(&name, reporter);
        } else if self.options.dry_run {
            reporter.dry_run_notice("Not renamed");
        }

        still_first
    }

    fn rename(&self, name: &NameModel, reporter: &mut Reporter) {
        let destination = name.normalized_path();
        if destination.exists() {
            reporter.error(&format!(
                "Unable to rename {}: destination already exists",
                name.original_name()
            ));
            return;
        }

        reporter.debug(&format!("Renaming: {}", destination.display()));
        if let Err(e) = fs::rename(name.original_path(), &destination) {
            reporter.error(&format!("Unable to rename {}: {}", name.original_name(), e));
        }
    }
}

/// Ask whether to apply a rename, with the option to type a different
/// name instead.
fn prompt(name: &NameModel) -> Answer {
    print!("Rename? (Yes/No/Edit) ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return Answer::No;
    }

    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => Answer::Yes,
        "e" | "edit" => {
            println!("{}", name.normalized());
            print!("New name: ");
            let _ = io::stdout().flush();

            let mut edited = String::new();
            if io::stdin().read_line(&mut edited).is_ok() && !edited.trim().is_empty() {
                Answer::Edit(edited.trim().to_string())
            } else {
                Answer::No
            }
        }
        _ => Answer::No,
    }
}

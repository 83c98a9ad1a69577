//! Mutable model of a single filename being normalized.
//!
//! A [`NameModel`] splits a filename into a stem and an extension once, lets
//! the rule pipeline rewrite the stem in place, and reassembles the final
//! name on demand. The extension is never touched by rules; it only gates
//! extension-sensitive rules and is reattached verbatim.

use std::path::{Path, PathBuf};

/// A filename under normalization, split into stem and extension.
#[derive(Debug, Clone)]
pub struct NameModel {
    directory: PathBuf,
    original_name: String,
    stem: String,
    extension: String,
}

impl NameModel {
    /// Model a regular file. The extension is split off at the last period,
    /// unless that period is the leading character (dotfiles keep their name
    /// whole, like ".bashrc").
    pub fn file(directory: &Path, name: &str) -> Self {
        let (stem, extension) = split_extension(name);
        Self {
            directory: directory.to_path_buf(),
            original_name: name.to_string(),
            stem: stem.to_string(),
            extension: extension.to_string(),
        }
    }

    /// Model a directory. Directories have no extension, so the whole name
    /// is the stem.
    pub fn directory(parent: &Path, name: &str) -> Self {
        Self {
            directory: parent.to_path_buf(),
            original_name: name.to_string(),
            stem: name.to_string(),
            extension: String::new(),
        }
    }

    /// The name as it was on disk before normalization.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// The current stem.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// The extension including its leading period, or "" for directories
    /// and extensionless files.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The extension without its leading period, for gating
    /// extension-sensitive rules.
    pub fn extension_name(&self) -> &str {
        self.extension.strip_prefix('.').unwrap_or(&self.extension)
    }

    /// Replace the stem. Leading and trailing whitespace is always trimmed
    /// so no rule can leave a name with dangling spaces.
    pub fn set_stem(&mut self, stem: &str) {
        self.stem = stem.trim().to_string();
    }

    /// Replace the whole name with user-supplied text, keeping the split
    /// intact: if the text still carries the original extension it is
    /// stripped back off the stem.
    pub fn edit(&mut self, name: &str) {
        if !self.extension.is_empty() && name.ends_with(&self.extension) {
            let stem_end = name.len() - self.extension.len();
            self.set_stem(&name[..stem_end]);
        } else {
            self.set_stem(name);
        }
    }

    /// The current full name: stem plus extension.
    pub fn normalized(&self) -> String {
        format!("{}{}", self.stem, self.extension)
    }

    /// Whether normalization produced a different name.
    pub fn changed(&self) -> bool {
        self.normalized() != self.original_name
    }

    /// The on-disk path of the entry before renaming.
    pub fn original_path(&self) -> PathBuf {
        self.directory.join(&self.original_name)
    }

    /// The path the entry would have after renaming.
    pub fn normalized_path(&self) -> PathBuf {
        self.directory.join(self.normalized())
    }
}

/// Split a filename at the last period, mirroring the usual stem/extension
/// convention: a period needs at least one non-period character before it
/// to start an extension.
fn split_extension(name: &str) -> (&str, &str) {
    if let Some(idx) = name.rfind('.') {
        if name[..idx].chars().any(|c| c != '.') {
            return name.split_at(idx);
        }
    }
    (name, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_stem_and_extension() {
        let name = NameModel::file(Path::new("."), "Foo Bar.mkv");
        assert_eq!(name.stem(), "Foo Bar");
        assert_eq!(name.extension(), ".mkv");
        assert_eq!(name.extension_name(), "mkv");
    }

    #[test]
    fn test_splits_at_last_period_only() {
        let name = NameModel::file(Path::new("."), "archive.tar.gz");
        assert_eq!(name.stem(), "archive.tar");
        assert_eq!(name.extension(), ".gz");
    }

    #[test]
    fn test_dotfile_has_no_extension() {
        let name = NameModel::file(Path::new("."), ".bashrc");
        assert_eq!(name.stem(), ".bashrc");
        assert_eq!(name.extension(), "");
        assert_eq!(name.extension_name(), "");
    }

    #[test]
    fn test_directory_has_no_extension() {
        let name = NameModel::directory(Path::new("."), "Season.01");
        assert_eq!(name.stem(), "Season.01");
        assert_eq!(name.extension(), "");
    }

    #[test]
    fn test_set_stem_trims_whitespace() {
        let mut name = NameModel::file(Path::new("."), "Foo.mkv");
        name.set_stem("  Bar  ");
        assert_eq!(name.normalized(), "Bar.mkv");
    }

    #[test]
    fn test_changed() {
        let mut name = NameModel::file(Path::new("."), "Foo.mkv");
        assert!(!name.changed());
        name.set_stem("Bar");
        assert!(name.changed());
        assert_eq!(name.normalized(), "Bar.mkv");
    }

    #[test]
    fn test_edit_with_extension_reattaches_split() {
        let mut name = NameModel::file(Path::new("."), "Foo.mkv");
        name.edit("Better Name.mkv");
        assert_eq!(name.stem(), "Better Name");
        assert_eq!(name.extension(), ".mkv");
        assert_eq!(name.normalized(), "Better Name.mkv");
    }

    #[test]
    fn test_edit_without_extension_keeps_original_extension() {
        let mut name = NameModel::file(Path::new("."), "Foo.mkv");
        name.edit("Better Name");
        assert_eq!(name.normalized(), "Better Name.mkv");
    }

    #[test]
    fn test_paths() {
        let mut name = NameModel::file(Path::new("/media"), "foo.mkv");
        name.set_stem("Foo");
        assert_eq!(name.original_path(), PathBuf::from("/media/foo.mkv"));
        assert_eq!(name.normalized_path(), PathBuf::from("/media/Foo.mkv"));
    }
}

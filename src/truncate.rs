//! Length enforcement for normalized filenames.

use crate::name_model::NameModel;

/// Marker appended to a stem that was cut short.
pub const TRUNCATION_MARKER: char = '…';

/// What a truncation did, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// Length before truncation, in characters.
    pub from: usize,
    /// Length after truncation, in characters.
    pub to: usize,
}

/// Cuts over-long stems down so the full name fits the length limit.
/// Lengths are counted in characters, not bytes, so multi-byte names are
/// not cut mid-character.
#[derive(Debug, Clone, Copy)]
pub struct Truncator {
    max_length: usize,
}

impl Truncator {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Truncate the stem of `name` if the full name exceeds the limit.
    /// The extension is always kept whole; the stem is cut to make room
    /// for it and the marker.
    ///
    /// Returns what changed, or `None` if the name already fit.
    pub fn truncate(&self, name: &mut NameModel) -> Option<Truncation> {
        let from = name.normalized().chars().count();
        if from <= self.max_length {
            return None;
        }

        let extension_len = name.extension().chars().count();
        let keep = self.max_length.saturating_sub(1 + extension_len);

        let mut stem: String = name.stem().chars().take(keep).collect();
        stem.push(TRUNCATION_MARKER);
        name.set_stem(&stem);

        Some(Truncation {
            from,
            to: name.normalized().chars().count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn file(name: &str) -> NameModel {
        NameModel::file(Path::new("."), name)
    }

    #[test]
    fn test_short_names_are_untouched() {
        let mut name = file("Foo Bar.mkv");
        assert_eq!(Truncator::new(140).truncate(&mut name), None);
        assert_eq!(name.normalized(), "Foo Bar.mkv");
    }

    #[test]
    fn test_name_at_the_limit_is_untouched() {
        let mut name = file("Foo Bar.mkv");
        assert_eq!(Truncator::new(11).truncate(&mut name), None);
    }

    #[test]
    fn test_long_stem_is_cut_with_marker() {
        let mut name = file("Foo Bar.mkv");
        let truncation = Truncator::new(8).truncate(&mut name).unwrap();
        assert_eq!(name.normalized(), "Foo….mkv");
        assert_eq!(truncation, Truncation { from: 11, to: 8 });
    }

    #[test]
    fn test_extension_is_always_kept_whole() {
        let mut name = file("A Very Long Name Indeed.mkv");
        Truncator::new(10).truncate(&mut name);
        assert!(name.normalized().ends_with(".mkv"));
        assert_eq!(name.normalized().chars().count(), 10);
    }

    #[test]
    fn test_lengths_are_counted_in_characters() {
        let mut name = file("Ärger Über Älteren.mkv");
        let truncation = Truncator::new(12).truncate(&mut name).unwrap();
        assert_eq!(truncation.from, 22);
        assert_eq!(name.normalized().chars().count(), 12);
        assert_eq!(name.normalized(), "Ärger Ü….mkv");
    }

    #[test]
    fn test_directory_names_truncate_too() {
        let mut name = NameModel::directory(Path::new("."), "A Very Long Directory Name");
        Truncator::new(10).truncate(&mut name);
        assert_eq!(name.normalized(), "A Very Lo…");
    }
}

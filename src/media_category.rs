//! Media type detection for files and directories.
//!
//! Classification is name-based: an ordered list of type mappings pairs a
//! media kind with a pattern over the whole filename (a keyword plus an
//! extension alternation). The first mapping that matches wins, so more
//! specific kinds (tv, anime) are listed before the catch-all kinds they
//! overlap with (movies).

use crate::config::ConfigError;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const AUDIO_EXTENSIONS: &[&str] = &[
    "aac", "ape", "flac", "m4a", "m4p", "mka", "mp3", "oga", "ogg", "wma",
];
const BOOK_EXTENSIONS: &[&str] = &[
    "awz3", "awz", "chm", "djvu", "epub", "fb2", "htm", "html", "ibooks", "kf8", "lit", "mobi",
    "opf", "pdb", "pdf", "prc", "ps", "rtf",
];
const COMIC_EXTENSIONS: &[&str] = &["cb7", "cba", "cbr", "cbt", "cbz"];
const VIDEO_EXTENSIONS: &[&str] = &[
    "avi", "mkv", "m4v", "mov", "mp4", "mpeg", "mpg", "ogv", "qt", "rmvb", "vob", "webm", "wmv",
];

/// Marker tokens that distinguish fansubbed releases from other video.
const ANIME_KEYWORD: &str =
    "(anime|deadfish|bakedfish|horriblesubs|1280x720 HEVC AAC|HEVC2|KamiFS|OVA|THORA)";

/// The media kinds files are sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Books,
    Comics,
    Manga,
    Tv,
    Anime,
    Movies,
    Music,
    Unknown,
}

impl MediaKind {
    /// The folder name a kind sorts into.
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaKind::Books => "books",
            MediaKind::Comics => "comics",
            MediaKind::Manga => "manga",
            MediaKind::Tv => "tv",
            MediaKind::Anime => "anime",
            MediaKind::Movies => "movies",
            MediaKind::Music => "music",
            MediaKind::Unknown => "unknown",
        }
    }

    /// Every concrete kind, in mapping order. Ties in directory votes
    /// resolve to the earliest kind in this order.
    pub fn all() -> [MediaKind; 7] {
        [
            MediaKind::Books,
            MediaKind::Manga,
            MediaKind::Comics,
            MediaKind::Tv,
            MediaKind::Anime,
            MediaKind::Movies,
            MediaKind::Music,
        ]
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One kind paired with the filename pattern that selects it.
struct TypeMapping {
    kind: MediaKind,
    pattern: Regex,
}

impl TypeMapping {
    fn new(kind: MediaKind, keyword: &str, extensions: &[&str]) -> Result<Self, ConfigError> {
        let alternation = extensions.join("|");
        let pattern = if keyword.is_empty() {
            format!(r"^.*\.({})$", alternation)
        } else {
            format!(r"^.*{}.*\.({})$", keyword, alternation)
        };

        let compiled = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidRulePattern {
                pattern,
                reason: e.to_string(),
            })?;

        Ok(Self {
            kind,
            pattern: compiled,
        })
    }

    fn matches(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name)
    }
}

/// Maps filenames and directories to media kinds.
pub struct MediaMapper {
    mappings: Vec<TypeMapping>,
}

impl MediaMapper {
    /// Compile the built-in type mappings.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapping pattern fails to compile.
    pub fn new() -> Result<Self, ConfigError> {
        let mappings = vec![
            TypeMapping::new(MediaKind::Books, "", BOOK_EXTENSIONS)?,
            TypeMapping::new(MediaKind::Manga, ANIME_KEYWORD, COMIC_EXTENSIONS)?,
            TypeMapping::new(MediaKind::Comics, "", COMIC_EXTENSIONS)?,
            TypeMapping::new(MediaKind::Tv, r"S\d\dE\d\d", VIDEO_EXTENSIONS)?,
            TypeMapping::new(MediaKind::Anime, ANIME_KEYWORD, VIDEO_EXTENSIONS)?,
            TypeMapping::new(MediaKind::Movies, "", VIDEO_EXTENSIONS)?,
            TypeMapping::new(MediaKind::Music, "", AUDIO_EXTENSIONS)?,
        ];

        Ok(Self { mappings })
    }

    /// The kind of a single file, by name.
    pub fn file_kind(&self, file_name: &str) -> MediaKind {
        self.mappings
            .iter()
            .find(|mapping| mapping.matches(file_name))
            .map(|mapping| mapping.kind)
            .unwrap_or(MediaKind::Unknown)
    }

    /// The kind of a directory: a majority vote over the files it
    /// contains, recursively. Ties resolve to the kind listed first in
    /// the mappings; a directory with no classifiable files is unknown.
    pub fn directory_kind(&self, dir: &Path) -> MediaKind {
        let mut votes: HashMap<MediaKind, usize> = HashMap::new();
        self.count_kinds(dir, &mut votes);

        let mut winner = MediaKind::Unknown;
        let mut winning_votes = 0;
        for kind in MediaKind::all() {
            let count = votes.get(&kind).copied().unwrap_or(0);
            if count > winning_votes {
                winner = kind;
                winning_votes = count;
            }
        }
        winner
    }

    fn count_kinds(&self, dir: &Path, votes: &mut HashMap<MediaKind, usize>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                self.count_kinds(&path, votes);
            } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                let kind = self.file_kind(name);
                if kind != MediaKind::Unknown {
                    *votes.entry(kind).or_insert(0) += 1;
                }
            }
        }
    }
}

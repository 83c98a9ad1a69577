//! mediatidy - media filename normalization and sorting
//!
//! This library renames media files (and directories) to a canonical,
//! human-readable form through an ordered rule pipeline, and optionally
//! sorts them into type-based folders. Skip rules and the truncation
//! threshold are configurable via TOML.

pub mod cli;
pub mod config;
pub mod file_renamer;
pub mod literal;
pub mod media_category;
pub mod media_sorter;
pub mod name_model;
pub mod output;
pub mod pipeline;
pub mod rule;
pub mod title_case;
pub mod truncate;

pub use config::{CompiledSkipList, ConfigError, TidyConfig};
pub use file_renamer::{FileRenamer, RenameOptions};
pub use literal::LiteralSet;
pub use media_category::{MediaKind, MediaMapper};
pub use media_sorter::{MediaSorter, SortError};
pub use name_model::NameModel;
pub use output::Reporter;
pub use pipeline::RulePipeline;
pub use rule::{Replacement, Rule};
pub use truncate::{Truncation, Truncator};

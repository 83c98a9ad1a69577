//! The ordered rule pipeline that normalizes a filename stem.
//!
//! Normalization runs in five stages:
//! 1. Ellipsis folding ("..." becomes "…" before periods are touched)
//! 2. Separator heuristics (period-, hyphen-, or underscore-separated
//!    names are folded to spaces)
//! 3. Pre-rules (junk removal, punctuation spacing, release-tag repairs)
//! 4. Title-casing
//! 5. Post-rules (episode markers, acronyms, canonical literals, volume
//!    and chapter markers)
//!
//! Rule order within a stage is significant and must not be reshuffled:
//! later rules assume the text shape earlier rules produce.

use crate::config::ConfigError;
use crate::literal::LiteralSet;
use crate::name_model::NameModel;
use crate::rule::Rule;
use crate::title_case::title_case;

/// Placeholder protecting periods that must survive the period-to-space
/// fold (decimal separators, abbreviation periods).
const PROTECTED_PERIOD: char = '␃';

/// The full set of normalization rules, compiled once.
pub struct RulePipeline {
    ellipsis: Rule,
    pre_rules: Vec<Rule>,
    post_rules: Vec<Rule>,
}

impl RulePipeline {
    /// Compile the built-in rule tables.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern fails to compile or any literal
    /// dictionary contains entries colliding on their lowercase key.
    pub fn new() -> Result<Self, ConfigError> {
        let archives = LiteralSet::build(["7z", "rar", "zip"])?;

        let abbreviations = LiteralSet::build([
            "Ave", "Bros", "Dr", "Jr", "Mr", "Mrs", "Ms", "Rev", "St", "vs",
        ])?;
        let acronyms = LiteralSet::build(["AKA", "C2C", "DC", "LLC", "OVA", "TV", "UFO", "UK", "USA"])?;
        let foreign = LiteralSet::build([
            "al", "chan", "de", "du", "et", "ga", "kun", "ni", "-san", "und", "wa", "wo",
        ])?;
        let groups = LiteralSet::build([
            "CHD", "d'argh", "DCP", "DTG", "FTG", "HP", "JYK", "LGC", "LOL", "n0m1", "PSA", "QCF",
            "RARBG", "RMTeam", "UTR", "YSTeam",
        ])?;
        let metadata = LiteralSet::build([
            "480p", "720p", "1080p", "1CH", "2CH", "6CH", "7CH", "AAC", "AC3", "azw3", "BluRay",
            "CD", "DL", "DTS", "DVD", "DVDRip", "epub", "FLAC", "HDTV", "HEVC", "mobi", "MKV",
            "MP3", "pdf", "x264", "x265", "Xvid",
        ])?;
        let miscellaneous = LiteralSet::build(["C-3PO", "com", "iZombie", "LEGO"])?;
        let numerals = LiteralSet::build(["II", "III", "IV", "V", "VI", "VII", "VIII", "IX"])?;
        let possessives = LiteralSet::build([
            "Attenborough", "Bob", "Childhood", "DC", "Marvel", "there", "who",
        ])?;
        let small = LiteralSet::build([
            "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "of", "on", "or",
            "the", "to", "via", "vs", "vs.",
        ])?;
        let removed = LiteralSet::build([
            "?", "*", "www.RapidMovieZ.com", "(request)", "[request]", "[ed]", "[eds]",
        ])?;

        let literals = LiteralSet::merged(&[
            &acronyms,
            &foreign,
            &groups,
            &metadata,
            &miscellaneous,
            &numerals,
        ])?;

        let pre_rules = vec![
            // Junk tokens dropped outright
            Rule::new(removed.pattern(), "")?,
            // Colon variants and dashes that act as separators
            Rule::new("(:|꞉|~|–)", " - ")?,
            // Space around brackets, before dash repairs
            Rule::new(r"([^\s])([\[(])", "${1} ${2}")?,
            Rule::new(r"([\])])([^\s,])", "${1} ${2}")?,
            // One-sided dashes and underscores become spaced dashes
            Rule::new(r"(\w)[-_]\s", "${1} - ")?,
            Rule::new(r"\s[-_](\w)", " - ${1}")?,
            // A leading bracketed group moves to the end
            Rule::new(r"^([\[(].*?[\])]) ?(.*)", "${2} ${1}")?,
            // Dropped apostrophes in possessives
            Rule::new(
                &format!(r"\b({})s(\s+\w)", possessives.pattern()),
                "${1}'s${2}",
            )?,
            // Audio channel counts fused to their codec
            Rule::new(r"\bDD(\d)\b", "DD ${1}")?,
            Rule::new(r"\bAAC(\d)\b", "AAC ${1}")?,
            // Video codec spelling variants
            Rule::new(r"\b[hx][ .]?(26[45])\b", "x${1}")?,
            // Release metadata fused to the following token with a hyphen
            Rule::new(&format!(r"\b({})-", metadata.pattern()), "${1} ")?,
            Rule::new(r"\bweb[-. ]?dl\b", "Web-DL")?,
            Rule::new(r"\bweb[-. ]?rip\b", "WebRip")?,
            Rule::new(r"\bb(d|r)(rip)?\b", "BluRay")?,
            Rule::new(r"\bx[ .]files\b", "X-Files")?,
            // Double quotes to apostrophes, leftover junk characters out
            Rule::new("\"", "'")?,
            Rule::new(r"[<>|\\_]", " ")?,
            Rule::new(r"\s+", " ")?,
        ];

        let post_rules = vec![
            // Season/episode markers, two-digit and one-digit season forms
            Rule::new(
                r"(- )?\bs?(\d\d)[. ]?(?:e|x|ep)[. ]?(\d\d)\b( -)?",
                "S${2}E${3}",
            )?,
            Rule::new(r"(- )?\bs?(\d)[. ]?[ex][. ]?(\d\d)\b( -)?", "S0${2}E${3}")?,
            Rule::new(r"\b(\d)of\d\b", "S01E0${1}")?,
            // Runs of single letters become dotted acronyms
            Rule::computed(r"(^| )((?:[a-z](?: |$)){2,})", |caps| {
                format!("{}{} ", &caps[1], caps[2].to_uppercase().replace(' ', "."))
            })?,
            // An acronym's final letter regains its period
            Rule::new(r"\b([a-z]\.) ?([a-z])$", "${1}${2}.")?,
            // Decimal separators lost to the period fold
            Rule::new(r"\b(\d) (\d)\b", "${1}.${2}")?,
            // Abbreviations regain their period
            Rule::new(&format!(r"\b({}) ", abbreviations.pattern()), "${1}. ")?,
            Self::canonicalize_rule(&literals)?,
            // Brackets lose inner padding
            Rule::new(r"\s+([\])])", "${1}")?,
            Rule::new(r"([\[(])\s+", "${1}")?,
            // Volume and chapter markers, spelled-out forms only for archives
            Rule::new(r"\bv(?:ol(?:ume|\.)? ?)?(\d+)\b", "v${1}")?.gated(&archives),
            Rule::new(r"\bv(\d+)c(\d+)\b", "v${1}c${2}")?,
            Rule::new(r"\bv(\d+)\b", "v${1}")?,
            Rule::new(r"\bc(?:h(?:apters?|\.)?)? ?(\d+)\b", "c${1}")?.gated(&archives),
            Rule::new(r"\bc(\d+)\b", "c${1}")?,
            // CRC tags are conventionally uppercase
            Rule::computed(r"\[[0-9a-f]{8}\]", |caps| caps[0].to_uppercase())?,
            // Small words re-capitalize after closing punctuation or digits
            Rule::computed(&format!(r"([,\])\d] )({})", small.pattern()), |caps| {
                format!("{}{}", &caps[1], capitalize(&caps[2]))
            })?,
        ];

        Ok(Self {
            ellipsis: Rule::new(r"\. ?\. ?\.", "…")?,
            pre_rules,
            post_rules,
        })
    }

    /// The dictionary rule mapping every known token to its canonical
    /// spelling. A literal opening the stem whose canonical form starts
    /// lowercase keeps its original casing, so names that begin with a
    /// foreign article ("De", "La") are not forced lowercase.
    fn canonicalize_rule(literals: &LiteralSet) -> Result<Rule, ConfigError> {
        let pattern = format!(r"\b({})\b", literals.pattern());
        let dictionary = literals.clone();
        Rule::computed(&pattern, move |caps| {
            let matched = match caps.get(1) {
                Some(m) => m,
                None => return caps[0].to_string(),
            };
            let canonical = dictionary.canonicalize(matched.as_str());
            let starts_lowercase = canonical.chars().next().is_some_and(char::is_lowercase);
            if matched.start() == 0 && starts_lowercase {
                matched.as_str().to_string()
            } else {
                canonical.to_string()
            }
        })
    }

    /// Normalize the stem of `name` in place. The extension is never
    /// modified.
    pub fn normalize(&self, name: &mut NameModel) {
        self.ellipsis.apply(name);

        let folded = fold_separators(name.stem());
        name.set_stem(&folded);

        for rule in &self.pre_rules {
            rule.apply(name);
        }

        let cased = title_case(name.stem());
        name.set_stem(&cased);

        for rule in &self.post_rules {
            rule.apply(name);
        }
    }
}

/// Uppercase the first character of a word, lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Fold period-, hyphen-, or underscore-separated stems to spaces.
///
/// Periods only fold when they dominate the stem (at least three, and
/// more periods than spaces); decimal points and abbreviation periods
/// are protected through the fold. Hyphens only fold when the stem has
/// more than three and no spaces at all. Underscores fold at two.
fn fold_separators(stem: &str) -> String {
    let mut name = stem.to_string();

    let periods = name.matches('.').count();
    let spaces = name.matches(' ').count();
    if periods >= 3 && periods > spaces {
        name = protect_periods(&name);
        name = name.replace('.', " ");
        name = name.replace(PROTECTED_PERIOD, ".");
    }

    if name.matches('-').count() > 3 && !name.contains(' ') {
        name = name.replace('-', " ");
    }

    if name.matches('_').count() >= 2 {
        name = name.replace('_', " ");
    }

    name
}

/// Swap periods that must survive the fold for the placeholder.
fn protect_periods(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let mut protected = String::with_capacity(stem.len());
    for (index, &c) in chars.iter().enumerate() {
        if c == '.' && period_is_protected(&chars, index) {
            protected.push(PROTECTED_PERIOD);
        } else {
            protected.push(c);
        }
    }
    protected
}

fn period_is_protected(chars: &[char], index: usize) -> bool {
    let next = chars.get(index + 1).copied();

    // Decimal separator: digit on both sides, the trailing digit ending
    // its word ("5.1" but not "5.1channel")
    if index > 0
        && chars[index - 1].is_ascii_digit()
        && next.is_some_and(|c| c.is_ascii_digit())
        && !chars.get(index + 2).copied().is_some_and(is_word)
    {
        return true;
    }

    // Abbreviation period before a space or closing bracket, unless it
    // ends an acronym run ("Mr. Foo" keeps its period, "U.S.A. Foo"
    // keeps only the inner ones)
    if matches!(next, Some(' ') | Some(')') | Some(']')) {
        if index == 1 && is_word(chars[0]) {
            return true;
        }
        let acronym_run = index >= 2 && is_word(chars[index - 1]) && chars[index - 2] == '.';
        return !acronym_run;
    }

    false
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_fold_requires_dominant_periods() {
        assert_eq!(fold_separators("Foo.Bar.Baz.Qux"), "Foo Bar Baz Qux");
        assert_eq!(fold_separators("Foo.Bar"), "Foo.Bar");
        assert_eq!(
            fold_separators("One. Two. Three. And More. Words. Here"),
            "One. Two. Three. And More. Words. Here"
        );
    }

    #[test]
    fn test_period_fold_protects_decimals() {
        assert_eq!(
            fold_separators("foo.720p.5.1.webrip"),
            "foo 720p 5.1 webrip"
        );
    }

    #[test]
    fn test_period_fold_protects_abbreviation_periods() {
        assert_eq!(fold_separators("Mr. Foo.Goes.To.Town"), "Mr. Foo Goes To Town");
    }

    #[test]
    fn test_period_fold_drops_acronym_run_periods() {
        // Inner acronym periods are not followed by a space, so the whole
        // run folds; the post-rules rebuild it from the letter run
        assert_eq!(fold_separators("A.B.C."), "A B C ");
    }

    #[test]
    fn test_hyphen_fold_requires_no_spaces() {
        assert_eq!(fold_separators("Foo-Bar-Baz-Qux-Quux"), "Foo Bar Baz Qux Quux");
        assert_eq!(fold_separators("Foo-Bar-Baz-Qux Quux"), "Foo-Bar-Baz-Qux Quux");
        assert_eq!(fold_separators("Foo-Bar"), "Foo-Bar");
    }

    #[test]
    fn test_underscore_fold() {
        assert_eq!(fold_separators("Foo_Bar_Baz"), "Foo Bar Baz");
        assert_eq!(fold_separators("Foo_Bar"), "Foo_Bar");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("the"), "The");
        assert_eq!(capitalize("THE"), "The");
        assert_eq!(capitalize(""), "");
    }
}

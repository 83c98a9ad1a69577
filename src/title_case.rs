//! Title-casing for filename stems.
//!
//! The stem is treated as a space-separated sequence of words. Words that
//! already carry casing information (an uppercase letter past the first,
//! or an inline period as in "S.W.A.T") are kept verbatim; small words
//! ("a", "of", "the") are lowercased unless they open or close the stem;
//! everything else gets its first letter capitalized, per hyphen segment.
//! Words that start with a digit ("720p", "5th") are left alone.

/// Words kept lowercase in the middle of a title.
const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "of", "on", "or", "the",
    "to", "v", "v.", "via", "vs", "vs.",
];

/// Title-case a stem in place of plain capitalization.
pub fn title_case(text: &str) -> String {
    let words: Vec<&str> = text.split(' ').collect();
    let last = words.len().saturating_sub(1);

    let mut cased = Vec::with_capacity(words.len());
    for (index, word) in words.iter().enumerate() {
        if word.is_empty() {
            cased.push(String::new());
        } else if keeps_own_casing(word) {
            cased.push((*word).to_string());
        } else if index != 0 && index != last && is_small_word(word) {
            cased.push(word.to_lowercase());
        } else {
            cased.push(capitalize_segments(word));
        }
    }

    cased.join(" ")
}

/// A word whose casing must not be touched: it has an uppercase letter
/// beyond its first letter ("McCoy", "HEVC") or an inline period ("D.O.C").
fn keeps_own_casing(word: &str) -> bool {
    let mut letters = word.chars().filter(|c| c.is_alphabetic());
    letters.next();
    if letters.any(|c| c.is_uppercase()) {
        return true;
    }

    let chars: Vec<char> = word.chars().collect();
    chars.windows(3).any(|window| {
        window[1] == '.' && window[0].is_alphabetic() && window[2].is_alphabetic()
    })
}

fn is_small_word(word: &str) -> bool {
    SMALL_WORDS.contains(&word.to_lowercase().as_str())
}

/// Capitalize each hyphen-separated segment of a word.
fn capitalize_segments(word: &str) -> String {
    word.split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("-")
}

/// Uppercase the first alphabetic character, skipping leading punctuation
/// like brackets and quotes. Segments that hit a digit first are left
/// untouched so tokens like "720p" keep their casing.
fn capitalize(segment: &str) -> String {
    let mut result = String::with_capacity(segment.len());
    let mut chars = segment.chars();

    for c in chars.by_ref() {
        if c.is_alphabetic() {
            result.extend(c.to_uppercase());
            break;
        }
        result.push(c);
        if c.is_numeric() {
            break;
        }
    }

    result.extend(chars);
    result
}

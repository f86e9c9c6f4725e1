//! Personal-name decomposition.
//!
//! Legacy records embed honorifics in the first name (`"Dr. John"`) and
//! generational or professional suffixes in the last name (`"Smith II"`).
//! Decomposition moves them into dedicated fields and cleans the remaining
//! parts.

use crate::text::strip_punctuation;

/// Titles recognised at the start of a first name, in match order.
pub const NAME_TITLES: [&str; 1] = ["Dr."];

/// Suffixes recognised in a last name, in match order. The first entry found
/// anywhere in the last name wins, so `III` is listed ahead of `II`.
pub const NAME_SUFFIXES: [&str; 6] = ["III", "II", "Jr", "Sr", "DDS", "M.D."];

/// Raw name parts as delivered by the source record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawName<'a> {
    /// First name, possibly carrying a title.
    pub first: Option<&'a str>,
    /// Middle name.
    pub middle: Option<&'a str>,
    /// Last name, possibly carrying a suffix.
    pub last: Option<&'a str>,
    /// Nickname.
    pub nick: Option<&'a str>,
}

/// Cleaned name parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonName {
    /// Title extracted from the first name, e.g. `Dr.`.
    pub prefix: String,
    /// First name without title or punctuation.
    pub first: String,
    /// Middle name without punctuation.
    pub middle: String,
    /// Last name without suffix or punctuation.
    pub last: String,
    /// Nickname; empty when it merely repeats the first name.
    pub nick: String,
    /// Suffix extracted from the last name, e.g. `II`.
    pub suffix: String,
}

/// Comparison key for a word or token: periods and commas removed.
fn match_key(word: &str) -> String {
    word.chars().filter(|ch| !matches!(ch, '.' | ',')).collect()
}

/// Split a leading title off a first name.
///
/// Returns `(prefix, remainder)`; the prefix is empty when no title matches.
///
/// # Examples
/// ```
/// use normalization::split_prefix;
///
/// assert_eq!(split_prefix("Dr. John"), ("Dr.".to_owned(), "John".to_owned()));
/// assert_eq!(split_prefix("John"), (String::new(), "John".to_owned()));
/// ```
#[must_use]
pub fn split_prefix(first: &str) -> (String, String) {
    let mut words = first.split_whitespace();
    let Some(lead) = words.next() else {
        return (String::new(), String::new());
    };
    let lead_key = match_key(lead);
    for title in NAME_TITLES {
        if match_key(title) == lead_key {
            return (title.to_owned(), words.collect::<Vec<_>>().join(" "));
        }
    }
    (String::new(), first.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Split a suffix off a last name.
///
/// Returns `(remainder, suffix)`. Suffixes are matched as whole words so
/// `Jrnold` is left alone; the remainder is every word before the match.
///
/// # Examples
/// ```
/// use normalization::split_suffix;
///
/// assert_eq!(split_suffix("Smith III"), ("Smith".to_owned(), "III".to_owned()));
/// assert_eq!(split_suffix("Smith, Jr."), ("Smith,".to_owned(), "Jr".to_owned()));
/// ```
#[must_use]
pub fn split_suffix(last: &str) -> (String, String) {
    let words: Vec<&str> = last.split_whitespace().collect();
    let keys: Vec<String> = words.iter().map(|word| match_key(word)).collect();
    for suffix in NAME_SUFFIXES {
        let suffix_key = match_key(suffix);
        if let Some(position) = keys.iter().position(|key| *key == suffix_key) {
            let remainder = words.iter().take(position).copied().collect::<Vec<_>>();
            return (remainder.join(" "), suffix.to_owned());
        }
    }
    (words.join(" "), String::new())
}

/// Decompose raw name parts into cleaned fields.
///
/// Titles and suffixes are extracted first, punctuation is then stripped
/// from the first, middle, last and nick parts, and finally a nickname equal
/// to the cleaned first name is cleared.
///
/// # Examples
/// ```
/// use normalization::{RawName, decompose_name};
///
/// let name = decompose_name(RawName {
///     first: Some("Dr. John"),
///     middle: None,
///     last: Some("Smith II"),
///     nick: Some("John"),
/// });
/// assert_eq!(name.prefix, "Dr.");
/// assert_eq!(name.first, "John");
/// assert_eq!(name.last, "Smith");
/// assert_eq!(name.suffix, "II");
/// assert_eq!(name.nick, "");
/// ```
#[must_use]
pub fn decompose_name(raw: RawName<'_>) -> PersonName {
    let (prefix, first) = split_prefix(raw.first.unwrap_or_default());
    let (last, suffix) = split_suffix(raw.last.unwrap_or_default());

    let first = strip_punctuation(&first);
    let middle = strip_punctuation(raw.middle.unwrap_or_default());
    let last = strip_punctuation(&last);
    let mut nick = strip_punctuation(raw.nick.unwrap_or_default());
    if nick == first {
        nick.clear();
    }

    PersonName {
        prefix,
        first,
        middle,
        last,
        nick,
        suffix,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Dr. John", "Dr.", "John")]
    #[case("Dr John", "Dr.", "John")]
    #[case("  John  Paul ", "", "John Paul")]
    #[case("Drew", "", "Drew")]
    #[case("Dr.", "Dr.", "")]
    #[case("", "", "")]
    fn splits_titles(#[case] input: &str, #[case] prefix: &str, #[case] first: &str) {
        assert_eq!(split_prefix(input), (prefix.to_owned(), first.to_owned()));
    }

    #[rstest]
    #[case("Smith II", "Smith", "II")]
    #[case("Smith III", "Smith", "III")]
    #[case("Smith Jr.", "Smith", "Jr")]
    #[case("Smith Sr", "Smith", "Sr")]
    #[case("Jones DDS", "Jones", "DDS")]
    #[case("Jones M.D.", "Jones", "M.D.")]
    #[case("Van Der Berg", "Van Der Berg", "")]
    #[case("Jrnold", "Jrnold", "")]
    #[case("Iverson", "Iverson", "")]
    fn splits_suffixes(#[case] input: &str, #[case] last: &str, #[case] suffix: &str) {
        assert_eq!(split_suffix(input), (last.to_owned(), suffix.to_owned()));
    }

    #[rstest]
    fn first_listed_suffix_wins_over_position() {
        assert_eq!(
            split_suffix("Smith Jr III"),
            ("Smith Jr".to_owned(), "III".to_owned())
        );
    }

    #[rstest]
    fn decomposes_full_example() {
        let name = decompose_name(RawName {
            first: Some("Dr. John"),
            middle: Some("Q."),
            last: Some("Smith II"),
            nick: None,
        });
        assert_eq!(
            name,
            PersonName {
                prefix: "Dr.".to_owned(),
                first: "John".to_owned(),
                middle: "Q".to_owned(),
                last: "Smith".to_owned(),
                nick: String::new(),
                suffix: "II".to_owned(),
            }
        );
    }

    #[rstest]
    #[case(Some("Bobby"), Some("Bobby"), "")]
    #[case(Some("Robert"), Some("Bobby"), "Bobby")]
    #[case(Some("Bobby."), Some("Bobby"), "")]
    #[case(None, None, "")]
    fn clears_nickname_repeating_first_name(
        #[case] first: Option<&str>,
        #[case] nick: Option<&str>,
        #[case] expected: &str,
    ) {
        let name = decompose_name(RawName {
            first,
            nick,
            ..RawName::default()
        });
        assert_eq!(name.nick, expected);
    }

    #[rstest]
    fn strips_punctuation_from_last_name_remainder() {
        let name = decompose_name(RawName {
            last: Some("Smith, Jr."),
            ..RawName::default()
        });
        assert_eq!(name.last, "Smith");
        assert_eq!(name.suffix, "Jr");
    }
}

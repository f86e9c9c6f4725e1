//! Free-text cleanup.

/// Characters removed by [`strip_punctuation`].
///
/// Apostrophes and hyphens are absent so names such as `O'Brien` and
/// `Smith-Jones` survive intact.
pub const PUNCTUATION: &str = "!\"#$%&()*+,./:;<=>?@[\\]^_`{|}~";

/// Remove every character in [`PUNCTUATION`] and trim surrounding whitespace.
///
/// # Examples
/// ```
/// use normalization::strip_punctuation;
///
/// assert_eq!(strip_punctuation("  Smith, "), "Smith");
/// assert_eq!(strip_punctuation(""), "");
/// ```
#[must_use]
pub fn strip_punctuation(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !PUNCTUATION.contains(*ch))
        .collect::<String>()
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::strip_punctuation;

    #[rstest]
    #[case("John", "John")]
    #[case("  J.R. ", "JR")]
    #[case("O'Brien", "O'Brien")]
    #[case("Smith-Jones", "Smith-Jones")]
    #[case("(Bob)", "Bob")]
    #[case("!!!", "")]
    #[case("", "")]
    fn strips_fixed_punctuation_set(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_punctuation(input), expected);
    }
}

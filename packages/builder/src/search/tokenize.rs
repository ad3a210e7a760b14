//! Tokenization shared by indexing and querying.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Split text into lowercase, accent-folded alphanumeric tokens.
///
/// # Examples
/// ```
/// use regdocs_builder::search::tokenize;
///
/// assert_eq!(tokenize("Qualified électronique-Signature"), vec!["qualified", "electronique", "signature"]);
/// ```
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let folded: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_numbers_and_punctuation() {
        assert_eq!(
            tokenize("Article 5b(3), Regulation (EU) 2024/1183"),
            vec!["article", "5b", "3", "regulation", "eu", "2024", "1183"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("  -- ").is_empty());
    }
}

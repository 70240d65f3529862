//! Text normalization and tokenization ahead of embedding lookup.

use regex::Regex;

/// Lowercase the text and replace every non-letter with a space.
pub fn normalize(text: &str) -> String {
    let re = Regex::new(r"[^a-zA-Z\s]").unwrap();
    let lowercase = text.to_lowercase();
    re.replace_all(&lowercase, " ").into_owned()
}

/// Normalize and split into word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("Hello, World!"), "hello  world ");
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("I love solving problems... http://example.com");
        assert_eq!(
            tokens,
            vec!["i", "love", "solving", "problems", "http", "example", "com"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("123 !?").is_empty());
    }
}

//! Locating URLs in free text

use std::sync::LazyLock;

use regex::{Captures, Regex};

// John Gruber's "improved liberal, accurate" pattern: a scheme, `www.` or a
// `name.tld/` start, balanced parentheses inside, and no trailing punctuation
#[allow(clippy::expect_used)]
static URL_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b((?:[a-z][\w-]+:(?:/{1,3}|[a-z0-9%])|www\d{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)(?:[^\s()<>]+|\(([^\s()<>]+|(\([^\s()<>]+\)))*\))+(?:\(([^\s()<>]+|(\([^\s()<>]+\)))*\)|[^\s`!()\[\]{};:'".,<>?«»“”‘’]))"#,
    )
    .expect("URL search regex is valid")
});

/// Replace every URL found in `text` by the output of `replace`
pub fn within_string<F>(text: &str, mut replace: F) -> String
where
    F: FnMut(&str) -> String,
{
    URL_IN_TEXT
        .replace_all(text, |caps: &Captures| replace(&caps[0]))
        .into_owned()
}

/// URLs found in `text`, in order of appearance
pub fn urls_in(text: &str) -> impl Iterator<Item = &str> {
    URL_IN_TEXT.find_iter(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_string() {
        let text = "Visit www.example.org/x or http://a.com/b.";
        let out = within_string(text, |url| format!("<{}>", url));
        assert_eq!(out, "Visit <www.example.org/x> or <http://a.com/b>.");
    }

    #[test]
    fn test_balanced_parentheses() {
        let text = "see (http://en.wikipedia.org/wiki/Rust_(language)), thanks";
        assert_eq!(
            urls_in(text).collect::<Vec<_>>(),
            ["http://en.wikipedia.org/wiki/Rust_(language)"]
        );
    }

    #[test]
    fn test_no_urls() {
        let text = "nothing to see here: just words.";
        assert_eq!(urls_in(text).count(), 0);
        assert_eq!(within_string(text, |_| String::from("x")), text);
    }
}

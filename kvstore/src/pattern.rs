// Copyright 2019-2020 PolkaX. Licensed under MIT or Apache-2.0.

//! Glob style key patterns as understood by `KEYS`:
//! `*` any run of characters, `?` one character, `[abc]`, `[^abc]` and
//! `[a-z]` classes, `\` escapes the next character.

use regex::Regex;

use crate::error::*;

#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(glob: &str) -> Result<Self> {
        let translated = translate(glob)?;
        let regex = Regex::new(&translated)
            .map_err(|e| StoreError::InvalidPattern(format!("{}: {}", glob, e)))?;
        Ok(Pattern { regex })
    }

    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

fn push_literal(re: &mut String, c: char) {
    let mut buf = [0u8; 4];
    re.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

fn push_class_char(items: &mut String, c: char) {
    if "\\[]^-&~".contains(c) {
        items.push('\\');
    }
    items.push(c);
}

fn translate(glob: &str) -> Result<String> {
    let chars: Vec<char> = glob.chars().collect();
    let mut re = String::from("(?s)^");
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            '\\' if i + 1 < chars.len() => {
                i += 1;
                push_literal(&mut re, chars[i]);
            }
            '[' => i = translate_class(glob, &chars, i + 1, &mut re)?,
            c => push_literal(&mut re, c),
        }
        i += 1;
    }
    re.push('$');
    Ok(re)
}

/// Translates the class body starting at `start`, returns the index of the
/// closing `]`.
fn translate_class(
    glob: &str,
    chars: &[char],
    start: usize,
    re: &mut String,
) -> Result<usize> {
    let mut i = start;
    let negated = chars.get(i) == Some(&'^');
    if negated {
        i += 1;
    }
    let mut items = String::new();
    loop {
        match chars.get(i) {
            None => {
                return Err(StoreError::InvalidPattern(format!(
                    "{}: unterminated character class",
                    glob
                )))
            }
            Some(']') => break,
            Some('\\') if i + 1 < chars.len() => {
                i += 1;
                push_class_char(&mut items, chars[i]);
            }
            Some(&lo)
                if chars.get(i + 1) == Some(&'-')
                    && chars.get(i + 2).map_or(false, |c| *c != ']') =>
            {
                // reversed ranges are accepted, "[z-a]" equals "[a-z]"
                let hi = chars[i + 2];
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                push_class_char(&mut items, lo);
                items.push('-');
                push_class_char(&mut items, hi);
                i += 2;
            }
            Some(&c) => push_class_char(&mut items, c),
        }
        i += 1;
    }
    if items.is_empty() {
        return Err(StoreError::InvalidPattern(format!(
            "{}: empty character class",
            glob
        )));
    }
    re.push('[');
    if negated {
        re.push('^');
    }
    re.push_str(&items);
    re.push(']');
    Ok(i)
}

#[cfg(test)]
mod tests {
    use matches::assert_matches;

    use super::*;

    fn is_match(glob: &str, key: &str) -> bool {
        Pattern::new(glob).unwrap().matches(key)
    }

    #[test]
    fn test_star_and_question() {
        assert!(is_match("*", ""));
        assert!(is_match("*", "anything at all"));
        assert!(is_match("test.*", "test.a1"));
        assert!(is_match("test.*", "test."));
        assert!(!is_match("test.*", "other.x"));
        assert!(!is_match("test.*", "testxa1"));
        assert!(is_match("h?llo", "hello"));
        assert!(!is_match("h?llo", "hllo"));
        assert!(is_match("a*b*c", "a--b--c"));
        assert!(is_match("*", "multi\nline"));
    }

    #[test]
    fn test_classes() {
        assert!(is_match("h[ae]llo", "hallo"));
        assert!(!is_match("h[ae]llo", "hillo"));
        assert!(is_match("h[^e]llo", "hallo"));
        assert!(!is_match("h[^e]llo", "hello"));
        assert!(is_match("h[a-b]llo", "hbllo"));
        assert!(is_match("h[b-a]llo", "hallo"));
        assert!(is_match("[-]", "-"));
        assert!(is_match("[a-]", "-"));
        assert!(is_match("[\\]]", "]"));
        assert!(is_match("[&~]", "~"));
    }

    #[test]
    fn test_escape_and_meta() {
        assert!(is_match("a\\*b", "a*b"));
        assert!(!is_match("a\\*b", "axb"));
        assert!(is_match("(x)+.$", "(x)+.$"));
        assert!(!is_match("(x)+.$", "xx!"));
        assert!(is_match("trailing\\", "trailing\\"));
    }

    #[test]
    fn test_invalid() {
        assert_matches!(Pattern::new("[abc"), Err(StoreError::InvalidPattern(_)));
        assert_matches!(Pattern::new("a[]"), Err(StoreError::InvalidPattern(_)));
    }
}

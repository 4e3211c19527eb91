//! Content matcher: counts occurrences of a term and its variants in a blob.

/// Pure, deterministic match counter.
pub trait Matcher: Send + Sync {
    fn count_matches(&self, blob: &[u8]) -> u64;
}

/// ASCII case-insensitive word-prefix matcher.
///
/// An occurrence counts when the term starts at a word boundary. Letters and
/// apostrophes directly after it are treated as an inflection of the same
/// word, so `pewter`, `Pewterer`, `PEWTERS` and `pewter's` are one match each,
/// while `spewter` is none.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    term: Vec<u8>,
}

impl TextMatcher {
    pub fn new(term: &str) -> Self {
        Self {
            term: term.as_bytes().to_ascii_lowercase(),
        }
    }

    pub fn term(&self) -> &[u8] {
        &self.term
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

fn is_variant_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'\''
}

impl Matcher for TextMatcher {
    fn count_matches(&self, blob: &[u8]) -> u64 {
        let n = self.term.len();
        if n == 0 || blob.len() < n {
            return 0;
        }
        let mut count = 0;
        let mut i = 0;
        while i + n <= blob.len() {
            let at_boundary = i == 0 || !is_word_byte(blob[i - 1]);
            if at_boundary && blob[i..i + n].eq_ignore_ascii_case(&self.term) {
                count += 1;
                i += n;
                while i < blob.len() && is_variant_byte(blob[i]) {
                    i += 1;
                }
            } else {
                i += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_term_and_variants() {
        let m = TextMatcher::new("pewter");
        let text = b"Pewter mugs, a pewterer's shop, PEWTERS and pewter's shine.";
        assert_eq!(m.count_matches(text), 4);
    }

    #[test]
    fn ignores_matches_inside_words() {
        let m = TextMatcher::new("pewter");
        assert_eq!(m.count_matches(b"spewter 1pewter xpewterx"), 0);
        assert_eq!(m.count_matches(b"(pewter)-pewter\npewter"), 3);
    }

    #[test]
    fn empty_term_and_short_blob() {
        assert_eq!(TextMatcher::new("").count_matches(b"anything"), 0);
        assert_eq!(TextMatcher::new("pewter").count_matches(b"pew"), 0);
        assert_eq!(TextMatcher::new("pewter").count_matches(b""), 0);
    }

    #[test]
    fn tolerates_non_utf8() {
        let m = TextMatcher::new("pewter");
        let mut blob = vec![0xff, 0xfe, b' '];
        blob.extend_from_slice(b"pewter");
        blob.push(0x80);
        assert_eq!(m.count_matches(&blob), 1);
    }
}

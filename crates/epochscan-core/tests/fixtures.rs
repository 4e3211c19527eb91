//! The synthetic corpus itself carries the counts the scan tests rely on.

mod common;

use epochscan_core::matcher::{Matcher, TextMatcher};

#[test]
fn fixture_text_has_exact_match_counts() {
    let m = TextMatcher::new(common::TERM);
    for (matches, seed) in [(0, 0), (1, 3), (16, 0), (18, 99), (19, 42)] {
        let text = common::fixture_text(matches, seed);
        assert_eq!(m.count_matches(text.as_bytes()), matches as u64, "seed {}", seed);
    }
}

#[test]
fn corpus_expected_counts_sum_to_regression_total() {
    let sum: usize = (0..common::CORPUS_LEN).map(common::expected_count).sum();
    assert_eq!(sum as u64, common::CORPUS_TOTAL);
    assert_eq!(common::expected_count(0), 16);
}

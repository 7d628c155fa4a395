//! Property tests for fuzzy ranking.
//!
//! 1. An exact title substring always outranks a content-only subsequence hit.
//! 2. Scores stay within `[0, 1]` and results come back sorted.
//! 3. A pattern with a character absent from every key matches nothing.

use dida::command::FuzzySearch;
use dida::command::fuzzy::{Key, SUBSEQUENCE_FLOOR};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Record {
    title: String,
    content: String,
}

const KEYS: &[Key<Record>] = &[|r| r.title.as_str(), |r| r.content.as_str()];

fn spread(word: &str) -> String {
    word.chars().map(String::from).collect::<Vec<_>>().join("-")
}

proptest! {
    #[test]
    fn title_substring_beats_spread_content(
        word in "[a-m]{2,8}",
        prefix in "[n-y ]{0,10}",
        suffix in "[n-y ]{0,10}",
    ) {
        let fuzzy = FuzzySearch::new();
        let records = vec![
            Record { title: String::new(), content: spread(&word) },
            Record { title: format!("{prefix}{word}{suffix}"), content: String::new() },
        ];

        let hits = fuzzy.search(records, &word, KEYS);
        prop_assert_eq!(hits.len(), 2);
        prop_assert_eq!(hits[0].ref_index, 1);
        prop_assert!(hits[0].score < SUBSEQUENCE_FLOOR);
        prop_assert!(hits[1].score >= SUBSEQUENCE_FLOOR);
    }

    #[test]
    fn scores_bounded_and_sorted(
        titles in prop::collection::vec("[a-f ]{0,16}", 0..12),
        pattern in "[a-f]{1,4}",
    ) {
        let fuzzy = FuzzySearch::new();
        let records: Vec<_> = titles
            .into_iter()
            .map(|title| Record { title, content: String::new() })
            .collect();
        let count = records.len();

        let hits = fuzzy.search(records, &pattern, KEYS);
        prop_assert!(hits.len() <= count);
        for hit in &hits {
            prop_assert!((0.0..=1.0).contains(&hit.score));
            prop_assert!(hit.ref_index < count);
        }
        for pair in hits.windows(2) {
            prop_assert!(pair[0].score <= pair[1].score);
        }
    }

    #[test]
    fn absent_character_matches_nothing(
        titles in prop::collection::vec("[a-m]{0,16}", 0..12),
        pattern in "[a-m]{0,3}z[a-m]{0,3}",
    ) {
        let fuzzy = FuzzySearch::new();
        let records: Vec<_> = titles
            .into_iter()
            .map(|title| Record { content: title.clone(), title })
            .collect();
        prop_assert!(fuzzy.search(records, &pattern, KEYS).is_empty());
    }
}

//! Term weights for word clouds.
//!
//! Focus clouds weight each watch term by how often a sender mentioned it.
//! Full-text clouds tokenize everything a sender wrote.

use crate::error::AnalysisResult;
use crate::nlp::{is_stop_token, strip_noise, Tokenizer};
use crate::relationship::RelationshipMatrix;
use chatlens_core::MessageTable;
use std::collections::HashMap;

/// `(term, weight)` pairs, heaviest first.
pub type TermWeights = Vec<(String, f64)>;

/// Merge counts by term, keeping first-seen order, then sort by count
/// descending and keep at most `max_words`.
fn rank_terms<'a>(terms: impl Iterator<Item = (&'a str, u64)>, max_words: usize) -> TermWeights {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut merged: Vec<(&str, u64)> = Vec::new();
    for (term, count) in terms {
        if count == 0 {
            continue;
        }
        match index.get(term) {
            Some(&i) => merged[i].1 += count,
            None => {
                index.insert(term, merged.len());
                merged.push((term, count));
            }
        }
    }
    merged.sort_by(|a, b| b.1.cmp(&a.1));
    merged.truncate(max_words);
    merged
        .into_iter()
        .map(|(term, count)| (term.to_string(), count as f64))
        .collect()
}

/// Per-sender weights taken from the relationship matrix columns. Rows that
/// share a term are summed; zero counts are dropped.
pub fn focus_frequencies(matrix: &RelationshipMatrix, max_words: usize) -> Vec<(String, TermWeights)> {
    matrix
        .columns()
        .iter()
        .map(|sender| {
            let column = matrix.column(sender).unwrap_or_default();
            (sender.clone(), rank_terms(column.into_iter(), max_words))
        })
        .collect()
}

/// Token counts over everything `sender` wrote, after noise stripping and
/// stop token removal.
pub fn sender_frequencies<T: Tokenizer + ?Sized>(
    table: &MessageTable,
    sender: &str,
    tokenizer: &T,
    max_words: usize,
) -> AnalysisResult<TermWeights> {
    let joined = table
        .by_sender(sender)
        .map(|record| record.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let tokens = tokenizer.tokenize(&strip_noise(&joined))?;
    Ok(rank_terms(
        tokens
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty() && !is_stop_token(t))
            .map(|t| (t, 1)),
        max_words,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::{MatchPolicy, WatchList};
    use chatlens_core::MessageRecord;
    use chrono::NaiveDate;

    struct CharTokenizer;

    impl Tokenizer for CharTokenizer {
        fn tokenize(&self, text: &str) -> AnalysisResult<Vec<String>> {
            Ok(text.chars().map(String::from).collect())
        }
    }

    fn table(rows: &[(&str, &str)]) -> MessageTable {
        let ts = NaiveDate::from_ymd_opt(2019, 1, 1)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("timestamp");
        MessageTable::new(
            rows.iter()
                .map(|(s, t)| MessageRecord::new(ts, *s, *t))
                .collect(),
        )
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn focus_weights_follow_the_sender_column() {
        let messages = table(&[("A", "红包 红包"), ("A", "红包 八卦"), ("B", "八卦")]);
        let watch = WatchList::new(&strings(&["A", "B"]), &strings(&["红包"]), &strings(&["红包", "八卦"]));
        let matrix = RelationshipMatrix::build(&messages, &watch, MatchPolicy::ExactSubstring);

        let clouds = focus_frequencies(&matrix, 10);
        assert_eq!(clouds.len(), 2);
        assert_eq!(clouds[0].0, "A");
        // Nickname and keyword rows for the same term add up.
        assert_eq!(clouds[0].1, vec![("红包".to_string(), 4.0), ("八卦".to_string(), 1.0)]);
        assert_eq!(clouds[1].1, vec![("八卦".to_string(), 1.0)]);
    }

    #[test]
    fn full_text_drops_noise_and_stop_tokens() {
        let messages = table(&[("A", "好的 ok!"), ("A", "好吃"), ("B", "好")]);
        let weights = sender_frequencies(&messages, "A", &CharTokenizer, 10).expect("weights");
        assert_eq!(weights, vec![("好".to_string(), 2.0), ("吃".to_string(), 1.0)]);
    }

    #[test]
    fn max_words_truncates() {
        let messages = table(&[("A", "甲乙丙丁")]);
        let weights = sender_frequencies(&messages, "A", &CharTokenizer, 2).expect("weights");
        assert_eq!(weights.len(), 2);
    }
}

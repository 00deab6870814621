//! Radar attribute scores derived from the relationship matrix.
//!
//! The pipeline is fixed: take the trailing keyword rows, append a totals
//! row, normalize columns, then rows, take the square root, drop the totals
//! row, and read one score vector per sender. Normalizing rows before
//! columns yields different scores.

use crate::error::{AnalysisError, AnalysisResult};
use crate::relationship::RelationshipMatrix;
use chatlens_core::config::AnalysisConfig;
use serde::Serialize;
use tracing::debug;

/// Label of the synthetic per-sender message count row.
pub const TOTAL_ROW: &str = "sum";

/// Real valued keyword x sender matrix under normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreMatrix {
    rows: Vec<String>,
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
    has_totals: bool,
}

impl ScoreMatrix {
    /// Copy the trailing `keyword_count` rows of `matrix`.
    pub fn from_keyword_rows(
        matrix: &RelationshipMatrix,
        keyword_count: usize,
    ) -> AnalysisResult<Self> {
        let total_rows = matrix.rows().len();
        if keyword_count == 0 || keyword_count > total_rows {
            return Err(AnalysisError::config(format!(
                "keyword row count {} out of range for a matrix with {} rows",
                keyword_count, total_rows
            )));
        }
        let start = total_rows - keyword_count;
        let values = (start..total_rows)
            .filter_map(|i| matrix.row(i))
            .map(|row| row.iter().map(|&c| c as f64).collect())
            .collect();
        Ok(Self {
            rows: matrix.rows()[start..].to_vec(),
            columns: matrix.columns().to_vec(),
            values,
            has_totals: false,
        })
    }

    /// Append the per-sender message counts as the totals row.
    pub fn append_totals(&mut self, totals: &[usize]) -> AnalysisResult<()> {
        if totals.len() != self.columns.len() {
            return Err(AnalysisError::config(format!(
                "{} message totals for {} senders",
                totals.len(),
                self.columns.len()
            )));
        }
        if self.has_totals {
            return Err(AnalysisError::precondition("totals row already appended"));
        }
        self.rows.push(TOTAL_ROW.to_string());
        self.values.push(totals.iter().map(|&t| t as f64).collect());
        self.has_totals = true;
        Ok(())
    }

    /// Divide each column by its maximum plus `epsilon`.
    pub fn normalize_columns(&mut self, epsilon: f64) {
        for col in 0..self.columns.len() {
            let max = self
                .values
                .iter()
                .map(|row| row[col])
                .fold(f64::NEG_INFINITY, f64::max);
            let divisor = max + epsilon;
            for row in &mut self.values {
                row[col] /= divisor;
            }
        }
    }

    /// Divide each row by its maximum plus `epsilon`.
    pub fn normalize_rows(&mut self, epsilon: f64) {
        for row in &mut self.values {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let divisor = max + epsilon;
            for value in row.iter_mut() {
                *value /= divisor;
            }
        }
    }

    /// Element-wise square root.
    pub fn compress_sqrt(&mut self) {
        for value in self.values.iter_mut().flatten() {
            *value = value.sqrt();
        }
    }

    /// Remove the totals row if present.
    pub fn drop_totals(&mut self) {
        if self.has_totals {
            self.rows.pop();
            self.values.pop();
            self.has_totals = false;
        }
    }

    /// Row labels.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Column labels.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Value at (`row`, `col`).
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Values of row `index`.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.values.get(index).map(Vec::as_slice)
    }

    /// Values of column `index`, top to bottom.
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.columns.len() {
            return None;
        }
        Some(self.values.iter().map(|row| row[index]).collect())
    }

    /// One vector per sender, labelled with `labels` (one per row).
    pub fn into_radar_scores(self, labels: &[String]) -> AnalysisResult<RadarScores> {
        if self.has_totals {
            return Err(AnalysisError::precondition(
                "totals row must be dropped before reading scores",
            ));
        }
        if labels.len() != self.rows.len() {
            return Err(AnalysisError::config(format!(
                "{} radar labels for {} keyword rows",
                labels.len(),
                self.rows.len()
            )));
        }
        let scores = self
            .columns
            .iter()
            .enumerate()
            .map(|(col, sender)| {
                let values = self.values.iter().map(|row| row[col]).collect();
                (sender.clone(), values)
            })
            .collect();
        Ok(RadarScores {
            labels: labels.to_vec(),
            scores,
        })
    }
}

/// Per-sender radar scores in sender rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarScores {
    labels: Vec<String>,
    scores: Vec<(String, Vec<f64>)>,
}

impl RadarScores {
    /// Axis labels, one per keyword.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Senders in rank order.
    pub fn senders(&self) -> impl Iterator<Item = &str> {
        self.scores.iter().map(|(s, _)| s.as_str())
    }

    /// Scores for `sender`.
    pub fn get(&self, sender: &str) -> Option<&[f64]> {
        self.scores
            .iter()
            .find(|(s, _)| s == sender)
            .map(|(_, v)| v.as_slice())
    }

    /// `(sender, scores)` pairs in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.scores.iter().map(|(s, v)| (s.as_str(), v.as_slice()))
    }

    /// Number of senders.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether there are no senders.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Turns a relationship matrix into radar scores.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeNormalizer {
    labels: Vec<String>,
    column_epsilon: f64,
    row_epsilon: f64,
}

impl AttributeNormalizer {
    /// Normalizer for `labels.len()` keyword rows.
    pub fn new(labels: Vec<String>, column_epsilon: f64, row_epsilon: f64) -> AnalysisResult<Self> {
        if labels.is_empty() {
            return Err(AnalysisError::config("at least one radar label is required"));
        }
        for (name, eps) in [("column_epsilon", column_epsilon), ("row_epsilon", row_epsilon)] {
            if !(eps.is_finite() && eps > 0.0) {
                return Err(AnalysisError::config(format!(
                    "{} must be a positive number, got {}",
                    name, eps
                )));
            }
        }
        Ok(Self {
            labels,
            column_epsilon,
            row_epsilon,
        })
    }

    /// Normalizer using the analysis section of the configuration.
    pub fn from_config(config: &AnalysisConfig) -> AnalysisResult<Self> {
        if config.radar_labels.len() != config.keywords.len() {
            return Err(AnalysisError::config(format!(
                "{} radar labels for {} keywords",
                config.radar_labels.len(),
                config.keywords.len()
            )));
        }
        Self::new(
            config.radar_labels.clone(),
            config.column_epsilon,
            config.row_epsilon,
        )
    }

    /// Number of keyword rows consumed.
    pub fn keyword_count(&self) -> usize {
        self.labels.len()
    }

    /// Run the full pipeline. `totals` holds each column sender's message
    /// count in column order.
    pub fn normalize(
        &self,
        matrix: &RelationshipMatrix,
        totals: &[usize],
    ) -> AnalysisResult<RadarScores> {
        if matrix.columns().is_empty() {
            return Err(AnalysisError::precondition(
                "relationship matrix has no sender columns; load messages and build it first",
            ));
        }
        let mut scores = ScoreMatrix::from_keyword_rows(matrix, self.keyword_count())?;
        scores.append_totals(totals)?;
        scores.normalize_columns(self.column_epsilon);
        scores.normalize_rows(self.row_epsilon);
        scores.compress_sqrt();
        scores.drop_totals();
        debug!(
            "radar scores computed for {} senders over {} axes",
            scores.columns().len(),
            scores.rows().len()
        );
        scores.into_radar_scores(&self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::{MatchPolicy, WatchList};
    use chatlens_core::{MessageRecord, MessageTable};
    use chrono::NaiveDate;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn matrix(rows: &[(&str, &str)], senders: &[&str], keywords: &[&str]) -> RelationshipMatrix {
        let ts = NaiveDate::from_ymd_opt(2019, 1, 1)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("timestamp");
        let table = MessageTable::new(
            rows.iter()
                .map(|(s, t)| MessageRecord::new(ts, *s, *t))
                .collect(),
        );
        let watch = WatchList::new(&strings(senders), &strings(&["nick"]), &strings(keywords));
        RelationshipMatrix::build(&table, &watch, MatchPolicy::ExactSubstring)
    }

    fn sample() -> RelationshipMatrix {
        matrix(
            &[
                ("A", "红包 八卦"),
                ("A", "红包"),
                ("A", "hello"),
                ("B", "八卦"),
                ("B", "nick"),
            ],
            &["A", "B"],
            &["红包", "八卦"],
        )
    }

    #[test]
    fn keyword_rows_are_the_trailing_block() {
        let scores = ScoreMatrix::from_keyword_rows(&sample(), 2).expect("rows");
        assert_eq!(scores.rows(), strings(&["红包", "八卦"]).as_slice());
        assert_eq!(scores.row(0), Some(&[2.0, 0.0][..]));
        assert_eq!(scores.row(1), Some(&[1.0, 1.0][..]));
        assert!(matches!(
            ScoreMatrix::from_keyword_rows(&sample(), 99),
            Err(AnalysisError::Config(_))
        ));
    }

    #[test]
    fn busiest_sender_total_is_near_one_after_column_pass() {
        let mut scores = ScoreMatrix::from_keyword_rows(&sample(), 2).expect("rows");
        scores.append_totals(&[3, 2]).expect("totals");
        scores.normalize_columns(0.01);

        let total_a = scores.get(2, 0).expect("cell");
        assert!((1.0 - total_a).abs() < 0.01);
        assert!(total_a < 1.0);
    }

    #[test]
    fn column_then_row_order_matters() {
        let mut col_first = ScoreMatrix::from_keyword_rows(&sample(), 2).expect("rows");
        col_first.append_totals(&[3, 2]).expect("totals");
        let mut row_first = col_first.clone();

        col_first.normalize_columns(0.01);
        col_first.normalize_rows(0.0001);
        row_first.normalize_rows(0.0001);
        row_first.normalize_columns(0.01);

        assert_ne!(col_first, row_first);
    }

    #[test]
    fn normalized_scores_are_bounded_and_reach_one() {
        let normalizer =
            AttributeNormalizer::new(strings(&["花痴", "八卦"]), 0.01, 0.0001).expect("normalizer");
        let radar = normalizer.normalize(&sample(), &[3, 2]).expect("scores");

        assert_eq!(radar.labels(), strings(&["花痴", "八卦"]).as_slice());
        assert_eq!(radar.senders().collect::<Vec<_>>(), vec!["A", "B"]);
        for (_, values) in radar.iter() {
            assert_eq!(values.len(), 2);
            assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
        }
        // Each nonzero keyword row has a sender near the top of the scale.
        for axis in 0..2 {
            let best = radar
                .iter()
                .map(|(_, v)| v[axis])
                .fold(0.0, f64::max);
            assert!(best > 0.99, "axis {} peaked at {}", axis, best);
        }
    }

    #[test]
    fn sqrt_keeps_order() {
        let mut scores = ScoreMatrix::from_keyword_rows(&sample(), 2).expect("rows");
        scores.normalize_columns(0.01);
        let before = scores.clone();
        scores.compress_sqrt();
        for r in 0..2 {
            for c in 0..2 {
                for r2 in 0..2 {
                    for c2 in 0..2 {
                        let (a, b) = (before.get(r, c), before.get(r2, c2));
                        if a <= b {
                            assert!(scores.get(r, c) <= scores.get(r2, c2));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn all_zero_columns_stay_zero() {
        let radar = AttributeNormalizer::new(strings(&["x"]), 0.01, 0.0001)
            .expect("normalizer")
            .normalize(&matrix(&[("A", "none")], &["A"], &["zzz"]), &[0])
            .expect("scores");
        assert_eq!(radar.get("A"), Some(&[0.0][..]));
    }

    #[test]
    fn matrix_without_senders_is_a_precondition_error() {
        let empty = matrix(&[], &[], &["红包"]);
        let normalizer = AttributeNormalizer::new(strings(&["红包"]), 0.01, 0.0001).expect("ok");
        assert!(matches!(
            normalizer.normalize(&empty, &[]),
            Err(AnalysisError::Precondition(_))
        ));
    }

    #[test]
    fn totals_must_align_with_columns() {
        let normalizer =
            AttributeNormalizer::new(strings(&["a", "b"]), 0.01, 0.0001).expect("normalizer");
        assert!(matches!(
            normalizer.normalize(&sample(), &[1]),
            Err(AnalysisError::Config(_))
        ));
    }

    #[test]
    fn epsilons_must_be_positive() {
        assert!(AttributeNormalizer::new(strings(&["a"]), 0.0, 0.1).is_err());
        assert!(AttributeNormalizer::new(strings(&["a"]), 0.1, f64::NAN).is_err());
    }
}

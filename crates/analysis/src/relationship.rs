//! Sender ranking, watch list, and the relationship matrix.
//!
//! The relationship matrix counts, for every watch term and every top sender,
//! how many of that sender's messages contain the term. Rows follow the watch
//! list order (top senders, then nicknames, then keywords) and duplicate
//! terms across those lists stay separate rows.

use crate::error::{AnalysisError, AnalysisResult};
use chatlens_core::MessageTable;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Senders ordered by message count, most active first.
///
/// Equal counts keep the order in which senders first appear in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SenderRanking {
    entries: Vec<(String, usize)>,
}

impl SenderRanking {
    /// Rank every sender in `table`.
    pub fn from_messages(table: &MessageTable) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<(String, usize)> = Vec::new();
        for record in table {
            match index.get(record.sender.as_str()) {
                Some(&i) => entries[i].1 += 1,
                None => {
                    index.insert(record.sender.as_str(), entries.len());
                    entries.push((record.sender.clone(), 1));
                }
            }
        }
        // Stable sort preserves first-appearance order among ties.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }

    /// Number of distinct senders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sender was seen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(sender, message count)` pairs in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(s, c)| (s.as_str(), *c))
    }

    /// Message count for `sender`, zero when unknown.
    pub fn count(&self, sender: &str) -> usize {
        self.entries
            .iter()
            .find(|(s, _)| s == sender)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Message counts aligned to `senders`.
    pub fn counts(&self, senders: &[String]) -> Vec<usize> {
        senders.iter().map(|s| self.count(s)).collect()
    }

    /// The `n` most active senders. `n` larger than the number of distinct
    /// senders is clamped; `n == 0` is a configuration error.
    pub fn top_n(&self, n: usize) -> AnalysisResult<Vec<String>> {
        if n == 0 {
            return Err(AnalysisError::config("top_n must be at least 1"));
        }
        if n > self.entries.len() {
            warn!(
                "top_n {} exceeds the {} distinct senders, clamping",
                n,
                self.entries.len()
            );
        }
        Ok(self
            .entries
            .iter()
            .take(n)
            .map(|(s, _)| s.clone())
            .collect())
    }
}

/// How a watch term is matched against message text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Plain substring containment, case- and whitespace-sensitive, on the
    /// text exactly as stored. An empty term never matches.
    #[default]
    ExactSubstring,
}

impl MatchPolicy {
    /// Whether `term` occurs in `text` under this policy.
    pub fn matches(&self, term: &str, text: &str) -> bool {
        match self {
            Self::ExactSubstring => !term.is_empty() && text.contains(term),
        }
    }
}

/// Watch terms forming the matrix rows: top senders ++ nicknames ++ keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchList {
    terms: Vec<String>,
    sender_count: usize,
    nickname_count: usize,
}

impl WatchList {
    /// Concatenate the three lists, keeping duplicates.
    pub fn new(senders: &[String], nicknames: &[String], keywords: &[String]) -> Self {
        let terms = senders
            .iter()
            .chain(nicknames)
            .chain(keywords)
            .cloned()
            .collect();
        Self {
            terms,
            sender_count: senders.len(),
            nickname_count: nicknames.len(),
        }
    }

    /// Every term in row order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// The top senders heading the list; these are also the matrix columns.
    pub fn senders(&self) -> &[String] {
        &self.terms[..self.sender_count]
    }

    /// The nickname block.
    pub fn nicknames(&self) -> &[String] {
        &self.terms[self.sender_count..self.sender_count + self.nickname_count]
    }

    /// The trailing keyword block.
    pub fn keywords(&self) -> &[String] {
        &self.terms[self.sender_count + self.nickname_count..]
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the list has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Dense watch term x sender count matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipMatrix {
    rows: Vec<String>,
    columns: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl RelationshipMatrix {
    /// Count watch term mentions in one pass over `table`.
    ///
    /// Columns are the watch list's senders. A message only ever increments
    /// its own author's column, and only when that author is a column.
    pub fn build(table: &MessageTable, watch: &WatchList, policy: MatchPolicy) -> Self {
        let columns = watch.senders().to_vec();
        let rows = watch.terms().to_vec();
        let column_index: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();
        let mut counts = vec![vec![0u64; columns.len()]; rows.len()];

        for record in table {
            let Some(&col) = column_index.get(record.sender.as_str()) else {
                continue;
            };
            for (row, term) in rows.iter().enumerate() {
                if policy.matches(term, &record.text) {
                    counts[row][col] += 1;
                }
            }
        }

        info!(
            "relationship matrix built: {} terms x {} senders from {} messages",
            rows.len(),
            columns.len(),
            table.len()
        );
        Self {
            rows,
            columns,
            counts,
        }
    }

    /// Row labels (watch terms).
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Column labels (top senders).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Count at the first row labelled `term` and the column `sender`.
    pub fn get(&self, term: &str, sender: &str) -> Option<u64> {
        let row = self.rows.iter().position(|r| r == term)?;
        let col = self.columns.iter().position(|c| c == sender)?;
        Some(self.counts[row][col])
    }

    /// Counts of row `index`.
    pub fn row(&self, index: usize) -> Option<&[u64]> {
        self.counts.get(index).map(Vec::as_slice)
    }

    /// Sum of row `index` across all senders.
    pub fn row_sum(&self, index: usize) -> u64 {
        self.row(index).map(|r| r.iter().sum()).unwrap_or(0)
    }

    /// `(term, count)` pairs for `sender` in row order.
    pub fn column(&self, sender: &str) -> Option<Vec<(&str, u64)>> {
        let col = self.columns.iter().position(|c| c == sender)?;
        Some(
            self.rows
                .iter()
                .zip(&self.counts)
                .map(|(term, counts)| (term.as_str(), counts[col]))
                .collect(),
        )
    }

    /// Sum of every cell.
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Write as CSV: a header with an empty corner cell and the senders, then
    /// one row per watch term.
    pub fn write_csv<W: Write>(&self, writer: W) -> AnalysisResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let header: Vec<&str> = std::iter::once("")
            .chain(self.columns.iter().map(String::as_str))
            .collect();
        csv_writer.write_record(&header)?;
        for (term, counts) in self.rows.iter().zip(&self.counts) {
            let mut record = Vec::with_capacity(counts.len() + 1);
            record.push(term.clone());
            record.extend(counts.iter().map(u64::to_string));
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Persist to `path`, creating parent directories.
    pub fn save_csv(&self, path: &Path) -> AnalysisResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.write_csv(std::fs::File::create(path)?)?;
        debug!("relationship matrix written to {}", path.display());
        Ok(())
    }
}

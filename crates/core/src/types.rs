use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single exported chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Local time the message was sent.
    pub timestamp: NaiveDateTime,

    /// Sender identifier exactly as exported.
    pub sender: String,

    /// Message text exactly as exported. Empty when the cell was blank.
    pub text: String,
}

impl MessageRecord {
    /// Create a new message record.
    pub fn new(timestamp: NaiveDateTime, sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            sender: sender.into(),
            text: text.into(),
        }
    }
}

/// Ordered, read-only table of loaded messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTable {
    records: Vec<MessageRecord>,
}

impl MessageTable {
    /// Wrap already loaded records, keeping their order.
    pub fn new(records: Vec<MessageRecord>) -> Self {
        Self { records }
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no messages.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate messages in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, MessageRecord> {
        self.records.iter()
    }

    /// All records as a slice.
    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    /// Distinct senders in order of first appearance.
    pub fn senders(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .map(|record| record.sender.as_str())
            .filter(|sender| seen.insert(*sender))
            .collect()
    }

    /// Messages authored by `sender`, in load order.
    pub fn by_sender<'a>(&'a self, sender: &'a str) -> impl Iterator<Item = &'a MessageRecord> + 'a {
        self.records.iter().filter(move |record| record.sender == sender)
    }
}

impl<'a> IntoIterator for &'a MessageTable {
    type Item = &'a MessageRecord;
    type IntoIter = std::slice::Iter<'a, MessageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

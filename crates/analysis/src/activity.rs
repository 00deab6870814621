use chatlens_core::MessageTable;
use chrono::Timelike;
use serde::Serialize;

/// Hours in a day.
pub const HOURS_PER_DAY: usize = 24;

/// Message counts per hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyActivity {
    counts: [usize; HOURS_PER_DAY],
}

impl HourlyActivity {
    /// Bucket every message by the hour of its timestamp.
    pub fn from_messages(table: &MessageTable) -> Self {
        let mut counts = [0usize; HOURS_PER_DAY];
        for record in table {
            counts[record.timestamp.hour() as usize] += 1;
        }
        Self { counts }
    }

    /// Messages sent during `hour` (0..24).
    pub fn count(&self, hour: usize) -> usize {
        self.counts.get(hour).copied().unwrap_or(0)
    }

    /// All 24 counts.
    pub fn counts(&self) -> &[usize; HOURS_PER_DAY] {
        &self.counts
    }

    /// Total messages.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// The `k` busiest hours with their counts, ties by earlier hour.
    /// Hours without messages are omitted.
    pub fn top_hours(&self, k: usize) -> Vec<(usize, usize)> {
        let mut hours: Vec<(usize, usize)> = self
            .counts
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, c)| c > 0)
            .collect();
        hours.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        hours.truncate(k);
        hours
    }

    /// Busiest hour, `None` for an empty table.
    pub fn peak_hour(&self) -> Option<usize> {
        self.top_hours(1).first().map(|&(hour, _)| hour)
    }

    /// Bar radii: each count divided by the busiest hour's count.
    pub fn radii(&self) -> Vec<f64> {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return vec![0.0; HOURS_PER_DAY];
        }
        self.counts
            .iter()
            .map(|&c| c as f64 / max as f64)
            .collect()
    }
}

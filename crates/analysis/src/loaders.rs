//! Message table loaders.
//!
//! A loader turns an exported file into a [`MessageTable`]. The registry
//! picks a loader by file extension; rows with an unparseable timestamp or a
//! missing sender abort the load with a [`AnalysisError::Load`] naming the
//! 1-based data row. Only an empty sender cell counts as missing; senders are
//! otherwise kept exactly as exported, whitespace included.

use crate::error::{AnalysisError, AnalysisResult};
use chatlens_core::config::InputConfig;
use chatlens_core::{MessageRecord, MessageTable};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Timestamp layouts accepted after RFC 3339.
const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Parse an exported timestamp into local naive time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn build_record(
    row: usize,
    timestamp: Option<&str>,
    sender: Option<&str>,
    text: Option<&str>,
) -> AnalysisResult<MessageRecord> {
    let raw_timestamp = timestamp.unwrap_or_default();
    let timestamp = parse_timestamp(raw_timestamp).ok_or_else(|| {
        AnalysisError::load(format!("row {}: unparseable timestamp '{}'", row, raw_timestamp))
    })?;
    let sender = match sender {
        Some(s) if !s.is_empty() => s,
        _ => return Err(AnalysisError::load(format!("row {}: missing sender", row))),
    };
    Ok(MessageRecord::new(timestamp, sender, text.unwrap_or_default()))
}

/// A source format the analyzer can read messages from.
pub trait TableLoader {
    /// Short format name used in logs.
    fn name(&self) -> &str;

    /// Whether this loader handles `path`.
    fn can_load(&self, path: &Path) -> bool;

    /// Read every message in `path`.
    fn load(&self, path: &Path) -> AnalysisResult<MessageTable>;
}

/// Delimited text export (`.csv`, `.tsv`).
#[derive(Debug, Clone)]
pub struct CsvTableLoader {
    timestamp_column: usize,
    sender_column: usize,
    message_column: usize,
    delimiter: u8,
    has_headers: bool,
}

impl Default for CsvTableLoader {
    fn default() -> Self {
        Self::from_config(&InputConfig::default())
    }
}

impl CsvTableLoader {
    /// Loader using the column layout from `config`.
    pub fn from_config(config: &InputConfig) -> Self {
        Self {
            timestamp_column: config.timestamp_column,
            sender_column: config.sender_column,
            message_column: config.message_column,
            delimiter: u8::try_from(config.delimiter).unwrap_or(b','),
            has_headers: config.has_headers,
        }
    }

    /// Override the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read messages from any reader.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> AnalysisResult<MessageTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, row) in csv_reader.records().enumerate() {
            let row = row?;
            records.push(build_record(
                index + 1,
                row.get(self.timestamp_column),
                row.get(self.sender_column),
                row.get(self.message_column),
            )?);
        }
        Ok(MessageTable::new(records))
    }
}

impl TableLoader for CsvTableLoader {
    fn name(&self) -> &str {
        "csv"
    }

    fn can_load(&self, path: &Path) -> bool {
        matches!(extension(path).as_deref(), Some("csv") | Some("tsv"))
    }

    fn load(&self, path: &Path) -> AnalysisResult<MessageTable> {
        let file = File::open(path)?;
        if extension(path).as_deref() == Some("tsv") {
            self.clone().with_delimiter(b'\t').load_from_reader(file)
        } else {
            self.load_from_reader(file)
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonMessage {
    timestamp: String,
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// JSON array of `{timestamp, sender, text}` objects.
#[derive(Debug, Clone, Default)]
pub struct JsonTableLoader;

impl JsonTableLoader {
    /// Read messages from any reader.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> AnalysisResult<MessageTable> {
        let messages: Vec<JsonMessage> = serde_json::from_reader(reader)?;
        let records = messages
            .iter()
            .enumerate()
            .map(|(index, m)| {
                build_record(
                    index + 1,
                    Some(m.timestamp.as_str()),
                    m.sender.as_deref(),
                    m.text.as_deref(),
                )
            })
            .collect::<AnalysisResult<Vec<_>>>()?;
        Ok(MessageTable::new(records))
    }
}

impl TableLoader for JsonTableLoader {
    fn name(&self) -> &str {
        "json"
    }

    fn can_load(&self, path: &Path) -> bool {
        extension(path).as_deref() == Some("json")
    }

    fn load(&self, path: &Path) -> AnalysisResult<MessageTable> {
        self.load_from_reader(File::open(path)?)
    }
}

/// Ordered set of loaders; the first one accepting a path wins.
pub struct LoaderRegistry {
    loaders: Vec<Box<dyn TableLoader>>,
}

impl LoaderRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    /// Registry with the built-in loaders configured from `config`.
    pub fn from_config(config: &InputConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CsvTableLoader::from_config(config)));
        registry.register(Box::new(JsonTableLoader));
        registry
    }

    /// Append a loader.
    pub fn register(&mut self, loader: Box<dyn TableLoader>) {
        self.loaders.push(loader);
    }

    /// Loader that accepts `path`, if any.
    pub fn detect(&self, path: &Path) -> Option<&dyn TableLoader> {
        self.loaders
            .iter()
            .find(|loader| loader.can_load(path))
            .map(|loader| loader.as_ref())
    }

    /// Load `path` with the first matching loader.
    pub fn load(&self, path: &Path) -> AnalysisResult<MessageTable> {
        let loader = self.detect(path).ok_or_else(|| {
            AnalysisError::load(format!("unsupported message table format: {}", path.display()))
        })?;
        info!("loading {} as {}", path.display(), loader.name());
        let table = loader.load(path)?;
        debug!("loaded {} messages", table.len());
        Ok(table)
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::from_config(&InputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const EXPORT: &str = "Date,Sender,Type,Status,Message\n\
        2019-01-01 09:00:00,Alice,1,0,I love 男神 stuff\n\
        2019-01-01T09:05,Bob,1,0,no mention\n\
        2019/01/01 21:30,Alice,1,0,\n";

    #[test]
    fn accepted_timestamp_layouts() {
        for value in [
            "2019-01-01T09:00:00+08:00",
            "2019-01-01 09:00:00",
            "2019-01-01 09:00",
            "2019-01-01T09:00:00",
            "2019-01-01T09:00",
            "2019/01/01 09:00:00",
            " 2019/01/01 09:00 ",
        ] {
            let parsed = parse_timestamp(value).unwrap_or_else(|| panic!("{}", value));
            assert_eq!(parsed.hour(), 9, "{}", value);
        }
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn csv_export_uses_configured_columns() {
        let table = CsvTableLoader::default()
            .load_from_reader(EXPORT.as_bytes())
            .expect("load");

        assert_eq!(table.len(), 3);
        let first = &table.records()[0];
        assert_eq!(first.sender, "Alice");
        assert_eq!(first.text, "I love 男神 stuff");
        assert_eq!(table.records()[2].text, "");
        assert_eq!(table.records()[2].timestamp.hour(), 21);
    }

    #[test]
    fn bad_timestamp_names_the_row() {
        let data = "Date,Sender,Type,Status,Message\n\
            2019-01-01 09:00,Alice,1,0,ok\n\
            not a date,Bob,1,0,broken\n";
        let err = CsvTableLoader::default()
            .load_from_reader(data.as_bytes())
            .expect_err("should fail");
        assert!(matches!(&err, AnalysisError::Load(msg) if msg.contains("row 2")));
    }

    #[test]
    fn missing_sender_is_a_load_error() {
        let data = "Date,Sender,Type,Status,Message\n2019-01-01 09:00,,1,0,hi\n";
        let err = CsvTableLoader::default()
            .load_from_reader(data.as_bytes())
            .expect_err("should fail");
        assert!(matches!(&err, AnalysisError::Load(msg) if msg.contains("missing sender")));
    }

    #[test]
    fn whitespace_sender_is_kept_verbatim() {
        let data = "Date,Sender,Type,Status,Message\n2019-01-01 09:00, ,1,0,hi\n";
        let table = CsvTableLoader::default()
            .load_from_reader(data.as_bytes())
            .expect("whitespace sender loads");
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].sender, " ");
    }

    #[test]
    fn json_records_without_text_are_kept() {
        let data = r#"[
            {"timestamp": "2019-01-01 09:00", "sender": "Alice", "text": "红包"},
            {"timestamp": "2019-01-01 10:00", "sender": "Bob"}
        ]"#;
        let table = JsonTableLoader.load_from_reader(data.as_bytes()).expect("load");
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].text, "");
    }

    #[test]
    fn registry_picks_loader_by_extension() {
        let registry = LoaderRegistry::default();
        assert_eq!(registry.detect(Path::new("a.CSV")).map(|l| l.name()), Some("csv"));
        assert_eq!(registry.detect(Path::new("a.tsv")).map(|l| l.name()), Some("csv"));
        assert_eq!(registry.detect(Path::new("a.json")).map(|l| l.name()), Some("json"));
        assert!(registry.detect(Path::new("a.xlsx")).is_none());
        assert!(matches!(
            registry.load(Path::new("a.xlsx")),
            Err(AnalysisError::Load(_))
        ));
    }

    #[test]
    fn tsv_files_are_tab_delimited() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("export.tsv");
        std::fs::write(
            &path,
            "Date\tSender\tType\tStatus\tMessage\n2019-01-01 09:00\tAlice\t1\t0\ta, b\n",
        )
        .expect("write");

        let table = LoaderRegistry::default().load(&path).expect("load");
        assert_eq!(table.records()[0].text, "a, b");
    }
}

use crate::constants::*;
use crate::Error;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration for chatlens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatlensConfig {
    /// Message table input configuration.
    pub input: InputConfig,

    /// Relationship and attribute analysis configuration.
    pub analysis: AnalysisConfig,

    /// Output artifact locations.
    pub output: OutputConfig,

    /// Chart rendering configuration.
    pub render: RenderConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Message table input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Exported message table. Can be overridden on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Zero-based timestamp column.
    pub timestamp_column: usize,

    /// Zero-based sender column.
    pub sender_column: usize,

    /// Zero-based message text column.
    pub message_column: usize,

    /// Field delimiter for delimited text tables.
    pub delimiter: char,

    /// Whether the first row is a header.
    pub has_headers: bool,
}

/// Relationship and attribute analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of most active senders used as matrix columns.
    pub top_n: usize,

    /// Nicknames appended to the watch list after the top senders.
    pub nicknames: Vec<String>,

    /// Keyword terms appended last; these rows feed the radar chart.
    pub keywords: Vec<String>,

    /// Radar axis label for each keyword, in keyword order.
    pub radar_labels: Vec<String>,

    /// Added to column maxima during column normalization.
    pub column_epsilon: f64,

    /// Added to row maxima during row normalization.
    pub row_epsilon: f64,

    /// Maximum number of words per word cloud.
    pub max_words: usize,
}

/// Output artifact locations, relative to `dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base output directory.
    pub dir: PathBuf,

    /// Relationship matrix CSV file.
    pub relationship_file: String,

    /// Hourly activity chart file.
    pub clock_file: String,

    /// Radar chart file.
    pub radar_file: String,

    /// Directory for relationship-count word clouds.
    pub focus_cloud_dir: String,

    /// Directory for message-text word clouds.
    pub full_cloud_dir: String,

    /// Tokenizer user dictionary file.
    pub user_dict_file: String,
}

/// Shape of the frame drawn around each radar panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameShape {
    /// Circular frame and rings.
    Circle,

    /// Polygon frame with one vertex per axis.
    Polygon,
}

/// Explicit rendering configuration passed to every chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Font family written into chart text. Must cover CJK glyphs.
    pub font_family: String,

    /// Radar panel frame shape.
    pub frame: FrameShape,

    /// Series colours as `#rrggbb`.
    pub palette: Vec<String>,

    /// Figure title above the radar grid.
    pub radar_title: String,

    /// Radar panels per row.
    pub radar_columns: usize,

    /// Edge length of one radar panel in pixels.
    pub radar_panel_size: u32,

    /// Radial grid levels drawn in each panel.
    pub radar_grid_levels: Vec<f64>,

    /// Edge length of the hourly activity chart in pixels.
    pub clock_size: u32,

    /// Word cloud canvas width in pixels.
    pub cloud_width: u32,

    /// Word cloud canvas height in pixels.
    pub cloud_height: u32,

    /// Smallest word cloud font size.
    pub cloud_min_font: f64,

    /// Largest word cloud font size.
    pub cloud_max_font: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given.
    pub level: LogLevel,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level.
    Error,

    /// Warning level.
    Warn,

    /// Info level.
    Info,

    /// Debug level.
    Debug,

    /// Trace level.
    Trace,
}

impl ChatlensConfig {
    /// Default location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot find config directory".to_string()))?
            .join("chatlens");
        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::FileSystem(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)
            .map_err(|e| Error::FileSystem(format!("Failed to write config file: {}", e)))
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Reject values the analysis cannot run with.
    pub fn validate(&self) -> Result<()> {
        let analysis = &self.analysis;
        if analysis.top_n == 0 {
            return Err(Error::config("top_n must be at least 1"));
        }
        if !(analysis.column_epsilon.is_finite() && analysis.column_epsilon > 0.0) {
            return Err(Error::config("column_epsilon must be a positive number"));
        }
        if !(analysis.row_epsilon.is_finite() && analysis.row_epsilon > 0.0) {
            return Err(Error::config("row_epsilon must be a positive number"));
        }
        if analysis.keywords.len() < MIN_RADAR_AXES {
            return Err(Error::config(format!(
                "at least {} keywords are required for the radar chart, got {}",
                MIN_RADAR_AXES,
                analysis.keywords.len()
            )));
        }
        if analysis.radar_labels.len() != analysis.keywords.len() {
            return Err(Error::config(format!(
                "radar_labels has {} entries but keywords has {}",
                analysis.radar_labels.len(),
                analysis.keywords.len()
            )));
        }
        if !self.input.delimiter.is_ascii() {
            return Err(Error::config("delimiter must be a single ASCII character"));
        }
        if self.render.palette.is_empty() {
            return Err(Error::config("render palette must not be empty"));
        }
        if self.render.radar_columns == 0 {
            return Err(Error::config("radar_columns must be at least 1"));
        }
        Ok(())
    }

    /// Resolve a file name against the output directory.
    pub fn output_path(&self, file: &str) -> PathBuf {
        self.output.dir.join(file)
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN,
            sender_column: DEFAULT_SENDER_COLUMN,
            message_column: DEFAULT_MESSAGE_COLUMN,
            delimiter: ',',
            has_headers: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            nicknames: DEFAULT_NICKNAMES.iter().map(|s| s.to_string()).collect(),
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            radar_labels: DEFAULT_RADAR_LABELS.iter().map(|s| s.to_string()).collect(),
            column_epsilon: COLUMN_EPSILON,
            row_epsilon: ROW_EPSILON,
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            relationship_file: RELATIONSHIP_FILE.to_string(),
            clock_file: CLOCK_CHART_FILE.to_string(),
            radar_file: RADAR_CHART_FILE.to_string(),
            focus_cloud_dir: FOCUS_CLOUD_DIR.to_string(),
            full_cloud_dir: FULL_CLOUD_DIR.to_string(),
            user_dict_file: USER_DICT_FILE.to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_family: "Microsoft YaHei".to_string(),
            frame: FrameShape::Polygon,
            palette: ["#0000ff", "#ff0000", "#008000", "#bf00bf", "#bfbf00"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            radar_title: "战力统计".to_string(),
            radar_columns: 3,
            radar_panel_size: 300,
            radar_grid_levels: vec![0.2, 0.4, 0.6, 0.8],
            clock_size: 800,
            cloud_width: 800,
            cloud_height: 600,
            cloud_min_font: 10.0,
            cloud_max_font: 96.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
        }
    }
}

impl FromStr for FrameShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "circle" => Ok(Self::Circle),
            "polygon" => Ok(Self::Polygon),
            other => Err(Error::config(format!("unknown value for frame: {}", other))),
        }
    }
}

impl fmt::Display for FrameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Circle => write!(f, "circle"),
            Self::Polygon => write!(f, "polygon"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ChatlensConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.analysis.keywords.len(), config.analysis.radar_labels.len());
        assert_eq!(config.analysis.top_n, 10);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ChatlensConfig = toml::from_str(
            r#"
            [analysis]
            top_n = 3

            [render]
            frame = "circle"
            "#,
        )
        .expect("parse");

        assert_eq!(config.analysis.top_n, 3);
        assert_eq!(config.render.frame, FrameShape::Circle);
        assert_eq!(config.input.message_column, DEFAULT_MESSAGE_COLUMN);
        assert_eq!(config.output.relationship_file, RELATIONSHIP_FILE);
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let mut config = ChatlensConfig::default();
        config.analysis.top_n = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn mismatched_labels_are_rejected() {
        let mut config = ChatlensConfig::default();
        config.analysis.radar_labels.pop();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn fewer_than_three_radar_axes_are_rejected() {
        let mut config = ChatlensConfig::default();
        config.analysis.keywords.truncate(2);
        config.analysis.radar_labels.truncate(2);
        assert!(matches!(config.validate(), Err(Error::Config(msg)) if msg.contains("at least 3")));

        config.analysis.keywords = vec!["a".into(), "b".into(), "c".into()];
        config.analysis.radar_labels = vec!["A".into(), "B".into(), "C".into()];
        config.validate().expect("three axes validate");
    }

    #[test]
    fn unknown_frame_is_a_config_error() {
        assert_eq!("polygon".parse::<FrameShape>().ok(), Some(FrameShape::Polygon));
        assert!(matches!("hexagon".parse::<FrameShape>(), Err(Error::Config(_))));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ChatlensConfig::default();
        config.analysis.top_n = 4;
        config.output.dir = PathBuf::from("out");
        config.save(&path).expect("save");

        let loaded = ChatlensConfig::load(&path).expect("load");
        assert_eq!(loaded, config);
    }
}

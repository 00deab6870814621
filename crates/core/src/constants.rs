//! Analysis constants and configuration defaults.

/// Number of most active senders analyzed by default.
pub const DEFAULT_TOP_N: usize = 10;

/// Nicknames tracked alongside the top senders.
pub const DEFAULT_NICKNAMES: [&str; 7] = ["胡一刀", "TT", "骚哥", "鸭鸭", "氨基", "霍乱", "小安子"];

/// Keyword terms scored on the radar chart.
pub const DEFAULT_KEYWORDS: [&str; 7] = ["男神", "女神", "八卦", "红包", "Photo", "呲牙", "约"];

/// Radar axis labels, one per keyword term.
pub const DEFAULT_RADAR_LABELS: [&str; 7] = ["花痴", "色", "八卦", "红包", "真相党", "龅牙", "求约"];

/// Fewest radar axes a chart can be drawn with.
pub const MIN_RADAR_AXES: usize = 3;

/// Added to each column maximum before column normalization.
pub const COLUMN_EPSILON: f64 = 0.01;

/// Added to each row maximum before row normalization.
pub const ROW_EPSILON: f64 = 0.0001;

/// Zero-based column holding the message timestamp.
pub const DEFAULT_TIMESTAMP_COLUMN: usize = 0;

/// Zero-based column holding the sender identifier.
pub const DEFAULT_SENDER_COLUMN: usize = 1;

/// Zero-based column holding the message text.
pub const DEFAULT_MESSAGE_COLUMN: usize = 4;

/// Maximum number of words drawn into one word cloud.
pub const DEFAULT_MAX_WORDS: usize = 2000;

/// Weight written for every user dictionary entry.
pub const USER_DICT_WEIGHT: u32 = 1000;

/// Relationship matrix artifact.
pub const RELATIONSHIP_FILE: &str = "relationship.csv";

/// Hourly activity polar chart.
pub const CLOCK_CHART_FILE: &str = "clockheatmap.svg";

/// Radar chart grid.
pub const RADAR_CHART_FILE: &str = "attriplots.svg";

/// Directory for word clouds built from relationship counts.
pub const FOCUS_CLOUD_DIR: &str = "wordcloud";

/// Directory for word clouds built from tokenized message text.
pub const FULL_CLOUD_DIR: &str = "wordcloud2";

/// Tokenizer user dictionary.
pub const USER_DICT_FILE: &str = "userdict.dict";

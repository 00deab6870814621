use crate::error::{AnalysisError, AnalysisResult};
use chatlens_core::constants::USER_DICT_WEIGHT;
use jieba_rs::Jieba;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufReader, Cursor};
use std::path::Path;
use tracing::{debug, info};

/// ASCII letters, digits, space, and the punctuation (CJK included) removed
/// from watch terms before they become dictionary entries.
static DICT_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9\[\]`~!@#$\^&*=|{}':;,.<>/?\\%！？，。《》“” ]")
        .expect("dictionary noise pattern is valid")
});

/// The dictionary class plus parentheses and line breaks, removed from
/// message text before tokenization.
static TEXT_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9\[\]`~!@#$\^&*=|{}':;,.<>/?\\%()！？，。《》“” \r\n]")
        .expect("text noise pattern is valid")
});

/// Filler tokens dropped from full-text word clouds.
pub const STOP_TOKENS: [&str; 37] = [
    "一下", "了", "啊", "是", "的", "你", "我", "都", "他", "又", "一个", "比", "让", "子", "吧",
    "就", "个", "吗", "和", "有", "人", "到", "那", "里", "下", "从", "后", "呀", "只", "哦", "去",
    "也", "在", "还", "才", "再", "不",
];

/// Whether `token` is a filler token.
pub fn is_stop_token(token: &str) -> bool {
    STOP_TOKENS.contains(&token)
}

/// Remove ASCII alphanumerics, punctuation, spaces, and line breaks.
pub fn strip_noise(text: &str) -> String {
    TEXT_NOISE.replace_all(text, "").into_owned()
}

/// Splits text into tokens.
pub trait Tokenizer {
    /// Tokens of `text` in order.
    fn tokenize(&self, text: &str) -> AnalysisResult<Vec<String>>;
}

/// Chinese segmenter backed by jieba-rs.
pub struct JiebaTokenizer {
    jieba: Jieba,
}

impl JiebaTokenizer {
    /// Tokenizer with the bundled dictionary only.
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }

    /// Tokenizer with the bundled dictionary plus the user dictionary at
    /// `path`.
    pub fn with_user_dict(path: &Path) -> AnalysisResult<Self> {
        let mut tokenizer = Self::new();
        tokenizer.load_user_dict(path)?;
        Ok(tokenizer)
    }

    /// Merge a `word weight` per line dictionary. Blank lines are skipped.
    pub fn load_user_dict(&mut self, path: &Path) -> AnalysisResult<()> {
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        let mut reader = BufReader::new(Cursor::new(entries.join("\n")));
        self.jieba
            .load_dict(&mut reader)
            .map_err(|e| AnalysisError::Tokenization(e.to_string()))?;
        info!("loaded {} user dictionary entries from {}", entries.len(), path.display());
        Ok(())
    }
}

impl Default for JiebaTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for JiebaTokenizer {
    fn tokenize(&self, text: &str) -> AnalysisResult<Vec<String>> {
        Ok(self
            .jieba
            .cut(text, true)
            .into_iter()
            .map(String::from)
            .collect())
    }
}

/// Tokenizer user dictionary derived from the watch list.
///
/// One line per watch term, in order. Terms left empty after removing noise
/// characters become blank lines so line numbers still follow the watch list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDictionary {
    lines: Vec<Option<String>>,
}

impl UserDictionary {
    /// Build from watch terms.
    pub fn from_watch_list(terms: &[String]) -> Self {
        let lines = terms
            .iter()
            .map(|term| {
                let cleaned = DICT_NOISE.replace_all(term, "");
                if cleaned.is_empty() {
                    None
                } else {
                    Some(cleaned.into_owned())
                }
            })
            .collect();
        Self { lines }
    }

    /// Words that produced an entry.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().flatten().map(String::as_str)
    }

    /// Number of lines, blank ones included.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Dictionary file content.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                Some(word) => format!("{} {}\n", word, USER_DICT_WEIGHT),
                None => "\n".to_string(),
            })
            .collect()
    }

    /// Write the dictionary as UTF-8.
    pub fn save(&self, path: &Path) -> AnalysisResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.render())?;
        debug!("user dictionary written to {}", path.display());
        Ok(())
    }
}

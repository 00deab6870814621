//! Chat history analysis for chatlens.
//!
//! This crate loads exported message tables, builds the sender x watch term
//! relationship matrix, turns it into radar attribute scores, and prepares
//! hourly activity and word cloud data for rendering.

#![deny(missing_docs, unsafe_code)]

/// Message table loaders.
pub mod loaders;

/// Sender ranking and the relationship matrix.
pub mod relationship;

/// Radar attribute normalization.
pub mod attributes;

/// Hour-of-day activity.
pub mod activity;

/// Tokenization and the user dictionary.
pub mod nlp;

/// Word cloud term weights.
pub mod wordcloud;

/// Analyzer session sequencing every step.
pub mod session;

/// Error types for analysis operations.
pub mod error;

pub use activity::HourlyActivity;
pub use attributes::{AttributeNormalizer, RadarScores, ScoreMatrix};
pub use error::{AnalysisError, AnalysisResult};
pub use loaders::{CsvTableLoader, JsonTableLoader, LoaderRegistry, TableLoader};
pub use nlp::{JiebaTokenizer, Tokenizer, UserDictionary};
pub use relationship::{MatchPolicy, RelationshipMatrix, SenderRanking, WatchList};
pub use session::{Analyzer, RunSummary};

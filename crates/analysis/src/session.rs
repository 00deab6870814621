//! The analyzer session: holds the loaded table and derived state, and runs
//! each analysis step after checking that its inputs exist.

use crate::activity::HourlyActivity;
use crate::attributes::{AttributeNormalizer, RadarScores};
use crate::error::{AnalysisError, AnalysisResult};
use crate::loaders::LoaderRegistry;
use crate::nlp::{JiebaTokenizer, Tokenizer, UserDictionary};
use crate::relationship::{MatchPolicy, RelationshipMatrix, SenderRanking, WatchList};
use crate::wordcloud::{focus_frequencies, sender_frequencies};
use chatlens_core::{ChatlensConfig, MessageTable};
use chatlens_visual::{ChartRenderer, RadarPanel, SvgRenderer, WordCloudRenderer};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Relationship step output kept for later steps.
#[derive(Debug, Clone)]
struct RelationshipState {
    watch_list: WatchList,
    matrix: RelationshipMatrix,
    totals: Vec<usize>,
}

/// Artifacts written by [`Analyzer::run_all`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Messages analyzed.
    pub messages: usize,
    /// Busiest hour of day.
    pub peak_hour: Option<usize>,
    /// Every file written, in order.
    pub artifacts: Vec<PathBuf>,
}

/// Replace path separators so a sender name is a single file name component.
fn file_stem(sender: &str) -> String {
    sender
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect()
}

/// One analysis run over one message table.
pub struct Analyzer<R = SvgRenderer> {
    config: ChatlensConfig,
    registry: LoaderRegistry,
    renderer: R,
    policy: MatchPolicy,
    table: Option<MessageTable>,
    relationship: Option<RelationshipState>,
}

impl Analyzer<SvgRenderer> {
    /// Analyzer drawing SVG charts with the configured render settings.
    pub fn new(config: ChatlensConfig) -> AnalysisResult<Self> {
        let renderer = SvgRenderer::new(config.render.clone())?;
        Self::with_renderer(config, renderer)
    }
}

impl<R: ChartRenderer + WordCloudRenderer> Analyzer<R> {
    /// Analyzer with a custom renderer.
    pub fn with_renderer(config: ChatlensConfig, renderer: R) -> AnalysisResult<Self> {
        config.validate()?;
        let registry = LoaderRegistry::from_config(&config.input);
        Ok(Self {
            config,
            registry,
            renderer,
            policy: MatchPolicy::default(),
            table: None,
            relationship: None,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &ChatlensConfig {
        &self.config
    }

    /// The renderer charts are drawn with.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Loader registry, for registering extra formats.
    pub fn registry_mut(&mut self) -> &mut LoaderRegistry {
        &mut self.registry
    }

    fn output_path(&self, file: &str) -> PathBuf {
        self.config.output_path(file)
    }

    /// Load a message table from `path`, discarding any derived state.
    pub fn load(&mut self, path: &Path) -> AnalysisResult<&MessageTable> {
        let table = self.registry.load(path)?;
        info!(
            "{} messages from {} senders loaded from {}",
            table.len(),
            table.senders().len(),
            path.display()
        );
        Ok(self.set_table(table))
    }

    /// Use an already loaded table, discarding any derived state.
    pub fn set_table(&mut self, table: MessageTable) -> &MessageTable {
        self.relationship = None;
        self.table.insert(table)
    }

    /// The loaded table.
    pub fn table(&self) -> AnalysisResult<&MessageTable> {
        self.table
            .as_ref()
            .ok_or_else(|| AnalysisError::precondition("need to load the message table first"))
    }

    fn relationship_state(&self) -> AnalysisResult<&RelationshipState> {
        self.relationship
            .as_ref()
            .ok_or_else(|| AnalysisError::precondition("need to build the relationship matrix first"))
    }

    /// The relationship matrix, once built.
    pub fn relationship_matrix(&self) -> AnalysisResult<&RelationshipMatrix> {
        Ok(&self.relationship_state()?.matrix)
    }

    /// Count messages per hour and draw the clock chart.
    pub fn clock_heat(&self) -> AnalysisResult<HourlyActivity> {
        let table = self.table()?;
        if table.is_empty() {
            return Err(AnalysisError::precondition(
                "message table is empty; nothing to draw on the clock",
            ));
        }
        let activity = HourlyActivity::from_messages(table);
        info!("top hours by message count: {:?}", activity.top_hours(5));
        if let Some(hour) = activity.peak_hour() {
            info!("most messages are sent at {} o'clock", hour);
        }

        let path = self.output_path(&self.config.output.clock_file);
        self.renderer.render_clock(&activity.radii(), &path)?;
        Ok(activity)
    }

    /// Build the relationship matrix and persist it as CSV.
    pub fn relationship(&mut self) -> AnalysisResult<&RelationshipMatrix> {
        let analysis = &self.config.analysis;
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| AnalysisError::precondition("need to load the message table first"))?;

        let ranking = SenderRanking::from_messages(table);
        let senders = ranking.top_n(analysis.top_n)?;
        let watch_list = WatchList::new(&senders, &analysis.nicknames, &analysis.keywords);
        let matrix = RelationshipMatrix::build(table, &watch_list, self.policy);
        let totals = ranking.counts(&senders);

        let path = self.config.output_path(&self.config.output.relationship_file);
        matrix.save_csv(&path)?;

        let state = self.relationship.insert(RelationshipState {
            watch_list,
            matrix,
            totals,
        });
        Ok(&state.matrix)
    }

    /// Radar scores for every top sender.
    pub fn attributes(&self) -> AnalysisResult<RadarScores> {
        let state = self.relationship_state()?;
        AttributeNormalizer::from_config(&self.config.analysis)?.normalize(&state.matrix, &state.totals)
    }

    /// Compute radar scores and draw the radar grid.
    pub fn radar(&self) -> AnalysisResult<RadarScores> {
        let scores = self.attributes()?;
        let panels: Vec<RadarPanel> = scores
            .iter()
            .map(|(sender, values)| RadarPanel::single(sender, values.to_vec()))
            .collect();
        let path = self.output_path(&self.config.output.radar_file);
        self.renderer.render_radar(&panels, scores.labels(), &path)?;
        Ok(scores)
    }

    /// Write the tokenizer user dictionary built from the watch list.
    pub fn generate_dict(&self) -> AnalysisResult<PathBuf> {
        let state = self.relationship_state()?;
        let dict = UserDictionary::from_watch_list(state.watch_list.terms());
        let path = self.output_path(&self.config.output.user_dict_file);
        dict.save(&path)?;
        info!("user dictionary with {} words written", dict.words().count());
        Ok(path)
    }

    /// Draw one cloud per top sender from their relationship column.
    pub fn wordcloud_focus(&self) -> AnalysisResult<Vec<PathBuf>> {
        let state = self.relationship_state()?;
        let dir = self.output_path(&self.config.output.focus_cloud_dir);
        let mut written = Vec::new();
        for (sender, words) in focus_frequencies(&state.matrix, self.config.analysis.max_words) {
            let path = dir.join(format!("{}2.svg", file_stem(&sender)));
            self.renderer.render_cloud(&words, &path)?;
            written.push(path);
        }
        debug!("{} focus word clouds written", written.len());
        Ok(written)
    }

    /// Draw one cloud per top sender from their tokenized messages, loading
    /// the user dictionary when it exists.
    pub fn wordcloud_all(&self) -> AnalysisResult<Vec<PathBuf>> {
        self.relationship_state()?;
        let dict_path = self.output_path(&self.config.output.user_dict_file);
        let tokenizer = if dict_path.exists() {
            info!("detected user dictionary, loading {}", dict_path.display());
            JiebaTokenizer::with_user_dict(&dict_path)?
        } else {
            info!("no user dictionary found, using the default dictionary; generate one for better tokenization");
            JiebaTokenizer::new()
        };
        self.wordcloud_all_with(&tokenizer)
    }

    /// [`Analyzer::wordcloud_all`] with a caller-supplied tokenizer.
    pub fn wordcloud_all_with<T: Tokenizer + ?Sized>(&self, tokenizer: &T) -> AnalysisResult<Vec<PathBuf>> {
        let state = self.relationship_state()?;
        let table = self.table()?;
        let dir = self.output_path(&self.config.output.full_cloud_dir);
        let mut written = Vec::new();
        for sender in state.matrix.columns() {
            let words = sender_frequencies(table, sender, tokenizer, self.config.analysis.max_words)?;
            if words.is_empty() {
                warn!("no tokens left for {}, cloud will be empty", sender);
            }
            let path = dir.join(format!("{}.svg", file_stem(sender)));
            self.renderer.render_cloud(&words, &path)?;
            written.push(path);
        }
        debug!("{} full-text word clouds written", written.len());
        Ok(written)
    }

    /// Load, then run clock, relationship, radar, focus clouds, and the user
    /// dictionary in that order.
    pub fn run_all(&mut self, path: &Path) -> AnalysisResult<RunSummary> {
        let messages = self.load(path)?.len();
        let activity = self.clock_heat()?;
        self.relationship()?;
        self.radar()?;
        let clouds = self.wordcloud_focus()?;
        let dict = self.generate_dict()?;

        let output = &self.config.output;
        let mut artifacts = vec![
            self.output_path(&output.clock_file),
            self.output_path(&output.relationship_file),
            self.output_path(&output.radar_file),
        ];
        artifacts.extend(clouds);
        artifacts.push(dict);
        Ok(RunSummary {
            messages,
            peak_hour: activity.peak_hour(),
            artifacts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_names_become_safe_file_stems() {
        assert_eq!(file_stem("a/b\\c"), "a_b_c");
        assert_eq!(file_stem("男神"), "男神");
    }
}

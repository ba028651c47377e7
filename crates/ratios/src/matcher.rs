use bilan_core::{Column, Metric, MetricValues, MetricsByYear, Table, KEY_COLUMN};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::number::clean_number;
use crate::similarity::{GestaltRatio, Similarity};
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatioError {
    #[error("Column '{column}' not found in table. Available columns: {available:?}")]
    MissingColumn { column: String, available: Vec<String> },
    #[error("Match threshold must be in [0, 1), got {0}")]
    InvalidThreshold(f32),
}

/// How a row label that clears the threshold for several metrics is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// The first metric in vocabulary order that clears the threshold.
    #[default]
    FirstInVocabulary,
    /// The highest-scoring metric; ties go to vocabulary order.
    BestScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// A label matches when its similarity is strictly above this.
    pub threshold: f32,
    /// Column holding the row labels.
    pub key_column: String,
    pub strategy: MatchStrategy,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            key_column: KEY_COLUMN.to_string(),
            strategy: MatchStrategy::default(),
        }
    }
}

/// Maps table rows onto canonical metrics by fuzzy label matching.
pub struct MetricMatcher {
    config: MatcherConfig,
    vocabulary: Vocabulary,
    similarity: Box<dyn Similarity>,
}

impl Default for MetricMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default(), Vocabulary::default())
    }
}

impl MatcherConfig {
    /// A threshold of 1 or more, or NaN, would reject every label.
    pub fn validate(&self) -> Result<(), RatioError> {
        if !(0.0..1.0).contains(&self.threshold) {
            return Err(RatioError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

impl MetricMatcher {
    pub fn new(config: MatcherConfig, vocabulary: Vocabulary) -> Self {
        Self { config, vocabulary, similarity: Box::new(GestaltRatio) }
    }

    pub fn with_similarity(mut self, similarity: impl Similarity + 'static) -> Self {
        self.similarity = Box::new(similarity);
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// The canonical metric a row label stands for, if any.
    pub fn classify(&self, label: &str) -> Option<Metric> {
        let threshold = self.config.threshold;
        let scored = self
            .vocabulary
            .entries()
            .iter()
            .map(|e| (e.metric, self.similarity.score(label, &e.label)))
            .filter(|(_, score)| *score > threshold);

        match self.config.strategy {
            MatchStrategy::FirstInVocabulary => scored.map(|(m, _)| m).next(),
            MatchStrategy::BestScore => scored
                .fold(None, |best: Option<(Metric, f32)>, (m, s)| match best {
                    Some((_, bs)) if bs >= s => best,
                    _ => Some((m, s)),
                })
                .map(|(m, _)| m),
        }
    }

    /// Canonical metrics read from one year column. Rows are visited in table
    /// order and the first row to claim a metric keeps it.
    pub fn metrics_for_year(&self, table: &Table, year_column: &str) -> Result<MetricValues, RatioError> {
        let key = self.key_column(table)?;
        let year = resolve(table, year_column)?;
        let mut metrics = MetricValues::new();

        for row in &table.rows {
            let (Some(label), Some(cell)) = (row.cell(key), row.cell(year)) else {
                continue;
            };
            let Some(value) = clean_number(cell) else {
                warn!(row = label, cell, column = year_column, "cell is not a number, skipped");
                continue;
            };
            let Some(metric) = self.classify(label) else {
                continue;
            };
            if metrics.insert_if_absent(metric, value) {
                debug!(row = label, %metric, %value, "metric matched");
            } else {
                debug!(row = label, %metric, "metric already matched by an earlier row");
            }
        }

        Ok(metrics)
    }

    /// Metrics of the most recent year column. A table without year columns
    /// yields all-`None` metrics.
    pub fn metrics_for_latest_year(&self, table: &Table) -> Result<MetricValues, RatioError> {
        self.key_column(table)?;
        match table.years.first() {
            Some(year) => self.metrics_for_year(table, &year.to_string()),
            None => {
                warn!("no year columns in table");
                Ok(MetricValues::new())
            }
        }
    }

    pub fn metrics_by_year(&self, table: &Table) -> Result<MetricsByYear, RatioError> {
        table
            .years
            .iter()
            .map(|year| Ok((*year, self.metrics_for_year(table, &year.to_string())?)))
            .collect()
    }

    fn key_column(&self, table: &Table) -> Result<Column, RatioError> {
        resolve(table, &self.config.key_column)
    }
}

fn resolve(table: &Table, column: &str) -> Result<Column, RatioError> {
    table.column(column).ok_or_else(|| RatioError::MissingColumn {
        column: column.to_string(),
        available: table.column_names(),
    })
}

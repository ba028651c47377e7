use std::path::{Path, PathBuf};

use anyhow::Context;
use bilan_extract::ExtractionConfig;
use bilan_ratios::{MatcherConfig, MetricMatcher, RatioEngine, Vocabulary, VocabularyEntry};
use serde::Deserialize;

/// Optional TOML settings file:
///
/// ```toml
/// [extraction]
/// row_tolerance = 12.0
///
/// [matcher]
/// strategy = "best_score"
///
/// [[vocabulary]]
/// metric = "current_assets"
/// label = "total des actifs courants"
/// # ... one entry per metric
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub extraction: ExtractionConfig,
    pub matcher: MatcherConfig,
    pub vocabulary: Option<Vec<VocabularyEntry>>,
}

impl Settings {
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading settings {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing settings {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.extraction.validate()?;
        settings.matcher.validate()?;
        Ok(settings)
    }

    pub fn ratio_engine(&self) -> anyhow::Result<RatioEngine> {
        let vocabulary = match &self.vocabulary {
            Some(entries) => Vocabulary::new(entries.clone())?,
            None => Vocabulary::default(),
        };
        Ok(RatioEngine::new(MetricMatcher::new(self.matcher.clone(), vocabulary)))
    }
}

/// Expands directories into their `*.json` files sorted by name, so merged
/// output does not depend on directory listing order.
pub async fn collect_inputs(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        let meta = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        if !meta.is_dir() {
            inputs.push(path.clone());
            continue;
        }
        let mut found = Vec::new();
        let mut entries = tokio::fs::read_dir(path)
            .await
            .with_context(|| format!("listing {}", path.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            let p = entry.path();
            if p.extension().and_then(|e| e.to_str()) == Some("json") {
                found.push(p);
            }
        }
        found.sort();
        inputs.extend(found);
    }
    Ok(inputs)
}

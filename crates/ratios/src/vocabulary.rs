use bilan_core::Metric;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Metric '{0}' is listed more than once")]
    Duplicate(Metric),
    #[error("Metric '{0}' has no label")]
    Missing(Metric),
    #[error("Metric '{0}' has an empty label")]
    EmptyLabel(Metric),
}

/// A canonical metric and the statement label that identifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub metric: Metric,
    pub label: String,
}

/// The canonical line items, in matching priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    metrics: Vec<VocabularyEntry>,
}

/// French statement labels, as printed on Tunisian and French balance sheets.
const FRENCH_LABELS: [(Metric, &str); 13] = [
    (Metric::CurrentAssets, "total des actifs courants"),
    (Metric::CurrentLiabilities, "total des passifs courants"),
    (Metric::Inventory, "stocks"),
    (Metric::NetIncome, "résultat de l'exercice"),
    (Metric::Revenue, "revenus"),
    (Metric::TotalAssets, "total des actifs"),
    (Metric::Equity, "capitaux propres"),
    (Metric::TotalLiabilities, "total des passifs"),
    (Metric::ShareCapital, "capital social"),
    (Metric::Reserves, "réserves"),
    (Metric::RetainedEarnings, "résultat reporté"),
    (Metric::OtherEquity, "autres capitaux propres"),
    (Metric::TreasuryShares, "actions propres"),
];

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            metrics: FRENCH_LABELS
                .iter()
                .map(|(metric, label)| VocabularyEntry { metric: *metric, label: label.to_string() })
                .collect(),
        }
    }
}

impl Vocabulary {
    pub fn new(metrics: Vec<VocabularyEntry>) -> Result<Self, VocabularyError> {
        let vocabulary = Self { metrics };
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Loads a relabelled vocabulary:
    ///
    /// ```toml
    /// [[metrics]]
    /// metric = "current_assets"
    /// label = "total current assets"
    /// ```
    ///
    /// Every metric must appear exactly once; file order is priority order.
    pub fn from_toml(toml_content: &str) -> Result<Self, VocabularyError> {
        let vocabulary: Vocabulary = toml::from_str(toml_content)?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    fn validate(&self) -> Result<(), VocabularyError> {
        for (idx, entry) in self.metrics.iter().enumerate() {
            if entry.label.trim().is_empty() {
                return Err(VocabularyError::EmptyLabel(entry.metric));
            }
            if self.metrics[..idx].iter().any(|e| e.metric == entry.metric) {
                return Err(VocabularyError::Duplicate(entry.metric));
            }
        }
        match Metric::ALL
            .into_iter()
            .find(|m| !self.metrics.iter().any(|e| e.metric == *m))
        {
            Some(missing) => Err(VocabularyError::Missing(missing)),
            None => Ok(()),
        }
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.metrics
    }

    pub fn label(&self, metric: Metric) -> Option<&str> {
        self.metrics
            .iter()
            .find(|e| e.metric == metric)
            .map(|e| e.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toml_for(entries: &[(Metric, &str)]) -> String {
        entries
            .iter()
            .map(|(m, l)| format!("[[metrics]]\nmetric = \"{m}\"\nlabel = \"{l}\"\n"))
            .collect()
    }

    #[test]
    fn default_covers_every_metric_in_priority_order() {
        let v = Vocabulary::default();
        let order: Vec<_> = v.entries().iter().map(|e| e.metric).collect();
        assert_eq!(order, Metric::ALL.to_vec());
        assert_eq!(v.label(Metric::Equity), Some("capitaux propres"));
    }

    #[test]
    fn from_toml_relabels() {
        let mut entries: Vec<(Metric, &str)> = FRENCH_LABELS.to_vec();
        entries[2] = (Metric::Inventory, "inventories");
        let v = Vocabulary::from_toml(&toml_for(&entries)).unwrap();
        assert_eq!(v.label(Metric::Inventory), Some("inventories"));
    }

    #[test]
    fn from_toml_rejects_missing_metric() {
        let entries = &FRENCH_LABELS[..12];
        let err = Vocabulary::from_toml(&toml_for(entries)).unwrap_err();
        assert!(matches!(err, VocabularyError::Missing(Metric::TreasuryShares)));
    }

    #[test]
    fn from_toml_rejects_duplicate_metric() {
        let mut entries: Vec<(Metric, &str)> = FRENCH_LABELS.to_vec();
        entries.push((Metric::Equity, "fonds propres"));
        let err = Vocabulary::from_toml(&toml_for(&entries)).unwrap_err();
        assert!(matches!(err, VocabularyError::Duplicate(Metric::Equity)));
    }

    #[test]
    fn from_toml_rejects_unknown_metric() {
        let err = Vocabulary::from_toml("[[metrics]]\nmetric = \"ebitda\"\nlabel = \"x\"\n").unwrap_err();
        assert!(matches!(err, VocabularyError::Toml(_)));
    }

    #[test]
    fn new_rejects_empty_label() {
        let mut entries = Vocabulary::default().entries().to_vec();
        entries[0].label = "  ".into();
        assert!(matches!(
            Vocabulary::new(entries),
            Err(VocabularyError::EmptyLabel(Metric::CurrentAssets))
        ));
    }
}

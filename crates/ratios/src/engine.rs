use bilan_core::{Metric, MetricValues, Ratio, RatioValues, RatiosByYear, Table};
use tracing::{debug, error, warn};

use crate::matcher::{MetricMatcher, RatioError};

/// `(numerator - less) / denominator`, defined only when every input is
/// present, the denominator is non-zero and the arithmetic stays in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioFormula {
    pub ratio: Ratio,
    pub numerator: Metric,
    pub less: Option<Metric>,
    pub denominator: Metric,
}

const fn formula(ratio: Ratio, numerator: Metric, denominator: Metric) -> RatioFormula {
    RatioFormula { ratio, numerator, less: None, denominator }
}

pub const RATIO_FORMULAS: [RatioFormula; 7] = [
    formula(Ratio::CurrentRatio, Metric::CurrentAssets, Metric::CurrentLiabilities),
    RatioFormula {
        ratio: Ratio::QuickRatio,
        numerator: Metric::CurrentAssets,
        less: Some(Metric::Inventory),
        denominator: Metric::CurrentLiabilities,
    },
    formula(Ratio::NetMargin, Metric::NetIncome, Metric::Revenue),
    formula(Ratio::ReturnOnAssets, Metric::NetIncome, Metric::TotalAssets),
    formula(Ratio::ReturnOnEquity, Metric::NetIncome, Metric::Equity),
    formula(Ratio::DebtRatio, Metric::TotalLiabilities, Metric::Equity),
    formula(Ratio::SolvencyRatio, Metric::Equity, Metric::TotalAssets),
];

impl RatioFormula {
    pub fn inputs(&self) -> impl Iterator<Item = Metric> {
        [Some(self.numerator), self.less, Some(self.denominator)]
            .into_iter()
            .flatten()
    }

    pub fn evaluate(&self, metrics: &MetricValues) -> Option<f64> {
        let mut numerator = metrics.get(self.numerator)?;
        if let Some(less) = self.less {
            numerator = numerator.checked_sub(metrics.get(less)?)?;
        }
        numerator.checked_ratio(metrics.get(self.denominator)?)
    }
}

/// Every ratio whose inputs are available. Missing ratios are left out.
pub fn compute_ratios(metrics: &MetricValues) -> RatioValues {
    RATIO_FORMULAS
        .iter()
        .filter_map(|f| f.evaluate(metrics).map(|v| (f.ratio, v)))
        .collect()
}

/// Table in, ratios per year out.
pub struct RatioEngine {
    matcher: MetricMatcher,
}

impl Default for RatioEngine {
    fn default() -> Self {
        Self::new(MetricMatcher::default())
    }
}

impl RatioEngine {
    pub fn new(matcher: MetricMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &MetricMatcher {
        &self.matcher
    }

    pub fn ratios_for_year(&self, table: &Table, year_column: &str) -> Result<RatioValues, RatioError> {
        let metrics = self.matcher.metrics_for_year(table, year_column)?;
        let ratios = compute_ratios(&metrics);
        debug!(
            year = year_column,
            metrics = metrics.matched(),
            ratios = ratios.len(),
            "ratios computed"
        );
        Ok(ratios)
    }

    /// Ratios for every year column. An empty or malformed table yields an
    /// empty map; the cause is logged.
    pub fn ratios_by_year(&self, table: &Table) -> RatiosByYear {
        if table.is_empty() {
            warn!("empty table, no ratios");
            return RatiosByYear::new();
        }
        debug!(columns = ?table.column_names(), rows = table.rows.len(), "computing ratios");

        match self.matcher.metrics_by_year(table) {
            Ok(by_year) => {
                if by_year.is_empty() {
                    warn!("no year columns in table, no ratios");
                }
                by_year
                    .into_iter()
                    .map(|(year, metrics)| (year, compute_ratios(&metrics)))
                    .collect()
            }
            Err(e) => {
                error!(error = %e, "cannot compute ratios");
                RatiosByYear::new()
            }
        }
    }
}

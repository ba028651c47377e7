use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::amount::Amount;
use crate::period::FiscalYear;

/// The canonical balance-sheet line items ratios are computed from.
/// Declaration order is matching priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CurrentAssets,
    CurrentLiabilities,
    Inventory,
    NetIncome,
    Revenue,
    TotalAssets,
    Equity,
    TotalLiabilities,
    ShareCapital,
    Reserves,
    RetainedEarnings,
    OtherEquity,
    TreasuryShares,
}

impl Metric {
    pub const ALL: [Metric; 13] = [
        Metric::CurrentAssets,
        Metric::CurrentLiabilities,
        Metric::Inventory,
        Metric::NetIncome,
        Metric::Revenue,
        Metric::TotalAssets,
        Metric::Equity,
        Metric::TotalLiabilities,
        Metric::ShareCapital,
        Metric::Reserves,
        Metric::RetainedEarnings,
        Metric::OtherEquity,
        Metric::TreasuryShares,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::CurrentAssets => "current_assets",
            Metric::CurrentLiabilities => "current_liabilities",
            Metric::Inventory => "inventory",
            Metric::NetIncome => "net_income",
            Metric::Revenue => "revenue",
            Metric::TotalAssets => "total_assets",
            Metric::Equity => "equity",
            Metric::TotalLiabilities => "total_liabilities",
            Metric::ShareCapital => "share_capital",
            Metric::Reserves => "reserves",
            Metric::RetainedEarnings => "retained_earnings",
            Metric::OtherEquity => "other_equity",
            Metric::TreasuryShares => "treasury_shares",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown metric: '{s}'"))
    }
}

/// One year's worth of canonical metrics. Every metric is always present as
/// a key; unmatched ones hold `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValues(BTreeMap<Metric, Option<Amount>>);

impl Default for MetricValues {
    fn default() -> Self {
        MetricValues(Metric::ALL.into_iter().map(|m| (m, None)).collect())
    }
}

impl MetricValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: Metric) -> Option<Amount> {
        self.0.get(&metric).copied().flatten()
    }

    /// Records `value` unless the metric already has one. Returns whether it
    /// was recorded.
    pub fn insert_if_absent(&mut self, metric: Metric, value: Amount) -> bool {
        let slot = self.0.entry(metric).or_insert(None);
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Option<Amount>)> + '_ {
        self.0.iter().map(|(m, v)| (*m, *v))
    }

    pub fn matched(&self) -> usize {
        self.0.values().filter(|v| v.is_some()).count()
    }
}

pub type MetricsByYear = BTreeMap<FiscalYear, MetricValues>;

/// Solvency and liquidity indicators derived from [`Metric`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ratio {
    CurrentRatio,
    QuickRatio,
    NetMargin,
    ReturnOnAssets,
    ReturnOnEquity,
    DebtRatio,
    SolvencyRatio,
}

impl Ratio {
    pub const ALL: [Ratio; 7] = [
        Ratio::CurrentRatio,
        Ratio::QuickRatio,
        Ratio::NetMargin,
        Ratio::ReturnOnAssets,
        Ratio::ReturnOnEquity,
        Ratio::DebtRatio,
        Ratio::SolvencyRatio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Ratio::CurrentRatio => "current_ratio",
            Ratio::QuickRatio => "quick_ratio",
            Ratio::NetMargin => "net_margin",
            Ratio::ReturnOnAssets => "return_on_assets",
            Ratio::ReturnOnEquity => "return_on_equity",
            Ratio::DebtRatio => "debt_ratio",
            Ratio::SolvencyRatio => "solvency_ratio",
        }
    }

    /// Label shown on the French dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Ratio::CurrentRatio => "Ratio liquidité générale",
            Ratio::QuickRatio => "Ratio de liquidité immédiate",
            Ratio::NetMargin => "Marge nette",
            Ratio::ReturnOnAssets => "Rentabilité économique",
            Ratio::ReturnOnEquity => "Rentabilité financière",
            Ratio::DebtRatio => "Ratio d'endettement",
            Ratio::SolvencyRatio => "Ratio de solvabilité",
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type RatioValues = BTreeMap<Ratio, f64>;
pub type RatiosByYear = BTreeMap<FiscalYear, RatioValues>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_roundtrip() {
        for m in Metric::ALL {
            assert_eq!(m.as_str().parse::<Metric>().unwrap(), m);
        }
        assert!("ebitda".parse::<Metric>().is_err());
    }

    #[test]
    fn metric_values_start_all_none() {
        let v = MetricValues::new();
        assert_eq!(v.iter().count(), 13);
        assert_eq!(v.matched(), 0);
    }

    #[test]
    fn insert_if_absent_keeps_first() {
        let mut v = MetricValues::new();
        assert!(v.insert_if_absent(Metric::Equity, Amount::from(100)));
        assert!(!v.insert_if_absent(Metric::Equity, Amount::from(999)));
        assert_eq!(v.get(Metric::Equity), Some(Amount::from(100)));
    }

    #[test]
    fn metric_values_serialize_with_nulls() {
        let mut v = MetricValues::new();
        v.insert_if_absent(Metric::Inventory, Amount::from(5));
        let json = serde_json::to_value(&v).unwrap();
        assert!(json["current_assets"].is_null());
        assert!(!json["inventory"].is_null());
    }

    #[test]
    fn ratio_serde_name_matches_as_str() {
        for r in Ratio::ALL {
            let json = serde_json::to_string(&r).unwrap();
            assert_eq!(json, format!("\"{}\"", r.as_str()));
        }
    }
}

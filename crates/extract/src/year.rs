use std::sync::OnceLock;

use bilan_core::{FiscalYear, Token};
use regex::Regex;
use tracing::debug;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Matched against lower-cased text with dashes folded to '-'.
re!(re_year_end_au,
    r"au\s*31[^\d]?(?:12|déc)\.?[^\d]?(20[2-3]\d)");
re!(re_year_end,
    r"31[^\d]?(?:12|déc)\.?[^\d]?(20[2-3]\d)");
re!(re_year_end_short,
    r"31[^\d]?(?:12|déc)\.?[^\d]?(\d{2})\b");
re!(re_bare_year,
    r"\b(20[2-3]\d)\b");
re!(re_flagged_year,
    r"\b(20[2-3]\d)[rp]?\b");

/// Tried in order; the first pattern that matches decides.
fn year_patterns() -> [(&'static str, &'static Regex); 5] {
    [
        ("au 31/12/yyyy", re_year_end_au()),
        ("31/12/yyyy", re_year_end()),
        ("31/12/yy", re_year_end_short()),
        ("yyyy", re_bare_year()),
        ("yyyy[r|p]", re_flagged_year()),
    ]
}

/// Reads a fiscal year out of a column header such as "Au 31/12/2023",
/// "31-déc.-22", "2024" or "2023R".
pub fn extract_year(text: &str) -> Option<FiscalYear> {
    let text = text.to_lowercase().replace(['–', '—'], "-");

    for (pattern, re) in year_patterns() {
        let Some(caps) = re.captures(&text) else {
            continue;
        };
        let digits = caps.get(1)?.as_str();
        let year = if digits.len() == 2 {
            FiscalYear::from_short(digits.parse().ok()?)
        } else {
            digits.parse().ok()?
        };
        debug!(text = %text, pattern, %year, "year recognised");
        return Some(year);
    }

    None
}

/// Fiscal year → x position of its column header, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearAnchors {
    anchors: Vec<(FiscalYear, i32)>,
}

impl YearAnchors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the anchor unless the year is already anchored.
    pub fn insert_if_absent(&mut self, year: FiscalYear, x: i32) -> bool {
        if self.get(year).is_some() {
            return false;
        }
        self.anchors.push((year, x));
        true
    }

    pub fn get(&self, year: FiscalYear) -> Option<i32> {
        self.anchors.iter().find(|(y, _)| *y == year).map(|(_, x)| *x)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FiscalYear, i32)> + '_ {
        self.anchors.iter().copied()
    }

    pub fn years(&self) -> impl Iterator<Item = FiscalYear> + '_ {
        self.anchors.iter().map(|(y, _)| *y)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

/// Anchors every recognised year at the left edge of the first header that
/// names it. Headers are visited top to bottom, then left to right; a later
/// header naming the same year never moves the anchor.
pub fn locate_years(year_tokens: &[Token]) -> YearAnchors {
    let mut ordered: Vec<&Token> = year_tokens.iter().collect();
    ordered.sort_by_key(|t| (t.bbox.top(), t.bbox.left()));

    ordered.into_iter().fold(YearAnchors::new(), |mut anchors, token| {
        if let Some(year) = extract_year(&token.text) {
            if anchors.insert_if_absent(year, token.bbox.left()) {
                debug!(%year, x = token.bbox.left(), "year anchored");
            }
        }
        anchors
    })
}

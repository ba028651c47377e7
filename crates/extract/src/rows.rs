use bilan_core::{FiscalYear, Row, Token};
use thiserror::Error;
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::normalize::NormalizedTokens;
use crate::year::YearAnchors;

/// Cell text used when no value lines up with a (row, year) pair.
pub const UNREPORTED: &str = "0";

#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("Token '{text}' has an inverted bounding box {bbox:?}")]
    InvertedBox { text: String, bbox: [i32; 4] },
}

/// Assembles one [`Row`] per row-label token by snapping value tokens onto
/// the label's line and the year columns.
#[derive(Debug, Clone, Default)]
pub struct RowBuilder {
    config: ExtractionConfig,
}

impl RowBuilder {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Rows top to bottom. Every anchored year gets a cell; unmatched cells
    /// hold [`UNREPORTED`]. With no anchors the rows carry no cells at all.
    pub fn build(&self, tokens: &NormalizedTokens, anchors: &YearAnchors) -> Result<Vec<Row>, RowError> {
        for token in tokens.keys.iter().chain(&tokens.values) {
            if token.bbox.is_inverted() {
                return Err(RowError::InvertedBox {
                    text: token.text.clone(),
                    bbox: token.bbox.into(),
                });
            }
        }

        let mut keys: Vec<&Token> = tokens.keys.iter().collect();
        keys.sort_by_key(|t| t.bbox.top());

        let rows = keys
            .into_iter()
            .map(|key| self.build_row(key, tokens, anchors))
            .collect();
        Ok(rows)
    }

    fn build_row(&self, key: &Token, tokens: &NormalizedTokens, anchors: &YearAnchors) -> Row {
        let mut row = Row::new(key.text.clone());
        row.note = self.find_note(key, &tokens.names);

        for value in tokens.values.iter().filter(|v| self.same_line(key, v)) {
            if let Some(year) = self.column_of(value, anchors) {
                row.values.insert(year, clean_cell_text(&value.text));
            }
        }

        for year in anchors.years() {
            row.values.entry(year).or_insert_with(|| UNREPORTED.to_string());
        }

        debug!(key = %row.key, cells = row.values.len(), note = ?row.note, "row assembled");
        row
    }

    fn same_line(&self, key: &Token, other: &Token) -> bool {
        within(key.bbox.top(), other.bbox.top(), self.config.row_tolerance)
    }

    /// First anchored year whose header sits close enough to the value's left edge.
    fn column_of(&self, value: &Token, anchors: &YearAnchors) -> Option<FiscalYear> {
        anchors
            .iter()
            .find(|(_, x)| within(value.bbox.left(), *x, self.config.column_tolerance))
            .map(|(year, _)| year)
    }

    fn find_note(&self, key: &Token, names: &[Token]) -> Option<String> {
        names
            .iter()
            .filter(|n| self.same_line(key, n))
            .find(|n| {
                let text = n.text.to_lowercase();
                self.config.note_markers.iter().any(|m| text.contains(&m.to_lowercase()))
            })
            .map(|n| n.text.clone())
    }
}

/// Coordinates come straight from classifier JSON, so the gap is taken in
/// `i64` to survive boxes at opposite ends of the `i32` range.
fn within(a: i32, b: i32, tolerance: f32) -> bool {
    ((i64::from(a) - i64::from(b)).abs() as f32) < tolerance
}

/// Strips digit grouping, turns a decimal comma into a point and rewrites an
/// accounting negative "(123)" as "-123". The result is still text.
pub fn clean_cell_text(text: &str) -> String {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match compact.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => format!("-{inner}"),
        None => compact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::year::locate_years;
    use bilan_core::{BoundingBox, Label};

    fn tok(text: &str, label: Label, x: i32, y: i32) -> Token {
        Token::new(text, label, BoundingBox::new(x, y, x + 40, y + 12))
    }

    fn year(n: u16) -> FiscalYear {
        FiscalYear::new(n)
    }

    fn build(tokens: &[Token]) -> Vec<Row> {
        let normalized = normalize(tokens);
        let anchors = locate_years(&normalized.years);
        RowBuilder::default().build(&normalized, &anchors).unwrap()
    }

    #[test]
    fn reconstructs_two_year_row() {
        let rows = build(&[
            tok("Total des actifs courants", Label::Key, 10, 100),
            tok("2023", Label::Year, 300, 20),
            tok("2022", Label::Year, 200, 20),
            tok("1 000", Label::Value, 300, 100),
            tok("(200)", Label::Value, 200, 100),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "Total des actifs courants");
        assert_eq!(rows[0].value(year(2023)), Some("1000"));
        assert_eq!(rows[0].value(year(2022)), Some("-200"));
    }

    #[test]
    fn row_band_is_strict() {
        let rows = build(&[
            tok("Stocks", Label::Key, 10, 100),
            tok("Créances", Label::Key, 10, 200),
            tok("Dettes", Label::Key, 10, 300),
            tok("2023", Label::Year, 300, 20),
            tok("9", Label::Value, 300, 109),
            tok("10", Label::Value, 300, 210),
            tok("11", Label::Value, 300, 311),
        ]);
        assert_eq!(rows[0].value(year(2023)), Some("9"));
        assert_eq!(rows[1].value(year(2023)), Some(UNREPORTED));
        assert_eq!(rows[2].value(year(2023)), Some(UNREPORTED));
    }

    #[test]
    fn column_band_is_strict() {
        let rows = build(&[
            tok("Stocks", Label::Key, 10, 100),
            tok("Créances", Label::Key, 10, 200),
            tok("2023", Label::Year, 300, 20),
            tok("49", Label::Value, 349, 100),
            tok("50", Label::Value, 350, 200),
        ]);
        assert_eq!(rows[0].value(year(2023)), Some("49"));
        assert_eq!(rows[1].value(year(2023)), Some(UNREPORTED));
    }

    #[test]
    fn unmatched_cells_default_to_zero() {
        let rows = build(&[
            tok("Stocks", Label::Key, 10, 100),
            tok("Capital social", Label::Key, 10, 140),
            tok("2024", Label::Year, 400, 20),
            tok("2023", Label::Year, 300, 20),
            tok("2022", Label::Year, 200, 20),
            tok("12", Label::Value, 300, 100),
        ]);
        for row in &rows {
            assert_eq!(row.values.len(), 3);
            for (y, v) in &row.values {
                if !(row.key == "Stocks" && *y == year(2023)) {
                    assert_eq!(v, UNREPORTED, "{} / {y}", row.key);
                }
            }
        }
    }

    #[test]
    fn no_years_means_no_cells() {
        let rows = build(&[
            tok("Stocks", Label::Key, 10, 100),
            tok("12", Label::Value, 300, 100),
        ]);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].values.is_empty());
    }

    #[test]
    fn keys_sorted_top_to_bottom() {
        let rows = build(&[
            tok("Dettes", Label::Key, 10, 300),
            tok("Stocks", Label::Key, 10, 100),
            tok("Créances", Label::Key, 10, 200),
        ]);
        let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Stocks", "Créances", "Dettes"]);
    }

    #[test]
    fn value_goes_to_first_qualifying_year() {
        // Both headers are within 50px of the value; the first anchored wins.
        let rows = build(&[
            tok("Stocks", Label::Key, 10, 100),
            tok("2023", Label::Year, 300, 20),
            tok("2022", Label::Year, 340, 20),
            tok("7", Label::Value, 320, 100),
        ]);
        assert_eq!(rows[0].value(year(2023)), Some("7"));
        assert_eq!(rows[0].value(year(2022)), Some(UNREPORTED));
    }

    #[test]
    fn note_reference_attached() {
        let rows = build(&[
            tok("Capitaux propres", Label::Key, 10, 100),
            tok("Stocks", Label::Key, 10, 200),
            tok("CP-3", Label::Name, 150, 104),
            tok("Annexe", Label::Name, 150, 200),
        ]);
        assert_eq!(rows[0].note.as_deref(), Some("CP-3"));
        assert_eq!(rows[1].note, None);
    }

    #[test]
    fn inverted_box_is_rejected() {
        let mut bad = tok("Stocks", Label::Key, 10, 100);
        bad.bbox = BoundingBox::new(50, 100, 10, 90);
        let normalized = normalize(&[bad]);
        let err = RowBuilder::default()
            .build(&normalized, &YearAnchors::new())
            .unwrap_err();
        assert!(matches!(err, RowError::InvertedBox { .. }));
    }

    #[test]
    fn far_apart_boxes_do_not_overflow() {
        let rows = build(&[
            tok("Stocks", Label::Key, 10, -2_000_000_000),
            tok("2023", Label::Year, 300, 20),
            tok("9", Label::Value, 300, 2_000_000_000),
            tok("8", Label::Value, i32::MIN, -2_000_000_000),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value(year(2023)), Some(UNREPORTED));
    }

    #[test]
    fn clean_cell_text_normalizes_locale() {
        assert_eq!(clean_cell_text("1 234,56"), "1234.56");
        assert_eq!(clean_cell_text("(1 234,56)"), "-1234.56");
        assert_eq!(clean_cell_text("12\u{a0}500"), "12500");
        assert_eq!(clean_cell_text("-"), "-");
    }
}

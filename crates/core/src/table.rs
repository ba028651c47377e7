use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::period::FiscalYear;

/// Name of the row-label column.
pub const KEY_COLUMN: &str = "key";
/// Name of the provenance column present once tables from several documents
/// are merged.
pub const SOURCE_COLUMN: &str = "source";

/// One line item with one raw cell per fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub key: String,
    /// Cleaned cell text per year. Numeric parsing happens later.
    pub values: BTreeMap<FiscalYear, String>,
    /// Note reference printed on the same line ("CP-3"), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Identifier of the document the row came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Row {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: BTreeMap::new(),
            note: None,
            source: None,
        }
    }

    pub fn value(&self, year: FiscalYear) -> Option<&str> {
        self.values.get(&year).map(String::as_str)
    }

    pub fn cell(&self, column: Column) -> Option<&str> {
        match column {
            Column::Key => Some(&self.key),
            Column::Year(y) => self.value(y),
            Column::Source => self.source.as_deref(),
        }
    }
}

/// A resolved column of a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Key,
    Year(FiscalYear),
    Source,
}

/// Rows in document order plus the year columns, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub years: Vec<FiscalYear>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(years: impl IntoIterator<Item = FiscalYear>) -> Self {
        let mut table = Table { years: years.into_iter().collect(), rows: Vec::new() };
        table.sort_years();
        table
    }

    fn sort_years(&mut self) {
        self.years.sort_by(|a, b| b.cmp(a));
        self.years.dedup();
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_source(&self) -> bool {
        self.rows.iter().any(|r| r.source.is_some())
    }

    /// Tags every row with the document it came from.
    pub fn with_source(mut self, source: &str) -> Self {
        for row in &mut self.rows {
            row.source = Some(source.to_string());
        }
        self
    }

    /// Appends `other` below this table. Year columns become the union; rows
    /// keep only the cells their own document reported.
    pub fn append(&mut self, other: Table) {
        self.years.extend(other.years);
        self.sort_years();
        self.rows.extend(other.rows);
    }

    /// Column names in display order: key, years (descending), then source.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.years.len() + 2);
        names.push(KEY_COLUMN.to_string());
        names.extend(self.years.iter().map(|y| y.to_string()));
        if self.has_source() {
            names.push(SOURCE_COLUMN.to_string());
        }
        names
    }

    pub fn column(&self, name: &str) -> Option<Column> {
        match name {
            KEY_COLUMN => Some(Column::Key),
            SOURCE_COLUMN if self.has_source() => Some(Column::Source),
            other => {
                let year: FiscalYear = other.parse().ok()?;
                self.years.contains(&year).then_some(Column::Year(year))
            }
        }
    }

    /// One JSON object per row, keyed by column name.
    pub fn to_records(&self) -> Vec<Value> {
        let with_source = self.has_source();
        self.rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                record.insert(KEY_COLUMN.to_string(), Value::String(row.key.clone()));
                for year in &self.years {
                    let cell = row.value(*year).map_or(Value::Null, |v| Value::String(v.to_string()));
                    record.insert(year.to_string(), cell);
                }
                if with_source {
                    let src = row.source.clone().map_or(Value::Null, Value::String);
                    record.insert(SOURCE_COLUMN.to_string(), src);
                }
                Value::Object(record)
            })
            .collect()
    }
}

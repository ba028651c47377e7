use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Not a four-digit year: '{0}'")]
pub struct YearError(pub String);

/// A fiscal year as it heads a balance-sheet column. Serialized as the bare
/// four-digit string ("2023") because that is the column name downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FiscalYear(pub u16);

impl FiscalYear {
    pub fn new(year: u16) -> Self {
        FiscalYear(year)
    }

    pub fn year(self) -> u16 {
        self.0
    }

    /// Expands a two-digit short form ("23") into the 2000s.
    pub fn from_short(yy: u8) -> Self {
        FiscalYear(2000 + u16::from(yy % 100))
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for FiscalYear {
    type Err = YearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(YearError(s.to_string()));
        }
        s.parse::<u16>()
            .map(FiscalYear)
            .map_err(|_| YearError(s.to_string()))
    }
}

impl TryFrom<String> for FiscalYear {
    type Error = YearError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FiscalYear> for String {
    fn from(y: FiscalYear) -> Self {
        y.to_string()
    }
}

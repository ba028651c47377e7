pub mod amount;
pub mod metric;
pub mod period;
pub mod table;
pub mod token;

pub use amount::Amount;
pub use metric::{Metric, MetricValues, MetricsByYear, Ratio, RatioValues, RatiosByYear};
pub use period::{FiscalYear, YearError};
pub use table::{Column, Row, Table, KEY_COLUMN, SOURCE_COLUMN};
pub use token::{BoundingBox, Label, Token};

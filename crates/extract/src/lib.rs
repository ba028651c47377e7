pub mod config;
pub mod normalize;
pub mod pipeline;
pub mod rows;
pub mod source;
pub mod types;
pub mod year;

pub use config::{ConfigError, ExtractionConfig};
pub use normalize::{normalize, NormalizedTokens};
pub use pipeline::{BatchDriver, BatchReport, DocumentFailure, DocumentPipeline, PipelineError};
pub use rows::{clean_cell_text, RowBuilder, RowError, UNREPORTED};
pub use source::{parse_page, SourceError, StaticTokens, TokenSource};
pub use types::{unnormalize_box, ClassifiedPage};
pub use year::{extract_year, locate_years, YearAnchors};

pub mod engine;
pub mod matcher;
pub mod number;
pub mod similarity;
pub(crate) mod util;
pub mod vocabulary;

pub use engine::{compute_ratios, RatioEngine, RatioFormula, RATIO_FORMULAS};
pub use matcher::{MatchStrategy, MatcherConfig, MetricMatcher, RatioError};
pub use number::clean_number;
pub use similarity::{GestaltRatio, NormalizedLevenshtein, Similarity};
pub use vocabulary::{Vocabulary, VocabularyEntry, VocabularyError};

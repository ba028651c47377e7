use std::collections::HashMap;

use thiserror::Error;

use crate::types::ClassifiedPage;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("No classified tokens for document '{0}'")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed token JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Abstraction over the OCR + layout classifier stage.
/// Implementations hand back the classified tokens of one table crop.
pub trait TokenSource: Send + Sync {
    fn load(&self, document: &str) -> Result<ClassifiedPage, SourceError>;
}

/// Parses the classifier's JSON output and brings its boxes to pixel space.
pub fn parse_page(bytes: &[u8]) -> Result<ClassifiedPage, SourceError> {
    let page: ClassifiedPage = serde_json::from_slice(bytes)?;
    Ok(page.into_pixel_space())
}

// ── In-memory source (always available, used for tests) ──────────────────────

/// Serves preset pages by document id, without any model behind it.
#[derive(Debug, Default)]
pub struct StaticTokens {
    pages: HashMap<String, ClassifiedPage>,
}

impl StaticTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, document: impl Into<String>, page: ClassifiedPage) -> Self {
        self.pages.insert(document.into(), page);
        self
    }
}

impl TokenSource for StaticTokens {
    fn load(&self, document: &str) -> Result<ClassifiedPage, SourceError> {
        self.pages
            .get(document)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(document.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilan_core::{BoundingBox, Label, Token};

    #[test]
    fn static_source_returns_preset_page() {
        let page = ClassifiedPage::new(
            800,
            600,
            vec![Token::new("Stocks", Label::Key, BoundingBox::new(1, 2, 3, 4))],
        );
        let src = StaticTokens::new().with_page("p1", page);
        assert_eq!(src.load("p1").unwrap().tokens.len(), 1);
    }

    #[test]
    fn static_source_unknown_document() {
        let err = StaticTokens::new().load("missing").unwrap_err();
        assert!(matches!(err, SourceError::NotFound(d) if d == "missing"));
    }

    #[test]
    fn parse_page_unnormalizes() {
        let json = br#"{"width": 1000, "height": 500, "normalized": true,
            "tokens": [{"text": "2023", "label": "YEAR", "box": [300, 40, 340, 60]}]}"#;
        let page = parse_page(json).unwrap();
        assert_eq!(page.tokens[0].bbox, BoundingBox::new(300, 20, 340, 30));
    }

    #[test]
    fn parse_page_rejects_bad_json() {
        assert!(matches!(parse_page(b"{not json"), Err(SourceError::Json(_))));
    }
}

use bilan_core::{BoundingBox, Token};
use serde::{Deserialize, Serialize};

/// Coordinate scale used by the layout classifier for normalized boxes.
const NORMALIZED_SCALE: f64 = 1000.0;

/// The classifier's output for one table crop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifiedPage {
    /// Page size in pixels. Informational: boxes are read as given.
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// `true` when boxes are on the classifier's 0..1000 grid rather than
    /// in pixels.
    #[serde(default)]
    pub normalized: bool,
    pub tokens: Vec<Token>,
}

impl ClassifiedPage {
    pub fn new(width: u32, height: u32, tokens: Vec<Token>) -> Self {
        Self { width, height, normalized: false, tokens }
    }

    /// Converts normalized boxes to pixel space; a no-op for pixel pages.
    pub fn into_pixel_space(mut self) -> Self {
        if self.normalized {
            for token in &mut self.tokens {
                token.bbox = unnormalize_box(token.bbox, self.width, self.height);
            }
            self.normalized = false;
        }
        self
    }
}

/// Scales a 0..1000 box to a `width` x `height` page, truncating toward zero.
pub fn unnormalize_box(bbox: BoundingBox, width: u32, height: u32) -> BoundingBox {
    let sx = |v: i32| (f64::from(v) / NORMALIZED_SCALE * f64::from(width)) as i32;
    let sy = |v: i32| (f64::from(v) / NORMALIZED_SCALE * f64::from(height)) as i32;
    BoundingBox::new(sx(bbox.x_min), sy(bbox.y_min), sx(bbox.x_max), sy(bbox.y_max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilan_core::Label;

    #[test]
    fn unnormalize_scales_and_truncates() {
        let b = unnormalize_box(BoundingBox::new(500, 250, 1000, 333), 800, 600);
        assert_eq!(b, BoundingBox::new(400, 150, 800, 199));
    }

    #[test]
    fn pixel_pages_are_untouched() {
        let tokens = vec![Token::new("2023", Label::Year, BoundingBox::new(1, 2, 3, 4))];
        let page = ClassifiedPage::new(100, 100, tokens.clone()).into_pixel_space();
        assert_eq!(page.tokens, tokens);
    }

    #[test]
    fn normalized_page_converts_once() {
        let json = r#"{
            "width": 2000, "height": 1000, "normalized": true,
            "tokens": [{"text": "Stocks", "label": "KEY", "box": [100, 100, 200, 120]}]
        }"#;
        let page: ClassifiedPage = serde_json::from_str(json).unwrap();
        let page = page.into_pixel_space();
        assert!(!page.normalized);
        assert_eq!(page.tokens[0].bbox, BoundingBox::new(200, 100, 400, 120));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification assigned to a text span by the layout model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Label {
    /// Row label of a line item ("Total des actifs courants").
    Key,
    /// A figure in one of the year columns.
    Value,
    /// Note references and other names printed next to a row.
    Name,
    /// Column header carrying a fiscal year or closing date.
    Year,
    Reference,
    Other,
}

impl Label {
    pub const ALL: [Label; 6] = [
        Label::Key,
        Label::Value,
        Label::Name,
        Label::Year,
        Label::Reference,
        Label::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Key => "key",
            Label::Value => "value",
            Label::Name => "name",
            Label::Year => "year",
            Label::Reference => "reference",
            Label::Other => "other",
        }
    }

    /// Outline colour used when drawing the classification overlay.
    pub fn overlay_color(self) -> &'static str {
        match self {
            Label::Key => "#0000FF",
            Label::Value => "#008000",
            Label::Name => "#FFA500",
            Label::Reference => "#FF0000",
            Label::Year => "#FFFF00",
            Label::Other => "#808080",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifiers emit upper-case labels; anything unknown is `Other`.
impl From<&str> for Label {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "key" => Label::Key,
            "value" => Label::Value,
            "name" => Label::Name,
            "year" => Label::Year,
            "reference" => Label::Reference,
            _ => Label::Other,
        }
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::from(s.as_str())
    }
}

/// Axis-aligned box in page pixel space, `(x_min, y_min, x_max, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BoundingBox {
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    /// Left edge, the x anchor used for column alignment.
    pub fn left(&self) -> i32 {
        self.x_min
    }

    /// Top edge, the y anchor used for row alignment.
    pub fn top(&self) -> i32 {
        self.y_min
    }

    pub fn width(&self) -> i32 {
        (self.x_max - self.x_min).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y_max - self.y_min).max(0)
    }

    /// A box whose max corner lies before its min corner.
    pub fn is_inverted(&self) -> bool {
        self.x_max < self.x_min || self.y_max < self.y_min
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from(b: [i32; 4]) -> Self {
        BoundingBox::new(b[0], b[1], b[2], b[3])
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x_min, b.y_min, b.x_max, b.y_max]
    }
}

/// One classified text span. `(text, label, bbox)` is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub label: Label,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

impl Token {
    pub fn new(text: impl Into<String>, label: Label, bbox: BoundingBox) -> Self {
        Self { text: text.into(), label, bbox }
    }
}

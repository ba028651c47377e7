use std::collections::HashSet;

use bilan_core::{Label, Token};

/// Deduplicated tokens of one document, bucketed by label, each bucket in
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTokens {
    pub keys: Vec<Token>,
    pub values: Vec<Token>,
    pub names: Vec<Token>,
    pub years: Vec<Token>,
    pub references: Vec<Token>,
    /// Kept for drawing only; nothing in the table pipeline reads these.
    pub other: Vec<Token>,
}

impl NormalizedTokens {
    pub fn bucket(&self, label: Label) -> &[Token] {
        match label {
            Label::Key => &self.keys,
            Label::Value => &self.values,
            Label::Name => &self.names,
            Label::Year => &self.years,
            Label::Reference => &self.references,
            Label::Other => &self.other,
        }
    }

    fn bucket_mut(&mut self, label: Label) -> &mut Vec<Token> {
        match label {
            Label::Key => &mut self.keys,
            Label::Value => &mut self.values,
            Label::Name => &mut self.names,
            Label::Year => &mut self.years,
            Label::Reference => &mut self.references,
            Label::Other => &mut self.other,
        }
    }

    /// Every kept token with its overlay colour, `other` included.
    pub fn overlay(&self) -> impl Iterator<Item = (&Token, &'static str)> {
        Label::ALL
            .into_iter()
            .flat_map(move |label| self.bucket(label).iter())
            .map(|t| (t, t.label.overlay_color()))
    }

    pub fn len(&self) -> usize {
        Label::ALL.iter().map(|l| self.bucket(*l).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drops blank and duplicate tokens and partitions the rest by label.
/// Duplicates share text, label and box; the first occurrence is kept.
pub fn normalize<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> NormalizedTokens {
    let mut seen: HashSet<&Token> = HashSet::new();
    let mut out = NormalizedTokens::default();

    for token in tokens {
        if token.text.trim().is_empty() {
            continue;
        }
        if seen.insert(token) {
            out.bucket_mut(token.label).push(token.clone());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilan_core::BoundingBox;

    fn tok(text: &str, label: Label, x: i32, y: i32) -> Token {
        Token::new(text, label, BoundingBox::new(x, y, x + 40, y + 12))
    }

    #[test]
    fn duplicates_collapse_to_first() {
        let tokens = vec![
            tok("Stocks", Label::Key, 10, 100),
            tok("Stocks", Label::Key, 10, 100),
            tok("Stocks", Label::Key, 10, 140),
            tok("Stocks", Label::Value, 10, 100),
        ];
        let n = normalize(&tokens);
        assert_eq!(n.keys.len(), 2);
        assert_eq!(n.values.len(), 1);
        assert_eq!(n.keys[0].bbox.top(), 100);
        assert_eq!(n.keys[1].bbox.top(), 140);
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let tokens = vec![
            tok("2023", Label::Year, 300, 20),
            tok("Stocks", Label::Key, 10, 100),
            tok("2023", Label::Year, 300, 20),
            tok("1 000", Label::Value, 300, 100),
        ];
        let once = normalize(&tokens);
        let flat: Vec<Token> = once.overlay().map(|(t, _)| t.clone()).collect();
        let twice = normalize(&flat);
        assert_eq!(once, twice);
    }

    #[test]
    fn blank_tokens_are_dropped() {
        let tokens = vec![tok("   ", Label::Key, 0, 0), tok("", Label::Value, 0, 0)];
        assert!(normalize(&tokens).is_empty());
    }

    #[test]
    fn other_tokens_kept_for_overlay_only() {
        let tokens = vec![tok("Bilan", Label::Other, 0, 0), tok("Stocks", Label::Key, 0, 50)];
        let n = normalize(&tokens);
        assert_eq!(n.other.len(), 1);
        let colors: Vec<_> = n.overlay().map(|(_, c)| c).collect();
        assert_eq!(colors, vec!["#0000FF", "#808080"]);
    }
}

//! Keyword heuristic mapping a property label to a node kind.
//!
//! Best-effort only: this is substring matching, not an ontology lookup.
//! Rules are checked in order and the first rule with a matching keyword
//! wins, so overlaps are resolved by rule order.

use serde::Deserialize;

use super::NodeKind;

/// Keywords that select one node kind
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KindRule {
    pub kind: NodeKind,
    pub keywords: Vec<String>,
}

impl KindRule {
    pub fn new(kind: NodeKind, keywords: &[&str]) -> Self {
        Self {
            kind,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, label_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && label_lower.contains(&k.to_lowercase()))
    }
}

#[derive(Debug, Clone)]
pub struct KindClassifier {
    rules: Vec<KindRule>,
    fallback: NodeKind,
}

impl KindClassifier {
    pub fn new(rules: Vec<KindRule>) -> Self {
        Self {
            rules,
            fallback: NodeKind::Related,
        }
    }

    /// Kind for an entity reached through a property labelled `property_label`
    pub fn classify(&self, property_label: &str) -> NodeKind {
        let lower = property_label.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.kind)
            .unwrap_or(self.fallback)
    }
}

impl Default for KindClassifier {
    fn default() -> Self {
        Self::new(crate::config::default_kind_rules())
    }
}

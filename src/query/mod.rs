//! Query client for the remote knowledge base.
//!
//! Two read-only operations are exposed: label search and single-entity
//! lookup. Each walks an ordered list of tiers (query endpoint first, then
//! the plain HTTP APIs) and only gives up once every tier has failed.

mod client;
pub mod ids;
pub mod sparql;
pub mod wikibase;

pub use client::{LookupTier, QueryClient, SearchTier};

use serde::{Deserialize, Serialize};

/// One candidate entity returned by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub label: String,
    pub description: String,
}

impl SearchHit {
    fn new(id: &str, label: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// Where a set of search hits came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    /// Blank text or zero limit; nothing was sent
    NotQueried,
    Sparql,
    KeywordApi,
    /// Every remote tier failed; hits are the fixed placeholder set
    Placeholder,
}

/// Search hits plus their provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    pub source: SearchSource,
}

impl SearchResults {
    pub fn empty() -> Self {
        Self {
            hits: Vec::new(),
            source: SearchSource::NotQueried,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            hits: placeholder_hits(),
            source: SearchSource::Placeholder,
        }
    }

    /// True when the hits are the degraded-mode placeholder set
    pub fn is_placeholder(&self) -> bool {
        self.source == SearchSource::Placeholder
    }
}

/// Fixed entities returned when no remote tier could answer a search
pub fn placeholder_hits() -> Vec<SearchHit> {
    vec![
        SearchHit::new("Q5", "human", "common name of Homo sapiens"),
        SearchHit::new("Q7725634", "Literary work", "creative work in the literary medium"),
        SearchHit::new("Q515", "city", "large permanent human settlement"),
        SearchHit::new("Q35120", "entity", "the ultimate being, a concept in metaphysics"),
        SearchHit::new("Q146", "house cat", "domesticated species of feline"),
    ]
}

/// A single directly-asserted fact about an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property identifier, e.g. `P106`
    pub id: String,
    /// Human-readable property name
    pub label: String,
    /// Human-readable resolved value
    pub value: String,
    /// Unresolved value: an entity URI, a media URI, a URL or a literal
    pub raw_value: String,
}

/// An entity with its label, description and direct properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub label: String,
    pub description: String,
    pub properties: Vec<Property>,
}

impl Entity {
    /// Entity with no properties (label/description tiers)
    pub fn bare(id: &str, label: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            properties: Vec::new(),
        }
    }
}

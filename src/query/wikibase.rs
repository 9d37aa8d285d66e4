//! Response shapes of the plain HTTP API (`wbsearchentities`, `wbgetentities`).

use serde::Deserialize;
use std::collections::HashMap;

use super::{Entity, SearchHit};

#[derive(Debug, Deserialize)]
pub struct SearchEntitiesResponse {
    /// Absent when the API answered with an error object
    pub search: Option<Vec<SearchEntity>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchEntity {
    #[serde(default)]
    pub id: String,
    pub label: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetEntitiesResponse {
    pub entities: Option<HashMap<String, ApiEntity>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiEntity {
    /// Present (as an empty string) for ids the API does not know
    pub missing: Option<serde_json::Value>,
    #[serde(default)]
    pub labels: HashMap<String, LangValue>,
    #[serde(default)]
    pub descriptions: HashMap<String, LangValue>,
}

#[derive(Debug, Deserialize)]
pub struct LangValue {
    pub value: String,
}

/// Hits of a keyword search. `None` when the body has no `search` array.
pub fn parse_search_response(response: SearchEntitiesResponse) -> Option<Vec<SearchHit>> {
    let items = response.search?;
    Some(
        items
            .into_iter()
            .map(|item| SearchHit {
                id: item.id,
                label: item.label.unwrap_or_else(|| "Unknown".to_string()),
                description: item.description.unwrap_or_default(),
            })
            .collect(),
    )
}

/// Entity metadata for `entity_id`, or `None` if the API reports it missing
pub fn parse_entity_response(
    response: GetEntitiesResponse,
    entity_id: &str,
    language: &str,
) -> Option<Entity> {
    let mut entities = response.entities?;
    let entity = entities.remove(entity_id)?;
    if entity.missing.is_some() {
        return None;
    }

    let label = entity
        .labels
        .get(language)
        .map(|l| l.value.as_str())
        .unwrap_or(entity_id);
    let description = entity
        .descriptions
        .get(language)
        .map(|d| d.value.as_str())
        .unwrap_or_default();

    Some(Entity::bare(entity_id, label, description))
}

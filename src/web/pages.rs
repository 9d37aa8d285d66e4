//! Full HTML pages rendered from the askama templates under `templates/`.

use askama::Template;

use crate::error::Result;
use crate::query::ids::ENTITY_URI_PREFIX;
use crate::query::{Entity, SearchHit, SearchResults};

/// Shown above placeholder search results
pub const PLACEHOLDER_NOTICE: &str =
    "The knowledge base could not be reached. Showing example entities instead.";

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate;

#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate<'a> {
    query: &'a str,
    placeholder: bool,
    notice: &'a str,
    hits: &'a [SearchHit],
}

#[derive(Template)]
#[template(path = "entity.html")]
struct EntityTemplate<'a> {
    entity: &'a Entity,
    rows: Vec<PropertyRow<'a>>,
    graph_html: &'a str,
    graph_json: &'a str,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    message: &'a str,
}

/// One row of the property table; `target` links entity-valued rows
struct PropertyRow<'a> {
    label: &'a str,
    value: &'a str,
    target: Option<&'a str>,
}

pub fn index_page() -> Result<String> {
    Ok(IndexTemplate.render()?)
}

pub fn results_page(query: &str, results: &SearchResults) -> Result<String> {
    let template = ResultsTemplate {
        query: query.trim(),
        placeholder: results.is_placeholder(),
        notice: PLACEHOLDER_NOTICE,
        hits: &results.hits,
    };
    Ok(template.render()?)
}

/// Entity page. `graph_html` and `graph_json` are inserted verbatim.
pub fn entity_page(entity: &Entity, graph_html: &str, graph_json: &str) -> Result<String> {
    let rows = entity
        .properties
        .iter()
        .map(|prop| PropertyRow {
            label: &prop.label,
            value: &prop.value,
            target: prop.raw_value.strip_prefix(ENTITY_URI_PREFIX),
        })
        .collect();

    let template = EntityTemplate {
        entity,
        rows,
        graph_html,
        graph_json,
    };
    Ok(template.render()?)
}

pub fn error_page(message: &str) -> Result<String> {
    Ok(ErrorTemplate { message }.render()?)
}

//! Query text builders and result parsing for the SPARQL endpoint.

use serde::Deserialize;
use std::collections::HashMap;

use super::ids::{trailing_segment, DIRECT_PROPERTY_PREFIX};
use super::{Entity, Property, SearchHit};

/// `application/sparql-results+json` body
#[derive(Debug, Deserialize)]
pub struct SparqlResponse {
    pub results: SparqlResults,
}

#[derive(Debug, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// One result row: variable name -> bound term
pub type Binding = HashMap<String, BindingValue>;

#[derive(Debug, Deserialize)]
pub struct BindingValue {
    pub value: String,
}

fn bound<'a>(row: &'a Binding, var: &str) -> Option<&'a str> {
    row.get(var).map(|v| v.value.as_str())
}

/// Escape text for use inside a double-quoted SPARQL string literal
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Case-insensitive label substring search
pub fn search_query(text: &str, language: &str, limit: usize) -> String {
    let text = escape_literal(text);
    let language = escape_literal(language);
    format!(
        r#"SELECT DISTINCT ?item ?itemLabel ?itemDescription
WHERE {{
  ?item rdfs:label ?label .
  FILTER(CONTAINS(LCASE(?label), LCASE("{text}")))
  FILTER(LANG(?label) = "{language}")

  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{language}". }}
  OPTIONAL {{ ?item schema:description ?itemDescription. FILTER(LANG(?itemDescription) = "{language}"). }}
}}
LIMIT {limit}"#
    )
}

/// Every direct property triple of one entity, with labels.
///
/// `entity_id` must already be validated as `Q<digits>`.
pub fn entity_properties_query(entity_id: &str, language: &str, limit: usize) -> String {
    let language = escape_literal(language);
    format!(
        r#"SELECT ?entity ?entityLabel ?entityDescription ?prop ?propLabel ?value ?valueLabel
WHERE {{
  BIND(wd:{entity_id} AS ?entity)
  ?entity ?prop ?value .
  FILTER(STRSTARTS(STR(?prop), "{DIRECT_PROPERTY_PREFIX}"))
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{language}". }}
}}
LIMIT {limit}"#
    )
}

/// Label and description only
pub fn entity_label_query(entity_id: &str, language: &str) -> String {
    let language = escape_literal(language);
    format!(
        r#"SELECT ?entityLabel ?entityDescription
WHERE {{
  BIND(wd:{entity_id} AS ?entity)
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{language}". }}
}}
LIMIT 1"#
    )
}

/// Rows of a search query as hits, in endpoint order
pub fn parse_search_hits(response: &SparqlResponse) -> Vec<SearchHit> {
    response
        .results
        .bindings
        .iter()
        .filter_map(|row| {
            let item = bound(row, "item")?;
            Some(SearchHit {
                id: trailing_segment(item).to_string(),
                label: bound(row, "itemLabel").unwrap_or("Unknown").to_string(),
                description: bound(row, "itemDescription").unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Entity from a property query. `None` when there are no rows.
pub fn parse_entity(entity_id: &str, response: &SparqlResponse) -> Option<Entity> {
    let rows = &response.results.bindings;
    if rows.is_empty() {
        return None;
    }

    let label = rows
        .iter()
        .find_map(|row| bound(row, "entityLabel"))
        .unwrap_or("Unknown Entity");
    let description = rows
        .iter()
        .find_map(|row| bound(row, "entityDescription"))
        .unwrap_or_default();

    let properties = rows
        .iter()
        .filter_map(|row| {
            let prop_uri = bound(row, "prop")?;
            let raw_value = bound(row, "value")?;
            let prop_id = trailing_segment(prop_uri);
            Some(Property {
                id: prop_id.to_string(),
                label: bound(row, "propLabel").unwrap_or(prop_id).to_string(),
                value: bound(row, "valueLabel").unwrap_or(raw_value).to_string(),
                raw_value: raw_value.to_string(),
            })
        })
        .collect();

    Some(Entity {
        id: entity_id.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        properties,
    })
}

/// Entity from a label query.
///
/// The label service echoes the bare id when it knows no label, so a row
/// carrying only that echo does not count as a hit.
pub fn parse_entity_label(entity_id: &str, response: &SparqlResponse) -> Option<Entity> {
    let row = response.results.bindings.first()?;
    let label = bound(row, "entityLabel").filter(|l| !l.is_empty());
    let description = bound(row, "entityDescription").filter(|d| !d.is_empty());

    match (label, description) {
        (None, None) => None,
        (Some(l), None) if l == entity_id => None,
        (label, description) => Some(Entity::bare(
            entity_id,
            label.unwrap_or(entity_id),
            description.unwrap_or_default(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> SparqlResponse {
        serde_json::from_value(value).unwrap()
    }

    fn uri(v: &str) -> serde_json::Value {
        json!({"type": "uri", "value": v})
    }

    fn lit(v: &str) -> serde_json::Value {
        json!({"type": "literal", "value": v, "xml:lang": "en"})
    }

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_literal("line\nbreak"), "line\\nbreak");
    }

    #[test]
    fn test_search_query_contains_filters() {
        let q = search_query("Ada \"L\"", "en", 10);
        assert!(q.contains(r#"LCASE("Ada \"L\"")"#));
        assert!(q.contains(r#"FILTER(LANG(?label) = "en")"#));
        assert!(q.trim_end().ends_with("LIMIT 10"));
    }

    #[test]
    fn test_properties_query_direct_namespace() {
        let q = entity_properties_query("Q42", "en", 100);
        assert!(q.contains("BIND(wd:Q42 AS ?entity)"));
        assert!(q.contains("http://www.wikidata.org/prop/direct/"));
        assert!(q.contains("LIMIT 100"));
    }

    #[test]
    fn test_parse_search_hits_defaults() {
        let resp = response(json!({
            "head": {"vars": ["item", "itemLabel", "itemDescription"]},
            "results": {"bindings": [
                {"item": uri("http://www.wikidata.org/entity/Q42"),
                 "itemLabel": lit("Douglas Adams"),
                 "itemDescription": lit("English writer")},
                {"item": uri("http://www.wikidata.org/entity/Q7")}
            ]}
        }));
        let hits = parse_search_hits(&resp);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "Q42");
        assert_eq!(hits[0].label, "Douglas Adams");
        assert_eq!(hits[1].label, "Unknown");
        assert_eq!(hits[1].description, "");
    }

    #[test]
    fn test_parse_entity_properties() {
        let resp = response(json!({
            "results": {"bindings": [
                {"prop": uri("http://www.wikidata.org/prop/direct/P106"),
                 "propLabel": lit("occupation"),
                 "value": uri("http://www.wikidata.org/entity/Q82955"),
                 "valueLabel": lit("politician")},
                {"entityLabel": lit("Somebody"),
                 "entityDescription": lit("a person"),
                 "prop": uri("http://www.wikidata.org/prop/direct/P569"),
                 "value": lit("1952-03-11")}
            ]}
        }));
        let entity = parse_entity("Q1", &resp).unwrap();
        assert_eq!(entity.label, "Somebody");
        assert_eq!(entity.description, "a person");
        assert_eq!(entity.properties.len(), 2);
        assert_eq!(entity.properties[0].id, "P106");
        assert_eq!(entity.properties[0].value, "politician");
        assert_eq!(entity.properties[1].label, "P569");
        assert_eq!(entity.properties[1].value, "1952-03-11");
        assert_eq!(entity.properties[1].raw_value, "1952-03-11");
    }

    #[test]
    fn test_parse_entity_empty_is_none() {
        let resp = response(json!({"results": {"bindings": []}}));
        assert!(parse_entity("Q1", &resp).is_none());
    }

    #[test]
    fn test_parse_entity_label_echo_is_none() {
        let resp = response(json!({"results": {"bindings": [
            {"entityLabel": lit("Q999999999")}
        ]}}));
        assert!(parse_entity_label("Q999999999", &resp).is_none());
    }

    #[test]
    fn test_parse_entity_label_hit() {
        let resp = response(json!({"results": {"bindings": [
            {"entityLabel": lit("Earth"), "entityDescription": lit("planet")}
        ]}}));
        let entity = parse_entity_label("Q2", &resp).unwrap();
        assert_eq!(entity.label, "Earth");
        assert_eq!(entity.description, "planet");
        assert!(entity.properties.is_empty());
    }
}

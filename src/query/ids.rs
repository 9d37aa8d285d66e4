//! Identifier and URI helpers for the knowledge base namespaces.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Result, WikigraphError};

/// Namespace of entity URIs
pub const ENTITY_URI_PREFIX: &str = "http://www.wikidata.org/entity/";

/// Namespace of directly-asserted ("truthy") property URIs
pub const DIRECT_PROPERTY_PREFIX: &str = "http://www.wikidata.org/prop/direct/";

fn entity_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Q[0-9]+$").expect("Invalid regex pattern"))
}

fn property_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^P[0-9]+$").expect("Invalid regex pattern"))
}

/// `Q<digits>`
pub fn is_entity_id(id: &str) -> bool {
    entity_id_regex().is_match(id)
}

/// `P<digits>`
pub fn is_property_id(id: &str) -> bool {
    property_id_regex().is_match(id)
}

/// Last `/`-separated segment of a URI (the whole string if there is no `/`)
pub fn trailing_segment(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Raw value points at another knowledge base entity
pub fn is_entity_uri(raw: &str) -> bool {
    raw.contains("wikidata.org/entity/")
}

/// Raw value points into the media repository
pub fn is_media_uri(raw: &str) -> bool {
    raw.contains("commons.wikimedia.org") || raw.contains("wikimedia.org/wiki")
}

/// Plain http(s) URL
pub fn is_http_url(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

/// Normalize user input to a canonical entity id.
///
/// Accepts `Q123`, `q123`, `123` and namespaced forms such as `wd:Q123`.
pub fn normalize_entity_id(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let local = trimmed.rsplit(':').next().unwrap_or(trimmed).trim();

    let candidate = if !local.is_empty() && local.chars().all(|c| c.is_ascii_digit()) {
        format!("Q{}", local)
    } else if let Some(rest) = local.strip_prefix('q') {
        format!("Q{}", rest)
    } else {
        local.to_string()
    };

    if is_entity_id(&candidate) {
        Ok(candidate)
    } else {
        Err(WikigraphError::InvalidInput(format!(
            "'{}' is not an entity identifier",
            raw
        )))
    }
}

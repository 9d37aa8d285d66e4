use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::KnowledgeBaseConfig;
use crate::error::{Result, WikigraphError};

use super::ids::is_entity_id;
use super::sparql::{self, SparqlResponse};
use super::wikibase::{self, GetEntitiesResponse, SearchEntitiesResponse};
use super::{Entity, SearchHit, SearchResults, SearchSource};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Search tiers, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTier {
    /// Label substring query against the SPARQL endpoint
    Sparql,
    /// `wbsearchentities` keyword search
    KeywordApi,
}

impl SearchTier {
    pub const ORDER: [SearchTier; 2] = [SearchTier::Sparql, SearchTier::KeywordApi];

    fn source(self) -> SearchSource {
        match self {
            SearchTier::Sparql => SearchSource::Sparql,
            SearchTier::KeywordApi => SearchSource::KeywordApi,
        }
    }
}

/// Lookup tiers, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTier {
    /// All direct property triples with labels
    Properties,
    /// Label and description only
    Labels,
    /// `wbgetentities` metadata call
    EntityApi,
}

impl LookupTier {
    pub const ORDER: [LookupTier; 3] = [
        LookupTier::Properties,
        LookupTier::Labels,
        LookupTier::EntityApi,
    ];
}

/// Read-only client for the remote knowledge base
///
/// Every remote failure (transport, status, decode) demotes to the next tier.
/// Only exhaustion surfaces: placeholder hits for search, `EntityNotFound`
/// for lookup.
pub struct QueryClient {
    http: Client,
    config: KnowledgeBaseConfig,
}

impl QueryClient {
    /// Create a new client bound to the configured endpoints
    pub fn new(config: KnowledgeBaseConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| WikigraphError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Search entities whose label contains `text`, bounded by `limit`.
    ///
    /// Never fails: when every tier fails the fixed placeholder set is
    /// returned with `SearchSource::Placeholder`.
    pub async fn search(&self, text: &str, limit: usize) -> SearchResults {
        let text = text.trim();
        if text.is_empty() || limit == 0 {
            return SearchResults::empty();
        }

        for tier in SearchTier::ORDER {
            match self.run_search_tier(tier, text, limit).await {
                Ok(Some(mut hits)) => {
                    hits.truncate(limit);
                    log::debug!("Search '{}' answered by {:?} ({} hits)", text, tier, hits.len());
                    return SearchResults {
                        hits,
                        source: tier.source(),
                    };
                }
                Ok(None) => log::warn!("Search tier {:?} returned no rows for '{}'", tier, text),
                Err(e) => log::warn!("Search tier {:?} failed for '{}': {}", tier, text, e),
            }
        }

        log::warn!("All search tiers failed for '{}', returning placeholder entities", text);
        SearchResults::placeholder()
    }

    async fn run_search_tier(
        &self,
        tier: SearchTier,
        text: &str,
        limit: usize,
    ) -> Result<Option<Vec<SearchHit>>> {
        match tier {
            SearchTier::Sparql => {
                let query = sparql::search_query(text, &self.config.language, limit);
                let response = self.sparql(&query).await?;
                let hits = sparql::parse_search_hits(&response);
                Ok(if hits.is_empty() { None } else { Some(hits) })
            }
            SearchTier::KeywordApi => {
                let limit = limit.to_string();
                let params = [
                    ("action", "wbsearchentities"),
                    ("format", "json"),
                    ("language", self.config.language.as_str()),
                    ("search", text),
                    ("limit", limit.as_str()),
                ];
                let response: SearchEntitiesResponse = self
                    .get_json(&self.config.search_api_endpoint, &params, "application/json")
                    .await?;
                Ok(wikibase::parse_search_response(response))
            }
        }
    }

    /// Fetch one entity with its direct properties.
    ///
    /// `entity_id` must be canonical (`Q<digits>`); see
    /// [`normalize_entity_id`](super::ids::normalize_entity_id).
    pub async fn lookup(&self, entity_id: &str) -> Result<Entity> {
        if !is_entity_id(entity_id) {
            return Err(WikigraphError::InvalidInput(format!(
                "'{}' is not a canonical entity identifier",
                entity_id
            )));
        }

        for tier in LookupTier::ORDER {
            match self.run_lookup_tier(tier, entity_id).await {
                Ok(Some(entity)) => {
                    log::debug!(
                        "Lookup {} answered by {:?} ({} properties)",
                        entity_id,
                        tier,
                        entity.properties.len()
                    );
                    return Ok(entity);
                }
                Ok(None) => log::warn!("Lookup tier {:?} found nothing for {}", tier, entity_id),
                Err(e) => log::warn!("Lookup tier {:?} failed for {}: {}", tier, entity_id, e),
            }
        }

        Err(WikigraphError::EntityNotFound(entity_id.to_string()))
    }

    async fn run_lookup_tier(&self, tier: LookupTier, entity_id: &str) -> Result<Option<Entity>> {
        let language = self.config.language.as_str();
        match tier {
            LookupTier::Properties => {
                let query = sparql::entity_properties_query(
                    entity_id,
                    language,
                    self.config.entity_query_limit,
                );
                let response = self.sparql(&query).await?;
                Ok(sparql::parse_entity(entity_id, &response))
            }
            LookupTier::Labels => {
                let query = sparql::entity_label_query(entity_id, language);
                let response = self.sparql(&query).await?;
                Ok(sparql::parse_entity_label(entity_id, &response))
            }
            LookupTier::EntityApi => {
                let params = [
                    ("action", "wbgetentities"),
                    ("ids", entity_id),
                    ("format", "json"),
                    ("languages", language),
                ];
                let response: GetEntitiesResponse = self
                    .get_json(&self.config.entity_api_endpoint, &params, "application/json")
                    .await?;
                Ok(wikibase::parse_entity_response(response, entity_id, language))
            }
        }
    }

    async fn sparql(&self, query: &str) -> Result<SparqlResponse> {
        let params = [("query", query), ("format", "json")];
        self.get_json(&self.config.sparql_endpoint, &params, SPARQL_RESULTS_JSON)
            .await
    }

    /// Single GET returning a decoded JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        accept: &str,
    ) -> Result<T> {
        let start = std::time::Instant::now();
        let response = self
            .http
            .get(endpoint)
            .query(params)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| WikigraphError::RemoteTransport(format!("{}: {}", endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            let preview: String = body.chars().take(200).collect();
            return Err(WikigraphError::RemoteQuery(format!(
                "{} returned {}: {}",
                endpoint, status, preview
            )));
        }

        let decoded = response.json::<T>().await?;
        log::debug!("GET {} took {:?}", endpoint, start.elapsed());
        Ok(decoded)
    }
}

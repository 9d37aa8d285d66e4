use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::graph::{KindRule, NodeKind};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

/// Web server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Remote knowledge base endpoints and request settings
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Query-language endpoint (primary tier for search and lookup)
    #[serde(default = "default_sparql_endpoint")]
    pub sparql_endpoint: String,
    /// Keyword search API (search fallback)
    #[serde(default = "default_api_endpoint")]
    pub search_api_endpoint: String,
    /// Per-entity metadata API (last lookup tier)
    #[serde(default = "default_api_endpoint")]
    pub entity_api_endpoint: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Row cap for the property query
    #[serde(default = "default_entity_query_limit")]
    pub entity_query_limit: usize,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            sparql_endpoint: default_sparql_endpoint(),
            search_api_endpoint: default_api_endpoint(),
            entity_api_endpoint: default_api_endpoint(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            entity_query_limit: default_entity_query_limit(),
        }
    }
}

impl KnowledgeBaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_sparql_endpoint() -> String {
    "https://query.wikidata.org/sparql".to_string()
}

fn default_api_endpoint() -> String {
    "https://www.wikidata.org/w/api.php".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("wikigraph/{}", env!("CARGO_PKG_VERSION"))
}

fn default_entity_query_limit() -> usize {
    100
}

/// Search configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_search_limit")]
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            max_limit: default_max_search_limit(),
        }
    }
}

fn default_search_limit() -> usize {
    10
}

fn default_max_search_limit() -> usize {
    50
}

/// Graph builder configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_max_relations")]
    pub max_relations: usize,
    /// Property ids that never produce an edge
    #[serde(default = "default_excluded_properties")]
    pub excluded_properties: Vec<String>,
    /// Display cap for image node labels (ellipsis included)
    #[serde(default = "default_label_max_chars")]
    pub label_max_chars: usize,
    /// Ordered keyword rules; the first matching rule decides a node's kind
    #[serde(default = "default_kind_rules")]
    pub kind_rules: Vec<KindRule>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_relations: default_max_relations(),
            excluded_properties: default_excluded_properties(),
            label_max_chars: default_label_max_chars(),
            kind_rules: default_kind_rules(),
        }
    }
}

fn default_max_relations() -> usize {
    15
}

fn default_excluded_properties() -> Vec<String> {
    // instance of, sex or gender
    vec!["P31".to_string(), "P21".to_string()]
}

fn default_label_max_chars() -> usize {
    30
}

pub fn default_kind_rules() -> Vec<KindRule> {
    vec![
        KindRule::new(NodeKind::Location, &["location", "place", "country"]),
        KindRule::new(
            NodeKind::Person,
            &["person", "creator", "author", "director", "founder", "head"],
        ),
    ]
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in WIKIGRAPH_CONFIG environment variable (must exist)
    /// 2. ./config.toml in current directory (built-in defaults if absent)
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let (config_path, explicit) = match std::env::var("WIKIGRAPH_CONFIG") {
            Ok(path) => (PathBuf::from(path), true),
            Err(_) => (PathBuf::from("config.toml"), false),
        };

        if !explicit && !config_path.exists() {
            log::info!("No config.toml found, using built-in defaults");
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        }

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml(&config_str)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse config.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let kb = &self.knowledge_base;
        for (name, endpoint) in [
            ("knowledge_base.sparql_endpoint", &kb.sparql_endpoint),
            ("knowledge_base.search_api_endpoint", &kb.search_api_endpoint),
            ("knowledge_base.entity_api_endpoint", &kb.entity_api_endpoint),
        ] {
            let parsed = url::Url::parse(endpoint)
                .with_context(|| format!("{} is not a valid URL: {}", name, endpoint))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                anyhow::bail!("{} must use http or https: {}", name, endpoint);
            }
        }

        if kb.timeout_secs == 0 {
            anyhow::bail!("knowledge_base.timeout_secs must be greater than 0");
        }

        if kb.language.trim().is_empty() {
            anyhow::bail!("knowledge_base.language must not be empty");
        }

        if self.search.default_limit == 0 || self.search.default_limit > self.search.max_limit {
            anyhow::bail!(
                "search.default_limit must be between 1 and search.max_limit ({})",
                self.search.max_limit
            );
        }

        if self.graph.max_relations == 0 {
            anyhow::bail!("graph.max_relations must be greater than 0");
        }

        if self.graph.label_max_chars < 4 {
            anyhow::bail!("graph.label_max_chars must be at least 4");
        }

        Ok(())
    }

    /// Socket address the web server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

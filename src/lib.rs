pub mod config;
pub mod error;
pub mod graph;
pub mod query;
pub mod render;
pub mod web;

pub use config::Config;
pub use error::{Result, WikigraphError};
pub use graph::{GraphBuilder, KnowledgeGraph, NodeKind};
pub use query::{Entity, Property, QueryClient, SearchHit, SearchResults};

use anyhow::Result;
use wikigraph::web::WebServer;
use wikigraph::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("serve");

    match command {
        "check" => run_config_check()?,
        "serve" | _ => run_web_server().await?,
    }

    Ok(())
}

/// Run the web front end
async fn run_web_server() -> Result<()> {
    log::info!("Starting Wikigraph v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    log::info!("Query endpoint: {}", config.knowledge_base.sparql_endpoint);
    log::info!("Request timeout: {}s", config.knowledge_base.timeout_secs);

    let server = WebServer::new(&config)?;
    server.run().await?;

    Ok(())
}

/// Load and validate configuration, then report the effective settings
fn run_config_check() -> Result<()> {
    let config = Config::load()?;
    log::info!("Configuration loaded successfully");
    log::info!("Bind address: {}", config.bind_addr());
    log::info!("Query endpoint: {}", config.knowledge_base.sparql_endpoint);
    log::info!("Keyword search endpoint: {}", config.knowledge_base.search_api_endpoint);
    log::info!("Entity metadata endpoint: {}", config.knowledge_base.entity_api_endpoint);
    log::info!("Language: {}", config.knowledge_base.language);
    log::info!("Search limit: {} (max {})", config.search.default_limit, config.search.max_limit);
    log::info!("Max relations per graph: {}", config.graph.max_relations);
    for rule in &config.graph.kind_rules {
        log::info!("Kind rule {:?}: {}", rule.kind, rule.keywords.join(", "));
    }
    Ok(())
}

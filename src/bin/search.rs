use clap::Parser;
use std::time::Instant;
use wikigraph::query::SearchSource;
use wikigraph::{Config, QueryClient};

#[derive(Parser, Debug)]
#[command(name = "search")]
#[command(about = "Search knowledge base entities by label")]
struct Args {
    /// Text to look for in entity labels
    query: String,

    /// Maximum number of results (defaults to search.default_limit)
    #[arg(short, long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    if args.query.trim().is_empty() {
        anyhow::bail!("Query cannot be empty");
    }

    let config = Config::load()?;
    let limit = args
        .limit
        .unwrap_or(config.search.default_limit)
        .clamp(1, config.search.max_limit);
    let client = QueryClient::new(config.knowledge_base.clone())?;

    let start = Instant::now();
    let results = client.search(&args.query, limit).await;
    let duration = start.elapsed();

    println!("\nQuery: \"{}\"\n", args.query);

    if results.is_placeholder() {
        println!("⚠️  Knowledge base unreachable, showing placeholder entities\n");
    }

    if results.hits.is_empty() {
        println!("No results found.");
    } else {
        for hit in &results.hits {
            println!("{:<12} {}", hit.id, hit.label);
            if !hit.description.is_empty() {
                println!("{:<12} {}", "", hit.description);
            }
        }
    }

    let source = match results.source {
        SearchSource::NotQueried => "none",
        SearchSource::Sparql => "query endpoint",
        SearchSource::KeywordApi => "keyword search API",
        SearchSource::Placeholder => "placeholder",
    };
    println!("\nResults: {}", results.hits.len());
    println!("Source: {}", source);
    println!("Latency: {:?}", duration);

    Ok(())
}

use clap::Parser;
use std::path::PathBuf;
use wikigraph::query::ids::normalize_entity_id;
use wikigraph::render::{graph_json, render_graph_html};
use wikigraph::{Config, GraphBuilder, QueryClient};

#[derive(Parser, Debug)]
#[command(name = "graph")]
#[command(about = "Fetch an entity and emit its relationship graph")]
struct Args {
    /// Entity id: Q42, 42 or wd:Q42
    entity: String,

    /// Maximum number of edges (defaults to graph.max_relations)
    #[arg(short, long)]
    max_relations: Option<usize>,

    /// Print the node/edge JSON instead of the HTML fragment
    #[arg(long)]
    json: bool,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "warn")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    let entity_id = normalize_entity_id(&args.entity)?;
    let client = QueryClient::new(config.knowledge_base.clone())?;
    let entity = client.lookup(&entity_id).await?;

    let max_relations = args.max_relations.unwrap_or(config.graph.max_relations);
    let graph = GraphBuilder::from_config(&config.graph).build_or_hub(&entity, max_relations);
    log::info!(
        "{} ({}): {} nodes, {} edges",
        entity.label,
        entity.id,
        graph.nodes.len(),
        graph.edges.len()
    );

    let output = if args.json {
        graph_json(&graph)?
    } else {
        render_graph_html(&graph)?
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, output)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", output),
    }

    Ok(())
}

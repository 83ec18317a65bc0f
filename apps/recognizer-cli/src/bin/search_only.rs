use clap::Parser;

use recognizer_cli::{load_settings, BackendArgs};
use recognizer_core::RequestContext;
use recognizer_elastic::ElasticCategoryIndex;

/// One-shot lookup against an already populated index.
#[derive(Parser)]
#[command(name = "recognizer-search")]
struct Cli {
    /// Text to resolve, e.g. a merchant label
    query: String,
    #[command(flatten)]
    backend: BackendArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.backend)?;
    let index = ElasticCategoryIndex::new(&settings.backend)?;
    println!("🔍 recognizer-search\n==================");
    println!("Query: {}", cli.query);
    println!("Backend: {}  index: {}", settings.backend.url, index.index_name());

    let ctx = RequestContext::with_timeout(settings.backend.timeout());
    let response = index.search(&ctx, &cli.query).await?;
    println!("\n🔍 {} matching categories ({} ms)", response.total_hits, response.took_ms);
    match response.best() {
        Some(hit) => println!("\n  best: score={:.4}  id={}  name={}", hit.score, hit.source.id, hit.source.name()),
        None => println!("\n  no category matches \"{}\"", cli.query),
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use recognizer_cli::{init_tracing, load_settings, seed_vocabulary, serve_until, shutdown_signal, BackendArgs};
use recognizer_core::config::Settings;
use recognizer_core::{Category, CategoryRecognizer, Error, RequestContext};
use recognizer_elastic::ElasticCategoryIndex;

#[derive(Parser)]
#[command(name = "svc-recognizer", version, about = "Category recognition service", long_about = "Resolves free-text labels to canonical categories using an Elasticsearch index.")]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the index, load the vocabulary and listen until stopped (default)
    Serve {
        /// Text to look up once the vocabulary is loaded (defaults to the last entry)
        #[arg(long)]
        probe: Option<String>,
    },
    /// Delete and recreate the category index
    Reset,
    /// Upsert a single category
    Index {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
    },
    /// Resolve text to a category
    Search { text: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.backend)?;
    init_tracing(&settings);
    tracing::info!(app = env!("CARGO_PKG_NAME"), event = "starting");

    let index = ElasticCategoryIndex::new(&settings.backend)?;
    tracing::info!(
        client = "elasticsearch",
        url = %settings.backend.url,
        index = index.index_name(),
        refresh = index.refresh_policy().as_str(),
        "client created"
    );
    let root = RequestContext::background();
    let call = || root.child(Some(settings.backend.timeout()));

    match cli.command.unwrap_or(Command::Serve { probe: None }) {
        Command::Serve { probe } => serve(&settings, &index, &root, probe).await?,
        Command::Reset => {
            index.reset_index(&call()).await?;
            println!("✅ Index '{}' recreated", index.index_name());
        }
        Command::Index { id, name } => {
            let category = Category::new(id, name);
            index.index_category(&call(), &category).await?;
            println!("✅ Indexed {} → {}", category.id, category.name);
        }
        Command::Search { text } => match index.search_category(&call(), &text).await {
            Ok(name) => println!("{}", name),
            Err(Error::NotFound(_)) => {
                eprintln!("No category matches \"{}\"", text);
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}

async fn serve(settings: &Settings, index: &ElasticCategoryIndex, root: &RequestContext, probe: Option<String>) -> anyhow::Result<()> {
    let timeout = Some(settings.backend.timeout());

    index.reset_index(&root.child(timeout)).await?;
    tracing::info!(index = index.index_name(), "index was reset");

    let indexed = seed_vocabulary(index, root, timeout, &settings.vocabulary).await;
    tracing::info!(indexed, total = settings.vocabulary.len(), "vocabulary loaded");

    let probe = probe.or_else(|| settings.vocabulary.iter().last().map(|c| c.name.clone()));
    if let Some(text) = probe {
        match index.search_category(&root.child(timeout), &text).await {
            Ok(category) => tracing::info!(%text, %category, "probe matched"),
            Err(e) => tracing::warn!(%text, error = %e, "probe failed"),
        }
    }

    let addr = format!("{}:{}", settings.service.host, settings.service.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    let token = root.token().clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("waiting for server shut down");
        token.cancel();
    });
    serve_until(listener, root.token().cancelled()).await?;
    tracing::info!("server stopped normally");
    Ok(())
}

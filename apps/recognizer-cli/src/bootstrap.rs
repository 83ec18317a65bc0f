use std::future::Future;
use std::time::Duration;

use clap::Args;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use recognizer_core::config::{Config, Settings, Vocabulary};
use recognizer_core::{CategoryRecognizer, RequestContext};

/// Flags shared by the binaries. Each one also reads the environment
/// variable the service has always been configured with.
#[derive(Debug, Clone, Default, Args)]
pub struct BackendArgs {
    /// Elasticsearch connection URL
    #[arg(short = 'c', long = "elasticsearch-url", env = "APP_ELASTICSEARCH_URL")]
    pub elasticsearch_url: Option<String>,
    /// Port the service listens on
    #[arg(short = 'g', long = "grpc-port", env = "APP_GRPC_PORT")]
    pub grpc_port: Option<u16>,
    /// Category index name
    #[arg(long)]
    pub index: Option<String>,
}

#[derive(Debug, Default, Serialize)]
struct Overrides {
    backend: BackendOverrides,
    service: ServiceOverrides,
}

#[derive(Debug, Default, Serialize)]
struct BackendOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<String>,
}

#[derive(Debug, Default, Serialize)]
struct ServiceOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
}

impl BackendArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            backend: BackendOverrides { url: self.elasticsearch_url.clone(), index: self.index.clone() },
            service: ServiceOverrides { port: self.grpc_port },
        }
    }
}

/// Config files and `APP_*` variables, then command-line flags on top.
pub fn load_settings(args: &BackendArgs) -> anyhow::Result<Settings> {
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    settings_with_flags(config, args)
}

fn settings_with_flags(config: Config, args: &BackendArgs) -> anyhow::Result<Settings> {
    config.with_overrides(args.overrides()).settings()
}

/// `RUST_LOG` wins over the configured level.
pub fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

/// Index every vocabulary entry, one request each, each under its own
/// `timeout` derived from `parent`. A failed entry is logged and skipped;
/// the number of indexed entries is returned.
pub async fn seed_vocabulary<R>(
    recognizer: &R,
    parent: &RequestContext,
    timeout: Option<Duration>,
    vocabulary: &Vocabulary,
) -> usize
where
    R: CategoryRecognizer + ?Sized,
{
    let mut indexed = 0;
    for category in vocabulary.iter() {
        match recognizer.index_category(&parent.child(timeout), category).await {
            Ok(()) => indexed += 1,
            Err(e) => tracing::error!(id = %category.id, name = %category.name, error = %e, "failed to index category"),
        }
    }
    indexed
}

/// Accept and immediately close connections until `shutdown` resolves.
/// No methods are registered on the listener yet.
pub async fn serve_until<F>(listener: TcpListener, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            () = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((socket, peer)) => {
                    tracing::debug!(%peer, "no methods registered, closing connection");
                    drop(socket);
                }
                Err(e) => tracing::warn!(error = %e, "accept failed"),
            },
        }
    }
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!(signal = "SIGINT", "operating system signal received"),
        () = terminate => tracing::info!(signal = "SIGTERM", "operating system signal received"),
    }
}

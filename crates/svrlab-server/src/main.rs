use clap::Parser;
use svrlab_server::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "svrlab=info,svrlab_server=info,svrlab_pipeline=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse()).await
}

use anyhow::Result;
use axum::Router;
use clap::Parser;
use sla_core::table::DEFAULT_PAGE_SIZE;
use sla_server::{build_app, AppConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Catalog file or directory (.json / .jsonl)
    #[arg(long, default_value = "./sample_data")]
    data: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Directory for saved_searches.json; kept in memory when omitted
    #[arg(long)]
    saved_searches: Option<PathBuf>,
    /// Rows per page when the request does not set page_size
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = AppConfig {
        data: args.data,
        saved_searches: args.saved_searches,
        default_page_size: args.page_size,
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

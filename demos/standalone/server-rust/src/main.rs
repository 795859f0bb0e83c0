/* demos/standalone/server-rust/src/main.rs */

mod pages;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use quire_server::{AssetManifest, StaticAssetManifest};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quire-demo", about = "Serve a buffered and a streamed Quire page")]
struct Args {
  #[arg(long, default_value = "127.0.0.1:3000")]
  addr: SocketAddr,

  /// Directory holding `assets.json` and the files it lists
  #[arg(long, default_value = "demos/standalone/public")]
  assets: PathBuf,

  /// How long the streamed page's application render takes
  #[arg(long, default_value_t = 500)]
  delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let args = Args::parse();

  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("quire_demo=debug,quire_server=debug,info"));
  tracing_subscriber::fmt().with_env_filter(filter).init();

  let manifest: Arc<dyn AssetManifest> = match StaticAssetManifest::load(&args.assets) {
    Ok(manifest) => Arc::new(manifest),
    Err(err) => {
      tracing::warn!(dir = %args.assets.display(), %err, "no asset manifest, serving without assets");
      Arc::new(StaticAssetManifest::default())
    }
  };

  let router = pages::routes(manifest, Duration::from_millis(args.delay_ms))
    .into_router()
    .nest_service("/assets", ServeDir::new(&args.assets));

  let listener = tokio::net::TcpListener::bind(args.addr).await?;
  tracing::info!(addr = %listener.local_addr()?, "quire demo listening");
  axum::serve(listener, router).await?;
  Ok(())
}

//! Runnable Parlor server.
//!
//! ```text
//! cargo run -p parlor-server -- 0.0.0.0:9000
//! RUST_LOG=parlor=debug cargo run -p parlor-server
//! ```

use parlor::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:8080".to_owned());

    let server = ServerBuilder::new().bind(&addr).build().await?;
    tracing::info!(addr = %server.local_addr()?, "parlor is open");
    server.run().await?;
    Ok(())
}

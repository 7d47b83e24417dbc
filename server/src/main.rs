use todo_core::{MemoryItemStore, TodoService};
use todo_server::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    todo_server::init_tracing();

    let config = ServerConfig::from_env()?;
    let service = TodoService::with_seed_name(MemoryItemStore::new(), &config.seed_name)?;

    let listener = TcpListener::bind(config.addr()).await?;
    info!(addr = %listener.local_addr()?, "listening");
    todo_server::run(listener, todo_server::router(service)).await?;
    Ok(())
}

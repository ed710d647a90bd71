use todo_api::application::task_service::TaskServiceImpl;
use todo_api::config::{Config, StoreBackend};
use todo_api::domain::store::TaskStore;
use todo_api::http::routing::{self, tasks};
use todo_api::infrastructure::dynamodb::{self, DynamoDbTaskStore};
use todo_api::infrastructure::memory_store::InMemoryTaskStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    match config.backend {
        StoreBackend::DynamoDb => {
            let client = dynamodb::connect(&config.region, config.endpoint_url.as_deref()).await;
            let store = DynamoDbTaskStore::new(client, config.table_name.clone());
            tracing::info!(table = store.table_name(), region = %config.region, "using DynamoDB task store");
            serve(&config, store).await
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory task store; data is lost on shutdown");
            serve(&config, InMemoryTaskStore::new()).await
        }
    }
}

async fn serve<S: TaskStore>(config: &Config, store: S) -> anyhow::Result<()> {
    let service = TaskServiceImpl::new(store);
    let router = routing::app(tasks::router(tasks::AppState { service }));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}

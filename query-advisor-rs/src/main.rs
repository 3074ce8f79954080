// query-advisor-rs/src/main.rs
// Query Advisor - HTTP entry point
// Port 8000 by default (QUERY_ADVISOR_SERVICE_PORT / QUERY_ADVISOR_SERVICE_ADDR)

use std::sync::Arc;

use query_advisor::logging::{init_logging, LoggingConfig};
use query_advisor::{create_router, AppState, SERVICE};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config_rs::load_dotenv();

    let service_name = config_rs::get_formatted_service_name(SERVICE);
    init_logging(&LoggingConfig::from_env(service_name.clone()))?;

    let state = AppState::from_env()?;
    tracing::info!(
        engine = state.analyzer().engine(),
        database = %state.analyzer().provider().database_name(),
        "Advisor state initialized"
    );

    let app = create_router(Arc::new(state));

    let addr = config_rs::get_bind_address(SERVICE, 8000);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("{} listening on {}", service_name, addr);

    axum::serve(listener, app).await?;
    Ok(())
}

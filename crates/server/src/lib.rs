//! PaperBrief HTTP Server
//!
//! Actix-web REST API: text/PDF summarization and academic search

pub mod error;
pub mod routes;
pub mod state;
pub mod types;
pub mod workflow;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use paperbrief_common::{AppConfig, Result};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::{ApiError, ApiResult};
pub use state::AppState;
pub use workflow::ResearchWorkflow;

/// Build state and run the HTTP server until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = Arc::new(AppState::new(config).await?);

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        // Any origin, method and header, with credentials
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}

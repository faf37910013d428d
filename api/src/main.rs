mod ask_form;
mod ask_response;
mod error;
mod page;
mod routes;

use anyhow::Context;
use pdf_qa::{PdfQa, RagConfig};
use routes::{app, AppState};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = RagConfig::from_env()?;
    let qa = PdfQa::from_config(&config)?;
    log::info!(
        "Pipeline ready: {} / {} (chunk size {}, overlap {}, top {})",
        config.embedding_model,
        config.completion_model,
        config.chunk_size,
        config.chunk_overlap,
        config.top_k
    );

    let addr = env::var("PDF_QA_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(AppState::new(qa))).await?;
    Ok(())
}

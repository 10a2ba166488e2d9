//! HTTP request boundary.
//!
//! A thin transport over the coordinator, serializing coordinator outcomes
//! and mapping the error taxonomy onto status codes. No domain logic lives
//! here.

mod routes;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::coordinator::VotingCoordinator;
use crate::error::Result;

pub use routes::router;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<VotingCoordinator>,
}

pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

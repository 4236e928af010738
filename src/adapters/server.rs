use crate::core::contact::ContactService;
use crate::core::experience::ExperienceSummary;
use crate::core::ContactResponse;
use crate::utils::error::{Result, SiteError};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

pub const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn routes(
    service: Arc<ContactService>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let contact = warp::path!("api" / "contact")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_service(service))
        .and_then(contact_handler);

    let experience = warp::path!("api" / "experience")
        .and(warp::get())
        .map(|| warp::reply::json(&ExperienceSummary::now()));

    let health = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    contact
        .or(experience)
        .or(health)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

fn with_service(
    service: Arc<ContactService>,
) -> impl Filter<Extract = (Arc<ContactService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

async fn contact_handler(
    body: Bytes,
    service: Arc<ContactService>,
) -> std::result::Result<impl Reply, Infallible> {
    let reply = service.handle(&body).await;
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok(warp::reply::with_status(warp::reply::json(&reply.body), status))
}

async fn handle_rejection(err: Rejection) -> std::result::Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ContactResponse::failed(message)),
        status,
    ))
}

/// Binds the routes and returns the bound address plus the server future.
pub fn bind(
    service: Arc<ContactService>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(SocketAddr, impl Future<Output = ()>)> {
    warp::serve(routes(service))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .map_err(|e| SiteError::ConfigError {
            message: format!("Failed to bind {}: {}", addr, e),
        })
}

/// 執行到收到 Ctrl-C 為止
pub async fn serve(service: Arc<ContactService>, addr: SocketAddr) -> Result<()> {
    let (bound, server) = bind(service, addr, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("🛑 Shutdown signal received");
        }
    })?;

    tracing::info!("🚀 Listening on http://{}", bound);
    server.await;
    tracing::info!("Server stopped");
    Ok(())
}

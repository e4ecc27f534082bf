use std::sync::Arc;

use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;

use crate::api::error::RouteError;
use crate::global::GlobalState;

async fn health(_: Request<Body>) -> Result<Response<Body>, RouteError> {
    tracing::debug!("Health check");
    Ok(Response::builder()
        .status(StatusCode::OK)
        .body(Body::from("OK"))
        .expect("failed to build health response"))
}

pub fn routes(_global: &Arc<GlobalState>) -> Router<Body, RouteError> {
    Router::builder()
        .get("/", health)
        .build()
        .expect("failed to build router")
}

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use hyper::{Body, Server};
use routerify::{Router, RouterService};

use self::error::RouteError;
use crate::global::GlobalState;

pub mod auth;
pub mod error;
pub mod macros;
pub mod v1;

pub fn routes(global: &Arc<GlobalState>) -> Router<Body, RouteError> {
    // The router holds a Weak reference so that open keep-alive connections
    // don't keep the global state (and with it the shutdown) alive forever.
    let weak = Arc::downgrade(global);
    Router::builder()
        .data(weak)
        .scope("/v1", v1::routes(global))
        .err_handler_with_info(error::error_handler)
        .build()
        .expect("failed to build router")
}

pub async fn run(global: Arc<GlobalState>) -> Result<()> {
    let addr: SocketAddr = global.config.bind_address.parse()?;

    tracing::info!("Listening on {}", addr);

    let service = RouterService::new(routes(&global))
        .map_err(|err| anyhow::anyhow!("failed to build router service: {}", err))?;

    let server = Server::try_bind(&addr)?.serve(service);

    let ctx = global.ctx.clone();
    drop(global);

    server
        .with_graceful_shutdown(async move { ctx.done().await })
        .await?;

    Ok(())
}

use std::sync::{Arc, Weak};

use hyper::http::header;
use hyper::{Body, StatusCode};
use routerify::prelude::RequestExt;
use routerify::Middleware;

use crate::api::error::RouteError;
use crate::api::v1::jwt::JwtState;
use crate::global::GlobalState;

/// Verifies a bearer token when one is presented and attaches the verified
/// identity to the request. Requests without an Authorization header pass
/// through anonymously; revoked or unverifiable tokens are rejected here.
pub fn auth_middleware(_global: &Arc<GlobalState>) -> Middleware<Body, RouteError> {
    Middleware::pre(|req| async move {
        let Some(token) = req.headers().get(header::AUTHORIZATION) else {
            return Ok(req);
        };

        let global = req
            .data::<Weak<GlobalState>>()
            .expect("global state not set")
            .upgrade()
            .ok_or((
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to upgrade global state",
            ))?;

        let token = token
            .to_str()
            .map_err(|e| (StatusCode::UNAUTHORIZED, "invalid authentication token", e))?;

        // Only bearer tokens are accepted
        if !token.starts_with("Bearer ") {
            return Err(RouteError::from((
                StatusCode::UNAUTHORIZED,
                "invalid authentication token",
            )));
        }

        let jwt = JwtState::verify(&global, token.trim_start_matches("Bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "invalid authentication token"))?;

        if global.revoked_tokens.is_revoked(&jwt.jti) {
            return Err(RouteError::from((
                StatusCode::UNAUTHORIZED,
                "token has been revoked",
            )));
        }

        req.set_context(jwt);

        Ok(req)
    })
}

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::config::AppConfig;
use crate::context::Context;
use crate::database::memory::{MemoryRoomRepository, MemoryUserStore};
use crate::global::GlobalState;

use super::*;

fn global(config: AppConfig) -> Arc<GlobalState> {
    let (ctx, _) = Context::new();
    Arc::new(GlobalState::with_stores(
        config,
        ctx,
        Arc::new(MemoryRoomRepository::new()),
        Arc::new(MemoryUserStore::new()),
    ))
}

fn state() -> JwtState {
    JwtState {
        user_id: 7,
        jti: "token-1".to_string(),
        expiration: Some(Utc::now() + Duration::hours(1)),
        issued_at: Utc::now() - Duration::seconds(5),
        not_before: None,
        audience: None,
    }
}

#[test]
fn test_round_trip() {
    let global = global(AppConfig::default());

    let token = state().serialize(&global).expect("failed to sign token");
    let verified = JwtState::verify(&global, &token).expect("failed to verify token");

    assert_eq!(verified.user_id, 7);
    assert_eq!(verified.jti, "token-1");
    assert!(verified.expiration.is_some());
}

#[test]
fn test_rejects_wrong_secret() {
    let signer = global(AppConfig::default());
    let verifier = global(AppConfig {
        jwt_secret: "other-secret".to_string(),
        ..Default::default()
    });

    let token = state().serialize(&signer).expect("failed to sign token");
    assert!(JwtState::verify(&verifier, &token).is_none());
}

#[test]
fn test_rejects_wrong_issuer() {
    let signer = global(AppConfig::default());
    let verifier = global(AppConfig {
        jwt_issuer: "someone-else".to_string(),
        ..Default::default()
    });

    let token = state().serialize(&signer).expect("failed to sign token");
    assert!(JwtState::verify(&verifier, &token).is_none());
}

#[test]
fn test_rejects_expired_token() {
    let global = global(AppConfig::default());

    let mut state = state();
    state.expiration = Some(Utc::now() - Duration::hours(1));

    let token = state.serialize(&global).expect("failed to sign token");
    assert!(JwtState::verify(&global, &token).is_none());
}

#[test]
fn test_rejects_not_yet_valid_token() {
    let global = global(AppConfig::default());

    let mut state = state();
    state.not_before = Some(Utc::now() + Duration::hours(1));

    let token = state.serialize(&global).expect("failed to sign token");
    assert!(JwtState::verify(&global, &token).is_none());
}

#[test]
fn test_rejects_token_issued_in_the_future() {
    let global = global(AppConfig::default());

    let mut state = state();
    state.issued_at = Utc::now() + Duration::hours(1);

    let token = state.serialize(&global).expect("failed to sign token");
    assert!(JwtState::verify(&global, &token).is_none());
}

#[test]
fn test_rejects_garbage() {
    let global = global(AppConfig::default());

    assert!(JwtState::verify(&global, "not a token").is_none());
    assert!(JwtState::verify(&global, "").is_none());
}

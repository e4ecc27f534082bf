use std::sync::Arc;

use crate::api::auth::RevocationList;
use crate::config::AppConfig;
use crate::context::Context;
use crate::database::repository::{
    PostgresRoomRepository, PostgresUserStore, RoomRepository, UserStore,
};

pub struct GlobalState {
    pub config: AppConfig,
    pub ctx: Context,
    pub rooms: Arc<dyn RoomRepository>,
    pub users: Arc<dyn UserStore>,
    pub revoked_tokens: RevocationList,
}

impl GlobalState {
    pub fn new(config: AppConfig, ctx: Context, db: sqlx::PgPool) -> Self {
        Self::with_stores(
            config,
            ctx,
            Arc::new(PostgresRoomRepository::new(db.clone())),
            Arc::new(PostgresUserStore::new(db)),
        )
    }

    /// Wires the state over arbitrary storage backends. Tests use this to
    /// substitute in-memory stores.
    pub fn with_stores(
        config: AppConfig,
        ctx: Context,
        rooms: Arc<dyn RoomRepository>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            config,
            ctx,
            rooms,
            users,
            revoked_tokens: RevocationList::new(),
        }
    }
}

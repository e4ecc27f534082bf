use async_trait::async_trait;

use super::room::{self, NewRoom};
use super::user;

/// A storage-layer fault. Missing records are not faults; lookups signal
/// them with `Ok(None)` so callers own the not-found mapping.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Durable storage for study-room records. Every write is a single atomic
/// unit: either fully committed or fully discarded.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Persists a validated candidate, assigning its identity and creation
    /// time, and returns the stored snapshot.
    async fn create(&self, room: NewRoom) -> Result<room::Model, RepositoryError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Option<room::Model>, RepositoryError>;

    /// All rooms in insertion order.
    async fn fetch_all(&self) -> Result<Vec<room::Model>, RepositoryError>;

    /// Replaces the mutable fields of the record `id` with those of the
    /// given snapshot. Returns `Ok(None)` without writing anything if the
    /// record does not exist.
    async fn update(&self, id: i64, room: &room::Model) -> Result<Option<room::Model>, RepositoryError>;
}

/// Lookup of externally-managed user identities, consumed when serializing
/// a room's creator summary.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn fetch_by_id(&self, id: i64) -> Result<Option<user::Model>, RepositoryError>;
}

pub struct PostgresRoomRepository {
    pool: sqlx::PgPool,
}

impl PostgresRoomRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PostgresRoomRepository {
    async fn create(&self, room: NewRoom) -> Result<room::Model, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let room = sqlx::query_as::<_, room::Model>(
            r#"
            INSERT INTO study_rooms (name, description, capacity, creator_id, date, start_time, end_time, location, mode, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            RETURNING *
            "#,
        )
        .bind(&room.name)
        .bind(&room.description)
        .bind(room.capacity)
        .bind(room.creator_id)
        .bind(room.date)
        .bind(room.start_time)
        .bind(room.end_time)
        .bind(&room.location)
        .bind(&room.mode)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(room)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<room::Model>, RepositoryError> {
        Ok(
            sqlx::query_as::<_, room::Model>("SELECT * FROM study_rooms WHERE room_id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn fetch_all(&self) -> Result<Vec<room::Model>, RepositoryError> {
        Ok(
            sqlx::query_as::<_, room::Model>("SELECT * FROM study_rooms ORDER BY room_id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn update(&self, id: i64, room: &room::Model) -> Result<Option<room::Model>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // creator_id and created_at are immutable and deliberately absent
        // from the SET list.
        let updated = sqlx::query_as::<_, room::Model>(
            r#"
            UPDATE study_rooms
            SET name = $2, description = $3, capacity = $4, date = $5, start_time = $6, end_time = $7, location = $8, mode = $9
            WHERE room_id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&room.name)
        .bind(&room.description)
        .bind(room.capacity)
        .bind(room.date)
        .bind(room.start_time)
        .bind(room.end_time)
        .bind(&room.location)
        .bind(&room.mode)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

pub struct PostgresUserStore {
    pool: sqlx::PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn fetch_by_id(&self, id: i64) -> Result<Option<user::Model>, RepositoryError> {
        Ok(
            sqlx::query_as::<_, user::Model>("SELECT id, username, email FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}

//! In-memory storage backends with the same observable semantics as the
//! Postgres ones. Handler tests substitute these for the real stores; they
//! also work as a scratch backend when no database is around.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::repository::{RepositoryError, RoomRepository, UserStore};
use super::room::{self, NewRoom};
use super::user;

#[derive(Default)]
struct Rooms {
    by_id: BTreeMap<i64, room::Model>,
    next_id: i64,
}

#[derive(Default)]
pub struct MemoryRoomRepository {
    rooms: Mutex<Rooms>,
}

impl MemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for MemoryRoomRepository {
    async fn create(&self, room: NewRoom) -> Result<room::Model, RepositoryError> {
        let mut rooms = self.rooms.lock().expect("room store poisoned");

        rooms.next_id += 1;
        let model = room::Model {
            room_id: rooms.next_id,
            name: room.name,
            description: room.description,
            capacity: room.capacity,
            creator_id: room.creator_id,
            date: room.date,
            start_time: room.start_time,
            end_time: room.end_time,
            location: room.location,
            mode: room.mode,
            created_at: Utc::now(),
        };

        rooms.by_id.insert(model.room_id, model.clone());

        Ok(model)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<room::Model>, RepositoryError> {
        let rooms = self.rooms.lock().expect("room store poisoned");

        Ok(rooms.by_id.get(&id).cloned())
    }

    async fn fetch_all(&self) -> Result<Vec<room::Model>, RepositoryError> {
        let rooms = self.rooms.lock().expect("room store poisoned");

        // Ids are assigned serially, so key order is insertion order.
        Ok(rooms.by_id.values().cloned().collect())
    }

    async fn update(&self, id: i64, room: &room::Model) -> Result<Option<room::Model>, RepositoryError> {
        let mut rooms = self.rooms.lock().expect("room store poisoned");

        let Some(stored) = rooms.by_id.get_mut(&id) else {
            return Ok(None);
        };

        // Mutable fields only; creator_id and created_at stay as stored.
        stored.name = room.name.clone();
        stored.description = room.description.clone();
        stored.capacity = room.capacity;
        stored.date = room.date;
        stored.start_time = room.start_time;
        stored.end_time = room.end_time;
        stored.location = room.location.clone();
        stored.mode = room.mode.clone();

        Ok(Some(stored.clone()))
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<BTreeMap<i64, user::Model>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: user::Model) {
        let mut users = self.users.lock().expect("user store poisoned");
        users.insert(user.id, user);
    }

    pub fn remove(&self, id: i64) {
        let mut users = self.users.lock().expect("user store poisoned");
        users.remove(&id);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn fetch_by_id(&self, id: i64) -> Result<Option<user::Model>, RepositoryError> {
        let users = self.users.lock().expect("user store poisoned");

        Ok(users.get(&id).cloned())
    }
}

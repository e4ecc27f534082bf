use std::sync::{Arc, Weak};

use hyper::body::HttpBody;
use hyper::{Body, Request, Response, StatusCode};
use routerify::prelude::RequestExt;
use routerify::Router;

use crate::api::error::RouteError;
use crate::api::macros::make_response;
use crate::api::v1::jwt::JwtState;
use crate::database::{room, user};
use crate::global::GlobalState;

/// A room as callers see it: times flattened back to the submitted wire
/// format, creator joined in as a nested summary.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct RoomResponse {
    room_id: i64,
    name: String,
    description: Option<String>,
    capacity: i32,
    creator_id: i64,
    creator: CreatorResponse,
    date: String,
    start_time: String,
    end_time: String,
    location: String,
    mode: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct CreatorResponse {
    id: i64,
    username: String,
    email: String,
}

impl RoomResponse {
    fn new(room: room::Model, creator: user::Model) -> Self {
        Self {
            room_id: room.room_id,
            name: room.name,
            description: room.description,
            capacity: room.capacity,
            creator_id: room.creator_id,
            creator: CreatorResponse {
                id: creator.id,
                username: creator.username,
                email: creator.email,
            },
            date: room.date.format("%Y-%m-%d").to_string(),
            start_time: room.start_time.format("%H:%M").to_string(),
            end_time: room.end_time.format("%H:%M").to_string(),
            location: room.location,
            mode: room.mode,
        }
    }
}

fn get_global(req: &Request<Body>) -> Result<Arc<GlobalState>, RouteError> {
    Ok(req
        .data::<Weak<GlobalState>>()
        .expect("global state not set")
        .upgrade()
        .ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to upgrade global state",
        ))?)
}

/// The creator summary is a live lookup against the identity collaborator;
/// a record whose creator has been removed upstream cannot be serialized
/// and surfaces as the operation's fault.
async fn room_response(
    global: &Arc<GlobalState>,
    room: room::Model,
    fault_message: &'static str,
) -> Result<RoomResponse, RouteError> {
    let creator = global
        .users
        .fetch_by_id(room.creator_id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, fault_message, e))?
        .ok_or_else(|| {
            RouteError::from((
                StatusCode::INTERNAL_SERVER_ERROR,
                fault_message,
                anyhow::anyhow!("creator {} no longer exists", room.creator_id),
            ))
        })?;

    Ok(RoomResponse::new(room, creator))
}

async fn create_room(mut req: Request<Body>) -> Result<Response<Body>, RouteError> {
    let global = get_global(&req)?;

    let Some(Ok(data)) = req.body_mut().data().await else {
        return Err(RouteError::from((
            StatusCode::BAD_REQUEST,
            "body has no data",
        )));
    };

    let payload = serde_json::from_slice::<room::RoomPayload>(&data)
        .map_err(|e| (StatusCode::BAD_REQUEST, "body is not valid json", e))?;

    let new_room = room::validate_create(&payload)
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;

    if let Some(identity) = req.context::<JwtState>() {
        tracing::debug!(user_id = identity.user_id, "creating room");
    }

    let room = global
        .rooms
        .create(new_room)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "Creation failed", e))?;

    let response = room_response(&global, room, "Creation failed").await?;
    let body = serde_json::to_string(&response)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "Creation failed", e))?;

    Ok(make_response!(StatusCode::CREATED, body))
}

async fn get_room(req: Request<Body>) -> Result<Response<Body>, RouteError> {
    let global = get_global(&req)?;

    // A non-numeric id segment names nothing, same as an unknown id.
    let id = req
        .param("id")
        .and_then(|id| id.parse::<i64>().ok())
        .ok_or((StatusCode::NOT_FOUND, "Room not found"))?;

    let room = global
        .rooms
        .fetch_by_id(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching room", e))?
        .ok_or((StatusCode::NOT_FOUND, "Room not found"))?;

    let response = room_response(&global, room, "Error fetching room").await?;
    let body = serde_json::to_string(&response)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching room", e))?;

    Ok(make_response!(StatusCode::OK, body))
}

async fn get_rooms(req: Request<Body>) -> Result<Response<Body>, RouteError> {
    let global = get_global(&req)?;

    let rooms = global
        .rooms
        .fetch_all()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching rooms", e))?;

    let mut data = Vec::with_capacity(rooms.len());
    for room in rooms {
        data.push(room_response(&global, room, "Error fetching rooms").await?);
    }

    let body = serde_json::to_string(&data)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching rooms", e))?;

    Ok(make_response!(StatusCode::OK, body))
}

async fn update_room(mut req: Request<Body>) -> Result<Response<Body>, RouteError> {
    let global = get_global(&req)?;

    let id = req
        .param("id")
        .and_then(|id| id.parse::<i64>().ok())
        .ok_or((StatusCode::NOT_FOUND, "Room not found"))?;

    // Existence is checked before the payload so an unknown id is a 404 no
    // matter what the body contains.
    let mut room = global
        .rooms
        .fetch_by_id(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "Update failed", e))?
        .ok_or((StatusCode::NOT_FOUND, "Room not found"))?;

    let Some(Ok(data)) = req.body_mut().data().await else {
        return Err(RouteError::from((
            StatusCode::BAD_REQUEST,
            "body has no data",
        )));
    };

    let payload = serde_json::from_slice::<room::RoomPayload>(&data)
        .map_err(|e| (StatusCode::BAD_REQUEST, "body is not valid json", e))?;

    // The snapshot takes the changes; the stored record only moves when the
    // whole pass has validated and the repository commits.
    room::apply_update(&mut room, &payload)
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;

    let room = global
        .rooms
        .update(id, &room)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "Update failed", e))?
        .ok_or((StatusCode::NOT_FOUND, "Room not found"))?;

    let response = room_response(&global, room, "Update failed").await?;
    let body = serde_json::to_string(&response)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, "Update failed", e))?;

    Ok(make_response!(StatusCode::OK, body))
}

pub fn routes(_global: &Arc<GlobalState>) -> Router<Body, RouteError> {
    Router::builder()
        .post("/", create_room)
        .get("/", get_rooms)
        .get("/:id", get_room)
        .put("/:id", update_room)
        .patch("/:id", update_room)
        .build()
        .expect("failed to build router")
}

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// A stored study-room booking. Instances handed out by a repository are
/// detached snapshots; the only way to change the stored record is another
/// repository call.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Model {
    /// The unique identifier for the room.
    pub room_id: i64,
    /// Display name of the room. Never empty.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Number of seats. Always positive.
    pub capacity: i32,
    /// The user that created the booking. Immutable.
    pub creator_id: i64,
    /// Calendar day of the booking.
    pub date: NaiveDate,
    /// Booking start: `date` at a wall-clock time.
    pub start_time: NaiveDateTime,
    /// Booking end: `date` at a wall-clock time. Not ordered against
    /// `start_time`.
    pub end_time: NaiveDateTime,
    /// Where the room meets. Never empty.
    pub location: String,
    /// Free-form category, e.g. "online" or "in-person". Never empty.
    pub mode: String,
    /// The time the record was created. Immutable.
    pub created_at: DateTime<Utc>,
}

/// A fully-validated candidate record, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoom {
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub creator_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location: String,
    pub mode: String,
}

/// Raw request fields, before validation. Everything is optional and
/// `capacity`/`creator_id` stay untyped so that `4` and `"4"` both parse
/// while `"abc"` gets reported precisely.
#[derive(Debug, Default, serde::Deserialize)]
pub struct RoomPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<serde_json::Value>,
    pub creator_id: Option<serde_json::Value>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub mode: Option<String>,
}

/// A rejected field. The `Display` text is the client-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Study room name cannot be empty")]
    EmptyName,
    #[error("Capacity must be an integer")]
    CapacityType,
    #[error("Capacity must be greater than zero")]
    CapacityValue,
    #[error("Creator ID must be an integer")]
    CreatorIdType,
    #[error("Date is required")]
    MissingDate,
    #[error("Invalid date format, expected YYYY-MM-DD")]
    DateFormat,
    #[error("Start time is required")]
    MissingStartTime,
    #[error("Invalid start_time format, expected HH:mm")]
    StartTimeFormat,
    #[error("End time is required")]
    MissingEndTime,
    #[error("Invalid end_time format, expected HH:mm")]
    EndTimeFormat,
    #[error("Location is required")]
    MissingLocation,
    #[error("Mode is required")]
    MissingMode,
}

fn parse_integer(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses a capacity out of a JSON number or integer string.
pub fn parse_capacity(value: &serde_json::Value) -> Result<i32, ValidationError> {
    let capacity = parse_integer(value)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or(ValidationError::CapacityType)?;

    if capacity <= 0 {
        return Err(ValidationError::CapacityValue);
    }

    Ok(capacity)
}

pub fn parse_creator_id(value: &serde_json::Value) -> Result<i64, ValidationError> {
    parse_integer(value).ok_or(ValidationError::CreatorIdType)
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::DateFormat)
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Runs the full create-time validation pass, stopping at the first failing
/// field so the caller reports exactly one problem.
pub fn validate_create(payload: &RoomPayload) -> Result<NewRoom, ValidationError> {
    let (
        Some(name),
        Some(capacity),
        Some(creator_id),
        Some(date),
        Some(start_time),
        Some(end_time),
        Some(location),
        Some(mode),
    ) = (
        payload.name.as_deref(),
        payload.capacity.as_ref(),
        payload.creator_id.as_ref(),
        payload.date.as_deref(),
        payload.start_time.as_deref(),
        payload.end_time.as_deref(),
        payload.location.as_deref(),
        payload.mode.as_deref(),
    )
    else {
        return Err(ValidationError::MissingFields);
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let capacity = parse_capacity(capacity)?;
    let creator_id = parse_creator_id(creator_id)?;

    let date = date.trim();
    if date.is_empty() {
        return Err(ValidationError::MissingDate);
    }
    let date = parse_date(date)?;

    let start_time = start_time.trim();
    if start_time.is_empty() {
        return Err(ValidationError::MissingStartTime);
    }
    let start_time = parse_time(start_time)
        .map(|t| date.and_time(t))
        .ok_or(ValidationError::StartTimeFormat)?;

    let end_time = end_time.trim();
    if end_time.is_empty() {
        return Err(ValidationError::MissingEndTime);
    }
    // Ends are combined with the same calendar day as starts; an end that
    // reads earlier than the start is accepted as-is.
    let end_time = parse_time(end_time)
        .map(|t| date.and_time(t))
        .ok_or(ValidationError::EndTimeFormat)?;

    let location = location.trim();
    if location.is_empty() {
        return Err(ValidationError::MissingLocation);
    }

    let mode = mode.trim();
    if mode.is_empty() {
        return Err(ValidationError::MissingMode);
    }

    let description = payload.description.as_ref().map(|d| d.trim().to_string());

    Ok(NewRoom {
        name: name.to_string(),
        description,
        capacity,
        creator_id,
        date,
        start_time,
        end_time,
        location: location.to_string(),
        mode: mode.to_string(),
    })
}

/// Applies the fields present in `payload` to a detached snapshot, in
/// payload order, stopping at the first failing field. Time-of-day fields
/// combine with the snapshot's current date, including a date updated
/// earlier in the same pass. The caller persists the snapshot only when the
/// whole pass succeeds, so an abort leaves the stored record untouched.
///
/// `creator_id` in the payload is ignored; the field is immutable.
pub fn apply_update(room: &mut Model, payload: &RoomPayload) -> Result<(), ValidationError> {
    if let Some(name) = &payload.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        room.name = name.to_string();
    }

    if let Some(description) = &payload.description {
        room.description = Some(description.trim().to_string());
    }

    if let Some(capacity) = &payload.capacity {
        room.capacity = parse_capacity(capacity)?;
    }

    if let Some(date) = &payload.date {
        room.date = parse_date(date.trim())?;
    }

    if let Some(start_time) = &payload.start_time {
        let time = parse_time(start_time.trim()).ok_or(ValidationError::StartTimeFormat)?;
        room.start_time = room.date.and_time(time);
    }

    if let Some(end_time) = &payload.end_time {
        let time = parse_time(end_time.trim()).ok_or(ValidationError::EndTimeFormat)?;
        room.end_time = room.date.and_time(time);
    }

    if let Some(location) = &payload.location {
        let location = location.trim();
        if location.is_empty() {
            return Err(ValidationError::MissingLocation);
        }
        room.location = location.to_string();
    }

    if let Some(mode) = &payload.mode {
        let mode = mode.trim();
        if mode.is_empty() {
            return Err(ValidationError::MissingMode);
        }
        room.mode = mode.to_string();
    }

    Ok(())
}

#[cfg(test)]
mod tests;

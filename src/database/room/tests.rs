use chrono::{NaiveDate, Utc};
use serde_json::json;

use super::*;

fn payload(value: serde_json::Value) -> RoomPayload {
    serde_json::from_value(value).expect("failed to deserialize payload")
}

fn full_payload() -> serde_json::Value {
    json!({
        "name": "Math",
        "capacity": 4,
        "creator_id": 1,
        "date": "2024-05-01",
        "start_time": "14:00",
        "end_time": "13:00",
        "location": "Lib",
        "mode": "online",
    })
}

fn stored_room() -> Model {
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("invalid date");
    Model {
        room_id: 1,
        name: "Math".to_string(),
        description: None,
        capacity: 4,
        creator_id: 1,
        date,
        start_time: date.and_hms_opt(14, 0, 0).expect("invalid time"),
        end_time: date.and_hms_opt(16, 0, 0).expect("invalid time"),
        location: "Lib".to_string(),
        mode: "online".to_string(),
        created_at: Utc::now(),
    }
}

#[test]
fn test_create_accepts_end_before_start() {
    let room = validate_create(&payload(full_payload())).expect("expected a valid room");

    let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("invalid date");
    assert_eq!(room.date, date);
    assert_eq!(room.start_time, date.and_hms_opt(14, 0, 0).expect("invalid time"));
    assert_eq!(room.end_time, date.and_hms_opt(13, 0, 0).expect("invalid time"));
    assert!(room.end_time < room.start_time);
}

#[test]
fn test_create_trims_strings() {
    let mut value = full_payload();
    value["name"] = json!("  Math  ");
    value["location"] = json!(" Lib ");
    value["mode"] = json!(" online ");
    value["description"] = json!("  quiet room  ");

    let room = validate_create(&payload(value)).expect("expected a valid room");
    assert_eq!(room.name, "Math");
    assert_eq!(room.location, "Lib");
    assert_eq!(room.mode, "online");
    assert_eq!(room.description.as_deref(), Some("quiet room"));
}

#[test]
fn test_create_missing_field() {
    let mut value = full_payload();
    value.as_object_mut()
        .expect("payload is not an object")
        .remove("location");

    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::MissingFields)
    );
}

#[test]
fn test_create_null_counts_as_missing() {
    let mut value = full_payload();
    value["end_time"] = json!(null);

    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::MissingFields)
    );
}

#[test]
fn test_create_empty_name() {
    let mut value = full_payload();
    value["name"] = json!("   ");

    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::EmptyName)
    );
}

#[test]
fn test_create_capacity_types() {
    let mut value = full_payload();
    value["capacity"] = json!("abc");
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::CapacityType)
    );

    let mut value = full_payload();
    value["capacity"] = json!(4.5);
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::CapacityType)
    );

    let mut value = full_payload();
    value["capacity"] = json!(true);
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::CapacityType)
    );

    let mut value = full_payload();
    value["capacity"] = json!("8");
    let room = validate_create(&payload(value)).expect("integer strings are accepted");
    assert_eq!(room.capacity, 8);
}

#[test]
fn test_create_capacity_must_be_positive() {
    for capacity in [0, -3] {
        let mut value = full_payload();
        value["capacity"] = json!(capacity);
        assert_eq!(
            validate_create(&payload(value)),
            Err(ValidationError::CapacityValue)
        );
    }
}

#[test]
fn test_create_creator_id() {
    let mut value = full_payload();
    value["creator_id"] = json!("not a number");
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::CreatorIdType)
    );

    let mut value = full_payload();
    value["creator_id"] = json!("7");
    let room = validate_create(&payload(value)).expect("integer strings are accepted");
    assert_eq!(room.creator_id, 7);
}

#[test]
fn test_create_date_errors() {
    let mut value = full_payload();
    value["date"] = json!("   ");
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::MissingDate)
    );

    let mut value = full_payload();
    value["date"] = json!("01-05-2024");
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::DateFormat)
    );
}

#[test]
fn test_create_time_errors() {
    let mut value = full_payload();
    value["start_time"] = json!("");
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::MissingStartTime)
    );

    let mut value = full_payload();
    value["start_time"] = json!("1400");
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::StartTimeFormat)
    );

    let mut value = full_payload();
    value["end_time"] = json!(" ");
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::MissingEndTime)
    );

    let mut value = full_payload();
    value["end_time"] = json!("25:00");
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::EndTimeFormat)
    );
}

#[test]
fn test_create_location_and_mode_required() {
    let mut value = full_payload();
    value["location"] = json!("  ");
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::MissingLocation)
    );

    let mut value = full_payload();
    value["mode"] = json!("");
    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::MissingMode)
    );
}

#[test]
fn test_create_reports_first_failure_only() {
    // Both the name and the capacity are bad; the name is checked first.
    let mut value = full_payload();
    value["name"] = json!("  ");
    value["capacity"] = json!("abc");

    assert_eq!(
        validate_create(&payload(value)),
        Err(ValidationError::EmptyName)
    );
}

#[test]
fn test_create_empty_description_accepted() {
    let mut value = full_payload();
    value["description"] = json!("   ");

    let room = validate_create(&payload(value)).expect("expected a valid room");
    assert_eq!(room.description.as_deref(), Some(""));
}

#[test]
fn test_update_empty_payload_changes_nothing() {
    let mut room = stored_room();
    let before = room.clone();

    apply_update(&mut room, &payload(json!({}))).expect("empty update should pass");
    assert_eq!(room, before);
}

#[test]
fn test_update_single_fields() {
    let mut room = stored_room();

    apply_update(&mut room, &payload(json!({ "name": "  Physics " }))).expect("update failed");
    assert_eq!(room.name, "Physics");

    apply_update(&mut room, &payload(json!({ "capacity": "12" }))).expect("update failed");
    assert_eq!(room.capacity, 12);

    apply_update(&mut room, &payload(json!({ "description": " new desc " })))
        .expect("update failed");
    assert_eq!(room.description.as_deref(), Some("new desc"));
}

#[test]
fn test_update_time_combines_with_stored_date() {
    let mut room = stored_room();

    apply_update(&mut room, &payload(json!({ "start_time": "09:30" }))).expect("update failed");

    let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("invalid date");
    assert_eq!(room.start_time, date.and_hms_opt(9, 30, 0).expect("invalid time"));
}

#[test]
fn test_update_time_combines_with_updated_date() {
    // A date earlier in the same payload moves the day the times land on.
    let mut room = stored_room();

    apply_update(
        &mut room,
        &payload(json!({ "date": "2024-06-02", "start_time": "10:00", "end_time": "11:00" })),
    )
    .expect("update failed");

    let date = NaiveDate::from_ymd_opt(2024, 6, 2).expect("invalid date");
    assert_eq!(room.date, date);
    assert_eq!(room.start_time, date.and_hms_opt(10, 0, 0).expect("invalid time"));
    assert_eq!(room.end_time, date.and_hms_opt(11, 0, 0).expect("invalid time"));
}

#[test]
fn test_update_date_alone_leaves_times() {
    let mut room = stored_room();
    let start_before = room.start_time;

    apply_update(&mut room, &payload(json!({ "date": "2024-06-02" }))).expect("update failed");

    assert_eq!(room.date, NaiveDate::from_ymd_opt(2024, 6, 2).expect("invalid date"));
    assert_eq!(room.start_time, start_before);
}

#[test]
fn test_update_rejects_bad_fields() {
    let mut room = stored_room();
    assert_eq!(
        apply_update(&mut room, &payload(json!({ "capacity": 0 }))),
        Err(ValidationError::CapacityValue)
    );

    let mut room = stored_room();
    assert_eq!(
        apply_update(&mut room, &payload(json!({ "capacity": -1 }))),
        Err(ValidationError::CapacityValue)
    );

    let mut room = stored_room();
    assert_eq!(
        apply_update(&mut room, &payload(json!({ "name": " " }))),
        Err(ValidationError::EmptyName)
    );

    let mut room = stored_room();
    assert_eq!(
        apply_update(&mut room, &payload(json!({ "date": "junk" }))),
        Err(ValidationError::DateFormat)
    );

    // Present-but-empty time fields report the format error on update.
    let mut room = stored_room();
    assert_eq!(
        apply_update(&mut room, &payload(json!({ "start_time": "" }))),
        Err(ValidationError::StartTimeFormat)
    );
}

#[test]
fn test_update_earlier_fields_mutate_snapshot_before_abort() {
    // The pass is sequential: the name lands on the snapshot before the
    // capacity aborts. Callers discard the snapshot, so nothing persists.
    let mut room = stored_room();

    assert_eq!(
        apply_update(
            &mut room,
            &payload(json!({ "name": "Physics", "capacity": "abc" })),
        ),
        Err(ValidationError::CapacityType)
    );
    assert_eq!(room.name, "Physics");
    assert_eq!(room.capacity, 4);
}

#[test]
fn test_update_ignores_creator_id() {
    let mut room = stored_room();

    apply_update(&mut room, &payload(json!({ "creator_id": 99 }))).expect("update failed");
    assert_eq!(room.creator_id, 1);
}

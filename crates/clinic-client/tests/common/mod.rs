#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use clinic_client::{Action, ApiClient, ClinicClient, MemoryStorage};
use clinic_core::models::{Role, User};
use serde_json::{Value, json};
use wiremock::MockServer;

pub fn client(server: &MockServer) -> (ClinicClient, MemoryStorage) {
    let storage = MemoryStorage::new();
    let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("api client");
    (ClinicClient::new(api, Arc::new(storage.clone())), storage)
}

pub async fn logged_in(server: &MockServer, token: &str) -> (ClinicClient, MemoryStorage) {
    let (client, storage) = client(server);
    client
        .store()
        .dispatch(Action::SetCredentials {
            user: patient_user(),
            token: token.to_string(),
        })
        .await
        .expect("set credentials");
    (client, storage)
}

pub fn patient_user() -> User {
    User {
        id: Some("u1".into()),
        email: "lina@clinic.test".into(),
        role: Role::Patient,
    }
}

pub fn doctor_json(id: &str) -> Value {
    json!({
        "_id": id,
        "user": { "_id": format!("u-{id}"), "name": "Dr. Rahman", "email": "rahman@clinic.test", "phone": "555-0101" },
        "specialization": "Cardiology",
        "license_number": "LIC-42",
        "address": "12 Main St"
    })
}

pub fn slot_json(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "schedule": "s1",
        "startTime": "09:00",
        "endTime": "09:30",
        "duration_minutes": 30,
        "status": status,
        "__v": 0
    })
}

pub fn appointment_json(id: &str, slot_id: &str) -> Value {
    json!({
        "_id": id,
        "patient": { "_id": "p1", "user": "u1", "date_of_birth": "1990-05-01", "gender": "female" },
        "doctor": doctor_json("d1"),
        "schedule": {
            "_id": slot_id,
            "startTime": "09:00",
            "endTime": "09:30",
            "duration_minutes": 30,
            "status": "booked",
            "schedule": {
                "_id": "s1",
                "date": "2025-06-02",
                "startTime": "09:00",
                "totalSlot": 5,
                "slot_duration_minutes": 30,
                "isActive": true
            }
        },
        "status": "pending",
        "createdAt": "2025-06-01T08:00:00.000Z",
        "updatedAt": "2025-06-01T08:00:00.000Z"
    })
}

pub fn schedule_json(id: &str) -> Value {
    json!({
        "_id": id,
        "doctor": "d1",
        "startTime": "09:00",
        "totalSlot": 5,
        "slot_duration_minutes": 30,
        "isActive": true,
        "date": "2025-06-02"
    })
}

/// Requests the mock server received for `path`
pub async fn hits(server: &MockServer, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == path)
        .count()
}

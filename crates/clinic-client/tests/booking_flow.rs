mod common;

use std::time::Duration;

use assert_json_diff::assert_json_include;
use clinic_client::slices::AppointmentsApi;
use clinic_client::{ClientError, QueryStatus};
use clinic_core::models::{
    AppointmentStatus, CreateAppointmentDto, CreateDoctorScheduleDto, CreatePrescriptionDto,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{appointment_json, hits, logged_in, schedule_json, slot_json};

fn schedule_dto() -> CreateDoctorScheduleDto {
    CreateDoctorScheduleDto {
        doctor: None,
        start_time: "09:00".into(),
        total_slot: 5,
        slot_duration_minutes: 30,
        is_active: Some(true),
        date: "2025-06-02".into(),
    }
}

#[tokio::test]
async fn booked_appointment_appears_pending_in_my_appointments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appointments/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/appointments/user"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([appointment_json("a1", "slot-1")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_partial_json(json!({
            "doctor": "d1",
            "schedule": "s1",
            "scheduleSlot": "slot-1",
            "status": "pending"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "a1",
            "doctor": "d1",
            "schedule": "slot-1",
            "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (client, _) = logged_in(&server, "tok-1").await;

    let mut mine = client
        .store()
        .subscribe_query(AppointmentsApi::mine_query())
        .await
        .unwrap();
    mine.wait_for(|e| e.status == QueryStatus::Success)
        .await
        .unwrap();

    let created = client
        .appointments()
        .create(&CreateAppointmentDto::pending("d1", "s1", "slot-1"))
        .await
        .unwrap();
    assert_json_include!(actual: created, expected: json!({ "_id": "a1" }));

    tokio::time::timeout(
        Duration::from_secs(2),
        mine.wait_for(|e| e.is_fresh() && e.data != Some(json!([]))),
    )
    .await
    .expect("subscription refetched")
    .unwrap();

    let result = client.appointments().mine().await.unwrap();
    let appointments = result.data.unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].status, AppointmentStatus::Pending);
    assert_eq!(appointments[0].slot_id(), Some("slot-1"));
    assert_eq!(hits(&server, "/appointments/user").await, 2);
}

#[tokio::test]
async fn created_schedule_is_listed_with_same_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doctor-schedules/my-schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/doctor-schedules/my-schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([schedule_json("s9")])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/doctor-schedules"))
        .and(body_partial_json(json!({
            "startTime": "09:00",
            "totalSlot": 5,
            "slot_duration_minutes": 30,
            "isActive": true,
            "date": "2025-06-02"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(schedule_json("s9")))
        .expect(1)
        .mount(&server)
        .await;
    let (client, _) = logged_in(&server, "tok-1").await;
    let schedules = client.schedules();

    assert_eq!(schedules.my_schedules().await.unwrap().data, Some(vec![]));
    let created = schedules.create(&schedule_dto()).await.unwrap();
    assert_eq!(created.id, "s9");

    let listed = schedules.my_schedules().await.unwrap().data.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].total_slot, 5);
    assert_eq!(listed[0].slot_duration_minutes, 30);
    assert!(listed[0].is_active);
    assert_eq!(listed[0].date, "2025-06-02");
}

#[tokio::test]
async fn invalid_schedule_is_not_sent() {
    let server = MockServer::start().await;
    let (client, _) = logged_in(&server, "tok-1").await;

    let mut dto = schedule_dto();
    dto.total_slot = 0;
    let err = client.schedules().create(&dto).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let mut dto = schedule_dto();
    dto.date = "02/06/2025".into();
    assert!(client.schedules().create(&dto).await.is_err());

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn booking_refreshes_slot_availability() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doctor-schedules/available-slots/d1"))
        .and(query_param("date", "2025-06-02"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([slot_json("slot-1", "available")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/doctor-schedules/available-slots/d1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([slot_json("slot-1", "booked")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "a1" })))
        .mount(&server)
        .await;
    let (client, _) = logged_in(&server, "tok-1").await;
    let slots = client.slots();

    let before = slots
        .available(Some("d1"), Some("2025-06-02"))
        .await
        .unwrap()
        .data
        .unwrap();
    assert!(before[0].is_available());

    client
        .appointments()
        .create(&CreateAppointmentDto::pending("d1", "s1", "slot-1"))
        .await
        .unwrap();

    let after = slots
        .available(Some("d1"), Some("2025-06-02"))
        .await
        .unwrap()
        .data
        .unwrap();
    assert!(!after[0].is_available());
    assert_eq!(
        hits(&server, "/doctor-schedules/available-slots/d1").await,
        2
    );
}

#[tokio::test]
async fn rejected_booking_changes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appointments/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "Slot already booked"
        })))
        .mount(&server)
        .await;
    let (client, _) = logged_in(&server, "tok-1").await;

    client.appointments().mine().await.unwrap();
    let err = client
        .appointments()
        .create(&CreateAppointmentDto::pending("d1", "s1", "slot-1"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Slot already booked");
    assert_eq!(err.status(), Some(409));

    let mine = client.appointments().mine().await.unwrap();
    assert!(!mine.is_stale);
    assert_eq!(hits(&server, "/appointments/user").await, 1);
}

#[tokio::test]
async fn appointments_by_schedule_are_always_a_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appointments/slot-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(appointment_json("a1", "slot-1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/appointments/slot-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_json("a2", "slot-2"),
            appointment_json("a3", "slot-2")
        ])))
        .mount(&server)
        .await;
    let (client, _) = logged_in(&server, "tok-1").await;
    let appointments = client.appointments();

    let single = appointments.by_schedule(Some("slot-1")).await.unwrap();
    assert_eq!(single.data.unwrap().len(), 1);
    let many = appointments.by_schedule(Some("slot-2")).await.unwrap();
    assert_eq!(many.data.unwrap().len(), 2);
}

#[tokio::test]
async fn path_ids_stay_in_their_own_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appointments/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "marker": "mine" }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/prescriptions/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let (client, _) = logged_in(&server, "tok-1").await;

    let result = client
        .appointments()
        .by_schedule(Some("s1/../user"))
        .await
        .unwrap();
    assert_eq!(result.data, Some(vec![]));
    assert_eq!(hits(&server, "/appointments/s1%2F..%2Fuser").await, 1);
    assert_eq!(hits(&server, "/appointments/user").await, 0);

    client.prescriptions().by_appointment(Some("a/1")).await.unwrap();
    assert_eq!(hits(&server, "/prescriptions/a%2F1").await, 1);

    let skipped = client.appointments().by_schedule(Some("..")).await.unwrap();
    assert_eq!(skipped.status, QueryStatus::Uninitialized);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn prescription_flow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/prescriptions/a1"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/prescriptions/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "rx1",
            "appointment": "a1",
            "patient": "p1",
            "doctor": "d1",
            "description": "Rest and fluids",
            "followUpDate": "2025-06-16"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/prescriptions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "rx1",
            "appointment": "a1",
            "patient": "p1",
            "doctor": "d1",
            "description": "Rest and fluids",
            "followUpDate": "2025-06-16"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (client, _) = logged_in(&server, "tok-1").await;
    let prescriptions = client.prescriptions();

    let none_yet = prescriptions.by_appointment(Some("a1")).await.unwrap();
    assert!(none_yet.is_success());
    assert_eq!(none_yet.data, None);

    let created = prescriptions
        .create(&CreatePrescriptionDto {
            appointment: "a1".into(),
            patient: "p1".into(),
            doctor: "d1".into(),
            description: "Rest and fluids".into(),
            follow_up_date: Some("2025-06-16".into()),
        })
        .await
        .unwrap();
    assert_eq!(created.id, "rx1");

    let found = prescriptions.by_appointment(Some("a1")).await.unwrap();
    assert_eq!(found.data.unwrap().description, "Rest and fluids");
}

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use availability_cell::{HttpSchedulingApi, SchedulingApi};
use patient_cell::{messages, AppointmentLifecycleManager, LifecycleError};
use shared_models::{AppointmentStatus, NoticeSeverity, SchedulingError};
use shared_utils::test_utils::{MockSchedulingResponses, TestConfig};

fn create_test_api(mock_server: &MockServer) -> Arc<dyn SchedulingApi> {
    let config = TestConfig::default().to_app_config(&mock_server.uri());
    Arc::new(HttpSchedulingApi::new(&config).expect("client should build"))
}

fn scheduled_list() -> serde_json::Value {
    MockSchedulingResponses::patient_appointments(
        vec![
            MockSchedulingResponses::patient_appointment("a-1", "2024-06-01", "09:00", "Scheduled"),
            MockSchedulingResponses::patient_appointment("a-2", "2024-06-08", "14:30", "Scheduled"),
        ],
        vec![MockSchedulingResponses::patient_appointment("a-0", "2024-05-01", "10:00", "Completed")],
    )
}

#[tokio::test]
async fn test_load_formats_both_partitions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scheduled_list()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = AppointmentLifecycleManager::new(create_test_api(&mock_server));
    manager.load().await.expect("load should succeed");

    let upcoming = manager.upcoming();
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].display_date, "June 1, 2024");
    assert_eq!(upcoming[0].display_time, "09:00 AM");
    assert_eq!(upcoming[1].display_time, "02:30 PM");
    assert!(upcoming.iter().all(|view| view.show_cancel_button));
    assert_eq!(manager.past()[0].status, AppointmentStatus::Completed);
    assert!(!manager.is_loading());
}

#[tokio::test]
async fn test_cancel_reloads_from_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scheduled_list()))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSchedulingResponses::patient_appointments(
            vec![MockSchedulingResponses::patient_appointment("a-2", "2024-06-08", "14:30", "Scheduled")],
            vec![
                MockSchedulingResponses::patient_appointment("a-1", "2024-06-01", "09:00", "Cancelled"),
                MockSchedulingResponses::patient_appointment("a-0", "2024-05-01", "10:00", "Completed"),
            ],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments/a-1/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSchedulingResponses::confirmation("Cancelled")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = AppointmentLifecycleManager::new(create_test_api(&mock_server));
    assert_ok!(manager.load().await);

    let pending = manager.request_cancellation("a-1").unwrap();
    assert_eq!(pending.prompt(), messages::CANCEL_PROMPT);
    assert_ok!(manager.confirm_cancellation(pending).await);

    // Partition and status come from the reload, not from local edits.
    assert_eq!(manager.upcoming().len(), 1);
    let cancelled = manager.past().into_iter().find(|view| view.id == "a-1").unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert!(!cancelled.show_cancel_button);

    let notices = manager.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, NoticeSeverity::Success);
    assert_eq!(notices[0].message, messages::CANCELLED);
}

#[tokio::test]
async fn test_cancel_succeeds_even_when_reload_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scheduled_list()))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_json(MockSchedulingResponses::error_response("Database offline")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments/a-1/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSchedulingResponses::confirmation("Cancelled")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = AppointmentLifecycleManager::new(create_test_api(&mock_server));
    assert_ok!(manager.load().await);

    let pending = manager.request_cancellation("a-1").unwrap();
    let confirmation = assert_ok!(manager.confirm_cancellation(pending).await);
    assert_eq!(confirmation.message, "Cancelled");

    // The stale list stays until the next successful load.
    let upcoming = manager.upcoming();
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].id, "a-1");
    assert!(!manager.is_loading());

    let notices = manager.take_notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].severity, NoticeSeverity::Success);
    assert_eq!(notices[0].message, messages::CANCELLED);
    assert_eq!(notices[1].severity, NoticeSeverity::Error);
    assert_eq!(notices[1].message, messages::LOAD_FAILED);
}

#[tokio::test]
async fn test_declined_cancellation_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scheduled_list()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments/a-1/cancel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let manager = AppointmentLifecycleManager::new(create_test_api(&mock_server));
    assert_ok!(manager.load().await);

    let pending = manager.request_cancellation("a-1").unwrap();
    manager.decline_cancellation(pending);

    assert_eq!(manager.upcoming().len(), 2);
    assert!(manager.take_notices().is_empty());
}

#[tokio::test]
async fn test_cancel_of_already_cancelled_keeps_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scheduled_list()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments/a-1/cancel"))
        .respond_with(ResponseTemplate::new(404).set_body_json(
            MockSchedulingResponses::error_response("Appointment already cancelled"),
        ))
        .mount(&mock_server)
        .await;

    let manager = AppointmentLifecycleManager::new(create_test_api(&mock_server));
    assert_ok!(manager.load().await);
    let before = manager.upcoming();

    let pending = manager.request_cancellation("a-1").unwrap();
    let result = manager.confirm_cancellation(pending).await;

    assert_matches!(result, Err(LifecycleError::Scheduling(SchedulingError::NotFound(_))));
    assert_eq!(manager.upcoming(), before);
    assert!(!manager.is_loading());

    let notices = manager.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, NoticeSeverity::Error);
    assert_eq!(notices[0].message, "Appointment already cancelled");
}

#[tokio::test]
async fn test_cancel_failure_without_message_uses_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scheduled_list()))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments/a-2/cancel"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let manager = AppointmentLifecycleManager::new(create_test_api(&mock_server));
    assert_ok!(manager.load().await);

    let pending = manager.request_cancellation("a-2").unwrap();
    assert!(manager.confirm_cancellation(pending).await.is_err());
    assert_eq!(manager.take_notices()[0].message, messages::CANCEL_FAILED);
}

#[tokio::test]
async fn test_cancelled_entries_cannot_be_cancelled_again() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSchedulingResponses::patient_appointments(
            vec![],
            vec![MockSchedulingResponses::patient_appointment("a-9", "2024-05-01", "10:00", "Cancelled")],
        )))
        .mount(&mock_server)
        .await;

    let manager = AppointmentLifecycleManager::new(create_test_api(&mock_server));
    assert_ok!(manager.load().await);

    assert_matches!(manager.request_cancellation("a-9"), Err(LifecycleError::NotCancellable(_)));
    assert_matches!(manager.request_cancellation("zzz"), Err(LifecycleError::UnknownAppointment(_)));
}

#[tokio::test]
async fn test_second_action_while_loading_is_busy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(scheduled_list())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = AppointmentLifecycleManager::new(create_test_api(&mock_server));

    let (first, second) = futures::join!(manager.load(), manager.load());

    assert!(first.is_ok());
    assert_matches!(second, Err(LifecycleError::Busy));
    assert!(!manager.is_loading());
}

#[tokio::test]
async fn test_load_is_refused_during_cancel_and_reload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scheduled_list()))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments/a-1/cancel"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Cancelled" }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = AppointmentLifecycleManager::new(create_test_api(&mock_server));
    assert_ok!(manager.load().await);

    let pending = manager.request_cancellation("a-1").unwrap();
    let (cancelled, reload) = futures::join!(manager.confirm_cancellation(pending), manager.load());

    assert!(cancelled.is_ok());
    assert_matches!(reload, Err(LifecycleError::Busy));
    assert!(!manager.is_loading());
}

#[tokio::test]
async fn test_load_failure_shows_fixed_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients/me/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_json(MockSchedulingResponses::error_response("boom")))
        .mount(&mock_server)
        .await;

    let manager = AppointmentLifecycleManager::new(create_test_api(&mock_server));
    assert!(manager.load().await.is_err());

    let notices = manager.take_notices();
    assert_eq!(notices[0].message, messages::LOAD_FAILED);
    assert!(manager.upcoming().is_empty());
}

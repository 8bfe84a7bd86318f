use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use availability_cell::{HttpSchedulingApi, SchedulingApi};
use doctor_cell::{DoctorDirectory, MISSING};
use shared_models::NoticeSeverity;
use shared_utils::test_utils::{MockSchedulingResponses, TestConfig};

fn create_test_api(mock_server: &MockServer) -> Arc<dyn SchedulingApi> {
    let config = TestConfig::default().to_app_config(&mock_server.uri());
    Arc::new(HttpSchedulingApi::new(&config).expect("client should build"))
}

#[tokio::test]
async fn test_load_formats_doctors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSchedulingResponses::doctor("d1", "Dr. One"),
            { "id": "d2", "name": "Dr. Two" },
        ])))
        .mount(&mock_server)
        .await;

    let mut directory = DoctorDirectory::new(create_test_api(&mock_server));
    let doctors = assert_ok!(directory.load().await);

    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors[0].display_days, "Monday, Wednesday, Friday");
    assert_eq!(doctors[0].display_hours, "09:00 AM - 05:00 PM");
    assert_eq!(doctors[1].display_days, MISSING);
    assert_eq!(doctors[1].display_hours, MISSING);
    assert!(!directory.is_loading());
}

#[tokio::test]
async fn test_load_failure_raises_error_notice() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(503).set_body_json(MockSchedulingResponses::error_response("Maintenance")))
        .mount(&mock_server)
        .await;

    let mut directory = DoctorDirectory::new(create_test_api(&mock_server));
    assert_err!(directory.load().await);

    let notices = directory.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, NoticeSeverity::Error);
    assert_eq!(notices[0].message, "Maintenance");
}

#[tokio::test]
async fn test_open_hands_doctor_to_booking_flow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSchedulingResponses::doctor("d1", "Dr. One"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/doctors/d1/slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["09:00"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut directory = DoctorDirectory::new(create_test_api(&mock_server));
    assert_ok!(directory.load().await);

    assert!(directory.open("unknown").is_none());

    let mut machine = directory.open("d1").expect("listed doctor should open");
    assert_eq!(machine.doctor_id(), "d1");
    assert_eq!(machine.doctor_name(), "Dr. One");

    machine.select_treatment("t-1");
    machine.select_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert_eq!(assert_ok!(machine.check_availability().await).len(), 1);
}

use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub api_key: String,
    pub auth_token: Option<String>,
    pub record_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_key: "test-api-key".to_string(),
            auth_token: Some("test-auth-token".to_string()),
            record_base_url: "https://clinic.test".to_string(),
        }
    }
}

impl TestConfig {
    /// Config aimed at a mock server (`MockServer::uri()`).
    pub fn to_app_config(&self, service_url: &str) -> AppConfig {
        let mut config = AppConfig::for_service(service_url, self.api_key.clone());
        config.scheduling_auth_token = self.auth_token.clone();
        config.record_base_url = self.record_base_url.clone();
        config.request_timeout_secs = 5;
        config
    }
}

pub struct MockSchedulingResponses;

impl MockSchedulingResponses {
    pub fn treatment(id: &str, name: &str) -> Value {
        json!({ "id": id, "name": name })
    }

    pub fn doctor(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "working_days": "Monday;Wednesday;Friday",
            "working_hours_start": 32_400_000u64,
            "working_hours_end": 61_200_000u64
        })
    }

    pub fn calendar_record(doctor_id: &str, doctor_name: &str, date: &str, start: &str, end: &str) -> Value {
        json!({
            "id": Uuid::new_v4().to_string(),
            "patient": "Test Patient",
            "treatment": "Consultation",
            "doctor_id": doctor_id,
            "doctor_name": doctor_name,
            "date": date,
            "start_time": start,
            "end_time": end
        })
    }

    pub fn patient_appointment(id: &str, date: &str, start: &str, status: &str) -> Value {
        json!({
            "id": id,
            "doctor_name": "Dr. Test",
            "treatment_name": "Consultation",
            "date": date,
            "start_time": start,
            "end_time": null,
            "status": status
        })
    }

    pub fn patient_appointments(upcoming: Vec<Value>, past: Vec<Value>) -> Value {
        json!({ "upcoming": upcoming, "past": past })
    }

    pub fn invoice(id: &str, status: &str, payment_link: Option<&str>) -> Value {
        json!({
            "id": id,
            "invoice_number": format!("INV-{}", id),
            "date": "2024-06-01",
            "amount": 120.5,
            "status": status,
            "payment_link": payment_link
        })
    }

    pub fn confirmation(message: &str) -> Value {
        json!({ "message": message })
    }

    pub fn error_response(message: &str) -> Value {
        json!({ "message": message })
    }
}

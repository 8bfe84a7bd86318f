// libs/availability-cell/src/models.rs
use serde::{Deserialize, Serialize};

/// Error payload returned by the scheduling service on non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Pull the human-readable message out of a raw error body. Falls back to
    /// the raw text when it is not JSON.
    pub fn extract_message(raw: &str) -> String {
        match serde_json::from_str::<ErrorBody>(raw) {
            Ok(body) => body
                .message
                .or(body.error)
                .unwrap_or_default(),
            Err(_) => raw.trim().to_string(),
        }
    }
}

pub mod paths {
    pub const TREATMENTS: &str = "/treatments";
    pub const DOCTORS: &str = "/doctors";
    pub const APPOINTMENTS: &str = "/appointments";
    pub const MY_PATIENT: &str = "/patients/me";
    pub const MY_APPOINTMENTS: &str = "/patients/me/appointments";
    pub const MY_PROFILE_STATUS: &str = "/patients/me/profile-status";
    pub const MY_INVOICES: &str = "/patients/me/invoices";

    pub fn doctor_slots(doctor_id: &str) -> String {
        format!("/doctors/{}/slots", urlencoding::encode(doctor_id))
    }

    pub fn cancel_appointment(appointment_id: &str) -> String {
        format!("/appointments/{}/cancel", urlencoding::encode(appointment_id))
    }
}

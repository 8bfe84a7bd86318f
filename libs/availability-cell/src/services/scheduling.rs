// libs/availability-cell/src/services/scheduling.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::{
    BookingRequest, CalendarRecord, Confirmation, Doctor, Invoice, PatientAppointments,
    PatientIdentity, ProfileStatus, SchedulingError, Slot, Treatment,
};

use crate::models::paths;
use crate::services::transport::ApiClient;

/// Request/response contract of the external scheduling service. The service
/// owns availability and persistence; callers only drive it.
#[async_trait]
pub trait SchedulingApi: Send + Sync {
    async fn list_treatments(&self) -> Result<Vec<Treatment>, SchedulingError>;

    async fn list_all_doctors(&self) -> Result<Vec<Doctor>, SchedulingError>;

    async fn list_appointments(&self) -> Result<Vec<CalendarRecord>, SchedulingError>;

    /// An empty list is a valid outcome, not an error.
    async fn list_available_slots(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        treatment_id: &str,
    ) -> Result<Vec<Slot>, SchedulingError>;

    /// The service performs the authoritative conflict check here.
    async fn book_appointment(&self, request: &BookingRequest) -> Result<Confirmation, SchedulingError>;

    async fn list_patient_appointments(&self) -> Result<PatientAppointments, SchedulingError>;

    async fn cancel_appointment(&self, appointment_id: &str) -> Result<Confirmation, SchedulingError>;

    async fn get_my_patient_id(&self) -> Result<Option<String>, SchedulingError>;

    async fn is_profile_complete(&self) -> Result<bool, SchedulingError>;

    async fn list_patient_invoices(&self) -> Result<Vec<Invoice>, SchedulingError>;
}

/// Reject blank identifiers before they reach the wire.
pub fn require_field(field: &str, value: &str) -> Result<(), SchedulingError> {
    if value.trim().is_empty() {
        return Err(SchedulingError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub struct HttpSchedulingApi {
    api: ApiClient,
}

impl HttpSchedulingApi {
    pub fn new(config: &AppConfig) -> Result<Self, SchedulingError> {
        Ok(Self {
            api: ApiClient::new(config)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.api.get_base_url()
    }
}

#[async_trait]
impl SchedulingApi for HttpSchedulingApi {
    async fn list_treatments(&self) -> Result<Vec<Treatment>, SchedulingError> {
        debug!("Fetching treatment catalog");

        let treatments: Option<Vec<Treatment>> = self.api
            .request(Method::GET, paths::TREATMENTS, &[], None)
            .await?;

        Ok(treatments.unwrap_or_default())
    }

    async fn list_all_doctors(&self) -> Result<Vec<Doctor>, SchedulingError> {
        debug!("Fetching doctor list");

        let doctors: Option<Vec<Doctor>> = self.api
            .request(Method::GET, paths::DOCTORS, &[], None)
            .await?;

        Ok(doctors.unwrap_or_default())
    }

    async fn list_appointments(&self) -> Result<Vec<CalendarRecord>, SchedulingError> {
        debug!("Fetching all appointments for calendar");

        let records: Option<Vec<CalendarRecord>> = self.api
            .request(Method::GET, paths::APPOINTMENTS, &[], None)
            .await?;

        Ok(records.unwrap_or_default())
    }

    async fn list_available_slots(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        treatment_id: &str,
    ) -> Result<Vec<Slot>, SchedulingError> {
        require_field("doctor_id", doctor_id)?;
        require_field("treatment_id", treatment_id)?;

        let date_param = date.format("%Y-%m-%d").to_string();
        debug!("Fetching slots for doctor {} on {} (treatment {})", doctor_id, date_param, treatment_id);

        let slots: Option<Vec<Slot>> = self.api
            .request(
                Method::GET,
                &paths::doctor_slots(doctor_id),
                &[("date", date_param.as_str()), ("treatment_id", treatment_id)],
                None,
            )
            .await?;

        let slots = slots.unwrap_or_default();
        debug!("Doctor {} has {} open slots on {}", doctor_id, slots.len(), date_param);
        Ok(slots)
    }

    async fn book_appointment(&self, request: &BookingRequest) -> Result<Confirmation, SchedulingError> {
        require_field("doctor_id", &request.doctor_id)?;
        require_field("treatment_id", &request.treatment_id)?;

        info!("Booking {} on {} at {} with doctor {}",
              request.treatment_id, request.date, request.start_time, request.doctor_id);

        let body = json!(request);
        let confirmation: Option<Confirmation> = self.api
            .request(Method::POST, paths::APPOINTMENTS, &[], Some(body))
            .await
            .inspect_err(|e| warn!("Booking rejected for doctor {}: {}", request.doctor_id, e))?;

        Ok(confirmation.unwrap_or_default())
    }

    async fn list_patient_appointments(&self) -> Result<PatientAppointments, SchedulingError> {
        debug!("Fetching appointments for current patient");

        let appointments: Option<PatientAppointments> = self.api
            .request(Method::GET, paths::MY_APPOINTMENTS, &[], None)
            .await?;

        Ok(appointments.unwrap_or_default())
    }

    async fn cancel_appointment(&self, appointment_id: &str) -> Result<Confirmation, SchedulingError> {
        require_field("appointment_id", appointment_id)?;

        info!("Cancelling appointment {}", appointment_id);

        let confirmation: Option<Confirmation> = self.api
            .request(Method::POST, &paths::cancel_appointment(appointment_id), &[], None)
            .await
            .inspect_err(|e| warn!("Cancellation of {} rejected: {}", appointment_id, e))?;

        Ok(confirmation.unwrap_or_default())
    }

    async fn get_my_patient_id(&self) -> Result<Option<String>, SchedulingError> {
        let identity: Option<PatientIdentity> = self.api
            .request(Method::GET, paths::MY_PATIENT, &[], None)
            .await?;

        Ok(identity
            .and_then(|identity| identity.patient_id)
            .filter(|id| !id.trim().is_empty()))
    }

    async fn is_profile_complete(&self) -> Result<bool, SchedulingError> {
        let status: Option<ProfileStatus> = self.api
            .request(Method::GET, paths::MY_PROFILE_STATUS, &[], None)
            .await?;

        Ok(status.map(|status| status.complete).unwrap_or(false))
    }

    async fn list_patient_invoices(&self) -> Result<Vec<Invoice>, SchedulingError> {
        debug!("Fetching invoices for current patient");

        let invoices: Option<Vec<Invoice>> = self.api
            .request(Method::GET, paths::MY_INVOICES, &[], None)
            .await?;

        Ok(invoices.unwrap_or_default())
    }
}

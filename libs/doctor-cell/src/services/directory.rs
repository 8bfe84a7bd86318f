// libs/doctor-cell/src/services/directory.rs
use std::sync::Arc;
use tracing::{debug, error};

use availability_cell::SchedulingApi;
use booking_cell::SlotSelectionMachine;
use shared_models::{Notice, SchedulingError};

use crate::models::{DoctorView, LOAD_FAILED};

/// The clinic's doctors, and the entry point into booking with one of them.
pub struct DoctorDirectory {
    api: Arc<dyn SchedulingApi>,
    doctors: Vec<DoctorView>,
    is_loading: bool,
    notices: Vec<Notice>,
}

impl DoctorDirectory {
    pub fn new(api: Arc<dyn SchedulingApi>) -> Self {
        Self {
            api,
            doctors: Vec::new(),
            is_loading: false,
            notices: Vec::new(),
        }
    }

    pub fn doctors(&self) -> &[DoctorView] {
        &self.doctors
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub async fn load(&mut self) -> Result<&[DoctorView], SchedulingError> {
        self.is_loading = true;
        let result = self.api.list_all_doctors().await;
        self.is_loading = false;

        match result {
            Ok(doctors) => {
                debug!("Loaded {} doctors", doctors.len());
                self.doctors = doctors.iter().map(DoctorView::from).collect();
                Ok(&self.doctors)
            }
            Err(e) => {
                error!("Error loading doctors: {}", e);
                self.notices.push(Notice::error(e.user_message(LOAD_FAILED)));
                Err(e)
            }
        }
    }

    pub fn find(&self, doctor_id: &str) -> Option<&DoctorView> {
        self.doctors.iter().find(|doctor| doctor.id == doctor_id)
    }

    /// Start a booking flow for a listed doctor.
    pub fn open(&self, doctor_id: &str) -> Option<SlotSelectionMachine> {
        let doctor = self.find(doctor_id)?;
        debug!("Opening booking for {} ({})", doctor.name, doctor.id);
        Some(SlotSelectionMachine::new(
            Arc::clone(&self.api),
            doctor.id.clone(),
            doctor.name.clone(),
        ))
    }
}

// libs/patient-cell/src/services/profile.rs
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use availability_cell::SchedulingApi;
use shared_models::{Notice, SchedulingError};

use crate::models::{messages, FundingType, ProfileView};

/// Completeness banner and funding-dependent fields of the patient's own
/// profile.
pub struct ProfileStatusService {
    api: Arc<dyn SchedulingApi>,
    view: ProfileView,
    is_loading: bool,
    notices: Vec<Notice>,
}

impl ProfileStatusService {
    pub fn new(api: Arc<dyn SchedulingApi>) -> Self {
        Self {
            api,
            view: ProfileView::default(),
            is_loading: false,
            notices: Vec::new(),
        }
    }

    pub fn view(&self) -> &ProfileView {
        &self.view
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.view.patient_id.as_deref()
    }

    pub fn show_incomplete_banner(&self) -> bool {
        self.view.show_incomplete_banner
    }

    pub fn show_insurance_field(&self) -> bool {
        self.view.show_insurance_field
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Resolve the caller's patient record and whether it still needs filling
    /// in.
    pub async fn initialize(&mut self) -> Result<(), SchedulingError> {
        self.is_loading = true;
        let result = self.resolve().await;
        self.is_loading = false;

        if let Err(e) = &result {
            error!("Error loading patient profile: {}", e);
            self.notices.push(Notice::error(messages::PROFILE_LOAD_FAILED));
        }
        result
    }

    async fn resolve(&mut self) -> Result<(), SchedulingError> {
        self.view.patient_id = self.api.get_my_patient_id().await?;

        let Some(patient_id) = self.view.patient_id.as_deref() else {
            warn!("No patient record linked to the current user");
            self.notices.push(Notice::error(messages::NO_PATIENT_RECORD));
            return Ok(());
        };
        debug!("Resolved patient {}", patient_id);

        let complete = self.api.is_profile_complete().await?;
        self.view.show_incomplete_banner = !complete;
        Ok(())
    }

    /// Funding type as stored on, or just picked for, the record.
    pub fn set_funding_type(&mut self, funding: Option<&str>) {
        self.view.show_insurance_field = FundingType::parse(funding).shows_insurance_field();
    }

    pub fn mark_saved(&mut self) {
        info!("Patient profile saved");
        self.notices.push(Notice::success(messages::PROFILE_SAVED));
        self.view.show_incomplete_banner = false;
    }

    pub fn mark_save_failed(&mut self, reason: &str) {
        error!("Error updating profile: {}", reason);
        self.notices.push(Notice::error(messages::PROFILE_SAVE_FAILED));
    }
}

// libs/patient-cell/src/services/lifecycle.rs
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use availability_cell::SchedulingApi;
use shared_models::{Confirmation, Notice};

use crate::error::LifecycleError;
use crate::models::{format_appointments, messages, AppointmentView, PendingCancellation};

/// Interactive yes/no confirmation for destructive actions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Default)]
struct LifecycleState {
    upcoming: Vec<AppointmentView>,
    past: Vec<AppointmentView>,
    loaded: bool,
    notices: Vec<Notice>,
}

/// Held for the duration of one network-bound lifecycle step.
struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A patient's own appointments, plus the confirm-then-cancel-then-reload
/// sequence. One action at a time: a second one started while the first is
/// in flight fails with `Busy`.
pub struct AppointmentLifecycleManager {
    api: Arc<dyn SchedulingApi>,
    state: Mutex<LifecycleState>,
    loading: AtomicBool,
}

impl AppointmentLifecycleManager {
    pub fn new(api: Arc<dyn SchedulingApi>) -> Self {
        Self {
            api,
            state: Mutex::new(LifecycleState::default()),
            loading: AtomicBool::new(false),
        }
    }

    fn state(&self) -> MutexGuard<'_, LifecycleState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self) -> Result<LoadingGuard<'_>, LifecycleError> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LifecycleError::Busy)?;
        Ok(LoadingGuard { flag: &self.loading })
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn upcoming(&self) -> Vec<AppointmentView> {
        self.state().upcoming.clone()
    }

    pub fn past(&self) -> Vec<AppointmentView> {
        self.state().past.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.state().loaded
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state().notices)
    }

    fn find(&self, appointment_id: &str) -> Option<AppointmentView> {
        let state = self.state();
        state
            .upcoming
            .iter()
            .chain(state.past.iter())
            .find(|view| view.id == appointment_id)
            .cloned()
    }

    /// Replace both partitions from the server.
    pub async fn load(&self) -> Result<(), LifecycleError> {
        let _guard = self.begin()?;
        self.refresh().await
    }

    async fn refresh(&self) -> Result<(), LifecycleError> {
        match self.api.list_patient_appointments().await {
            Ok(appointments) => {
                debug!("Loaded {} upcoming and {} past appointments",
                       appointments.upcoming.len(), appointments.past.len());

                let mut state = self.state();
                state.upcoming = format_appointments(&appointments.upcoming);
                state.past = format_appointments(&appointments.past);
                state.loaded = true;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load patient appointments: {}", e);
                self.state().notices.push(Notice::error(messages::LOAD_FAILED));
                Err(e.into())
            }
        }
    }

    /// First step of a cancellation. Nothing is sent until the returned
    /// request is confirmed.
    pub fn request_cancellation(&self, appointment_id: &str) -> Result<PendingCancellation, LifecycleError> {
        if self.is_loading() {
            return Err(LifecycleError::Busy);
        }

        let view = self
            .find(appointment_id)
            .ok_or_else(|| LifecycleError::UnknownAppointment(appointment_id.to_string()))?;
        if !view.show_cancel_button {
            return Err(LifecycleError::NotCancellable(view.id));
        }

        Ok(PendingCancellation {
            appointment_id: view.id,
        })
    }

    pub fn decline_cancellation(&self, pending: PendingCancellation) {
        debug!("Cancellation of {} declined", pending.appointment_id);
    }

    /// Cancel, then reload the whole list. On failure the list is left as it
    /// was.
    pub async fn confirm_cancellation(&self, pending: PendingCancellation) -> Result<Confirmation, LifecycleError> {
        let _guard = self.begin()?;
        let appointment_id = pending.appointment_id;

        match self.api.cancel_appointment(&appointment_id).await {
            Ok(confirmation) => {
                info!("Appointment {} cancelled", appointment_id);
                self.state().notices.push(Notice::success(messages::CANCELLED));

                if self.refresh().await.is_err() {
                    warn!("Reload after cancelling {} failed", appointment_id);
                }
                Ok(confirmation)
            }
            Err(e) => {
                warn!("Cancelling appointment {} failed: {}", appointment_id, e);
                self.state()
                    .notices
                    .push(Notice::error(e.user_message(messages::CANCEL_FAILED)));
                Err(e.into())
            }
        }
    }

    /// Ask, then cancel. `Ok(None)` when the user says no.
    pub async fn cancel_with_prompt(
        &self,
        appointment_id: &str,
        prompt: &dyn ConfirmPrompt,
    ) -> Result<Option<Confirmation>, LifecycleError> {
        let pending = self.request_cancellation(appointment_id)?;

        if !prompt.confirm(pending.prompt()).await {
            self.decline_cancellation(pending);
            return Ok(None);
        }

        self.confirm_cancellation(pending).await.map(Some)
    }
}

use thiserror::Error;

use shared_models::SchedulingError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Another appointment action is still in progress")]
    Busy,

    #[error("Appointment {0} is not in the loaded list")]
    UnknownAppointment(String),

    #[error("Appointment {0} is already cancelled")]
    NotCancellable(String),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
}

use thiserror::Error;

use shared_models::{SchedulingError, Slot};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Select a treatment and a date before checking availability")]
    MissingSelection,

    #[error("No slot selected")]
    NoSlotSelected,

    #[error("Slot {0} is not in the current availability list")]
    UnknownSlot(Slot),

    #[error("Booking has not been requested for confirmation")]
    NotConfirming,

    #[error("Confirmation is open; confirm or decline first")]
    ConfirmationOpen,

    #[error("Slot fetch was superseded by a newer request")]
    Superseded,

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
}

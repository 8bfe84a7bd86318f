// libs/booking-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_models::Slot;

/// Where the booking flow for one doctor currently stands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    Idle,
    /// Treatment catalog request in flight.
    TreatmentPending,
    /// Catalog available; waiting for treatment and date.
    TreatmentChosen,
    SlotsLoading,
    SlotsReady,
    SlotSelected,
    ConfirmPending,
    Booking,
    Booked,
    BookingFailed,
}

impl fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowPhase::Idle => write!(f, "idle"),
            FlowPhase::TreatmentPending => write!(f, "treatment_pending"),
            FlowPhase::TreatmentChosen => write!(f, "treatment_chosen"),
            FlowPhase::SlotsLoading => write!(f, "slots_loading"),
            FlowPhase::SlotsReady => write!(f, "slots_ready"),
            FlowPhase::SlotSelected => write!(f, "slot_selected"),
            FlowPhase::ConfirmPending => write!(f, "confirm_pending"),
            FlowPhase::Booking => write!(f, "booking"),
            FlowPhase::Booked => write!(f, "booked"),
            FlowPhase::BookingFailed => write!(f, "booking_failed"),
        }
    }
}

/// The single active (treatment, date, slot) tuple plus the confirmation gate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_treatment_id: Option<String>,
    pub selected_date: Option<NaiveDate>,
    pub selected_slot: Option<Slot>,
    pub show_confirm: bool,
}

impl SelectionState {
    /// "Check Availability" is only enabled once both inputs are set.
    pub fn can_check_availability(&self) -> bool {
        self.selected_treatment_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
            && self.selected_date.is_some()
    }
}

/// Option for the treatment picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreatmentOption {
    pub label: String,
    pub value: String,
}

pub mod messages {
    pub const NO_SLOTS_TITLE: &str = "No Slots";
    pub const NO_SLOTS: &str = "No available slots for this date.";
    pub const SELECT_SLOT_FIRST: &str = "Please select a slot first.";
    pub const TREATMENTS_TITLE: &str = "Treatments unavailable";
    pub const TREATMENTS_FAILED: &str = "Could not load treatments";
    pub const SLOTS_FAILED: &str = "Could not load available slots.";
    pub const BOOKING_FAILED: &str = "Could not book the appointment.";
    pub const BOOKED: &str = "Appointment booked.";
    pub const RECHECK_TITLE: &str = "Slot taken";
    pub const RECHECK: &str = "That slot is no longer available. Check availability again to see open slots.";
}

// libs/booking-cell/src/services/selection.rs
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

use availability_cell::SchedulingApi;
use shared_models::{BookingRequest, Confirmation, Notice, SchedulingError, Slot, Treatment};

use crate::error::BookingError;
use crate::models::{messages, FlowPhase, SelectionState, TreatmentOption};
use crate::services::sequence::{RequestSequencer, RequestToken};

/// A slot fetch that has been issued but not yet applied. Running it does not
/// borrow the machine, so a newer fetch may be issued while it is in flight.
#[derive(Debug, Clone)]
pub struct SlotFetch {
    token: RequestToken,
    doctor_id: String,
    date: NaiveDate,
    treatment_id: String,
}

impl SlotFetch {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub async fn run(self, api: &dyn SchedulingApi) -> SlotFetchOutcome {
        let result = api
            .list_available_slots(&self.doctor_id, self.date, &self.treatment_id)
            .await;

        SlotFetchOutcome {
            token: self.token,
            result,
        }
    }
}

#[derive(Debug)]
pub struct SlotFetchOutcome {
    token: RequestToken,
    result: Result<Vec<Slot>, SchedulingError>,
}

/// Drives treatment -> date -> slots -> slot -> confirm -> book for a single
/// doctor.
pub struct SlotSelectionMachine {
    api: Arc<dyn SchedulingApi>,
    doctor_id: String,
    doctor_name: String,
    treatments: Vec<Treatment>,
    slots: Vec<Slot>,
    selection: SelectionState,
    phase: FlowPhase,
    needs_recheck: bool,
    sequencer: RequestSequencer,
    notices: Vec<Notice>,
}

impl SlotSelectionMachine {
    pub fn new(
        api: Arc<dyn SchedulingApi>,
        doctor_id: impl Into<String>,
        doctor_name: impl Into<String>,
    ) -> Self {
        Self {
            api,
            doctor_id: doctor_id.into(),
            doctor_name: doctor_name.into(),
            treatments: Vec::new(),
            slots: Vec::new(),
            selection: SelectionState::default(),
            phase: FlowPhase::Idle,
            needs_recheck: false,
            sequencer: RequestSequencer::new(),
            notices: Vec::new(),
        }
    }

    // --- accessors -----------------------------------------------------------

    pub fn doctor_id(&self) -> &str {
        &self.doctor_id
    }

    pub fn doctor_name(&self) -> &str {
        &self.doctor_name
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn treatments(&self) -> &[Treatment] {
        &self.treatments
    }

    pub fn treatment_options(&self) -> Vec<TreatmentOption> {
        self.treatments
            .iter()
            .map(|t| TreatmentOption {
                label: t.name.clone(),
                value: t.id.clone(),
            })
            .collect()
    }

    pub fn is_slot_selected(&self, slot: &Slot) -> bool {
        self.selection.selected_slot.as_ref() == Some(slot)
    }

    pub fn can_check_availability(&self) -> bool {
        self.selection.can_check_availability()
    }

    /// Set after a booking conflict: the shown slot list was dropped and the
    /// user has to check availability again.
    pub fn needs_recheck(&self) -> bool {
        self.needs_recheck
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- catalog -------------------------------------------------------------

    /// Load the treatment catalog. Failure leaves the flow usable with no
    /// options and a warning.
    pub async fn open(&mut self) {
        self.phase = FlowPhase::TreatmentPending;

        match self.api.list_treatments().await {
            Ok(treatments) => {
                debug!("Loaded {} treatments for doctor {}", treatments.len(), self.doctor_id);
                self.treatments = treatments;
            }
            Err(e) => {
                warn!("Could not load treatments: {}", e);
                self.treatments.clear();
                self.notices.push(Notice::warning(messages::TREATMENTS_TITLE, messages::TREATMENTS_FAILED));
            }
        }

        self.phase = FlowPhase::TreatmentChosen;
    }

    // --- inputs --------------------------------------------------------------

    pub fn select_treatment(&mut self, treatment_id: impl Into<String>) {
        let treatment_id = treatment_id.into();
        if self.selection.selected_treatment_id.as_deref() == Some(treatment_id.as_str()) {
            return;
        }

        debug!("Treatment changed to {}", treatment_id);
        self.selection.selected_treatment_id = Some(treatment_id);
        self.invalidate_slots();
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        if self.selection.selected_date == Some(date) {
            return;
        }

        debug!("Date changed to {}", date);
        self.selection.selected_date = Some(date);
        self.invalidate_slots();
    }

    /// Drop the slot list, the chosen slot and any in-flight fetch.
    fn invalidate_slots(&mut self) {
        self.sequencer.invalidate();
        self.slots.clear();
        self.selection.selected_slot = None;
        self.selection.show_confirm = false;
        self.needs_recheck = false;
        self.phase = FlowPhase::TreatmentChosen;
    }

    // --- availability --------------------------------------------------------

    /// Issue a slot fetch for the current inputs. The previous list is
    /// cleared immediately and every earlier fetch becomes stale.
    pub fn begin_slot_fetch(&mut self) -> Result<SlotFetch, BookingError> {
        if self.selection.show_confirm {
            return Err(BookingError::ConfirmationOpen);
        }

        let (treatment_id, date) = match (&self.selection.selected_treatment_id, self.selection.selected_date) {
            (Some(treatment_id), Some(date)) if self.selection.can_check_availability() => {
                (treatment_id.clone(), date)
            }
            _ => return Err(BookingError::MissingSelection),
        };

        self.slots.clear();
        self.selection.selected_slot = None;
        self.phase = FlowPhase::SlotsLoading;

        let token = self.sequencer.issue();
        debug!("Fetching slots for doctor {} on {} (token {})", self.doctor_id, date, token.value());

        Ok(SlotFetch {
            token,
            doctor_id: self.doctor_id.clone(),
            date,
            treatment_id,
        })
    }

    /// Apply a finished fetch. Returns `Superseded` (and changes nothing) when
    /// a newer fetch was issued or the inputs moved on in the meantime.
    pub fn apply_slot_fetch(&mut self, outcome: SlotFetchOutcome) -> Result<&[Slot], BookingError> {
        if !self.sequencer.is_current(outcome.token) {
            debug!("Discarding stale slot response (token {})", outcome.token.value());
            return Err(BookingError::Superseded);
        }

        self.phase = FlowPhase::SlotsReady;

        match outcome.result {
            Ok(slots) => {
                self.slots = slots;
                self.needs_recheck = false;

                if self.slots.is_empty() {
                    info!("No slots for doctor {} on {:?}", self.doctor_id, self.selection.selected_date);
                    self.notices.push(Notice::warning(messages::NO_SLOTS_TITLE, messages::NO_SLOTS));
                }

                Ok(&self.slots)
            }
            Err(e) => {
                warn!("Slot fetch failed for doctor {}: {}", self.doctor_id, e);
                self.slots.clear();
                self.notices.push(Notice::error(e.user_message(messages::SLOTS_FAILED)));
                Err(BookingError::Scheduling(e))
            }
        }
    }

    /// "Check Availability": issue, await and apply a fetch.
    pub async fn check_availability(&mut self) -> Result<&[Slot], BookingError> {
        let fetch = self.begin_slot_fetch()?;
        let outcome = fetch.run(self.api.as_ref()).await;
        self.apply_slot_fetch(outcome)
    }

    // --- slot choice ---------------------------------------------------------

    /// Choose a slot from the current list, replacing any previous choice.
    pub fn select_slot(&mut self, slot: Slot) -> Result<(), BookingError> {
        if self.selection.show_confirm {
            return Err(BookingError::ConfirmationOpen);
        }
        if !self.slots.contains(&slot) {
            return Err(BookingError::UnknownSlot(slot));
        }

        self.selection.selected_slot = Some(slot);
        self.phase = FlowPhase::SlotSelected;
        Ok(())
    }

    // --- confirmation gate ---------------------------------------------------

    /// "Book": opens the confirmation gate. Refused locally without a chosen
    /// slot.
    pub fn request_booking(&mut self) -> Result<(), BookingError> {
        if self.selection.selected_slot.is_none() {
            self.notices.push(Notice::error(messages::SELECT_SLOT_FIRST));
            return Err(BookingError::NoSlotSelected);
        }

        self.selection.show_confirm = true;
        self.phase = FlowPhase::ConfirmPending;
        Ok(())
    }

    pub fn decline_booking(&mut self) {
        if self.phase != FlowPhase::ConfirmPending {
            return;
        }

        self.selection.show_confirm = false;
        self.phase = FlowPhase::SlotSelected;
    }

    /// Issue exactly one booking call for an open confirmation gate.
    pub async fn confirm_booking(&mut self) -> Result<Confirmation, BookingError> {
        if self.phase != FlowPhase::ConfirmPending || !self.selection.show_confirm {
            return Err(BookingError::NotConfirming);
        }

        let request = match (
            &self.selection.selected_treatment_id,
            self.selection.selected_date,
            self.selection.selected_slot,
        ) {
            (Some(treatment_id), Some(date), Some(slot)) => Some(BookingRequest {
                doctor_id: self.doctor_id.clone(),
                treatment_id: treatment_id.clone(),
                date,
                start_time: slot,
            }),
            _ => None,
        };

        let Some(request) = request else {
            self.selection.show_confirm = false;
            self.phase = FlowPhase::BookingFailed;
            return Err(BookingError::NoSlotSelected);
        };

        self.phase = FlowPhase::Booking;
        let result = self.api.book_appointment(&request).await;
        self.selection.show_confirm = false;

        match result {
            Ok(confirmation) => {
                info!("Booked {} at {} on {} with doctor {}",
                      request.treatment_id, request.start_time, request.date, self.doctor_id);

                self.sequencer.invalidate();
                self.slots.clear();
                self.selection.selected_slot = None;
                self.needs_recheck = false;
                self.phase = FlowPhase::Booked;

                let message = if confirmation.message.trim().is_empty() {
                    messages::BOOKED.to_string()
                } else {
                    confirmation.message.clone()
                };
                self.notices.push(Notice::success(message));

                Ok(confirmation)
            }
            Err(e) => {
                warn!("Booking failed for doctor {} at {}: {}", self.doctor_id, request.start_time, e);
                self.phase = FlowPhase::BookingFailed;
                self.notices.push(Notice::error(e.user_message(messages::BOOKING_FAILED)));

                if e.is_conflict() {
                    // The list we showed is known to be wrong now.
                    self.sequencer.invalidate();
                    self.slots.clear();
                    self.selection.selected_slot = None;
                    self.needs_recheck = true;
                    self.notices.push(Notice::warning(messages::RECHECK_TITLE, messages::RECHECK));
                }

                Err(BookingError::Scheduling(e))
            }
        }
    }

    // --- teardown ------------------------------------------------------------

    /// Close the modal: everything resets and in-flight fetches become stale.
    pub fn close(&mut self) {
        debug!("Closing booking flow for doctor {}", self.doctor_id);
        self.sequencer.invalidate();
        self.slots.clear();
        self.selection = SelectionState::default();
        self.needs_recheck = false;
        self.phase = FlowPhase::Idle;
    }
}

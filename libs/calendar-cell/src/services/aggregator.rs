// libs/calendar-cell/src/services/aggregator.rs
use std::sync::Arc;
use tracing::{debug, error, info};

use availability_cell::SchedulingApi;
use shared_config::AppConfig;
use shared_models::{CalendarRecord, Notice};

use crate::models::{CalendarEvent, CalendarViewOptions, DeepLink, DoctorOption, FilterControl};
use crate::services::surface::CalendarSurface;

const LOAD_FAILED: &str = "Could not load appointments.";

/// Project raw appointment rows into calendar events.
pub fn project_events(records: &[CalendarRecord]) -> Vec<CalendarEvent> {
    records.iter().map(CalendarEvent::from).collect()
}

/// One option per doctor identity, in order of first appearance. A doctor
/// listed under several names keeps the last one.
pub fn distinct_doctors(events: &[CalendarEvent]) -> Vec<DoctorOption> {
    let mut doctors: Vec<DoctorOption> = Vec::new();
    for event in events {
        match doctors.iter_mut().find(|d| d.value == event.doctor_id) {
            Some(existing) => existing.label = event.doctor_name.clone(),
            None => doctors.push(DoctorOption {
                label: event.doctor_name.clone(),
                value: event.doctor_id.clone(),
            }),
        }
    }
    doctors
}

pub fn derive_filter_control(doctors: Vec<DoctorOption>) -> FilterControl {
    match doctors.len() {
        0 => FilterControl::Empty,
        1 => FilterControl::Suppressed {
            doctor_id: doctors[0].value.clone(),
        },
        _ => FilterControl::Choice { options: doctors },
    }
}

/// Events visible under `doctor_id`; `None` shows everything.
pub fn filter_events(events: &[CalendarEvent], doctor_id: Option<&str>) -> Vec<CalendarEvent> {
    match doctor_id {
        Some(id) => events.iter().filter(|e| e.doctor_id == id).cloned().collect(),
        None => events.to_vec(),
    }
}

/// Builds the clinic calendar from the full appointment list and keeps the
/// surface in sync with the doctor filter.
pub struct CalendarAggregator<S: CalendarSurface> {
    api: Arc<dyn SchedulingApi>,
    surface: S,
    record_base_url: String,
    view_options: CalendarViewOptions,
    events: Vec<CalendarEvent>,
    control: FilterControl,
    chosen_doctor: Option<String>,
    notices: Vec<Notice>,
}

impl<S: CalendarSurface> CalendarAggregator<S> {
    pub fn new(api: Arc<dyn SchedulingApi>, surface: S, config: &AppConfig) -> Self {
        Self {
            api,
            surface,
            record_base_url: config.record_base_url.clone(),
            view_options: CalendarViewOptions::default(),
            events: Vec::new(),
            control: FilterControl::Empty,
            chosen_doctor: None,
            notices: Vec::new(),
        }
    }

    /// Fetch every appointment and rebuild events, filter and surface. On
    /// failure the previous state stays as it was.
    pub async fn load(&mut self) -> bool {
        match self.api.list_appointments().await {
            Ok(records) => {
                self.replace_records(&records);
                info!("Calendar loaded {} events across {} doctors",
                      self.events.len(), distinct_doctors(&self.events).len());
                true
            }
            Err(e) => {
                error!("Error fetching appointments: {}", e);
                self.notices.push(Notice::error(e.user_message(LOAD_FAILED)));
                false
            }
        }
    }

    fn replace_records(&mut self, records: &[CalendarRecord]) {
        self.events = project_events(records);
        self.control = derive_filter_control(distinct_doctors(&self.events));
        self.chosen_doctor = None;
        self.render();
    }

    /// Pick a doctor (or `None`/empty for all). Ignored while the control is
    /// suppressed.
    pub fn select_doctor(&mut self, doctor_id: Option<&str>) -> bool {
        if !self.control.is_visible() {
            debug!("Doctor filter is not selectable ({:?})", self.control);
            return false;
        }

        self.chosen_doctor = doctor_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        debug!("Doctor filter set to {:?}", self.chosen_doctor);

        self.render();
        true
    }

    pub fn active_filter(&self) -> Option<&str> {
        match &self.control {
            FilterControl::Suppressed { doctor_id } => Some(doctor_id.as_str()),
            FilterControl::Choice { .. } => self.chosen_doctor.as_deref(),
            FilterControl::Empty => None,
        }
    }

    pub fn rendered_events(&self) -> Vec<CalendarEvent> {
        filter_events(&self.events, self.active_filter())
    }

    fn render(&mut self) {
        let visible = self.rendered_events();
        self.surface.remove_all_events();
        self.surface.add_event_source(visible);
    }

    /// Deep link for an event's detail page. Read-only.
    pub fn open_event(&self, event_id: &str) -> Option<DeepLink> {
        self.events
            .iter()
            .find(|event| event.id == event_id)
            .map(|event| DeepLink::appointment(&self.record_base_url, &event.id))
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn filter_control(&self) -> &FilterControl {
        &self.control
    }

    pub fn view_options(&self) -> &CalendarViewOptions {
        &self.view_options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

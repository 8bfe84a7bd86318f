// libs/calendar-cell/src/models.rs
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_models::CalendarRecord;

// ==============================================================================
// EVENTS
// ==============================================================================

/// Display shape of one appointment on the calendar surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub doctor_id: String,
    pub doctor_name: String,
}

impl From<&CalendarRecord> for CalendarEvent {
    fn from(record: &CalendarRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: format!("{} - {}", record.patient, record.treatment),
            start: record.date.and_time(record.start_time),
            end: record.date.and_time(record.end_time),
            doctor_id: record.doctor_id.clone(),
            doctor_name: record.doctor_name.clone(),
        }
    }
}

// ==============================================================================
// DOCTOR FILTER
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoctorOption {
    pub label: String,
    pub value: String,
}

/// Filter control derived from the loaded appointment set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterControl {
    /// No appointments, nothing to filter.
    Empty,
    /// Exactly one doctor: filter pinned to them, control not shown.
    Suppressed { doctor_id: String },
    /// Several doctors: picker shown, defaulting to all.
    Choice { options: Vec<DoctorOption> },
}

impl FilterControl {
    pub fn is_visible(&self) -> bool {
        matches!(self, FilterControl::Choice { .. })
    }

    pub fn options(&self) -> &[DoctorOption] {
        match self {
            FilterControl::Choice { options } => options,
            _ => &[],
        }
    }
}

// ==============================================================================
// VIEW OPTIONS & NAVIGATION
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CalendarView {
    DayGridMonth,
    TimeGridWeek,
    TimeGridDay,
    ListWeek,
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarView::DayGridMonth => write!(f, "dayGridMonth"),
            CalendarView::TimeGridWeek => write!(f, "timeGridWeek"),
            CalendarView::TimeGridDay => write!(f, "timeGridDay"),
            CalendarView::ListWeek => write!(f, "listWeek"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarViewOptions {
    pub initial_view: CalendarView,
    pub available_views: Vec<CalendarView>,
    pub slot_min_time: NaiveTime,
    pub slot_max_time: NaiveTime,
    pub nav_links: bool,
}

impl Default for CalendarViewOptions {
    fn default() -> Self {
        Self {
            initial_view: CalendarView::DayGridMonth,
            available_views: vec![
                CalendarView::DayGridMonth,
                CalendarView::TimeGridWeek,
                CalendarView::TimeGridDay,
                CalendarView::ListWeek,
            ],
            slot_min_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
            slot_max_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN),
            nav_links: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LinkTarget {
    SameContext,
    NewContext,
}

/// Identity-keyed link to an appointment's detail page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeepLink {
    pub url: String,
    pub target: LinkTarget,
}

impl DeepLink {
    pub fn appointment(base_url: &str, appointment_id: &str) -> Self {
        Self {
            url: format!(
                "{}/appointments/{}/view",
                base_url.trim_end_matches('/'),
                urlencoding::encode(appointment_id)
            ),
            target: LinkTarget::NewContext,
        }
    }
}

// libs/shared/models/src/scheduling.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ==============================================================================
// CATALOG RECORDS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Treatment {
    pub id: String,
    pub name: String,
}

/// Doctor record as listed by the service. Working days and hours are
/// display attributes only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub working_days: Option<String>,
    /// Milliseconds after midnight.
    #[serde(default)]
    pub working_hours_start: Option<u64>,
    #[serde(default)]
    pub working_hours_end: Option<u64>,
}

// ==============================================================================
// SLOTS
// ==============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid slot token '{0}', expected HH:mm")]
pub struct SlotParseError(pub String);

/// Candidate start time for the currently selected doctor and date, as an
/// `HH:mm` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(NaiveTime);

impl Slot {
    pub fn parse(token: &str) -> Result<Self, SlotParseError> {
        let bytes = token.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(SlotParseError(token.to_string()));
        }

        NaiveTime::parse_from_str(token, "%H:%M")
            .map(Slot)
            .map_err(|_| SlotParseError(token.to_string()))
    }

    pub fn from_time(time: NaiveTime) -> Self {
        Slot(time)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    pub fn token(&self) -> String {
        self.0.format("%H:%M").to_string()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for Slot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::parse(s)
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Slot::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
    Other(String),
}

impl AppointmentStatus {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled)
    }
}

impl From<String> for AppointmentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Scheduled" => AppointmentStatus::Scheduled,
            "Completed" => AppointmentStatus::Completed,
            "Cancelled" => AppointmentStatus::Cancelled,
            "No Show" | "NoShow" => AppointmentStatus::NoShow,
            _ => AppointmentStatus::Other(raw),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "Scheduled"),
            AppointmentStatus::Completed => write!(f, "Completed"),
            AppointmentStatus::Cancelled => write!(f, "Cancelled"),
            AppointmentStatus::NoShow => write!(f, "No Show"),
            AppointmentStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Flat appointment row backing the clinic calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarRecord {
    pub id: String,
    pub patient: String,
    pub treatment: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    #[serde(deserialize_with = "time_of_day::required")]
    pub start_time: NaiveTime,
    #[serde(deserialize_with = "time_of_day::required")]
    pub end_time: NaiveTime,
}

/// One of the signed-in patient's own appointments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientAppointment {
    pub id: String,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub treatment_name: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "time_of_day::optional")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "time_of_day::optional")]
    pub end_time: Option<NaiveTime>,
    pub status: AppointmentStatus,
}

/// Upcoming/past partition, decided by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientAppointments {
    #[serde(default)]
    pub upcoming: Vec<PatientAppointment>,
    #[serde(default)]
    pub past: Vec<PatientAppointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRequest {
    pub doctor_id: String,
    pub treatment_id: String,
    pub date: NaiveDate,
    pub start_time: Slot,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Confirmation {
    #[serde(default)]
    pub message: String,
}

// ==============================================================================
// PATIENT PROFILE & BILLING
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientIdentity {
    #[serde(default)]
    pub patient_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileStatus {
    #[serde(default)]
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub amount: f64,
    pub status: String,
    #[serde(default)]
    pub payment_link: Option<String>,
}

/// Lenient time-of-day decoding: the service sends either `HH:mm`,
/// `HH:mm:ss(.fff)(Z)` text, or milliseconds after midnight.
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer};
    use tracing::warn;

    const MILLIS_PER_DAY: u64 = 86_400_000;

    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Millis(u64),
        Text(String),
    }

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let trimmed = raw.trim().trim_end_matches('Z');
        ["%H:%M:%S%.f", "%H:%M"]
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
    }

    pub fn from_millis(millis: u64) -> Option<NaiveTime> {
        if millis >= MILLIS_PER_DAY {
            return None;
        }
        let seconds = (millis / 1000) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
    }

    fn decode(raw: &RawTime) -> Option<NaiveTime> {
        match raw {
            RawTime::Millis(ms) => from_millis(*ms),
            RawTime::Text(text) => match text.trim().parse::<u64>() {
                Ok(ms) => from_millis(ms),
                Err(_) => parse(text),
            },
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = RawTime::deserialize(deserializer)?;
        decode(&raw).ok_or_else(|| serde::de::Error::custom(format!("unrecognised time of day {:?}", raw)))
    }

    pub fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let Some(raw) = Option::<RawTime>::deserialize(deserializer)? else {
            return Ok(None);
        };

        let time = decode(&raw);
        if time.is_none() {
            warn!("Dropping unrecognised time of day {:?}", raw);
        }
        Ok(time)
    }
}

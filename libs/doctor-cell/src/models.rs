use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use shared_models::{time_of_day, Doctor};

pub const MISSING: &str = "—";
pub const LOAD_FAILED: &str = "Could not load doctors.";

/// A doctor as listed in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoctorView {
    pub id: String,
    pub name: String,
    pub display_days: String,
    pub display_hours: String,
}

impl From<&Doctor> for DoctorView {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.clone(),
            name: doctor.name.clone(),
            display_days: display_days(doctor.working_days.as_deref()),
            display_hours: display_hours(doctor.working_hours_start, doctor.working_hours_end),
        }
    }
}

/// `Monday;Wednesday` -> `Monday, Wednesday`
pub fn display_days(working_days: Option<&str>) -> String {
    match working_days.map(str::trim) {
        Some(days) if !days.is_empty() => days
            .split(';')
            .map(str::trim)
            .filter(|day| !day.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => MISSING.to_string(),
    }
}

/// Working hours stored as milliseconds after midnight, shown as
/// `09:00 AM - 05:00 PM`.
pub fn display_hours(start_ms: Option<u64>, end_ms: Option<u64>) -> String {
    let (Some(start), Some(end)) = (
        start_ms.and_then(time_of_day::from_millis),
        end_ms.and_then(time_of_day::from_millis),
    ) else {
        return MISSING.to_string();
    };

    format!("{} - {}", clock(start), clock(end))
}

fn clock(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!("{:02}:{:02} {}", hour, time.minute(), if is_pm { "PM" } else { "AM" })
}

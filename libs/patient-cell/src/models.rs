use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use shared_models::{AppointmentStatus, Invoice, PatientAppointment};

pub mod messages {
    pub const CANCEL_PROMPT: &str = "Are you sure you want to cancel this appointment?";
    pub const CANCELLED: &str = "Appointment cancelled successfully.";
    pub const CANCEL_FAILED: &str = "Failed to cancel appointment.";
    pub const LOAD_FAILED: &str = "Failed to load appointments.";

    pub const NO_PATIENT_RECORD: &str = "No patient record found for your user.";
    pub const PROFILE_LOAD_FAILED: &str = "Failed to load your profile.";
    pub const PROFILE_SAVED: &str = "Your profile was updated successfully.";
    pub const PROFILE_SAVE_FAILED: &str = "Unable to save your profile.";

    pub const PAYMENT_LINK_MISSING: &str = "Payment link not available.";
    pub const INVOICES_FAILED: &str = "Failed to load invoices.";
}

/// `June 1, 2024`
pub fn long_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%B %-d, %Y").to_string()).unwrap_or_default()
}

/// `09:00 AM`
pub fn twelve_hour_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%I:%M %p").to_string()).unwrap_or_default()
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentView {
    pub id: String,
    pub doctor_name: String,
    pub treatment_name: String,
    pub display_date: String,
    pub display_time: String,
    pub status: AppointmentStatus,
    pub show_cancel_button: bool,
}

impl From<&PatientAppointment> for AppointmentView {
    fn from(appointment: &PatientAppointment) -> Self {
        Self {
            id: appointment.id.clone(),
            doctor_name: appointment.doctor_name.clone().unwrap_or_default(),
            treatment_name: appointment.treatment_name.clone().unwrap_or_default(),
            display_date: long_date(appointment.date),
            display_time: twelve_hour_time(appointment.start_time),
            status: appointment.status.clone(),
            show_cancel_button: !appointment.status.is_cancelled(),
        }
    }
}

pub fn format_appointments(list: &[PatientAppointment]) -> Vec<AppointmentView> {
    list.iter().map(AppointmentView::from).collect()
}

/// A cancellation the user has asked for but not yet confirmed. Consumed by
/// either confirming or declining.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingCancellation {
    pub(crate) appointment_id: String,
}

impl PendingCancellation {
    pub fn appointment_id(&self) -> &str {
        &self.appointment_id
    }

    pub fn prompt(&self) -> &'static str {
        messages::CANCEL_PROMPT
    }
}

// ==============================================================================
// PROFILE
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FundingType {
    Insured,
    SelfFunded,
    Unspecified,
}

impl FundingType {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("Insured") => FundingType::Insured,
            Some("Self-Funding") | Some("Self-Funded") => FundingType::SelfFunded,
            _ => FundingType::Unspecified,
        }
    }

    pub fn shows_insurance_field(&self) -> bool {
        matches!(self, FundingType::Insured)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileView {
    pub patient_id: Option<String>,
    pub show_incomplete_banner: bool,
    pub show_insurance_field: bool,
}

// ==============================================================================
// INVOICES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceView {
    pub id: String,
    pub invoice_number: String,
    pub display_date: String,
    pub display_amount: String,
    pub status: String,
    pub payment_link: Option<String>,
    pub can_pay: bool,
}

impl From<&Invoice> for InvoiceView {
    fn from(invoice: &Invoice) -> Self {
        let settled = matches!(invoice.status.as_str(), "Paid" | "Cancelled");
        let has_link = invoice
            .payment_link
            .as_deref()
            .is_some_and(|link| !link.trim().is_empty());

        Self {
            id: invoice.id.clone(),
            invoice_number: invoice.invoice_number.clone(),
            display_date: invoice
                .date
                .map(|d| d.format("%b %d, %Y").to_string())
                .unwrap_or_default(),
            display_amount: format!("${:.2}", invoice.amount),
            status: invoice.status.clone(),
            payment_link: invoice.payment_link.clone(),
            can_pay: has_link && !settled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(status: AppointmentStatus) -> PatientAppointment {
        PatientAppointment {
            id: "a-1".to_string(),
            doctor_name: Some("Dr. D".to_string()),
            treatment_name: None,
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            start_time: NaiveTime::from_hms_opt(9, 0, 0),
            end_time: None,
            status,
        }
    }

    fn invoice(status: &str, link: Option<&str>) -> Invoice {
        Invoice {
            id: "i-1".to_string(),
            invoice_number: "INV-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            amount: 120.5,
            status: status.to_string(),
            payment_link: link.map(str::to_string),
        }
    }

    #[test]
    fn appointment_display_formats() {
        let view = AppointmentView::from(&appointment(AppointmentStatus::Scheduled));

        assert_eq!(view.display_date, "June 1, 2024");
        assert_eq!(view.display_time, "09:00 AM");
        assert_eq!(view.treatment_name, "");
        assert!(view.show_cancel_button);
    }

    #[test]
    fn afternoon_times_use_pm() {
        assert_eq!(twelve_hour_time(NaiveTime::from_hms_opt(14, 30, 0)), "02:30 PM");
        assert_eq!(twelve_hour_time(None), "");
        assert_eq!(long_date(None), "");
    }

    #[test]
    fn cancelled_appointments_hide_cancel() {
        let view = AppointmentView::from(&appointment(AppointmentStatus::Cancelled));
        assert!(!view.show_cancel_button);

        let view = AppointmentView::from(&appointment(AppointmentStatus::Completed));
        assert!(view.show_cancel_button);
    }

    #[test]
    fn funding_type_controls_insurance_field() {
        assert!(FundingType::parse(Some("Insured")).shows_insurance_field());
        assert!(!FundingType::parse(Some("Self-Funding")).shows_insurance_field());
        assert!(!FundingType::parse(None).shows_insurance_field());
    }

    #[test]
    fn invoice_payability() {
        assert!(InvoiceView::from(&invoice("Unpaid", Some("https://pay.test/1"))).can_pay);
        assert!(!InvoiceView::from(&invoice("Paid", Some("https://pay.test/1"))).can_pay);
        assert!(!InvoiceView::from(&invoice("Cancelled", Some("https://pay.test/1"))).can_pay);
        assert!(!InvoiceView::from(&invoice("Unpaid", None)).can_pay);
    }

    #[test]
    fn invoice_display_fields() {
        let view = InvoiceView::from(&invoice("Unpaid", None));
        assert_eq!(view.display_date, "Jun 01, 2024");
        assert_eq!(view.display_amount, "$120.50");
    }
}

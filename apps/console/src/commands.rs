use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::debug;

use availability_cell::SchedulingApi;
use booking_cell::SlotSelectionMachine;
use calendar_cell::{CalendarAggregator, EventBoard};
use doctor_cell::DoctorDirectory;
use patient_cell::{AppointmentLifecycleManager, AppointmentView, InvoiceBook, ProfileStatusService};
use shared_config::AppConfig;
use shared_models::{Notice, Slot};

use crate::prompt::StdinPrompt;

#[derive(Debug, Parser)]
#[command(name = "clinic-console")]
#[command(version = "0.1.0")]
#[command(about = "Clinic appointment scheduling from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List doctors and their working hours
    Doctors,
    /// Show the clinic calendar, optionally for one doctor
    Calendar {
        doctor_id: Option<String>,
    },
    /// Book an appointment with a doctor
    Book {
        doctor_id: String,
    },
    /// List your appointments and cancel one
    Appointments,
    /// List your invoices and pay one
    Invoices,
    /// Show your profile status
    Profile,
}

pub async fn run(command: Command, api: Arc<dyn SchedulingApi>, config: &AppConfig) -> Result<()> {
    debug!("Running {:?}", command);

    match command {
        Command::Doctors => doctors(api).await,
        Command::Calendar { doctor_id } => calendar(api, config, doctor_id).await,
        Command::Book { doctor_id } => book(api, &doctor_id).await,
        Command::Appointments => appointments(api).await,
        Command::Invoices => invoices(api).await,
        Command::Profile => profile(api).await,
    }
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        eprintln!("{}", notice);
    }
}

async fn doctors(api: Arc<dyn SchedulingApi>) -> Result<()> {
    let mut directory = DoctorDirectory::new(api);
    let loaded = directory.load().await.map(|doctors| doctors.to_vec());
    print_notices(directory.take_notices());

    for doctor in loaded? {
        println!("{:<12} {:<24} {:<36} {}", doctor.id, doctor.name, doctor.display_days, doctor.display_hours);
    }
    Ok(())
}

async fn calendar(api: Arc<dyn SchedulingApi>, config: &AppConfig, doctor_id: Option<String>) -> Result<()> {
    let mut calendar = CalendarAggregator::new(api, EventBoard::new(), config);
    let loaded = calendar.load().await;
    print_notices(calendar.take_notices());
    if !loaded {
        bail!("Calendar could not be loaded");
    }

    let options = calendar.filter_control().options();
    if !options.is_empty() {
        let names: Vec<String> = options.iter().map(|o| format!("{} ({})", o.label, o.value)).collect();
        println!("Doctors: {}", names.join(", "));
    }

    if let Some(doctor_id) = doctor_id {
        if !calendar.select_doctor(Some(&doctor_id)) {
            println!("Only one doctor on the calendar, showing everything.");
        }
    }

    for (day, events) in calendar.surface().agenda() {
        println!("{}", day.format("%A, %B %-d, %Y"));
        for event in events {
            let link = calendar.open_event(&event.id).map(|link| link.url).unwrap_or_default();
            println!(
                "  {}-{}  {}  [{}]  {}",
                event.start.format("%H:%M"),
                event.end.format("%H:%M"),
                event.title,
                event.doctor_name,
                link
            );
        }
    }
    Ok(())
}

async fn book(api: Arc<dyn SchedulingApi>, doctor_id: &str) -> Result<()> {
    let prompt = StdinPrompt::new();

    let mut directory = DoctorDirectory::new(api);
    let loaded = directory.load().await.map(|_| ());
    print_notices(directory.take_notices());
    loaded?;

    let mut machine = directory
        .open(doctor_id)
        .ok_or_else(|| anyhow!("No doctor with id {}", doctor_id))?;
    let result = book_with(&mut machine, &prompt).await;
    print_notices(machine.take_notices());
    machine.close();
    result
}

async fn book_with(machine: &mut SlotSelectionMachine, prompt: &StdinPrompt) -> Result<()> {
    println!("Booking with {}", machine.doctor_name());
    machine.open().await;
    print_notices(machine.take_notices());

    let options = machine.treatment_options();
    for (index, option) in options.iter().enumerate() {
        println!("  {}. {}", index + 1, option.label);
    }
    let Some(choice) = prompt.ask("Treatment number:").await? else {
        return Ok(());
    };
    let index: usize = choice.parse().context("Treatment number must be a number")?;
    let treatment = options
        .get(index.wrapping_sub(1))
        .ok_or_else(|| anyhow!("No treatment number {}", index))?;
    machine.select_treatment(treatment.value.clone());

    let Some(date) = prompt.ask("Date (YYYY-MM-DD):").await? else {
        return Ok(());
    };
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").context("Date must be YYYY-MM-DD")?;
    machine.select_date(date);

    let slots = machine.check_availability().await?.to_vec();
    if slots.is_empty() {
        return Ok(());
    }
    let tokens: Vec<String> = slots.iter().map(Slot::token).collect();
    println!("Available: {}", tokens.join("  "));

    let Some(slot) = prompt.ask("Slot (HH:mm):").await? else {
        return Ok(());
    };
    machine.select_slot(Slot::parse(&slot)?)?;
    machine.request_booking()?;

    if prompt.yes_no(&format!("Book {} on {}?", slot, date)).await? {
        let confirmation = machine.confirm_booking().await?;
        println!("{}", confirmation.message);
    } else {
        machine.decline_booking();
    }
    Ok(())
}

fn print_appointments(heading: &str, list: &[AppointmentView]) {
    println!("{}", heading);
    if list.is_empty() {
        println!("  (none)");
    }
    for view in list {
        println!(
            "  {:<12} {:<20} {:<9} {:<20} {:<20} {}",
            view.id, view.display_date, view.display_time, view.treatment_name, view.doctor_name, view.status
        );
    }
}

async fn appointments(api: Arc<dyn SchedulingApi>) -> Result<()> {
    let prompt = StdinPrompt::new();
    let manager = AppointmentLifecycleManager::new(api);

    let loaded = manager.load().await;
    print_notices(manager.take_notices());
    loaded?;

    print_appointments("Upcoming", &manager.upcoming());
    print_appointments("Past", &manager.past());

    let Some(appointment_id) = prompt.ask("Cancel which appointment? (id, blank to skip)").await? else {
        return Ok(());
    };

    let outcome = manager.cancel_with_prompt(&appointment_id, &prompt).await;
    print_notices(manager.take_notices());
    if outcome?.is_some() {
        print_appointments("Upcoming", &manager.upcoming());
    }
    Ok(())
}

async fn invoices(api: Arc<dyn SchedulingApi>) -> Result<()> {
    let prompt = StdinPrompt::new();
    let mut book = InvoiceBook::new(api);

    if book.load().await.is_err() {
        bail!("{}", book.error().unwrap_or("Failed to load invoices."));
    }
    if book.is_empty() {
        println!("No invoices.");
        return Ok(());
    }

    for invoice in book.invoices() {
        println!(
            "  {:<12} {:<14} {:<10} {:>10} {:<10} {}",
            invoice.id,
            invoice.invoice_number,
            invoice.display_date,
            invoice.display_amount,
            invoice.status,
            if invoice.can_pay { "payable" } else { "" }
        );
    }

    let Some(invoice_id) = prompt.ask("Pay which invoice? (id, blank to skip)").await? else {
        return Ok(());
    };
    if let Some(link) = book.pay(&invoice_id) {
        println!("Open to pay: {}", link);
    }
    print_notices(book.take_notices());
    Ok(())
}

async fn profile(api: Arc<dyn SchedulingApi>) -> Result<()> {
    let mut profile = ProfileStatusService::new(api);
    let result = profile.initialize().await;
    print_notices(profile.take_notices());
    result?;

    if let Some(patient_id) = profile.patient_id() {
        println!("Patient record: {}", patient_id);
        if profile.show_incomplete_banner() {
            println!("Your profile is incomplete. Please fill in the missing details.");
        } else {
            println!("Your profile is complete.");
        }
    }
    Ok(())
}

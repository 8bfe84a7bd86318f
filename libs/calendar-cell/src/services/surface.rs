use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::CalendarEvent;

/// Rendering target for calendar events. The aggregator always replaces the
/// full event source, it never diffs.
pub trait CalendarSurface {
    fn remove_all_events(&mut self);

    fn add_event_source(&mut self, events: Vec<CalendarEvent>);
}

/// In-memory surface; also what the console renders from.
#[derive(Debug, Default)]
pub struct EventBoard {
    events: Vec<CalendarEvent>,
    renders: usize,
}

impl EventBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// How many event sources have been attached so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Events grouped by day, each day ordered by start time.
    pub fn agenda(&self) -> BTreeMap<NaiveDate, Vec<&CalendarEvent>> {
        let mut days: BTreeMap<NaiveDate, Vec<&CalendarEvent>> = BTreeMap::new();
        for event in &self.events {
            days.entry(event.start.date()).or_default().push(event);
        }
        for events in days.values_mut() {
            events.sort_by_key(|event| event.start);
        }
        days
    }
}

impl CalendarSurface for EventBoard {
    fn remove_all_events(&mut self) {
        self.events.clear();
    }

    fn add_event_source(&mut self, events: Vec<CalendarEvent>) {
        self.events.extend(events);
        self.renders += 1;
    }
}

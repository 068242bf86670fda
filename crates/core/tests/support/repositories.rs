//! Mock port implementations for testing
//!
//! Provides in-memory mocks for all scheduling ports, enabling
//! deterministic unit tests without database dependencies.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chairside_core::scheduling::ports::{
    AppointmentRepository, AuditLog, CalendarRepository, PaymentOutcome, ServiceCatalog,
    SlotClaim, TransitionOutcome,
};
use chairside_domain::{
    Actor, Appointment, AppointmentStatus, PaymentStatus, ProviderCalendar,
    Result as DomainResult,
};
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

/// In-memory mock for `CalendarRepository`.
#[derive(Default)]
pub struct MockCalendarRepository {
    calendars: Mutex<HashMap<Uuid, ProviderCalendar>>,
}

impl MockCalendarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience helper for seeding a calendar.
    pub fn with_calendar(self, calendar: ProviderCalendar) -> Self {
        self.calendars.lock().unwrap().insert(calendar.provider_id, calendar);
        self
    }
}

#[async_trait]
impl CalendarRepository for MockCalendarRepository {
    async fn get(&self, provider_id: Uuid) -> DomainResult<Option<ProviderCalendar>> {
        Ok(self.calendars.lock().unwrap().get(&provider_id).cloned())
    }

    async fn upsert(&self, calendar: &ProviderCalendar) -> DomainResult<()> {
        self.calendars.lock().unwrap().insert(calendar.provider_id, calendar.clone());
        Ok(())
    }
}

/// In-memory mock for `AppointmentRepository`.
///
/// The slot claim and guarded transitions run under one mutex, mirroring the
/// serializable units the SQLite implementation provides.
#[derive(Default)]
pub struct MockAppointmentRepository {
    rows: Mutex<Vec<Appointment>>,
}

impl MockAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn appointment_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl AppointmentRepository for MockAppointmentRepository {
    async fn occupied_times(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> DomainResult<Vec<NaiveTime>> {
        let mut times: Vec<NaiveTime> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| {
                row.provider_id == provider_id && row.date == date && row.status.occupies_slot()
            })
            .map(|row| row.time)
            .collect();
        times.sort_unstable();
        Ok(times)
    }

    async fn insert_if_free(&self, appointment: &Appointment) -> DomainResult<SlotClaim> {
        let mut rows = self.rows.lock().unwrap();
        let held = rows.iter().any(|row| {
            row.provider_id == appointment.provider_id
                && row.date == appointment.date
                && row.time == appointment.time
                && row.status.occupies_slot()
        });
        if held {
            return Ok(SlotClaim::Conflict);
        }
        rows.push(appointment.clone());
        Ok(SlotClaim::Created)
    }

    async fn find(&self, id: Uuid) -> DomainResult<Option<Appointment>> {
        Ok(self.rows.lock().unwrap().iter().find(|row| row.id == id).cloned())
    }

    async fn transition(
        &self,
        id: Uuid,
        allowed_from: &[AppointmentStatus],
        to: AppointmentStatus,
        notes: Option<String>,
    ) -> DomainResult<TransitionOutcome> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(TransitionOutcome::NotFound);
        };
        if !allowed_from.contains(&row.status) {
            return Ok(TransitionOutcome::Refused(row.status));
        }
        row.status = to;
        if let Some(notes) = notes {
            row.notes = Some(notes);
        }
        Ok(TransitionOutcome::Applied(row.clone()))
    }

    async fn record_payment(&self, id: Uuid, method: &str) -> DomainResult<PaymentOutcome> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(PaymentOutcome::NotFound);
        };
        if row.payment_status == PaymentStatus::Paid {
            return Ok(PaymentOutcome::AlreadyPaid);
        }
        row.payment_status = PaymentStatus::Paid;
        row.payment_method = Some(method.to_owned());
        Ok(PaymentOutcome::Applied(row.clone()))
    }

    async fn list_for_provider(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> DomainResult<Vec<Appointment>> {
        let mut rows: Vec<Appointment> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.provider_id == provider_id && row.date == date)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.time);
        Ok(rows)
    }
}

/// In-memory mock for `ServiceCatalog`.
#[derive(Default)]
pub struct MockServiceCatalog {
    prices: Mutex<HashMap<(String, Option<String>), f64>>,
}

impl MockServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(self, service: &str, specialty: Option<&str>, price: f64) -> Self {
        self.prices
            .lock()
            .unwrap()
            .insert((service.to_owned(), specialty.map(str::to_owned)), price);
        self
    }
}

#[async_trait]
impl ServiceCatalog for MockServiceCatalog {
    async fn price_of(
        &self,
        service_name: &str,
        specialty: Option<&str>,
    ) -> DomainResult<Option<f64>> {
        let prices = self.prices.lock().unwrap();
        if let Some(specialty) = specialty {
            let scoped = (service_name.to_owned(), Some(specialty.to_owned()));
            if let Some(price) = prices.get(&scoped) {
                return Ok(Some(*price));
            }
        }
        Ok(prices.get(&(service_name.to_owned(), None)).copied())
    }
}

/// Recording mock for `AuditLog`.
#[derive(Default)]
pub struct MockAuditLog {
    entries: Arc<Mutex<Vec<(Option<Uuid>, String, String)>>>,
}

impl MockAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<String> {
        self.entries.lock().unwrap().iter().map(|(_, action, _)| action.clone()).collect()
    }
}

#[async_trait]
impl AuditLog for MockAuditLog {
    async fn record(&self, actor: Option<&Actor>, action: &str, details: &str) -> DomainResult<()> {
        self.entries.lock().unwrap().push((
            actor.and_then(|a| a.id),
            action.to_owned(),
            details.to_owned(),
        ));
        Ok(())
    }
}

//! Port interfaces for the scheduling engine.
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chairside_domain::{Actor, Appointment, AppointmentStatus, ProviderCalendar, Result};
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

/// Outcome of the atomic create-if-free commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotClaim {
    /// The appointment row was created and now holds the slot.
    Created,
    /// Another slot-occupying appointment already holds the tuple.
    Conflict,
}

/// Outcome of a guarded lifecycle transition.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// Guard held; the updated appointment row.
    Applied(Appointment),
    /// Guard failed; carries the status the row actually had.
    Refused(AppointmentStatus),
    NotFound,
}

/// Outcome of a guarded payment recording.
#[derive(Debug, Clone)]
pub enum PaymentOutcome {
    /// Payment recorded; the updated appointment row.
    Applied(Appointment),
    /// The appointment was already paid.
    AlreadyPaid,
    NotFound,
}

/// Trait for reading and upserting provider calendars.
#[async_trait]
pub trait CalendarRepository: Send + Sync {
    /// Fetch the calendar for a provider; `None` means no availability has
    /// been configured.
    async fn get(&self, provider_id: Uuid) -> Result<Option<ProviderCalendar>>;

    /// Create or replace the provider's calendar (one calendar per provider).
    async fn upsert(&self, calendar: &ProviderCalendar) -> Result<()>;
}

/// Trait for the appointment ledger.
///
/// Implementations must make `insert_if_free`, `transition`, and
/// `record_payment` each execute as a single serializable unit: concurrent
/// callers must never both succeed in claiming one slot or interleave a
/// guarded update.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Slot-occupying appointment times at `(provider_id, date)`, as one
    /// consistent snapshot.
    async fn occupied_times(&self, provider_id: Uuid, date: NaiveDate) -> Result<Vec<NaiveTime>>;

    /// Atomically create the appointment unless its slot is already held.
    async fn insert_if_free(&self, appointment: &Appointment) -> Result<SlotClaim>;

    async fn find(&self, id: Uuid) -> Result<Option<Appointment>>;

    /// Move the appointment to `to` if its current status is in
    /// `allowed_from`, optionally attaching completion notes. The check and
    /// the update are one atomic step.
    async fn transition(
        &self,
        id: Uuid,
        allowed_from: &[AppointmentStatus],
        to: AppointmentStatus,
        notes: Option<String>,
    ) -> Result<TransitionOutcome>;

    /// Record payment if the appointment is still unpaid.
    async fn record_payment(&self, id: Uuid, method: &str) -> Result<PaymentOutcome>;

    /// All appointments for a provider on a date, ascending by time.
    async fn list_for_provider(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>>;
}

/// Trait for the service price catalog (external collaborator, read-only to
/// the engine).
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    /// Price for a service, preferring a specialty-scoped entry. `None`
    /// means the catalog has no entry and the engine's fallback applies.
    async fn price_of(&self, service_name: &str, specialty: Option<&str>) -> Result<Option<f64>>;
}

/// Trait for the append-only audit trail.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Record who did what. Audit failures never fail the parent operation.
    async fn record(&self, actor: Option<&Actor>, action: &str, details: &str) -> Result<()>;
}

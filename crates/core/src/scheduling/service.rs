//! Scheduling service - core business logic.
//!
//! Composes the slot generator with the appointment ledger to resolve
//! availability, validates and commits bookings, and drives the appointment
//! lifecycle through guarded transitions. All storage handles are passed in
//! explicitly; the service keeps no ambient state.

use std::sync::Arc;

use chairside_domain::constants::{DEFAULT_COMPLETION_NOTES, DEFAULT_SERVICE_PRICE};
use chairside_domain::types::calendar::day_name;
use chairside_domain::{
    Actor, Appointment, AppointmentStatus, BookingMode, BookingRequest, PaymentStatus,
    ProviderCalendar, ScheduleError,
};
use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::ports::{
    AppointmentRepository, AuditLog, CalendarRepository, PaymentOutcome, ServiceCatalog,
    SlotClaim, TransitionOutcome,
};
use super::slots;

type ScheduleResult<T> = std::result::Result<T, ScheduleError>;

/// Appointment scheduling service.
pub struct SchedulingService {
    calendars: Arc<dyn CalendarRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    catalog: Arc<dyn ServiceCatalog>,
    audit: Option<Arc<dyn AuditLog>>,
    default_price: f64,
}

impl SchedulingService {
    /// Create a new scheduling service.
    pub fn new(
        calendars: Arc<dyn CalendarRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        catalog: Arc<dyn ServiceCatalog>,
    ) -> Self {
        Self { calendars, appointments, catalog, audit: None, default_price: DEFAULT_SERVICE_PRICE }
    }

    /// Attach an audit log. Audit writes are best-effort and never fail the
    /// operation that triggered them.
    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Override the fallback price used when the service catalog has no
    /// entry for a requested service.
    pub fn with_default_price(mut self, price: f64) -> Self {
        self.default_price = price;
        self
    }

    /// Validate and store a provider calendar (upsert).
    #[instrument(skip(self, calendar, actor), fields(provider_id = %calendar.provider_id))]
    pub async fn set_calendar(
        &self,
        calendar: &ProviderCalendar,
        actor: Option<&Actor>,
    ) -> ScheduleResult<()> {
        calendar.validate()?;
        self.calendars.upsert(calendar).await?;
        self.audit(actor, "calendar_update", &calendar.provider_id.to_string()).await;
        Ok(())
    }

    /// Fetch a provider's calendar, if one has been configured.
    pub async fn get_calendar(
        &self,
        provider_id: Uuid,
    ) -> ScheduleResult<Option<ProviderCalendar>> {
        Ok(self.calendars.get(provider_id).await?)
    }

    /// Free slot start times for a provider on a date, ascending.
    ///
    /// No calendar means no availability. Pure read: candidate slots minus
    /// the ledger's occupancy snapshot.
    #[instrument(skip(self))]
    pub async fn available_slots(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> ScheduleResult<Vec<NaiveTime>> {
        let Some(calendar) = self.calendars.get(provider_id).await? else {
            return Ok(Vec::new());
        };
        let occupied = self.appointments.occupied_times(provider_id, date).await?;
        let free: Vec<NaiveTime> = slots::candidate_slots(&calendar, date)
            .into_iter()
            .filter(|time| !occupied.contains(time))
            .collect();
        debug!(count = free.len(), occupied = occupied.len(), "resolved availability");
        Ok(free)
    }

    /// Validate and atomically commit a booking.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// calendar configured, provider works that weekday, time inside the
    /// working window, time in the slot catalog, then the atomic
    /// create-if-free commit against the ledger. Two concurrent calls for
    /// the same tuple cannot both succeed; the loser sees
    /// [`ScheduleError::SlotAlreadyBooked`].
    #[instrument(skip(self, request, actor), fields(provider_id = %request.provider_id, date = %request.date))]
    pub async fn book(
        &self,
        request: BookingRequest,
        mode: BookingMode,
        actor: Option<&Actor>,
    ) -> ScheduleResult<Appointment> {
        let calendar = self
            .calendars
            .get(request.provider_id)
            .await?
            .ok_or(ScheduleError::NoCalendarConfigured)?;

        if !calendar.works_on(request.date) {
            return Err(ScheduleError::ProviderNotWorkingThatDay(
                day_name(request.date.weekday()).to_owned(),
            ));
        }
        if !slots::in_working_window(&calendar, request.time) {
            return Err(ScheduleError::OutsideWorkingHours);
        }
        if !slots::candidate_slots(&calendar, request.date).contains(&request.time) {
            return Err(ScheduleError::InvalidSlot);
        }

        let price = self
            .catalog
            .price_of(&request.service_name, calendar.specialty.as_deref())
            .await?
            .unwrap_or(self.default_price);

        let appointment = Appointment {
            id: Uuid::now_v7(),
            patient_id: request.patient_id,
            provider_id: request.provider_id,
            date: request.date,
            time: request.time,
            service_name: request.service_name,
            service_price: price,
            status: mode.initial_status(),
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            notes: None,
            created_at: Utc::now(),
        };

        match self.appointments.insert_if_free(&appointment).await? {
            SlotClaim::Created => {
                info!(appointment_id = %appointment.id, status = %appointment.status, "booking committed");
                self.audit(
                    actor,
                    "appointment_book",
                    &format!(
                        "pat:{} provider:{} {} {}",
                        appointment.patient_id,
                        appointment.provider_id,
                        appointment.date,
                        appointment.time.format("%H:%M")
                    ),
                )
                .await;
                Ok(appointment)
            }
            SlotClaim::Conflict => Err(ScheduleError::SlotAlreadyBooked),
        }
    }

    /// Approve a pending appointment (`Pending` → `Scheduled`).
    pub async fn approve(&self, id: Uuid, actor: Option<&Actor>) -> ScheduleResult<Appointment> {
        self.apply_transition(
            id,
            &[AppointmentStatus::Pending],
            AppointmentStatus::Scheduled,
            None,
            "appointment_approve",
            actor,
        )
        .await
    }

    /// Confirm a scheduled appointment (`Scheduled` → `Confirmed`).
    pub async fn confirm(&self, id: Uuid, actor: Option<&Actor>) -> ScheduleResult<Appointment> {
        self.apply_transition(
            id,
            &[AppointmentStatus::Scheduled],
            AppointmentStatus::Confirmed,
            None,
            "appointment_confirm",
            actor,
        )
        .await
    }

    /// Cancel any non-terminal appointment, releasing its slot for
    /// re-booking.
    pub async fn cancel(&self, id: Uuid, actor: Option<&Actor>) -> ScheduleResult<Appointment> {
        self.apply_transition(
            id,
            &AppointmentStatus::CANCELLABLE,
            AppointmentStatus::Cancelled,
            None,
            "appointment_cancel",
            actor,
        )
        .await
    }

    /// Complete an appointment (`Scheduled`/`Confirmed` → `Completed`),
    /// attaching the provider's notes. An empty notes string records the
    /// placeholder instead.
    pub async fn complete(
        &self,
        id: Uuid,
        notes: &str,
        actor: Option<&Actor>,
    ) -> ScheduleResult<Appointment> {
        let notes = if notes.trim().is_empty() {
            DEFAULT_COMPLETION_NOTES.to_owned()
        } else {
            notes.to_owned()
        };
        self.apply_transition(
            id,
            &[AppointmentStatus::Scheduled, AppointmentStatus::Confirmed],
            AppointmentStatus::Completed,
            Some(notes),
            "appointment_complete",
            actor,
        )
        .await
    }

    /// Record payment for an appointment, legal only while unpaid. A second
    /// call is rejected with `InvalidTransition` rather than silently
    /// no-opping.
    #[instrument(skip(self, actor))]
    pub async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: &str,
        actor: Option<&Actor>,
    ) -> ScheduleResult<Appointment> {
        match self.appointments.record_payment(id, payment_method).await? {
            PaymentOutcome::Applied(appointment) => {
                self.audit(actor, "appointment_payment", &id.to_string()).await;
                Ok(appointment)
            }
            PaymentOutcome::AlreadyPaid => Err(ScheduleError::InvalidTransition {
                from: PaymentStatus::Paid.to_string(),
                to: PaymentStatus::Paid.to_string(),
            }),
            PaymentOutcome::NotFound => Err(ScheduleError::AppointmentNotFound(id)),
        }
    }

    /// Look up a single appointment.
    pub async fn find_appointment(&self, id: Uuid) -> ScheduleResult<Option<Appointment>> {
        Ok(self.appointments.find(id).await?)
    }

    /// All appointments for a provider on a date, ascending by time. Call
    /// sites showing future availability filter by date themselves.
    pub async fn appointments_for_provider(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> ScheduleResult<Vec<Appointment>> {
        Ok(self.appointments.list_for_provider(provider_id, date).await?)
    }

    #[instrument(skip(self, notes, actor), fields(to = %to))]
    async fn apply_transition(
        &self,
        id: Uuid,
        allowed_from: &[AppointmentStatus],
        to: AppointmentStatus,
        notes: Option<String>,
        action: &str,
        actor: Option<&Actor>,
    ) -> ScheduleResult<Appointment> {
        match self.appointments.transition(id, allowed_from, to, notes).await? {
            TransitionOutcome::Applied(appointment) => {
                info!(appointment_id = %id, from = ?allowed_from, to = %to, "transition applied");
                self.audit(actor, action, &id.to_string()).await;
                Ok(appointment)
            }
            TransitionOutcome::Refused(current) => Err(ScheduleError::InvalidTransition {
                from: current.to_string(),
                to: to.to_string(),
            }),
            TransitionOutcome::NotFound => Err(ScheduleError::AppointmentNotFound(id)),
        }
    }

    async fn audit(&self, actor: Option<&Actor>, action: &str, details: &str) {
        if let Some(audit) = &self.audit {
            if let Err(err) = audit.record(actor, action, details).await {
                warn!(error = %err, action, "failed to record audit entry");
            }
        }
    }
}

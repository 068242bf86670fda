//! Appointment entity and its lifecycle state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ClinicError;

/// Lifecycle status of an appointment.
///
/// `Completed` and `Cancelled` are terminal. The slot-occupying subset
/// (`Pending`, `Scheduled`, `Confirmed`) reserves the appointment's
/// `(provider, date, time)` slot against new bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Statuses that hold their slot against concurrent bookings.
    ///
    /// Must stay in sync with the partial unique index on the appointments
    /// table.
    pub const OCCUPYING: [Self; 3] = [Self::Pending, Self::Scheduled, Self::Confirmed];

    /// Non-terminal statuses, i.e. those from which `cancel` is legal.
    pub const CANCELLABLE: [Self; 3] = [Self::Pending, Self::Scheduled, Self::Confirmed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Scheduled => "Scheduled",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether an appointment in this status reserves its slot.
    pub fn occupies_slot(self) -> bool {
        Self::OCCUPYING.contains(&self)
    }

    /// Legal next statuses for this status.
    pub const fn valid_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Scheduled, Self::Cancelled],
            Self::Scheduled => &[Self::Confirmed, Self::Completed, Self::Cancelled],
            Self::Confirmed => &[Self::Completed, Self::Cancelled],
            // Terminal states
            Self::Completed | Self::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        self.valid_transitions().contains(&next)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Scheduled" => Ok(Self::Scheduled),
            "Confirmed" => Ok(Self::Confirmed),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            other => {
                Err(ClinicError::InvalidInput(format!("unknown appointment status: {other}")))
            }
        }
    }
}

/// Payment status, a one-way two-state machine orthogonal to the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unpaid" => Ok(Self::Unpaid),
            "Paid" => Ok(Self::Paid),
            other => Err(ClinicError::InvalidInput(format!("unknown payment status: {other}"))),
        }
    }
}

/// Who is driving the booking flow. Caller-supplied, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingMode {
    /// Guest/patient self-service booking; starts `Pending` until staff
    /// approve it.
    SelfService,
    /// Front-desk booking on behalf of a walk-in; starts `Scheduled`.
    StaffEntered,
}

impl BookingMode {
    pub const fn initial_status(self) -> AppointmentStatus {
        match self {
            Self::SelfService => AppointmentStatus::Pending,
            Self::StaffEntered => AppointmentStatus::Scheduled,
        }
    }
}

/// A proposed booking, as submitted to the booking transaction manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service_name: String,
}

/// A committed appointment.
///
/// `id` is immutable once assigned. Status and payment fields are only ever
/// mutated through the engine's guarded transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service_name: String,
    pub service_price: f64,
    pub status: AppointmentStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

//! Domain types and models

pub mod appointment;
pub mod calendar;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use appointment::{
    Appointment, AppointmentStatus, BookingMode, BookingRequest, PaymentStatus,
};
pub use calendar::ProviderCalendar;

/// Role of the actor invoking an engine operation.
///
/// Used only to tag audit entries and to let the caller pick the booking
/// mode; authorization policy lives outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Guest,
    Patient,
    Staff,
    Provider,
    Admin,
}

impl ActorRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "Guest",
            Self::Patient => "Patient",
            Self::Staff => "Staff",
            Self::Provider => "Provider",
            Self::Admin => "Admin",
        }
    }
}

/// The identity invoking an engine operation, as reported by the caller's
/// session layer. `id` is absent for unauthenticated (guest) callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Option<Uuid>,
    pub role: ActorRole,
}

impl Actor {
    pub const fn new(id: Option<Uuid>, role: ActorRole) -> Self {
        Self { id, role }
    }

    /// A staff actor, the common case for front-desk operations.
    pub const fn staff(id: Uuid) -> Self {
        Self { id: Some(id), role: ActorRole::Staff }
    }

    /// An anonymous self-service caller.
    pub const fn guest() -> Self {
        Self { id: None, role: ActorRole::Guest }
    }
}

//! Error types used throughout the scheduling engine

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Fault-level error type for Chairside.
///
/// Only genuine engine faults live here (storage loss, bad configuration,
/// programming errors). Expected booking outcomes are modelled separately by
/// [`ScheduleError`].
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ClinicError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Chairside operations
pub type Result<T> = std::result::Result<T, ClinicError>;

/// Typed outcome taxonomy for scheduling operations.
///
/// Every variant except [`ScheduleError::Storage`] is an expected,
/// user-correctable rejection: it is surfaced verbatim to the caller and
/// never retried by the engine. Callers seeing [`SlotAlreadyBooked`] should
/// re-query availability and pick a different slot rather than resubmit.
///
/// [`SlotAlreadyBooked`]: ScheduleError::SlotAlreadyBooked
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum ScheduleError {
    #[error("invalid calendar: {0}")]
    InvalidCalendar(String),

    #[error("no working hours configured for this provider")]
    NoCalendarConfigured,

    #[error("provider does not work on {0}")]
    ProviderNotWorkingThatDay(String),

    #[error("requested time is outside the provider's working hours")]
    OutsideWorkingHours,

    #[error("requested time is not a bookable slot")]
    InvalidSlot,

    #[error("slot is already booked")]
    SlotAlreadyBooked,

    #[error("illegal transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("appointment {0} not found")]
    AppointmentNotFound(Uuid),

    #[error(transparent)]
    Storage(#[from] ClinicError),
}

impl ScheduleError {
    /// Whether this is an expected rejection rather than an engine fault.
    ///
    /// Rejections are safe for the caller to handle and retry with corrected
    /// input; a `Storage` error means the persistence layer itself failed.
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

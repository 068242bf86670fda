//! # Chairside Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The slot generator and availability resolver
//! - The booking transaction manager and lifecycle transitions
//! - Port/adapter interfaces (traits) for persistence and collaborators
//!
//! ## Architecture Principles
//! - Only depends on `chairside-domain`
//! - No database or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod scheduling;

// Re-export specific items to avoid ambiguity
pub use scheduling::ports::{
    AppointmentRepository, AuditLog, CalendarRepository, PaymentOutcome, ServiceCatalog,
    SlotClaim, TransitionOutcome,
};
pub use scheduling::service::SchedulingService;
pub use scheduling::slots;

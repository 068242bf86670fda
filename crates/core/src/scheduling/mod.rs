//! Appointment scheduling: slot generation, availability resolution, the
//! booking transaction manager, and lifecycle transitions.

pub mod ports;
pub mod service;
pub mod slots;

pub use ports::{
    AppointmentRepository, AuditLog, CalendarRepository, PaymentOutcome, ServiceCatalog,
    SlotClaim, TransitionOutcome,
};
pub use service::SchedulingService;

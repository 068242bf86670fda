//! Database implementations

pub mod appointment_repository;
pub mod audit_repository;
pub mod calendar_repository;
pub mod manager;
pub mod service_catalog;

pub use appointment_repository::SqliteAppointmentRepository;
pub use audit_repository::SqliteAuditLog;
pub use calendar_repository::SqliteCalendarRepository;
pub use manager::DbManager;
pub use service_catalog::SqliteServiceCatalog;

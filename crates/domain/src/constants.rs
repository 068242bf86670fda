//! Domain constants
//!
//! Centralized location for all domain-level constants used throughout the
//! scheduling engine.

// Slot geometry
pub const SLOT_GRANULARITY_MINUTES: u32 = 30;

/// Fixed intraday slot catalog, as half-open `[start_hour, end_hour)` blocks.
/// Two daily blocks separated by the clinic's lunch break; candidate slots
/// are enumerated at [`SLOT_GRANULARITY_MINUTES`] within each block.
pub const SLOT_CATALOG_BLOCKS: [(u32, u32); 2] = [(8, 12), (13, 17)];

// Booking defaults
pub const DEFAULT_SERVICE_PRICE: f64 = 500.0;
pub const DEFAULT_COMPLETION_NOTES: &str = "N/A";

// Audit
pub const PUBLIC_ACTOR_ROLE: &str = "Public";

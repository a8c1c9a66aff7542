//! Appliance simulation components.

/// The appliance core and its tick state machine.
pub mod appliance;
/// Kind registry, defaults, and factory functions.
pub mod catalog;
/// Named, invokable appliance operations.
pub mod task;
pub mod types;
/// Fluctuating generation models.
pub mod wind;

// Re-export the main types for convenience
pub use appliance::Appliance;
pub use appliance::SharedAppliance;
pub use catalog::ApplianceKind;
pub use task::{ApplianceTask, TaskAction};
pub use types::{DutyCycle, UsageRates};

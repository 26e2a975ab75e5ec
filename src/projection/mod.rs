//! Projection engine for monthly balance forecasts

pub mod calendar;
mod engine;
mod horizon;
mod month;
mod occurrences;

pub use engine::{project, ProjectionConfig, ProjectionEngine};
pub use horizon::{optimal_horizon, MIN_HORIZON_MONTHS, RECURRING_HORIZON_MONTHS};
pub use month::{AccountBalance, Occurrence, OccurrenceOrigin, ProjectionMonth, ProjectionResult};
pub use occurrences::{classify, synthesize_month, Template};

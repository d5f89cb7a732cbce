//! fleetmock-store - Deferred-mutation store for the fleetmock fake
//!
//! A single task owns the resource tree. Reads answer immediately; mutations
//! are validated up front, acknowledged with a pending operation, and applied
//! by a scheduled follow-up message once their configured delay elapses.

pub mod scheduler;
pub mod service;

pub use scheduler::Scheduler;
pub use service::{MockDelays, StoreHandle};

//! fleetmock-core - Resource model for the fleetmock device-fleet fake
//!
//! This crate provides the in-memory resource tree (zones, hosts, groups,
//! virtual devices), the canned dataset it starts from, and the random name
//! generators used when resources are created.

pub mod error;
pub mod namegen;
mod seed;
pub mod tree;
pub mod types;

pub use error::StoreError;
pub use tree::ResourceTree;
pub use types::{Cvd, Group, Host, HostView, Operation};

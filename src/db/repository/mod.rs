//! Repository layer — entity-scoped database operations.
//!
//! One sub-module per entity; all public functions are re-exported here.
//! Absence is `Ok(None)`/`Ok(false)`, never an error; the API boundary
//! decides what a missing row means.

mod doctor;
mod gallery;
mod patient;
mod schedule;
mod visit;

pub use doctor::*;
pub use gallery::*;
pub use patient::*;
pub use schedule::*;
pub use visit::*;

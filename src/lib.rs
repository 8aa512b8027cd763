//! Per-region statistics of fracture transport snapshots and the CSV tables
//! built from them.

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod error;
pub mod io;
pub mod snapshot;
pub mod stage;
pub mod table;

pub use error::{PostError, Result};

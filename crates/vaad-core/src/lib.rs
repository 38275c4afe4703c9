//! vaad-core
//!
//! Financial reconciliation and maintenance scheduling for the building committee.
//! Depends on vaad-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod balance_service;
pub mod debt_service;
pub mod directory;
pub mod error;
pub mod format;
pub mod maintenance_service;
pub mod money;
pub mod predicates;
pub mod public_api;
pub mod reader;
pub mod storage;
pub mod time;

pub use balance_service::*;
pub use debt_service::*;
pub use directory::*;
pub use error::CoreError;
pub use maintenance_service::*;
pub use reader::*;

#[cfg(test)]
mod tests;

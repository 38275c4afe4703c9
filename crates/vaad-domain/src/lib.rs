//! vaad-domain
//!
//! Pure domain models for the building committee ledgers (residents, fees,
//! pending payments, EV charging, committee income/expense, maintenance).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod charging;
pub mod committee;
pub mod common;
pub mod labels;
pub mod maintenance;
pub mod payment;
pub mod resident;
pub mod snapshot;

pub use charging::*;
pub use committee::*;
pub use common::*;
pub use labels::*;
pub use maintenance::*;
pub use payment::*;
pub use resident::*;
pub use snapshot::*;

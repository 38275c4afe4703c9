#![doc(test(attr(deny(warnings))))]

//! Vaad Ledger reconciles a building committee's books: what each resident
//! owes, what the committee collected and spent, and which maintenance tasks
//! are coming due.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Vaad Ledger tracing initialized.");
    });
}

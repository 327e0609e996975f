#![doc(test(attr(deny(warnings))))]

//! Akhra Books keeps the double-entry books of a community association: the
//! chart of accounts, journal entries, the cash book, vouchers and the reports
//! derived from them, with a small shell on top.

pub mod cli;
pub mod errors;
pub mod manager;
pub mod utils;

pub use errors::AppError;
pub use manager::{BookManager, LoadReport};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Akhra Books tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}

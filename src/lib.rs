//! Tamper-evident ledger of library book checkouts, served over HTTP.

pub mod clock;
pub mod config;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod model;
pub mod routes;
pub mod validation;

use std::sync::Arc;

use clock::Clock;
use ledger::Ledger;

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

impl AppState {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: Arc::new(Ledger::new(clock)),
        }
    }
}

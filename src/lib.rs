//! Backend core for a Soroban remittance demo: four smart-wallet accounts
//! (A-D), a multisig treasury, and a USDC/EURC forex leg priced by an
//! external quote provider.
//!
//! [`service::Remittance`] is the entry point. It validates raw request
//! values and routes writes through [`orchestrator::TransactionOrchestrator`]
//! and reads through [`reconciler::StateReconciler`].

pub mod config;
pub mod directory;
pub mod error;
pub mod forex;
pub mod orchestrator;
pub mod reconciler;
pub mod service;
pub mod snapshot;
pub mod validation;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{Error, Result};
pub use service::Remittance;

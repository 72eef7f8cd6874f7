//! Tessera core: a batch-issuance ownership ledger behind a phase-gated
//! sale admission policy.
//!
//! The crate is an embeddable core. The host environment supplies the
//! execution guarantees (atomic, strictly sequential calls); this crate
//! supplies the state and the rules:
//!
//! - [`ledger::OwnershipLedger`]: sequential unit ids, one ownership record
//!   per issuance batch regardless of batch size, per-unit transfer with
//!   lazy record splitting
//! - [`gate::SaleGate`]: fail-closed admission over sale phase, allowlist
//!   membership, per-call quantity, remaining supply, and exact payment
//! - [`allowlist::AllowlistVerifier`]: Merkle-proof membership checks
//!   against a fixed commitment root
//! - [`collection::Collection`]: the public call surface wiring the gate
//!   in front of the ledger
//!
//! Every failing call surfaces a specific error before any mutation, so a
//! failed call never leaves partial state behind.

pub mod allowlist;
pub mod collection;
pub mod config;
pub mod crypto;
pub mod error;
pub mod events;
pub mod gate;
pub mod identity;
pub mod ledger;

pub use collection::Collection;
pub use config::{CollectionConfig, SaleParameters};
pub use error::ErrorKind;
pub use events::TransferEvent;
pub use gate::{GateError, SalePhase};
pub use identity::Identity;
pub use ledger::{LedgerError, OwnershipLedger};

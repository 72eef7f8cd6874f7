//! Error classification shared across the ledger and the sale gate.

use serde::{Deserialize, Serialize};

/// Coarse classification of call failures.
///
/// Every failure is attributable to the caller and leaves no state change;
/// the kind tells the caller which input to fix. Specific variants live on
/// the per-module error enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed input: null identity, zero quantity, unknown unit,
    /// rejected receipt.
    Validation,
    /// Caller lacks the required authority or membership.
    Authorization,
    /// Per-call or total supply limits exceeded.
    Capacity,
    /// Attached payment does not match the required amount.
    Payment,
}

//! Ledger-specific error types.

use thiserror::Error;

use crate::error::ErrorKind;
use crate::identity::Identity;

/// Errors that can occur during ledger operations.
///
/// Every check runs before any mutation, so a returned error implies the
/// ledger is exactly as it was before the call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerError {
    /// Issuance or transfer targeted the reserved null identity.
    #[error("recipient is the null identity")]
    RecipientIsNullIdentity,

    /// Issuance requested zero units.
    #[error("issuance quantity must be greater than zero")]
    QuantityIsZero,

    /// The recipient's receipt-acceptance hook declined the batch.
    #[error("recipient {recipient} rejected receipt of {quantity} unit(s)")]
    RecipientRejectsReceipt {
        /// The declining recipient.
        recipient: Identity,
        /// Units in the rejected batch.
        quantity: u64,
    },

    /// The unit has never been issued.
    #[error("unit {unit_id} does not exist")]
    UnitDoesNotExist {
        /// The queried unit id.
        unit_id: u64,
    },

    /// Caller is neither the holder of the unit nor approved for it.
    #[error("caller {caller} is neither holder nor approved for unit {unit_id}")]
    NotOwnerOrApproved {
        /// The unauthorized caller.
        caller: Identity,
        /// The unit the caller tried to move.
        unit_id: u64,
    },

    /// The claimed sender does not match the unit's current holder.
    #[error("transfer of unit {unit_id} from {claimed}, but holder is {holder}")]
    TransferFromMismatch {
        /// The unit id.
        unit_id: u64,
        /// The identity the caller claimed holds the unit.
        claimed: Identity,
        /// The actual current holder.
        holder: Identity,
    },

    /// Balance query for the null identity.
    #[error("balance query for the null identity")]
    QueryForNullIdentity,

    /// Approval granted to the unit's current holder.
    #[error("approval for unit {unit_id} targets its current holder")]
    ApprovalToCurrentHolder {
        /// The unit id.
        unit_id: u64,
    },

    /// Operator approval granted by the caller to itself.
    #[error("operator approval targets the caller {caller} itself")]
    SelfApprovalForAll {
        /// The caller that tried to approve itself.
        caller: Identity,
    },
}

impl LedgerError {
    /// Classifies the failure per the caller-facing taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RecipientIsNullIdentity
            | Self::QuantityIsZero
            | Self::RecipientRejectsReceipt { .. }
            | Self::UnitDoesNotExist { .. }
            | Self::QueryForNullIdentity
            | Self::ApprovalToCurrentHolder { .. }
            | Self::SelfApprovalForAll { .. } => ErrorKind::Validation,
            Self::NotOwnerOrApproved { .. } | Self::TransferFromMismatch { .. } => {
                ErrorKind::Authorization
            },
        }
    }
}

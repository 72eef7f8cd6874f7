//! Fail-closed sale admission.
//!
//! The gate is a pure checker: given the immutable sale parameters, the
//! owner-mutable phase flags, and the allowlist verifier, [`SaleGate::authorize`]
//! inspects a proposed gated mint and either clears it or returns the first
//! failing check. It never mutates ledger state and holds no state beyond
//! the two phase flags, so a denied call has nothing to roll back.
//!
//! Checks run in a fixed order: phase, allowlist membership, per-call
//! quantity bound, remaining supply, exact payment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::allowlist::AllowlistVerifier;
use crate::config::SaleParameters;
use crate::crypto::Hash;
use crate::error::ErrorKind;
use crate::identity::Identity;
use crate::ledger::LedgerError;

/// Sale phase derived from the two owner-mutable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalePhase {
    /// No gated issuance at all.
    Closed,
    /// Gated issuance restricted to allowlisted identities.
    AllowlistOnly,
    /// Gated issuance open to any identity.
    Public,
}

/// Errors from gated admission and owner administration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GateError {
    /// Caller is not the configured owner.
    #[error("caller {caller} is not the collection owner")]
    NotOwner {
        /// The unauthorized caller.
        caller: Identity,
    },

    /// The sale is closed.
    #[error("sale is closed")]
    SaleClosed,

    /// Allowlist membership proof missing or not matching the commitment.
    #[error("identity {caller} is not allowlisted")]
    NotAllowlisted {
        /// The caller whose proof failed.
        caller: Identity,
    },

    /// Quantity outside `1..=max_per_call`.
    #[error("quantity {quantity} outside the per-call limit of {max_per_call}")]
    ExceedsPerCallLimit {
        /// The requested quantity.
        quantity: u64,
        /// The configured per-call limit.
        max_per_call: u64,
    },

    /// Not enough supply left for the requested quantity.
    #[error("not enough supply left: requested {requested}, remaining {remaining}")]
    SupplyExceeded {
        /// The requested quantity.
        requested: u64,
        /// Units still issuable under the supply cap.
        remaining: u64,
    },

    /// Attached payment does not equal `quantity * unit_price`.
    #[error("incorrect payment: expected {expected}, attached {attached}")]
    IncorrectPayment {
        /// The exact amount required.
        expected: u128,
        /// The amount the caller attached.
        attached: u128,
    },

    /// The underlying ledger write failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl GateError {
    /// Classifies the failure per the caller-facing taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOwner { .. } | Self::SaleClosed | Self::NotAllowlisted { .. } => {
                ErrorKind::Authorization
            },
            Self::ExceedsPerCallLimit { .. } | Self::SupplyExceeded { .. } => ErrorKind::Capacity,
            Self::IncorrectPayment { .. } => ErrorKind::Payment,
            Self::Ledger(inner) => inner.kind(),
        }
    }
}

/// Phase-gated admission policy in front of the ledger.
#[derive(Debug, Clone)]
pub struct SaleGate {
    params: SaleParameters,
    verifier: AllowlistVerifier,
    sale_open: bool,
    allowlist_required: bool,
}

impl SaleGate {
    /// Creates a gate with the sale closed and the allowlist flag unset.
    #[must_use]
    pub const fn new(params: SaleParameters, allowlist_root: Hash) -> Self {
        Self {
            params,
            verifier: AllowlistVerifier::new(allowlist_root),
            sale_open: false,
            allowlist_required: false,
        }
    }

    /// The immutable sale parameters.
    #[must_use]
    pub const fn params(&self) -> &SaleParameters {
        &self.params
    }

    /// Current state of the sale-open flag.
    #[must_use]
    pub const fn sale_open(&self) -> bool {
        self.sale_open
    }

    /// Current state of the allowlist-required flag.
    #[must_use]
    pub const fn allowlist_required(&self) -> bool {
        self.allowlist_required
    }

    /// Sets the sale-open flag. Owner authorization is the caller's
    /// responsibility.
    pub fn set_sale_open(&mut self, open: bool) {
        self.sale_open = open;
    }

    /// Sets the allowlist-required flag. Owner authorization is the
    /// caller's responsibility.
    pub fn set_allowlist_required(&mut self, required: bool) {
        self.allowlist_required = required;
    }

    /// The phase derived from the two flags.
    #[must_use]
    pub const fn phase(&self) -> SalePhase {
        if !self.sale_open {
            SalePhase::Closed
        } else if self.allowlist_required {
            SalePhase::AllowlistOnly
        } else {
            SalePhase::Public
        }
    }

    /// Clears a proposed gated mint or returns the first failing check.
    ///
    /// `total_issued` is the ledger's running issuance count, used for the
    /// supply check. Nothing is mutated either way.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::SaleClosed`], [`GateError::NotAllowlisted`],
    /// [`GateError::ExceedsPerCallLimit`], [`GateError::SupplyExceeded`],
    /// or [`GateError::IncorrectPayment`] in that check order.
    pub fn authorize(
        &self,
        caller: Identity,
        quantity: u64,
        proof: &[Hash],
        attached_payment: u128,
        total_issued: u64,
    ) -> Result<(), GateError> {
        if !self.sale_open {
            return Err(GateError::SaleClosed);
        }
        if self.allowlist_required && !self.verifier.verify(caller, proof) {
            return Err(GateError::NotAllowlisted { caller });
        }
        if quantity == 0 || quantity > self.params.max_per_call {
            return Err(GateError::ExceedsPerCallLimit {
                quantity,
                max_per_call: self.params.max_per_call,
            });
        }
        let remaining = self.params.max_supply.saturating_sub(total_issued);
        if quantity > remaining {
            return Err(GateError::SupplyExceeded {
                requested: quantity,
                remaining,
            });
        }
        let expected = u128::from(quantity) * u128::from(self.params.unit_price);
        if attached_payment != expected {
            return Err(GateError::IncorrectPayment {
                expected,
                attached: attached_payment,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{hash_identity_leaf, hash_node_pair, ZERO_HASH};

    fn addr(n: u8) -> Identity {
        Identity::from_bytes([n; 20])
    }

    fn params() -> SaleParameters {
        SaleParameters {
            unit_price: 2,
            max_per_call: 20,
            max_supply: 100,
        }
    }

    fn open_gate() -> SaleGate {
        let mut gate = SaleGate::new(params(), ZERO_HASH);
        gate.set_sale_open(true);
        gate
    }

    #[test]
    fn phase_is_derived_from_the_two_flags() {
        let mut gate = SaleGate::new(params(), ZERO_HASH);
        assert_eq!(gate.phase(), SalePhase::Closed);

        gate.set_allowlist_required(true);
        assert_eq!(gate.phase(), SalePhase::Closed);

        gate.set_sale_open(true);
        assert_eq!(gate.phase(), SalePhase::AllowlistOnly);

        gate.set_allowlist_required(false);
        assert_eq!(gate.phase(), SalePhase::Public);
    }

    #[test]
    fn closed_sale_denies_before_any_other_check() {
        let gate = SaleGate::new(params(), ZERO_HASH);

        // Everything else about this request is wrong too; the phase check
        // must win.
        let error = gate
            .authorize(addr(1), 0, &[], 999, 1_000)
            .expect_err("closed sale must deny");

        assert!(matches!(error, GateError::SaleClosed));
        assert_eq!(error.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn allowlist_flag_requires_a_valid_proof() {
        let leaf_member = hash_identity_leaf(addr(1).as_bytes());
        let leaf_other = hash_identity_leaf(addr(2).as_bytes());
        let root = hash_node_pair(&leaf_member, &leaf_other);

        let mut gate = SaleGate::new(params(), root);
        gate.set_sale_open(true);
        gate.set_allowlist_required(true);

        gate.authorize(addr(1), 1, &[leaf_other], 2, 0)
            .expect("member with valid proof is admitted");

        let error = gate
            .authorize(addr(3), 1, &[leaf_other], 2, 0)
            .expect_err("non-member must be denied");
        assert!(matches!(error, GateError::NotAllowlisted { .. }));
        assert_eq!(error.kind(), ErrorKind::Authorization);

        let error = gate
            .authorize(addr(1), 1, &[], 2, 0)
            .expect_err("member without proof must be denied");
        assert!(matches!(error, GateError::NotAllowlisted { .. }));
    }

    #[test]
    fn proof_is_ignored_when_allowlist_is_not_required() {
        let gate = open_gate();

        gate.authorize(addr(3), 1, &[], 2, 0)
            .expect("public sale admits anyone");
    }

    #[test]
    fn quantity_bounds_are_enforced() {
        let gate = open_gate();

        let error = gate
            .authorize(addr(1), 0, &[], 0, 0)
            .expect_err("zero quantity must be denied");
        assert!(matches!(
            error,
            GateError::ExceedsPerCallLimit { quantity: 0, .. }
        ));
        assert_eq!(error.kind(), ErrorKind::Capacity);

        let error = gate
            .authorize(addr(1), 21, &[], 42, 0)
            .expect_err("over-limit quantity must be denied");
        assert!(matches!(
            error,
            GateError::ExceedsPerCallLimit { quantity: 21, .. }
        ));

        gate.authorize(addr(1), 20, &[], 40, 0)
            .expect("limit quantity is admitted");
    }

    #[test]
    fn supply_cap_counts_all_prior_issuance() {
        let gate = open_gate();

        gate.authorize(addr(1), 10, &[], 20, 90)
            .expect("exactly-remaining quantity is admitted");

        let error = gate
            .authorize(addr(1), 11, &[], 22, 90)
            .expect_err("beyond-remaining quantity must be denied");
        assert!(matches!(
            error,
            GateError::SupplyExceeded {
                requested: 11,
                remaining: 10,
            }
        ));
        assert_eq!(error.kind(), ErrorKind::Capacity);

        // Administrative issuance may already have pushed the count past
        // the cap; remaining saturates at zero.
        let error = gate
            .authorize(addr(1), 1, &[], 2, 120)
            .expect_err("exhausted supply must deny");
        assert!(matches!(
            error,
            GateError::SupplyExceeded { remaining: 0, .. }
        ));
    }

    #[test]
    fn payment_must_match_exactly() {
        let gate = open_gate();

        let error = gate
            .authorize(addr(1), 5, &[], 9, 0)
            .expect_err("underpayment must be denied");
        assert!(matches!(
            error,
            GateError::IncorrectPayment {
                expected: 10,
                attached: 9,
            }
        ));
        assert_eq!(error.kind(), ErrorKind::Payment);

        let error = gate
            .authorize(addr(1), 5, &[], 11, 0)
            .expect_err("overpayment must be denied");
        assert!(matches!(error, GateError::IncorrectPayment { .. }));

        gate.authorize(addr(1), 5, &[], 10, 0)
            .expect("exact payment is admitted");
    }

    #[test]
    fn free_mint_requires_zero_payment() {
        let mut gate = SaleGate::new(
            SaleParameters {
                unit_price: 0,
                ..params()
            },
            ZERO_HASH,
        );
        gate.set_sale_open(true);

        gate.authorize(addr(1), 5, &[], 0, 0)
            .expect("free mint with zero payment");
        let error = gate
            .authorize(addr(1), 5, &[], 1, 0)
            .expect_err("free mint rejects attached payment");
        assert!(matches!(error, GateError::IncorrectPayment { .. }));
    }

    #[test]
    fn authorize_mutates_nothing() {
        let gate = open_gate();
        let before = (gate.sale_open(), gate.allowlist_required(), gate.phase());

        let _ = gate.authorize(addr(1), 5, &[], 10, 0);
        let _ = gate.authorize(addr(1), 99, &[], 0, 0);

        assert_eq!(
            (gate.sale_open(), gate.allowlist_required(), gate.phase()),
            before
        );
    }
}

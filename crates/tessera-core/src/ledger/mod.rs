//! Sequential-id ownership ledger with amortized-O(1) batch issuance.
//!
//! The ledger assigns consecutive unit ids and stores **one** ownership
//! record per issuance batch, keyed by the batch's first unit id in an
//! ordered map. A unit's effective holder is found by predecessor lookup:
//! the record at the greatest key `<= unit` governs it. Batch records are
//! split lazily when a mid-batch unit is transferred individually.
//!
//! # Invariant
//!
//! The record keys partition the issued range: records are stored at
//! strictly increasing keys, each covering `covers` consecutive units, and
//! each record's coverage ends exactly where the next record begins (the
//! last one ends at the issuance head). Issuance appends one record;
//! transfer splits at most one record into at most three. Every mutation
//! path re-establishes the partition before returning.
//!
//! All validation runs before any mutation, so a failed call leaves the
//! ledger untouched. The host environment executes calls sequentially and
//! atomically; no interior locking is needed.

mod error;
mod existence;


use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub use error::LedgerError;
pub use existence::ExistenceIndex;

use crate::identity::Identity;

/// Receipt-acceptance capability for contract-like recipients.
///
/// Consulted once per batch, never per unit, which preserves the O(1)
/// storage profile of batch issuance. Declining fails the whole batch with
/// no state change.
pub trait ReceiptAcceptor {
    /// Returns `true` if `recipient` accepts receipt of units
    /// `start_unit_id .. start_unit_id + quantity`.
    ///
    /// Plain identities without custom receipt logic should return `true`.
    fn accepts(&self, recipient: Identity, start_unit_id: u64, quantity: u64) -> bool;
}

/// Ownership record covering a contiguous run of units.
///
/// One record exists for the first unit of each issuance batch, plus one
/// for every unit split out of its batch by an individual transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    /// Current holder of every covered unit.
    pub holder: Identity,
    /// Consecutive units this record covers, starting at its key.
    pub covers: u64,
}

/// Per-holder account state, created lazily and never deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderAccount {
    /// Units currently held.
    pub balance: u64,
    /// Lifetime units issued directly to this identity; never decremented.
    pub number_issued: u64,
}

/// The ownership ledger.
#[derive(Debug, Clone, Default)]
pub struct OwnershipLedger {
    start_id: u64,
    total_issued: u64,
    records: BTreeMap<u64, OwnershipRecord>,
    accounts: BTreeMap<Identity, HolderAccount>,
    unit_approvals: BTreeMap<u64, Identity>,
    operator_approvals: BTreeSet<(Identity, Identity)>,
}

impl OwnershipLedger {
    /// Creates an empty ledger whose first unit will receive `start_id`.
    #[must_use]
    pub fn new(start_id: u64) -> Self {
        Self {
            start_id,
            ..Self::default()
        }
    }

    /// The id assigned to the first unit ever issued.
    #[must_use]
    pub const fn start_id(&self) -> u64 {
        self.start_id
    }

    /// Units issued so far. Monotonic; with no burn path this equals the
    /// live supply.
    #[must_use]
    pub const fn total_issued(&self) -> u64 {
        self.total_issued
    }

    /// The id the next issued unit will receive.
    #[must_use]
    pub const fn next_unit_id(&self) -> u64 {
        self.start_id + self.total_issued
    }

    /// Returns `true` iff the unit has been issued.
    #[must_use]
    pub const fn exists(&self, unit_id: u64) -> bool {
        self.existence_index().exists(unit_id)
    }

    /// A copyable snapshot of the issued range.
    #[must_use]
    pub const fn existence_index(&self) -> ExistenceIndex {
        ExistenceIndex::new(self.start_id, self.total_issued)
    }

    /// Units currently held by `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::QueryForNullIdentity`] for the null identity.
    pub fn balance_of(&self, identity: Identity) -> Result<u64, LedgerError> {
        if identity.is_null() {
            return Err(LedgerError::QueryForNullIdentity);
        }
        Ok(self.accounts.get(&identity).map_or(0, |a| a.balance))
    }

    /// Lifetime units issued directly to `identity`.
    #[must_use]
    pub fn number_issued(&self, identity: Identity) -> u64 {
        self.accounts.get(&identity).map_or(0, |a| a.number_issued)
    }

    /// Resolves the current holder of `unit_id` by predecessor lookup,
    /// O(log batches).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnitDoesNotExist`] for ids outside the issued
    /// range.
    pub fn owner_of(&self, unit_id: u64) -> Result<Identity, LedgerError> {
        if !self.exists(unit_id) {
            return Err(LedgerError::UnitDoesNotExist { unit_id });
        }
        // Unreachable while the partition invariant holds; surfaced as a
        // missing unit rather than a panic.
        let Some((_, record)) = self.records.range(..=unit_id).next_back() else {
            return Err(LedgerError::UnitDoesNotExist { unit_id });
        };
        Ok(record.holder)
    }

    /// Issues `quantity` consecutive units to `recipient` without a receipt
    /// hook.
    ///
    /// # Errors
    ///
    /// See [`OwnershipLedger::issue_with_acceptor`].
    pub fn issue(
        &mut self,
        recipient: Identity,
        quantity: u64,
    ) -> Result<(u64, u64), LedgerError> {
        self.issue_with_acceptor(recipient, quantity, None)
    }

    /// Issues `quantity` consecutive units to `recipient`, consulting the
    /// receipt hook once for the whole batch.
    ///
    /// Writes exactly one ownership record regardless of `quantity` and
    /// returns the issued range as `(start, end_exclusive)`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::RecipientIsNullIdentity`],
    /// [`LedgerError::QuantityIsZero`], or
    /// [`LedgerError::RecipientRejectsReceipt`]; in every case nothing is
    /// mutated.
    pub fn issue_with_acceptor(
        &mut self,
        recipient: Identity,
        quantity: u64,
        acceptor: Option<&dyn ReceiptAcceptor>,
    ) -> Result<(u64, u64), LedgerError> {
        if recipient.is_null() {
            return Err(LedgerError::RecipientIsNullIdentity);
        }
        if quantity == 0 {
            return Err(LedgerError::QuantityIsZero);
        }
        let start = self.next_unit_id();
        if let Some(acceptor) = acceptor {
            if !acceptor.accepts(recipient, start, quantity) {
                return Err(LedgerError::RecipientRejectsReceipt {
                    recipient,
                    quantity,
                });
            }
        }

        self.records.insert(
            start,
            OwnershipRecord {
                holder: recipient,
                covers: quantity,
            },
        );
        let account = self.accounts.entry(recipient).or_default();
        account.balance += quantity;
        account.number_issued += quantity;
        self.total_issued += quantity;
        Ok((start, start + quantity))
    }

    /// Transfers a single unit from `from` to `to` on behalf of `caller`.
    ///
    /// The transferred unit gets its own size-1 record. When the unit is
    /// not the last of its covering record and the next unit has no record
    /// of its own, a record carrying the original holder is materialized at
    /// `unit_id + 1` so predecessor resolution keeps answering correctly
    /// for the rest of the batch. Any one-time approval for the unit is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnitDoesNotExist`],
    /// [`LedgerError::NotOwnerOrApproved`],
    /// [`LedgerError::TransferFromMismatch`], or
    /// [`LedgerError::RecipientIsNullIdentity`]; in every case nothing is
    /// mutated.
    pub fn transfer(
        &mut self,
        caller: Identity,
        from: Identity,
        to: Identity,
        unit_id: u64,
    ) -> Result<(), LedgerError> {
        let holder = self.owner_of(unit_id)?;
        let authorized = caller == holder
            || self.unit_approvals.get(&unit_id) == Some(&caller)
            || self.operator_approvals.contains(&(holder, caller));
        if !authorized {
            return Err(LedgerError::NotOwnerOrApproved { caller, unit_id });
        }
        if from != holder {
            return Err(LedgerError::TransferFromMismatch {
                unit_id,
                claimed: from,
                holder,
            });
        }
        if to.is_null() {
            return Err(LedgerError::RecipientIsNullIdentity);
        }

        self.unit_approvals.remove(&unit_id);
        self.split_record(unit_id, to);

        if let Some(account) = self.accounts.get_mut(&from) {
            account.balance -= 1;
        }
        self.accounts.entry(to).or_default().balance += 1;
        Ok(())
    }

    /// Rewrites the record partition so `unit_id` is covered by its own
    /// size-1 record holding `to`, shrinking or splitting the governing
    /// record as needed. `unit_id` must exist.
    fn split_record(&mut self, unit_id: u64, to: Identity) {
        let (base, governing) = match self.records.range(..=unit_id).next_back() {
            Some((key, record)) => (*key, *record),
            // The caller verified existence; the partition invariant
            // guarantees a governing record.
            None => unreachable!("issued unit {unit_id} has no governing record"),
        };
        let coverage_end = base + governing.covers;

        if unit_id > base {
            if let Some(record) = self.records.get_mut(&base) {
                record.covers = unit_id - base;
            }
        }
        if unit_id + 1 < coverage_end {
            self.records.insert(
                unit_id + 1,
                OwnershipRecord {
                    holder: governing.holder,
                    covers: coverage_end - (unit_id + 1),
                },
            );
        }
        self.records.insert(
            unit_id,
            OwnershipRecord {
                holder: to,
                covers: 1,
            },
        );
    }

    /// Grants (or, for the null identity, clears) a one-time approval for a
    /// single unit. Only the unit's holder or one of its operators may
    /// grant it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnitDoesNotExist`],
    /// [`LedgerError::ApprovalToCurrentHolder`], or
    /// [`LedgerError::NotOwnerOrApproved`].
    pub fn approve(
        &mut self,
        caller: Identity,
        approved: Identity,
        unit_id: u64,
    ) -> Result<(), LedgerError> {
        let holder = self.owner_of(unit_id)?;
        if approved == holder {
            return Err(LedgerError::ApprovalToCurrentHolder { unit_id });
        }
        if caller != holder && !self.operator_approvals.contains(&(holder, caller)) {
            return Err(LedgerError::NotOwnerOrApproved { caller, unit_id });
        }

        if approved.is_null() {
            self.unit_approvals.remove(&unit_id);
        } else {
            self.unit_approvals.insert(unit_id, approved);
        }
        Ok(())
    }

    /// The identity holding a one-time approval for `unit_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnitDoesNotExist`] for ids outside the issued
    /// range.
    pub fn get_approved(&self, unit_id: u64) -> Result<Option<Identity>, LedgerError> {
        if !self.exists(unit_id) {
            return Err(LedgerError::UnitDoesNotExist { unit_id });
        }
        Ok(self.unit_approvals.get(&unit_id).copied())
    }

    /// Grants or revokes a standing approval for `operator` over every
    /// unit the caller holds, now and in the future.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::SelfApprovalForAll`] when the caller targets
    /// itself, or [`LedgerError::RecipientIsNullIdentity`] for the null
    /// operator.
    pub fn set_approval_for_all(
        &mut self,
        caller: Identity,
        operator: Identity,
        approved: bool,
    ) -> Result<(), LedgerError> {
        if operator.is_null() {
            return Err(LedgerError::RecipientIsNullIdentity);
        }
        if operator == caller {
            return Err(LedgerError::SelfApprovalForAll { caller });
        }

        if approved {
            self.operator_approvals.insert((caller, operator));
        } else {
            self.operator_approvals.remove(&(caller, operator));
        }
        Ok(())
    }

    /// Returns `true` iff `operator` holds a standing approval from
    /// `holder`.
    #[must_use]
    pub fn is_approved_for_all(&self, holder: Identity, operator: Identity) -> bool {
        self.operator_approvals.contains(&(holder, operator))
    }

    /// Number of ownership records currently stored. Grows by one per
    /// issuance batch and by at most two per transfer.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub(crate) fn records(&self) -> &BTreeMap<u64, OwnershipRecord> {
        &self.records
    }
}

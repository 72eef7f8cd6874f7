//! Public call surface combining the sale gate and the ownership ledger.
//!
//! [`Collection`] is what the host environment drives. It owns the
//! immutable configuration, the gate flags, the ledger, and the event log,
//! and it enforces the owner-bypass rule: the configured owner skips every
//! gate check, everyone else passes through [`SaleGate::authorize`] before
//! the ledger is touched.

use crate::config::CollectionConfig;
use crate::crypto::Hash;
use crate::events::TransferEvent;
use crate::gate::{GateError, SaleGate, SalePhase};
use crate::identity::Identity;
use crate::ledger::{ExistenceIndex, LedgerError, OwnershipLedger, ReceiptAcceptor};

/// A unit collection: gated issuance in front of a batch ledger.
///
/// The host guarantees sequential, atomic call execution; the collection
/// guarantees that every failing call returns a specific error before any
/// state mutation.
pub struct Collection {
    config: CollectionConfig,
    gate: SaleGate,
    ledger: OwnershipLedger,
    acceptor: Option<Box<dyn ReceiptAcceptor>>,
    events: Vec<TransferEvent>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .field("total_issued", &self.ledger.total_issued())
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl Collection {
    /// Creates a collection from its immutable configuration. The sale
    /// starts closed.
    #[must_use]
    pub fn new(config: CollectionConfig) -> Self {
        let gate = SaleGate::new(config.sale, config.allowlist_root);
        let ledger = OwnershipLedger::new(config.start_id);
        Self {
            config,
            gate,
            ledger,
            acceptor: None,
            events: Vec::new(),
        }
    }

    /// Installs the host's receipt-acceptance hook for contract-like
    /// recipients. Every issuance path consults it once per batch.
    #[must_use]
    pub fn with_receipt_acceptor(mut self, acceptor: Box<dyn ReceiptAcceptor>) -> Self {
        self.acceptor = Some(acceptor);
        self
    }

    // ---- views -----------------------------------------------------------

    /// Display name of the collection.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Short display symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    /// The owner identity fixed at construction.
    #[must_use]
    pub const fn owner(&self) -> Identity {
        self.config.owner
    }

    /// Units in circulation. With no burn path this equals
    /// [`Collection::total_minted`].
    #[must_use]
    pub const fn total_supply(&self) -> u64 {
        self.ledger.total_issued()
    }

    /// Units issued over the collection's lifetime.
    #[must_use]
    pub const fn total_minted(&self) -> u64 {
        self.ledger.total_issued()
    }

    /// Units currently held by `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::QueryForNullIdentity`] for the null identity.
    pub fn balance_of(&self, identity: Identity) -> Result<u64, LedgerError> {
        self.ledger.balance_of(identity)
    }

    /// Lifetime units issued directly to `identity`.
    #[must_use]
    pub fn number_minted(&self, identity: Identity) -> u64 {
        self.ledger.number_issued(identity)
    }

    /// Returns `true` iff the unit has been issued.
    #[must_use]
    pub const fn exists(&self, unit_id: u64) -> bool {
        self.ledger.exists(unit_id)
    }

    /// A copyable snapshot of the issued range.
    #[must_use]
    pub const fn existence_index(&self) -> ExistenceIndex {
        self.ledger.existence_index()
    }

    /// The current holder of `unit_id`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnitDoesNotExist`] for ids outside the issued
    /// range.
    pub fn owner_of(&self, unit_id: u64) -> Result<Identity, LedgerError> {
        self.ledger.owner_of(unit_id)
    }

    /// The metadata reference for an issued unit: the configured base URI
    /// with the decimal unit id appended, or empty when no base URI is set.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnitDoesNotExist`] for ids outside the issued
    /// range.
    pub fn unit_uri(&self, unit_id: u64) -> Result<String, LedgerError> {
        if !self.ledger.exists(unit_id) {
            return Err(LedgerError::UnitDoesNotExist { unit_id });
        }
        if self.config.base_uri.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{}{unit_id}", self.config.base_uri))
    }

    /// The phase derived from the gate flags.
    #[must_use]
    pub const fn phase(&self) -> SalePhase {
        self.gate.phase()
    }

    /// Current state of the sale-open flag.
    #[must_use]
    pub const fn sale_open(&self) -> bool {
        self.gate.sale_open()
    }

    /// Current state of the allowlist-required flag.
    #[must_use]
    pub const fn allowlist_required(&self) -> bool {
        self.gate.allowlist_required()
    }

    /// The identity holding a one-time approval for `unit_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnitDoesNotExist`] for ids outside the issued
    /// range.
    pub fn get_approved(&self, unit_id: u64) -> Result<Option<Identity>, LedgerError> {
        self.ledger.get_approved(unit_id)
    }

    /// Returns `true` iff `operator` holds a standing approval from
    /// `holder`.
    #[must_use]
    pub fn is_approved_for_all(&self, holder: Identity, operator: Identity) -> bool {
        self.ledger.is_approved_for_all(holder, operator)
    }

    /// Notifications recorded since the last drain, oldest first.
    #[must_use]
    pub fn events(&self) -> &[TransferEvent] {
        &self.events
    }

    /// Takes and clears the recorded notifications.
    pub fn drain_events(&mut self) -> Vec<TransferEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- owner administration --------------------------------------------

    fn require_owner(&self, caller: Identity) -> Result<(), GateError> {
        if caller == self.config.owner {
            Ok(())
        } else {
            Err(GateError::NotOwner { caller })
        }
    }

    /// Opens or closes the gated sale. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::NotOwner`] for any other caller.
    pub fn set_sale_open(&mut self, caller: Identity, open: bool) -> Result<(), GateError> {
        self.require_owner(caller)?;
        self.gate.set_sale_open(open);
        tracing::info!(open, "sale-open flag updated");
        Ok(())
    }

    /// Sets whether gated mints require an allowlist proof. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::NotOwner`] for any other caller.
    pub fn set_allowlist_required(
        &mut self,
        caller: Identity,
        required: bool,
    ) -> Result<(), GateError> {
        self.require_owner(caller)?;
        self.gate.set_allowlist_required(required);
        tracing::info!(required, "allowlist-required flag updated");
        Ok(())
    }

    /// Administrative issuance: owner only, bypasses phase, allowlist,
    /// quantity, supply, and payment checks entirely.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::NotOwner`] for any other caller, or a
    /// [`GateError::Ledger`] failure from the batch write; nothing is
    /// mutated on failure.
    pub fn admin_issue(
        &mut self,
        caller: Identity,
        recipient: Identity,
        quantity: u64,
    ) -> Result<(u64, u64), GateError> {
        self.require_owner(caller)?;
        let range = self
            .ledger
            .issue_with_acceptor(recipient, quantity, self.acceptor.as_deref())?;
        self.record_issuance(recipient, range);
        tracing::debug!(%recipient, quantity, start = range.0, "administrative issuance");
        Ok(range)
    }

    /// Gated issuance: anyone may call, subject to the sale gate. The
    /// configured owner bypasses every check.
    ///
    /// # Errors
    ///
    /// Returns the first failing gate check (see [`SaleGate::authorize`])
    /// or a [`GateError::Ledger`] failure from the batch write; nothing is
    /// mutated on failure.
    pub fn gated_mint(
        &mut self,
        caller: Identity,
        recipient: Identity,
        quantity: u64,
        proof: &[Hash],
        attached_payment: u128,
    ) -> Result<(u64, u64), GateError> {
        if caller != self.config.owner {
            self.gate.authorize(
                caller,
                quantity,
                proof,
                attached_payment,
                self.ledger.total_issued(),
            )?;
        }
        let range = self
            .ledger
            .issue_with_acceptor(recipient, quantity, self.acceptor.as_deref())?;
        self.record_issuance(recipient, range);
        tracing::debug!(
            %caller,
            %recipient,
            quantity,
            attached_payment,
            start = range.0,
            "gated mint"
        );
        Ok(range)
    }

    // ---- holder operations -----------------------------------------------

    /// Transfers a single unit. The caller must be the holder, hold a
    /// one-time approval for the unit, or hold a standing approval from the
    /// holder. Bypasses the sale gate entirely.
    ///
    /// # Errors
    ///
    /// See [`OwnershipLedger::transfer`].
    pub fn transfer_from(
        &mut self,
        caller: Identity,
        from: Identity,
        to: Identity,
        unit_id: u64,
    ) -> Result<(), LedgerError> {
        self.ledger.transfer(caller, from, to, unit_id)?;
        self.events.push(TransferEvent {
            from: Some(from),
            to,
            unit_id,
        });
        tracing::debug!(%from, %to, unit_id, "unit transferred");
        Ok(())
    }

    /// Grants (or clears, for the null identity) a one-time approval for a
    /// single unit.
    ///
    /// # Errors
    ///
    /// See [`OwnershipLedger::approve`].
    pub fn approve(
        &mut self,
        caller: Identity,
        approved: Identity,
        unit_id: u64,
    ) -> Result<(), LedgerError> {
        self.ledger.approve(caller, approved, unit_id)
    }

    /// Grants or revokes a standing approval for `operator` over every unit
    /// the caller holds.
    ///
    /// # Errors
    ///
    /// See [`OwnershipLedger::set_approval_for_all`].
    pub fn set_approval_for_all(
        &mut self,
        caller: Identity,
        operator: Identity,
        approved: bool,
    ) -> Result<(), LedgerError> {
        self.ledger.set_approval_for_all(caller, operator, approved)
    }

    /// Records one notification per issued unit; the ledger write itself
    /// stays one record per batch.
    fn record_issuance(&mut self, recipient: Identity, (start, end): (u64, u64)) {
        self.events.extend((start..end).map(|unit_id| TransferEvent {
            from: None,
            to: recipient,
            unit_id,
        }));
    }
}

//! Immutable collection configuration.
//!
//! Everything here is fixed at construction time: display metadata, the id
//! offset, the sale parameters, the owner identity, and the allowlist
//! commitment. Only the sale gate's two phase flags mutate after
//! construction, and those live on [`crate::gate::SaleGate`].

use serde::{Deserialize, Serialize};

use crate::crypto::{Hash, ZERO_HASH};
use crate::identity::Identity;

/// Monetary and quota parameters for the gated sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaleParameters {
    /// Price per unit, in the host environment's smallest denomination.
    pub unit_price: u64,
    /// Maximum units a single gated call may issue.
    pub max_per_call: u64,
    /// Maximum units the gated path may drive total issuance to.
    pub max_supply: u64,
}

impl Default for SaleParameters {
    fn default() -> Self {
        Self {
            unit_price: 0,
            max_per_call: u64::MAX,
            max_supply: u64::MAX,
        }
    }
}

/// Construction-time configuration; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Display name of the collection.
    pub name: String,
    /// Short display symbol.
    pub symbol: String,
    /// Id assigned to the first unit ever issued.
    pub start_id: u64,
    /// Sale pricing and quota limits.
    pub sale: SaleParameters,
    /// Identity allowed to administer the sale and issue directly.
    pub owner: Identity,
    /// Base URI prepended to a unit id to form its metadata reference.
    /// Empty means no metadata references are served.
    pub base_uri: String,
    /// Fixed Merkle root committing to the allowlisted identities.
    ///
    /// The zero root admits nobody.
    pub allowlist_root: Hash,
}

impl CollectionConfig {
    /// Creates a builder with the given display name, symbol, and owner.
    pub fn builder(
        name: impl Into<String>,
        symbol: impl Into<String>,
        owner: Identity,
    ) -> CollectionConfigBuilder {
        CollectionConfigBuilder {
            name: name.into(),
            symbol: symbol.into(),
            owner,
            start_id: 0,
            sale: SaleParameters::default(),
            base_uri: String::new(),
            allowlist_root: ZERO_HASH,
        }
    }
}

/// Builder for [`CollectionConfig`].
#[derive(Debug, Clone)]
pub struct CollectionConfigBuilder {
    name: String,
    symbol: String,
    owner: Identity,
    start_id: u64,
    sale: SaleParameters,
    base_uri: String,
    allowlist_root: Hash,
}

impl CollectionConfigBuilder {
    /// Sets the id of the first unit ever issued (default 0).
    #[must_use]
    pub const fn start_id(mut self, start_id: u64) -> Self {
        self.start_id = start_id;
        self
    }

    /// Sets the price per unit (default 0).
    #[must_use]
    pub const fn unit_price(mut self, unit_price: u64) -> Self {
        self.sale.unit_price = unit_price;
        self
    }

    /// Sets the per-call issuance limit (default unlimited).
    #[must_use]
    pub const fn max_per_call(mut self, max_per_call: u64) -> Self {
        self.sale.max_per_call = max_per_call;
        self
    }

    /// Sets the gated supply cap (default unlimited).
    #[must_use]
    pub const fn max_supply(mut self, max_supply: u64) -> Self {
        self.sale.max_supply = max_supply;
        self
    }

    /// Sets the metadata base URI (default empty).
    #[must_use]
    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    /// Sets the allowlist commitment root (default zero, admitting nobody).
    #[must_use]
    pub const fn allowlist_root(mut self, root: Hash) -> Self {
        self.allowlist_root = root;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> CollectionConfig {
        CollectionConfig {
            name: self.name,
            symbol: self.symbol,
            start_id: self.start_id,
            sale: self.sale,
            owner: self.owner,
            base_uri: self.base_uri,
            allowlist_root: self.allowlist_root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Identity {
        Identity::from_bytes([0xEE; 20])
    }

    #[test]
    fn builder_defaults_are_permissive_except_allowlist() {
        let config = CollectionConfig::builder("Test", "TEST", owner()).build();

        assert_eq!(config.start_id, 0);
        assert_eq!(config.sale.unit_price, 0);
        assert_eq!(config.sale.max_per_call, u64::MAX);
        assert_eq!(config.sale.max_supply, u64::MAX);
        assert!(config.base_uri.is_empty());
        assert_eq!(config.allowlist_root, ZERO_HASH);
    }

    #[test]
    fn builder_applies_overrides() {
        let root = [0x42u8; 32];
        let config = CollectionConfig::builder("Test", "TEST", owner())
            .start_id(100)
            .unit_price(2)
            .max_per_call(20)
            .max_supply(100)
            .base_uri("ipfs://units/")
            .allowlist_root(root)
            .build();

        assert_eq!(config.start_id, 100);
        assert_eq!(config.sale.unit_price, 2);
        assert_eq!(config.sale.max_per_call, 20);
        assert_eq!(config.sale.max_supply, 100);
        assert_eq!(config.base_uri, "ipfs://units/");
        assert_eq!(config.allowlist_root, root);
        assert_eq!(config.owner, owner());
    }
}

//! Allowlist membership verification against a fixed Merkle commitment.
//!
//! The commitment root is set at configuration time and never mutated by
//! issuance. Proof *construction* is the allowlist publisher's concern;
//! this module only verifies.

use crate::crypto::{self, Hash, ZERO_HASH};
use crate::identity::Identity;

/// Verifies membership proofs against a fixed allowlist commitment.
///
/// Verification is a pure function of the identity, the supplied proof,
/// and the root; nothing here mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowlistVerifier {
    root: Hash,
}

impl AllowlistVerifier {
    /// Creates a verifier bound to a fixed commitment root.
    ///
    /// The zero root is a valid configuration that admits nobody.
    #[must_use]
    pub const fn new(root: Hash) -> Self {
        Self { root }
    }

    /// The commitment root this verifier checks against.
    #[must_use]
    pub const fn root(&self) -> &Hash {
        &self.root
    }

    /// Returns `true` iff `proof` connects `identity` to the commitment.
    ///
    /// Sibling order is reconstructed from the byte order of each pair, so
    /// the proof carries no direction bits. The zero root fails every
    /// proof.
    #[must_use]
    pub fn verify(&self, identity: Identity, proof: &[Hash]) -> bool {
        if self.root == ZERO_HASH {
            return false;
        }
        let mut node = crypto::hash_identity_leaf(identity.as_bytes());
        for sibling in proof {
            node = crypto::hash_node_pair(&node, sibling);
        }
        node == self.root
    }
}

//! Blake3 hashing with domain separation for Merkle commitments.

/// Size of a Blake3 hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Type alias for a 32-byte hash.
pub type Hash = [u8; HASH_SIZE];

/// The all-zero hash, reserved as the "commits to nothing" root.
pub const ZERO_HASH: Hash = [0u8; HASH_SIZE];

/// Domain prefix for leaf hashes. Distinct from the node prefix so a proof
/// cannot present an interior node as a leaf.
const LEAF_DOMAIN: &[u8] = b"tessera.allowlist.leaf.v1";

/// Domain prefix for interior node hashes.
const NODE_DOMAIN: &[u8] = b"tessera.allowlist.node.v1";

/// Hashes an identity's raw bytes into an allowlist leaf.
#[must_use]
pub fn hash_identity_leaf(identity_bytes: &[u8]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(LEAF_DOMAIN);
    hasher.update(identity_bytes);
    *hasher.finalize().as_bytes()
}

/// Hashes two sibling nodes into their parent.
///
/// The pair is ordered bytewise before hashing, so a verifier needs no
/// left/right direction bits alongside the proof.
#[must_use]
pub fn hash_node_pair(a: &Hash, b: &Hash) -> Hash {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = blake3::Hasher::new();
    hasher.update(NODE_DOMAIN);
    hasher.update(lo);
    hasher.update(hi);
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_hash_is_deterministic() {
        let a = hash_identity_leaf(b"identity-1");
        let b = hash_identity_leaf(b"identity-1");
        assert_eq!(a, b);

        let c = hash_identity_leaf(b"identity-2");
        assert_ne!(a, c);
    }

    #[test]
    fn leaf_and_node_domains_are_separated() {
        // A 64-byte leaf input must not collide with a node over the same
        // bytes split into two halves.
        let half_a = [0x11u8; HASH_SIZE];
        let half_b = [0x22u8; HASH_SIZE];
        let mut concatenated = Vec::with_capacity(HASH_SIZE * 2);
        concatenated.extend_from_slice(&half_a);
        concatenated.extend_from_slice(&half_b);

        let as_leaf = hash_identity_leaf(&concatenated);
        let as_node = hash_node_pair(&half_a, &half_b);
        assert_ne!(as_leaf, as_node);
    }

    #[test]
    fn node_pair_hash_is_commutative() {
        let a = hash_identity_leaf(b"left");
        let b = hash_identity_leaf(b"right");
        assert_eq!(hash_node_pair(&a, &b), hash_node_pair(&b, &a));
    }

    #[test]
    fn node_pair_hash_distinguishes_inputs() {
        let a = hash_identity_leaf(b"left");
        let b = hash_identity_leaf(b"right");
        let c = hash_identity_leaf(b"other");
        assert_ne!(hash_node_pair(&a, &b), hash_node_pair(&a, &c));
    }
}

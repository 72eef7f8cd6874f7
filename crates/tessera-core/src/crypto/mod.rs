//! Hashing primitives for the allowlist commitment.

mod hash;

pub use hash::{hash_identity_leaf, hash_node_pair, Hash, HASH_SIZE, ZERO_HASH};

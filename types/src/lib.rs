//! Fundamental types for the weft node.
//!
//! This crate defines the primitives shared by every other crate in the
//! workspace: nanosecond timestamps, content-addressed transaction
//! identifiers, node identities, and Ed25519 key material.

pub mod keys;
pub mod node;
pub mod time;
pub mod transaction;

pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use node::NodeId;
pub use time::Timestamp;
pub use transaction::TransactionId;

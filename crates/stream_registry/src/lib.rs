//! Type registry for polymorphic bucket deserialization.
//!
//! A reader that only knows a bucket's wire-level type tag resolves the tag here to a
//! [`BucketStream`], then lets that stream read the bucket. Streams also capture the
//! [`StreamContext`] a later read needs to rebuild an equivalent bucket.
//!
//! # Key types
//!
//! | Type | Role |
//! |------|------|
//! | [`StreamRegistry`] | Atomic container; lock-free lookups, serialized registrations. |
//! | [`Snapshot`] | Immutable key-to-stream mapping at one publication. |
//! | [`TypeKey`] | Opaque byte tag identifying a bucket type. |
//! | [`BucketStream`] | Per-type read / context capability. |
//! | [`PersistentMap`] | Structurally shared hash trie backing each snapshot. |
//!
//! # Registration
//!
//! Streams are registered at runtime with [`StreamRegistry::register_stream`] or statically with
//! [`bucket_stream!`], which [`StreamRegistry::register_inventory`] collects. The shared instance
//! in [`global::streams`] is built from the static submissions.

pub mod builtins;
mod config;
mod error;
pub mod global;
mod key;
pub mod map;
mod registry;
mod snapshot;
mod stream;


#[cfg(test)]
pub(crate) mod test_fixtures;

#[doc(hidden)]
pub use inventory;

pub use builtins::StreamReg;
pub use config::{EmptyKeyPolicy, RegistryConfig};
pub use error::{ConfigError, RegisterError, StreamError};
pub use key::TypeKey;
pub use map::PersistentMap;
pub use registry::StreamRegistry;
pub use snapshot::{Snapshot, StreamRef};
pub use stream::{Bucket, BucketStream, StreamContext, ensure_remaining};

//! Immutable registry views.
//!
//! # Role
//!
//! A [`Snapshot`] is the complete key-to-stream mapping at one publication. It contains no
//! mutation logic; the registry derives the next snapshot from the current one and swaps it in.
//!
//! # Invariants
//!
//! - A snapshot is never modified after publication
//!   (see `invariants::test_snapshot_isolation_across_swap`).
//! - Each key maps to at most one stream.

use std::fmt;
use std::sync::Arc;

use crate::key::TypeKey;
use crate::map::PersistentMap;
use crate::stream::BucketStream;

/// Shared handle to a registered stream.
pub type StreamRef = Arc<dyn BucketStream>;

/// Registry state at one publication.
#[derive(Clone, Default)]
pub struct Snapshot {
	pub(crate) streams: PersistentMap<TypeKey, StreamRef>,
	/// Number of publications that led to this snapshot; zero for the initial empty one.
	pub(crate) generation: u64,
}

impl Snapshot {
	#[inline]
	pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&StreamRef> {
		self.streams.get(key.as_ref())
	}

	pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
		self.streams.contains_key(key.as_ref())
	}

	pub fn len(&self) -> usize {
		self.streams.len()
	}

	pub fn is_empty(&self) -> bool {
		self.streams.is_empty()
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn keys(&self) -> impl Iterator<Item = &TypeKey> + '_ {
		self.streams.keys()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&TypeKey, &StreamRef)> + '_ {
		self.streams.iter()
	}
}

impl fmt::Debug for Snapshot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		struct Streams<'a>(&'a PersistentMap<TypeKey, StreamRef>);

		impl fmt::Debug for Streams<'_> {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.debug_map()
					.entries(self.0.iter().map(|(k, s)| (k, s.name())))
					.finish()
			}
		}

		f.debug_struct("Snapshot")
			.field("generation", &self.generation)
			.field("streams", &Streams(&self.streams))
			.finish()
	}
}

//! Copy-on-write stream registry with atomic publication.
//!
//! # Mental model
//!
//! * Readers load the current `Arc<Snapshot>` with one atomic read and query that immutable view.
//! * Writers hold the writer mutex, derive the next snapshot from the current one, and store it.
//! * A reader that loaded the previous snapshot keeps a complete, consistent view of it.
//!
//! # Concurrency & ordering
//!
//! * Lookups are lock-free and never wait on writers (`ArcSwap` load).
//! * Registrations are serialized by `writer`, so load-then-store cannot lose an update and
//!   every registration lands in a single total order.
//! * All keys of one registration become visible in the same publication.
//!
//! # Invariants
//!
//! - Last registration touching a key wins (see `invariants::test_last_writer_wins`).
//! - Aliased keys resolve to the same stream instance
//!   (see `invariants::test_aliases_share_stream`).
//! - Rejected registrations publish nothing
//!   (see `invariants::test_rejected_registration_is_inert`).
//! - Readers never observe a partial registration
//!   (see `invariants::test_readers_see_whole_publications`).

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::{EmptyKeyPolicy, RegistryConfig};
use crate::error::RegisterError;
use crate::key::TypeKey;
use crate::snapshot::{Snapshot, StreamRef};


/// Registry mapping wire type keys to the streams that read them.
pub struct StreamRegistry {
	label: Box<str>,
	empty_keys: EmptyKeyPolicy,
	snap: ArcSwap<Snapshot>,
	writer: Mutex<()>,
}

impl StreamRegistry {
	/// Creates an empty registry with the default configuration.
	pub fn new() -> Self {
		Self::with_config(RegistryConfig::default())
	}

	pub fn with_config(config: RegistryConfig) -> Self {
		Self {
			label: config.label.into_boxed_str(),
			empty_keys: config.empty_keys,
			snap: ArcSwap::from_pointee(Snapshot::default()),
			writer: Mutex::new(()),
		}
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	/// Returns the stream registered for `key` in the latest published snapshot.
	#[inline]
	pub fn stream(&self, key: impl AsRef<[u8]>) -> Option<StreamRef> {
		let key = key.as_ref();
		let found = self.snap.load().get(key).cloned();
		if found.is_none() {
			trace!(
				registry = %self.label,
				key = %String::from_utf8_lossy(key),
				"no stream registered"
			);
		}
		found
	}

	/// Binds `stream` to every key in `keys`, superseding earlier bindings.
	///
	/// All keys are published together. An empty `keys` is handled according to the
	/// configured [`EmptyKeyPolicy`] and never publishes.
	pub fn register_stream<I>(&self, stream: StreamRef, keys: I) -> Result<(), RegisterError>
	where
		I: IntoIterator,
		I::Item: Into<TypeKey>,
	{
		let keys: Vec<TypeKey> = keys.into_iter().map(Into::into).collect();
		if keys.is_empty() {
			return self.empty_registration(RegisterError::NoKeys {
				label: self.label.clone(),
				stream: stream.name().into(),
			});
		}
		self.publish(keys.into_iter().map(|key| (key, Arc::clone(&stream))));
		Ok(())
	}

	/// Pins the current snapshot. Later registrations do not affect it.
	pub fn snapshot(&self) -> Arc<Snapshot> {
		self.snap.load_full()
	}

	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.snap.load().is_empty()
	}

	pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
		self.snap.load().contains(key)
	}

	/// Number of publications so far.
	pub fn generation(&self) -> u64 {
		self.snap.load().generation()
	}

	/// Applies the empty-key policy to a registration that bound no keys.
	pub(crate) fn empty_registration(&self, error: RegisterError) -> Result<(), RegisterError> {
		match self.empty_keys {
			EmptyKeyPolicy::Reject => {
				warn!(registry = %self.label, %error, "rejected registration without type keys");
				Err(error)
			}
			EmptyKeyPolicy::Ignore => {
				debug!(registry = %self.label, %error, "ignored registration without type keys");
				Ok(())
			}
		}
	}

	/// Installs `entries` in one new snapshot. Publishes nothing when `entries` is empty.
	pub(crate) fn publish<I>(&self, entries: I)
	where
		I: IntoIterator<Item = (TypeKey, StreamRef)>,
	{
		let _writer = self.writer.lock();
		let current = self.snap.load_full();
		let generation = current.generation + 1;

		let mut streams = current.streams.clone();
		for (key, stream) in entries {
			let replaced = streams.contains_key(key.as_bytes());
			debug!(
				registry = %self.label,
				key = %key,
				stream = stream.name(),
				replaced,
				generation,
				"registered bucket stream"
			);
			streams = streams.insert(key, stream);
		}

		if streams.ptr_eq(&current.streams) {
			return;
		}
		self.snap.store(Arc::new(Snapshot {
			streams,
			generation,
		}));
	}
}

impl Default for StreamRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for StreamRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let snap = self.snap.load();
		f.debug_struct("StreamRegistry")
			.field("label", &self.label)
			.field("empty_keys", &self.empty_keys)
			.field("generation", &snap.generation())
			.field("len", &snap.len())
			.finish()
	}
}

//! Static stream registration via `inventory`.
//!
//! Each `bucket_stream!` invocation submits a [`StreamReg`]. Domain modules that never see each
//! other register their streams this way, and [`StreamRegistry::register_inventory`] collects
//! every submission linked into the binary.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::RegisterError;
use crate::key::TypeKey;
use crate::registry::StreamRegistry;
use crate::snapshot::StreamRef;

/// Static registration entry collected via `inventory`.
pub struct StreamReg {
	/// Wire tags bound to the stream.
	pub keys: &'static [&'static str],
	/// Crate that submitted the registration.
	pub crate_name: &'static str,
	/// Builds the stream instance shared by all of `keys`.
	pub make: fn() -> StreamRef,
}

inventory::collect!(StreamReg);

/// Submits a bucket stream for static registration.
///
/// ```ignore
/// fn terms() -> StreamRef {
///     Arc::new(TermsStream)
/// }
///
/// stream_registry::bucket_stream!(terms, ["terms", "sterms"]);
/// ```
#[macro_export]
macro_rules! bucket_stream {
	($make:path, [$($key:literal),+ $(,)?]) => {
		$crate::inventory::submit! {
			$crate::builtins::StreamReg {
				keys: &[$($key),+],
				crate_name: env!("CARGO_PKG_NAME"),
				make: $make,
			}
		}
	};
}

impl StreamRegistry {
	/// Creates a registry holding every `bucket_stream!` submission.
	pub fn from_inventory() -> Result<Self, RegisterError> {
		let registry = Self::new();
		registry.register_inventory()?;
		Ok(registry)
	}

	/// Registers every `bucket_stream!` submission in a single publication.
	///
	/// Returns the number of submissions that bound at least one key. A submission without keys
	/// follows the configured empty-key policy: under `Reject` the whole call fails and nothing is
	/// published, under `Ignore` the submission is skipped without building its stream.
	pub fn register_inventory(&self) -> Result<usize, RegisterError> {
		let mut entries = Vec::new();
		let mut registered = 0;

		for reg in inventory::iter::<StreamReg> {
			if reg.keys.is_empty() {
				self.empty_registration(RegisterError::EmptySubmission {
					label: self.label().into(),
					crate_name: reg.crate_name,
				})?;
				continue;
			}
			let stream = (reg.make)();
			debug!(
				registry = %self.label(),
				crate_name = reg.crate_name,
				stream = stream.name(),
				"collected static bucket stream"
			);
			registered += 1;
			entries.extend(
				reg.keys
					.iter()
					.map(|&key| (TypeKey::from(key), Arc::clone(&stream))),
			);
		}

		self.publish(entries);
		info!(registry = %self.label(), registered, "registered static bucket streams");
		Ok(registered)
	}
}

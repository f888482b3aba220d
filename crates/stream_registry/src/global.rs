//! Process-wide registry for binaries that want a single shared instance.
//!
//! Library code should take a `&StreamRegistry` instead of calling [`streams`], so that tests can
//! build isolated registries.

use std::sync::OnceLock;

use crate::error::RegisterError;
use crate::registry::StreamRegistry;

static STREAMS: OnceLock<Result<StreamRegistry, RegisterError>> = OnceLock::new();

/// Returns the shared registry, populating it from `bucket_stream!` submissions on first use.
///
/// A rejected static submission is remembered, so every call reports the same error.
pub fn streams() -> Result<&'static StreamRegistry, RegisterError> {
	STREAMS
		.get_or_init(StreamRegistry::from_inventory)
		.as_ref()
		.map_err(Clone::clone)
}

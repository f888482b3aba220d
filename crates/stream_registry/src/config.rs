//! Registry configuration loaded from TOML.
//!
//! ```toml
//! label = "aggregation-buckets"
//! empty_keys = "ignore"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// What to do when a registration names no type keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyKeyPolicy {
	/// Fail with [`crate::RegisterError::NoKeys`], or [`crate::RegisterError::EmptySubmission`] for a
	/// static submission.
	#[default]
	Reject,
	/// Accept the call and publish nothing.
	Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Name attached to log events and errors from this registry.
	pub label: String,
	pub empty_keys: EmptyKeyPolicy,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			label: "streams".to_string(),
			empty_keys: EmptyKeyPolicy::default(),
		}
	}
}

impl RegistryConfig {
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(src)?)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&src)
	}
}

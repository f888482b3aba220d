//! Error types for registration, stream reads, and config loading.

use std::path::PathBuf;

/// Registration rejected before any snapshot was published.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
	/// The call supplied a stream but no type keys to bind it to.
	#[error("{label}: stream '{stream}' registered without any type keys")]
	NoKeys { label: Box<str>, stream: Box<str> },

	/// A static submission carried an empty key list.
	#[error("{label}: static submission from crate '{crate_name}' has no type keys")]
	EmptySubmission {
		label: Box<str>,
		crate_name: &'static str,
	},
}

/// Failure raised by a [`crate::BucketStream`] while reading a bucket or capturing its context.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
	#[error("truncated input: needed {needed} bytes, {remaining} remaining")]
	Truncated { needed: usize, remaining: usize },

	#[error("malformed bucket: {0}")]
	Malformed(String),

	#[error("expected bucket of type {expected}, found {found}")]
	UnexpectedBucket {
		expected: &'static str,
		found: &'static str,
	},

	#[error("stream context is missing attribute '{0}'")]
	MissingAttribute(&'static str),
}

/// Failure loading a [`crate::RegistryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid registry config: {0}")]
	Parse(#[from] toml::de::Error),
}

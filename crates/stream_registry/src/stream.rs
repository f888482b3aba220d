//! Handler capability consumed from domain types.
//!
//! Each bucket type supplies one [`BucketStream`] and binds it to its wire tags through the
//! registry. The registry never calls these methods itself; the deserialization framework does,
//! after resolving the tag.

use std::any::{Any, type_name};
use std::collections::BTreeMap;
use std::fmt::Debug;

use bytes::Buf;
use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// A deserialized aggregation bucket.
pub trait Bucket: Any + Debug + Send + Sync {
	/// Concrete type name, used in diagnostics.
	fn kind(&self) -> &'static str {
		type_name::<Self>()
	}
}

impl dyn Bucket {
	pub fn downcast_ref<T: Bucket>(&self) -> Option<&T> {
		let any: &dyn Any = self;
		any.downcast_ref()
	}

	pub fn is<T: Bucket>(&self) -> bool {
		self.downcast_ref::<T>().is_some()
	}

	/// Downcasts or reports which bucket type was actually supplied.
	pub fn expect_kind<T: Bucket>(&self) -> Result<&T, StreamError> {
		self.downcast_ref().ok_or_else(|| StreamError::UnexpectedBucket {
			expected: type_name::<T>(),
			found: self.kind(),
		})
	}
}

/// Auxiliary state captured from a bucket so that a later read can rebuild an equivalent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamContext {
	/// Whether buckets of this shape are rendered as a keyed object rather than a list.
	pub keyed: bool,
	/// Value format applied to bucket keys, if any.
	pub format: Option<String>,
	/// Handler-specific parameters.
	pub attributes: BTreeMap<String, String>,
}

impl StreamContext {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn keyed(mut self, keyed: bool) -> Self {
		self.keyed = keyed;
		self
	}

	pub fn with_format(mut self, format: impl Into<String>) -> Self {
		self.format = Some(format.into());
		self
	}

	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.get(name).map(String::as_str)
	}

	pub fn require_attribute(&self, name: &'static str) -> Result<&str, StreamError> {
		self.attribute(name).ok_or(StreamError::MissingAttribute(name))
	}
}

/// Reads one bucket type from the wire and captures the context needed to read it back.
pub trait BucketStream: Send + Sync + 'static {
	/// Reads a bucket from `input`, interpreting it with `context`.
	fn read_result(
		&self,
		input: &mut dyn Buf,
		context: &StreamContext,
	) -> Result<Box<dyn Bucket>, StreamError>;

	/// Derives the context that [`BucketStream::read_result`] needs to rebuild `bucket`.
	fn stream_context(&self, bucket: &dyn Bucket) -> Result<StreamContext, StreamError>;

	/// Name used in registry logs.
	fn name(&self) -> &str {
		type_name::<Self>()
	}
}

/// Fails with [`StreamError::Truncated`] unless `input` still holds `needed` bytes.
///
/// `Buf` getters panic on underflow, so handlers check lengths before reading.
pub fn ensure_remaining(input: &dyn Buf, needed: usize) -> Result<(), StreamError> {
	let remaining = input.remaining();
	if remaining < needed {
		return Err(StreamError::Truncated { needed, remaining });
	}
	Ok(())
}

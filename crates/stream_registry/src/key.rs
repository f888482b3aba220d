//! Wire-level type tags.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use bytes::Bytes;

/// Opaque byte-sequence tag identifying a bucket type on the wire.
///
/// Hashes and compares exactly like its byte content, so lookups can be made with any
/// `&[u8]` without building a key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TypeKey(Bytes);

impl TypeKey {
	pub const fn from_static(bytes: &'static [u8]) -> Self {
		Self(Bytes::from_static(bytes))
	}

	pub fn copy_from_slice(bytes: &[u8]) -> Self {
		Self(Bytes::copy_from_slice(bytes))
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn into_bytes(self) -> Bytes {
		self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl Hash for TypeKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.as_bytes().hash(state);
	}
}

impl Borrow<[u8]> for TypeKey {
	fn borrow(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl AsRef<[u8]> for TypeKey {
	fn as_ref(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl From<&'static str> for TypeKey {
	fn from(s: &'static str) -> Self {
		Self::from_static(s.as_bytes())
	}
}

impl From<&'static [u8]> for TypeKey {
	fn from(bytes: &'static [u8]) -> Self {
		Self::from_static(bytes)
	}
}

impl From<Bytes> for TypeKey {
	fn from(bytes: Bytes) -> Self {
		Self(bytes)
	}
}

impl From<Vec<u8>> for TypeKey {
	fn from(bytes: Vec<u8>) -> Self {
		Self(Bytes::from(bytes))
	}
}

impl From<String> for TypeKey {
	fn from(s: String) -> Self {
		Self(Bytes::from(s))
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&String::from_utf8_lossy(&self.0))
	}
}

impl fmt::Debug for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeKey({:?})", String::from_utf8_lossy(&self.0))
	}
}

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Buf;

use crate::{Bucket, BucketStream, StreamContext, StreamError, StreamRef};

/// Bucket that only records which stream produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Marker {
	pub(crate) stream: &'static str,
}

impl Bucket for Marker {}

/// Stream identified by name, optionally counting its drops.
pub(crate) struct NamedStream {
	pub(crate) name: &'static str,
	drops: Option<Arc<AtomicUsize>>,
}

impl Drop for NamedStream {
	fn drop(&mut self) {
		if let Some(counter) = &self.drops {
			counter.fetch_add(1, Ordering::SeqCst);
		}
	}
}

impl BucketStream for NamedStream {
	fn read_result(
		&self,
		_input: &mut dyn Buf,
		_context: &StreamContext,
	) -> Result<Box<dyn Bucket>, StreamError> {
		Ok(Box::new(Marker { stream: self.name }))
	}

	fn stream_context(&self, bucket: &dyn Bucket) -> Result<StreamContext, StreamError> {
		let marker = bucket.expect_kind::<Marker>()?;
		Ok(StreamContext::new().with_attribute("stream", marker.stream))
	}

	fn name(&self) -> &str {
		self.name
	}
}

pub(crate) fn named(name: &'static str) -> StreamRef {
	Arc::new(NamedStream { name, drops: None })
}

pub(crate) fn tracked(name: &'static str, drops: &Arc<AtomicUsize>) -> StreamRef {
	Arc::new(NamedStream {
		name,
		drops: Some(Arc::clone(drops)),
	})
}

/// Name of the stream `registry` currently resolves `key` to.
pub(crate) fn resolved(
	registry: &crate::StreamRegistry,
	key: impl AsRef<[u8]>,
) -> Option<String> {
	registry.stream(key).map(|s| s.name().to_string())
}

pub(crate) fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

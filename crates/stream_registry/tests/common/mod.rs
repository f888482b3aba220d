#![allow(dead_code)]

use std::sync::Arc;

use bytes::{Buf, BufMut, BytesMut};
use stream_registry::{
	Bucket, BucketStream, StreamContext, StreamError, StreamRef, ensure_remaining,
};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn put_string(out: &mut BytesMut, s: &str) {
	out.put_u16(s.len() as u16);
	out.put_slice(s.as_bytes());
}

fn get_string(input: &mut dyn Buf) -> Result<String, StreamError> {
	ensure_remaining(input, 2)?;
	let len = input.get_u16() as usize;
	ensure_remaining(input, len)?;
	let mut raw = vec![0; len];
	input.copy_to_slice(&mut raw);
	String::from_utf8(raw).map_err(|e| StreamError::Malformed(e.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeBucket {
	pub key: String,
	pub from: f64,
	pub to: f64,
	pub doc_count: u64,
	pub keyed: bool,
	pub format: Option<String>,
}

impl Bucket for RangeBucket {}

/// Reads numeric and date range buckets; the date variant differs only in its key format.
pub struct RangeStream;

impl RangeStream {
	pub fn write(bucket: &RangeBucket, out: &mut BytesMut) {
		put_string(out, &bucket.key);
		out.put_f64(bucket.from);
		out.put_f64(bucket.to);
		out.put_u64(bucket.doc_count);
	}
}

impl BucketStream for RangeStream {
	fn read_result(
		&self,
		input: &mut dyn Buf,
		context: &StreamContext,
	) -> Result<Box<dyn Bucket>, StreamError> {
		let key = get_string(input)?;
		ensure_remaining(input, 24)?;
		Ok(Box::new(RangeBucket {
			key,
			from: input.get_f64(),
			to: input.get_f64(),
			doc_count: input.get_u64(),
			keyed: context.keyed,
			format: context.format.clone(),
		}))
	}

	fn stream_context(&self, bucket: &dyn Bucket) -> Result<StreamContext, StreamError> {
		let bucket = bucket.expect_kind::<RangeBucket>()?;
		let mut context = StreamContext::new().keyed(bucket.keyed);
		context.format = bucket.format.clone();
		Ok(context)
	}

	fn name(&self) -> &str {
		"range"
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermsBucket {
	pub term: String,
	pub doc_count: u64,
	/// Present only when the aggregation was asked to report per-term error bounds.
	pub doc_count_error: Option<u64>,
}

impl Bucket for TermsBucket {}

pub struct TermsStream;

impl TermsStream {
	pub fn write(bucket: &TermsBucket, out: &mut BytesMut) {
		put_string(out, &bucket.term);
		out.put_u64(bucket.doc_count);
		if let Some(err) = bucket.doc_count_error {
			out.put_u64(err);
		}
	}
}

impl BucketStream for TermsStream {
	fn read_result(
		&self,
		input: &mut dyn Buf,
		context: &StreamContext,
	) -> Result<Box<dyn Bucket>, StreamError> {
		let show_error = match context.require_attribute("show_doc_count_error")? {
			"true" => true,
			"false" => false,
			other => {
				return Err(StreamError::Malformed(format!(
					"show_doc_count_error must be a boolean, got '{other}'"
				)));
			}
		};
		let term = get_string(input)?;
		ensure_remaining(input, 8)?;
		let doc_count = input.get_u64();
		let doc_count_error = if show_error {
			ensure_remaining(input, 8)?;
			Some(input.get_u64())
		} else {
			None
		};
		Ok(Box::new(TermsBucket {
			term,
			doc_count,
			doc_count_error,
		}))
	}

	fn stream_context(&self, bucket: &dyn Bucket) -> Result<StreamContext, StreamError> {
		let bucket = bucket.expect_kind::<TermsBucket>()?;
		let show = bucket.doc_count_error.is_some();
		Ok(StreamContext::new().with_attribute("show_doc_count_error", show.to_string()))
	}

	fn name(&self) -> &str {
		"terms"
	}
}

pub fn range_stream() -> StreamRef {
	Arc::new(RangeStream)
}

pub fn terms_stream() -> StreamRef {
	Arc::new(TermsStream)
}

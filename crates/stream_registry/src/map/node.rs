//! Trie nodes and the path-copying insert.
//!
//! # Invariants
//!
//! - A `Branch` never holds a slot for an unset bitmap bit, and slot order follows bit order.
//! - A `Collision` node only exists once every hash bit has been consumed, so all of its
//!   leaves share one hash.

use std::borrow::Borrow;
use std::sync::Arc;

pub(super) const BITS: u32 = 5;
const MASK: u64 = (1 << BITS) - 1;
const HASH_BITS: u32 = u64::BITS;

pub(super) struct Leaf<K, V> {
	pub(super) hash: u64,
	pub(super) key: K,
	pub(super) value: V,
}

pub(super) enum Slot<K, V> {
	Leaf(Arc<Leaf<K, V>>),
	Node(Arc<Node<K, V>>),
}

impl<K, V> Clone for Slot<K, V> {
	fn clone(&self) -> Self {
		match self {
			Slot::Leaf(leaf) => Slot::Leaf(Arc::clone(leaf)),
			Slot::Node(node) => Slot::Node(Arc::clone(node)),
		}
	}
}

pub(super) enum Node<K, V> {
	Branch { bitmap: u32, slots: Box<[Slot<K, V>]> },
	Collision { hash: u64, leaves: Box<[Arc<Leaf<K, V>>]> },
}

#[inline]
fn bit_for(hash: u64, shift: u32) -> u32 {
	1 << ((hash >> shift) & MASK)
}

#[inline]
fn slot_index(bitmap: u32, bit: u32) -> usize {
	(bitmap & (bit - 1)).count_ones() as usize
}

impl<K, V> Node<K, V> {
	pub(super) fn empty() -> Self {
		Node::Branch {
			bitmap: 0,
			slots: Box::default(),
		}
	}

	pub(super) fn get<Q>(&self, hash: u64, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Eq + ?Sized,
	{
		let mut node = self;
		let mut shift = 0;
		loop {
			match node {
				Node::Branch { bitmap, slots } => {
					let bit = bit_for(hash, shift);
					if bitmap & bit == 0 {
						return None;
					}
					match &slots[slot_index(*bitmap, bit)] {
						Slot::Leaf(leaf) => {
							return (leaf.hash == hash && leaf.key.borrow() == key)
								.then_some(&leaf.value);
						}
						Slot::Node(child) => {
							node = child.as_ref();
							shift += BITS;
						}
					}
				}
				Node::Collision { hash: h, leaves } => {
					if *h != hash {
						return None;
					}
					return leaves
						.iter()
						.find(|leaf| leaf.key.borrow() == key)
						.map(|leaf| &leaf.value);
				}
			}
		}
	}

	/// Returns a copy of `self` with `leaf` installed, sharing every untouched subtree.
	///
	/// The flag reports whether an existing leaf with the same key was superseded.
	pub(super) fn insert(&self, shift: u32, leaf: Arc<Leaf<K, V>>) -> (Self, bool)
	where
		K: Eq,
	{
		match self {
			Node::Branch { bitmap, slots } => {
				let bit = bit_for(leaf.hash, shift);
				let idx = slot_index(*bitmap, bit);

				if bitmap & bit == 0 {
					let mut next = Vec::with_capacity(slots.len() + 1);
					next.extend_from_slice(&slots[..idx]);
					next.push(Slot::Leaf(leaf));
					next.extend_from_slice(&slots[idx..]);
					let node = Node::Branch {
						bitmap: bitmap | bit,
						slots: next.into_boxed_slice(),
					};
					return (node, false);
				}

				let (slot, replaced) = match &slots[idx] {
					Slot::Leaf(existing)
						if existing.hash == leaf.hash && existing.key == leaf.key =>
					{
						(Slot::Leaf(leaf), true)
					}
					Slot::Leaf(existing) => {
						let merged = Self::merge(shift + BITS, Arc::clone(existing), leaf);
						(Slot::Node(Arc::new(merged)), false)
					}
					Slot::Node(child) => {
						let (child, replaced) = child.insert(shift + BITS, leaf);
						(Slot::Node(Arc::new(child)), replaced)
					}
				};

				let mut next = slots.to_vec();
				next[idx] = slot;
				let node = Node::Branch {
					bitmap: *bitmap,
					slots: next.into_boxed_slice(),
				};
				(node, replaced)
			}
			Node::Collision { hash, leaves } => {
				debug_assert_eq!(*hash, leaf.hash);
				let mut next = leaves.to_vec();
				let replaced = match next.iter().position(|l| l.key == leaf.key) {
					Some(pos) => {
						next[pos] = leaf;
						true
					}
					None => {
						next.push(leaf);
						false
					}
				};
				let node = Node::Collision {
					hash: *hash,
					leaves: next.into_boxed_slice(),
				};
				(node, replaced)
			}
		}
	}

	/// Builds the smallest subtree separating two leaves that shared a slot at `shift - BITS`.
	fn merge(shift: u32, a: Arc<Leaf<K, V>>, b: Arc<Leaf<K, V>>) -> Self {
		if shift >= HASH_BITS {
			return Node::Collision {
				hash: a.hash,
				leaves: vec![a, b].into_boxed_slice(),
			};
		}

		let bit_a = bit_for(a.hash, shift);
		let bit_b = bit_for(b.hash, shift);
		if bit_a == bit_b {
			let child = Self::merge(shift + BITS, a, b);
			return Node::Branch {
				bitmap: bit_a,
				slots: vec![Slot::Node(Arc::new(child))].into_boxed_slice(),
			};
		}

		let slots = if bit_a < bit_b {
			vec![Slot::Leaf(a), Slot::Leaf(b)]
		} else {
			vec![Slot::Leaf(b), Slot::Leaf(a)]
		};
		Node::Branch {
			bitmap: bit_a | bit_b,
			slots: slots.into_boxed_slice(),
		}
	}

	/// Number of nodes on the deepest path, counting `self`.
	#[cfg(test)]
	pub(super) fn depth(&self) -> usize {
		match self {
			Node::Branch { slots, .. } => {
				1 + slots
					.iter()
					.map(|slot| match slot {
						Slot::Leaf(_) => 0,
						Slot::Node(child) => child.depth(),
					})
					.max()
					.unwrap_or(0)
			}
			Node::Collision { .. } => 1,
		}
	}
}

//! Persistent hash map with structural sharing.
//!
//! # Role
//!
//! Backing store for registry snapshots. [`PersistentMap::insert`] never mutates the receiver;
//! it returns a new map that copies only the nodes on the path from the root to the changed
//! entry and shares every other subtree with the original.
//!
//! # Layout
//!
//! A hash array mapped trie: each branch consumes five bits of a 64-bit `FxHasher` hash and
//! stores its children densely behind a 32-bit occupancy bitmap. Keys whose hashes agree on all
//! 64 bits end up together in a collision node and are compared by equality.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHasher;

mod node;

use node::{Leaf, Node, Slot};


fn hash_of<Q: Hash + ?Sized>(key: &Q) -> u64 {
	let mut hasher = FxHasher::default();
	key.hash(&mut hasher);
	hasher.finish()
}

/// Immutable hash map; cloning is O(1) and updates return new versions.
pub struct PersistentMap<K, V> {
	root: Arc<Node<K, V>>,
	len: usize,
}

impl<K, V> PersistentMap<K, V> {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self {
			root: Arc::new(Node::empty()),
			len: 0,
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Iterates entries in trie order, which is stable for a given map but otherwise unspecified.
	pub fn iter(&self) -> Iter<'_, K, V> {
		let mut stack = Vec::new();
		let mut leaves = None;
		match self.root.as_ref() {
			Node::Branch { slots, .. } => stack.push(slots.iter()),
			Node::Collision { leaves: l, .. } => leaves = Some(l.iter()),
		}
		Iter { stack, leaves }
	}

	pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
		self.iter().map(|(k, _)| k)
	}

	/// Returns true when both maps point at the same root node.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.root, &other.root)
	}

	#[cfg(test)]
	pub(crate) fn depth(&self) -> usize {
		self.root.depth()
	}
}

impl<K, V> PersistentMap<K, V>
where
	K: Hash + Eq,
{
	/// Looks up `key`, accepting any borrowed form that hashes like `K`.
	pub fn get<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.root.get(hash_of(key), key)
	}

	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.get(key).is_some()
	}

	/// Returns a new map with `key` bound to `value`, superseding any previous binding.
	#[must_use]
	pub fn insert(&self, key: K, value: V) -> Self {
		let hash = hash_of(&key);
		let leaf = Arc::new(Leaf { hash, key, value });
		let (root, replaced) = self.root.insert(0, leaf);
		Self {
			root: Arc::new(root),
			len: if replaced { self.len } else { self.len + 1 },
		}
	}
}

impl<K, V> Clone for PersistentMap<K, V> {
	fn clone(&self) -> Self {
		Self {
			root: Arc::clone(&self.root),
			len: self.len,
		}
	}
}

impl<K, V> Default for PersistentMap<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentMap<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<K, V> FromIterator<(K, V)> for PersistentMap<K, V>
where
	K: Hash + Eq,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		iter.into_iter()
			.fold(Self::new(), |map, (k, v)| map.insert(k, v))
	}
}

impl<'a, K, V> IntoIterator for &'a PersistentMap<K, V> {
	type Item = (&'a K, &'a V);
	type IntoIter = Iter<'a, K, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Depth-first iterator over a [`PersistentMap`].
pub struct Iter<'a, K, V> {
	stack: Vec<std::slice::Iter<'a, Slot<K, V>>>,
	leaves: Option<std::slice::Iter<'a, Arc<Leaf<K, V>>>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
	type Item = (&'a K, &'a V);

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(leaves) = &mut self.leaves {
				if let Some(leaf) = leaves.next() {
					return Some((&leaf.key, &leaf.value));
				}
				self.leaves = None;
			}

			let top = self.stack.last_mut()?;
			match top.next() {
				None => {
					self.stack.pop();
				}
				Some(Slot::Leaf(leaf)) => return Some((&leaf.key, &leaf.value)),
				Some(Slot::Node(child)) => match child.as_ref() {
					Node::Branch { slots, .. } => self.stack.push(slots.iter()),
					Node::Collision { leaves, .. } => self.leaves = Some(leaves.iter()),
				},
			}
		}
	}
}

//! Nested views over the flat, id-indexed category listing.
//!
//! Nodes are placed in an arena and linked by index. The nested output is produced only at the
//! end, so inputs never need parent or child references to each other.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

pub trait TreeItem {
	fn id(&self) -> Uuid;

	fn parent_id(&self) -> Option<Uuid>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode<T> {
	#[serde(flatten)]
	pub item: T,
	pub children: Vec<TreeNode<T>>,
}

/// Assembles a forest from a flat listing, keeping the input order among siblings.
///
/// A node whose parent is absent from `items` becomes a root. Duplicate ids keep the first
/// occurrence. A parent chain that loops back on itself is broken at the node where the loop is
/// detected, which is then promoted to a root.
pub fn assemble<T>(items: Vec<T>) -> Vec<TreeNode<T>>
where
	T: TreeItem,
{
	let mut index_by_id = HashMap::with_capacity(items.len());
	let mut arena = Vec::with_capacity(items.len());

	for item in items {
		let id = item.id();

		if index_by_id.contains_key(&id) {
			continue;
		}

		index_by_id.insert(id, arena.len());
		arena.push(item);
	}

	let mut parent_index = arena
		.iter()
		.map(|item| item.parent_id().and_then(|parent_id| index_by_id.get(&parent_id).copied()))
		.collect::<Vec<_>>();

	break_cycles(&mut parent_index);

	let mut children = vec![Vec::new(); arena.len()];
	let mut roots = Vec::new();

	for (index, parent) in parent_index.iter().enumerate() {
		match parent {
			Some(parent) => children[*parent].push(index),
			None => roots.push(index),
		}
	}

	let mut slots = arena.into_iter().map(Some).collect::<Vec<_>>();

	roots.into_iter().filter_map(|root| build(root, &mut slots, &children)).collect()
}

fn break_cycles(parent_index: &mut [Option<usize>]) {
	// 0 = unvisited, 1 = on the current walk, 2 = settled.
	let mut state = vec![0_u8; parent_index.len()];

	for start in 0..parent_index.len() {
		let mut walk = Vec::new();
		let mut cursor = Some(start);

		while let Some(index) = cursor {
			match state[index] {
				2 => break,
				1 => {
					parent_index[index] = None;

					break;
				},
				_ => {
					state[index] = 1;

					walk.push(index);

					cursor = parent_index[index];
				},
			}
		}

		for index in walk {
			state[index] = 2;
		}
	}
}

fn build<T>(
	index: usize,
	slots: &mut [Option<T>],
	children: &[Vec<usize>],
) -> Option<TreeNode<T>> {
	let item = slots[index].take()?;
	let nested =
		children[index].iter().filter_map(|child| build(*child, slots, children)).collect();

	Some(TreeNode { item, children: nested })
}

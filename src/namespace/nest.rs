use std::collections::HashMap;

use super::ancestors;
use crate::types::query::ResourceNode;

/// Nest flat nodes under their nearest present ancestor.
///
/// Pass 1 indexes every node by name and marks pool roots. Pass 2 attaches each
/// non-root node to the nearest ancestor found in the index, or makes it a root
/// when none is. The flat input is not assumed to be parent-before-child.
/// Roots keep their first-seen input order; children keep the order in which
/// pass 2 reaches them.
#[must_use]
pub fn nest(flat: Vec<ResourceNode>) -> Vec<ResourceNode> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(flat.len());
    let mut pool_root = vec![false; flat.len()];
    for (i, node) in flat.iter().enumerate() {
        index.insert(node.name.as_str(), i);
        pool_root[i] = node.is_pool_root();
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); flat.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (i, node) in flat.iter().enumerate() {
        if pool_root[i] {
            roots.push(i);
            continue;
        }
        match ancestors(&node.name).find_map(|a| index.get(a).copied()) {
            Some(parent) => children[parent].push(i),
            None => roots.push(i),
        }
    }
    drop(index);

    let mut slots: Vec<Option<ResourceNode>> = flat.into_iter().map(Some).collect();
    roots
        .into_iter()
        .map(|r| assemble(r, &mut slots, &children))
        .collect()
}

fn assemble(idx: usize, slots: &mut [Option<ResourceNode>], children: &[Vec<usize>]) -> ResourceNode {
    let mut node = slots[idx].take().unwrap_or_default();
    for &c in &children[idx] {
        let child = assemble(c, slots, children);
        node.children.push(child);
    }
    node
}

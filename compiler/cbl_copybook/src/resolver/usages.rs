//! Cross-references between occurrences of the same copybook.

use cbl_ir::node::for_each_copy_mut;
use cbl_ir::{copy_nodes, CopybookName, Locality, Node};
use rustc_hash::FxHashMap;

/// Fill every copy node's `usages` with the other occurrences of the same
/// copybook anywhere in `roots`, ordered by document and offset.
pub fn link_usages(roots: &mut [Node]) {
    let mut occurrences: FxHashMap<CopybookName, Vec<Locality>> = FxHashMap::default();
    for node in copy_nodes(roots) {
        occurrences
            .entry(node.name.clone())
            .or_default()
            .push(node.locality.clone());
    }
    for localities in occurrences.values_mut() {
        localities.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        localities.dedup();
    }
    for_each_copy_mut(roots, &mut |node| {
        node.usages = occurrences
            .get(&node.name)
            .map(|all| {
                all.iter()
                    .filter(|locality| **locality != node.locality)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
    });
}

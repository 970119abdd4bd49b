//! Distances, ages and diversity indices derived from branch lengths.
//!
//! Ages are measured backwards from the present, which is taken to be the
//! depth of the living tips. Living tips are assumed to be equidistant from
//! the root; only when no tip is alive does the slower maximum over all tips
//! take over.

use super::{NodeId, Tree, TreeFloat};
use crate::TERMINUS_EPSILON;
use rayon::prelude::*;

/// Tip counts above this are scanned in parallel.
const PARALLEL_TIP_THRESHOLD: usize = 100;

impl Tree {
    // =========================================================================
    // Distances
    // =========================================================================

    pub fn time_from_node_to_parent(&self, node_id: NodeId) -> TreeFloat {
        let time = self.branch_length(node_id);
        debug_assert!(time >= 0e0, "negative branch length on node {node_id}");
        time
    }

    /// Sum of branch lengths from `node_id` up to `ancestor_id`.
    ///
    /// Panics if the walk reaches the root without meeting `ancestor_id`.
    pub fn time_from_node_to_ancestor(
        &self,
        node_id: NodeId,
        ancestor_id: NodeId,
    ) -> TreeFloat {
        let mut total: TreeFloat = 0e0;
        let mut current = node_id;
        while current != ancestor_id {
            total += self.time_from_node_to_parent(current);
            current = match self.parent_id(current) {
                Some(parent_id) => parent_id,
                None => panic!("node {ancestor_id} is not an ancestor of node {node_id}"),
            };
        }
        total
    }

    pub fn time_from_node_to_root(&self, node_id: NodeId) -> TreeFloat {
        self.time_from_node_to_ancestor(node_id, self.root())
    }

    fn max_time_to_root(&self, tip_ids: &[NodeId]) -> TreeFloat {
        if tip_ids.len() > PARALLEL_TIP_THRESHOLD {
            tip_ids
                .par_iter()
                .map(|&tip_id| self.time_from_node_to_root(tip_id))
                .reduce(|| 0e0, TreeFloat::max)
        } else {
            tip_ids
                .iter()
                .map(|&tip_id| self.time_from_node_to_root(tip_id))
                .fold(0e0, TreeFloat::max)
        }
    }

    // =========================================================================
    // Ages
    // =========================================================================

    /// Depth of the first living tip, or of the deepest tip when every tip
    /// is dead.
    pub fn root_age(&self) -> TreeFloat {
        let tip_ids = self.leaf_ids();
        match tip_ids.iter().find(|&&tip_id| self.is_node_alive(tip_id)) {
            Some(&living_id) => self.time_from_node_to_root(living_id),
            None => self.max_time_to_root(&tip_ids),
        }
    }

    /// Depth of the deepest tip, dead or alive.
    pub fn phylo_age(&self) -> TreeFloat {
        self.max_time_to_root(&self.leaf_ids())
    }

    /// Root age plus the stem length carried by the root.
    pub fn tree_age(&self) -> TreeFloat {
        self.root_age() + self.branch_length(self.root())
    }

    /// How long ago the lineage ending at `node_id` ended. Zero for living
    /// tips. Results within [TERMINUS_EPSILON] of zero are snapped to zero.
    pub fn time_since_node_terminus(&self, node_id: NodeId) -> TreeFloat {
        if self.is_node_alive(node_id) {
            return 0e0;
        }
        let time = self.root_age() - self.time_from_node_to_root(node_id);
        if time.abs() < TERMINUS_EPSILON { 0e0 } else { time }
    }

    /// How long ago the branch leading to `node_id` began.
    pub fn time_since_node_origin(&self, node_id: NodeId) -> TreeFloat {
        self.time_since_node_terminus(node_id) + self.time_from_node_to_parent(node_id)
    }

    pub fn node_age(&self, node_id: NodeId) -> TreeFloat {
        let age = self.root_age() - self.time_from_node_to_root(node_id);
        debug_assert!(
            self.is_root(node_id) || age > -TERMINUS_EPSILON,
            "node {node_id} lies below the present ({age})"
        );
        age
    }

    // =========================================================================
    // Diversity
    // =========================================================================

    /// Sum of all branch lengths except the root's stem.
    pub fn calc_phylo_diversity(&self) -> TreeFloat {
        self.nodes_iter()
            .filter(|node| !node.is_root())
            .map(|node| node.branch_length())
            .sum()
    }

    /// `1 - prod(1 - b)` over the non-root branch lengths `b`, read as
    /// allele-sharing probabilities.
    ///
    /// Returns 0 if any length is 1 or more (the lengths are not
    /// probabilities) and 1 if no length is nonzero.
    pub fn calc_genetic_diversity(&self) -> TreeFloat {
        let mut product: TreeFloat = 1e0;
        let mut has_distances = false;
        for node in self.nodes_iter().filter(|node| !node.is_root()) {
            let distance = node.branch_length();
            if distance >= 1e0 {
                return 0e0;
            }
            if distance != 0e0 {
                has_distances = true;
                product *= 1e0 - distance;
            }
        }
        if has_distances { 1e0 - product } else { 1e0 }
    }
}

use super::TreeFloat;
use super::caic::{CAIC_OVERFLOW, CaicCode, char_to_index};
use super::node::{Node, NodeId};
use super::translation::{TranslationTable, TranslationTableError};
use crate::{SERIES_INDEX_WIDTH, UNKNOWN_DISTANCE};
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use std::fmt::Display;
use thiserror::Error;

/// Which leaves [Tree::kill_leaf] refuses to kill.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PreservePolicy {
    #[default]
    None,
    Root,
    RootAndChildren,
}

#[derive(Debug, Default, Clone)]
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
    root_id: Option<NodeId>,
    name: String,
    dead: FxHashSet<NodeId>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    #[error("The root node {0} cannot be moved.")]
    CannotMoveRoot(NodeId),
    #[error(
        "Cannot move node {subtree} under node {target}: the target lies within the moved subtree."
    )]
    MoveIntoOwnSubtree { subtree: NodeId, target: NodeId },
}

/// Node counts reported for a tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeSummary {
    pub nodes: usize,
    pub leaves: usize,
    pub living_leaves: usize,
}

impl Display for TreeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nodes, {} leaves ({} living)",
            self.nodes, self.leaves, self.living_leaves
        )
    }
}

impl Tree {
    // =========================================================================
    // Construction
    // =========================================================================

    pub fn new() -> Self {
        Self::default()
    }

    /// A tree holding nothing but a root.
    pub fn seeded() -> Self {
        let mut tree = Self::new();
        let _ = tree.insert_root();
        tree
    }

    /// Drops every node. The tree name is kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.dead.clear();
        self.root_id = None;
    }

    pub fn insert_root(&mut self) -> NodeId {
        assert!(self.is_empty(), "a root can only be inserted into an empty tree");
        let root_id = self.insert_node(Node::new());
        self.root_id = Some(root_id);
        root_id
    }

    /// Appends a new child at the end of `parent_id`'s child list.
    pub fn insert_child(&mut self, parent_id: NodeId) -> NodeId {
        self.assert_exists(parent_id);
        let mut node = Node::new();
        node.set_parent_id(Some(parent_id));
        let node_id = self.insert_node(node);
        self.nodes[parent_id].add_child_id(node_id);
        node_id
    }

    fn insert_node(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    fn assert_exists(&self, node_id: NodeId) {
        assert!(self.nodes.contains_key(node_id), "node {node_id} does not exist");
    }

    // =========================================================================
    // Topology Mutation
    // =========================================================================

    /// Splits a leaf into two zero-length children and marks it dead.
    pub fn speciate(&mut self, node_id: NodeId) -> (NodeId, NodeId) {
        assert!(self.is_leaf(node_id), "only a leaf can speciate");
        let left = self.insert_child(node_id);
        let right = self.insert_child(node_id);
        self.make_dead(node_id);
        (left, right)
    }

    /// Splices out `node_id`, which must be a non-root only child with a
    /// single child of its own. That child takes its place in the parent's
    /// child list and absorbs its branch length. Returns the child.
    pub fn collapse_node(&mut self, node_id: NodeId) -> NodeId {
        let parent_id = match self.parent_id(node_id) {
            Some(parent_id) => parent_id,
            None => panic!("the root node {node_id} cannot be collapsed"),
        };
        assert!(
            self.child_count(parent_id) == 1,
            "node {node_id} is not an only child"
        );
        assert!(
            self.child_count(node_id) == 1,
            "node {node_id} does not have exactly one child"
        );

        let child_id = self.nodes[node_id].child_ids()[0];
        let combined =
            self.nodes[node_id].branch_length() + self.nodes[child_id].branch_length();

        if let Some(position) = self.nodes[parent_id].remove_child_id(&node_id) {
            self.nodes[parent_id].insert_child_id(position, child_id);
        }
        self.nodes[child_id].set_parent_id(Some(parent_id));
        self.nodes[child_id].set_branch_length(combined);

        let _ = self.dead.remove(&node_id);
        let _ = self.nodes.remove(node_id);
        child_id
    }

    /// Collapses `node_id` and then each ancestor for as long as the chain
    /// consists of non-root only children with a single child. Returns the
    /// node that now sits where the chain used to be.
    pub fn collapse_branch(&mut self, node_id: NodeId) -> NodeId {
        let mut current = node_id;
        let mut survivor = node_id;
        while let Some(parent_id) = self.parent_id(current) {
            if self.child_count(parent_id) != 1 || !self.is_node_singleton(current) {
                break;
            }
            survivor = self.collapse_node(current);
            current = parent_id;
        }
        survivor
    }

    /// Detaches `subtree_id` and appends it as the last child of
    /// `new_parent_id`.
    pub fn move_subtree(
        &mut self,
        subtree_id: NodeId,
        new_parent_id: NodeId,
    ) -> Result<(), TreeError> {
        self.assert_exists(new_parent_id);
        let old_parent_id = match self.parent_id(subtree_id) {
            Some(parent_id) => parent_id,
            None => return Err(TreeError::CannotMoveRoot(subtree_id)),
        };
        if subtree_id == new_parent_id || self.is_ancestor(subtree_id, new_parent_id) {
            return Err(TreeError::MoveIntoOwnSubtree {
                subtree: subtree_id,
                target: new_parent_id,
            });
        }

        let _ = self.nodes[old_parent_id].remove_child_id(&subtree_id);
        self.nodes[new_parent_id].add_child_id(subtree_id);
        self.nodes[subtree_id].set_parent_id(Some(new_parent_id));
        Ok(())
    }

    /// Removes `node_id` and all of its descendants. Only their ids become
    /// invalid. Deleting the root empties the tree.
    pub fn delete_subtree(&mut self, node_id: NodeId) {
        let Some(parent_id) = self.parent_id(node_id) else {
            self.clear();
            return;
        };
        let _ = self.nodes[parent_id].remove_child_id(&node_id);
        for id in self.subtree_preorder(node_id) {
            let _ = self.dead.remove(&id);
            let _ = self.nodes.remove(id);
        }
    }

    // =========================================================================
    // Dead & Alive
    // =========================================================================

    pub fn make_dead(&mut self, node_id: NodeId) {
        self.assert_exists(node_id);
        let _ = self.dead.insert(node_id);
    }

    pub fn make_alive(&mut self, node_id: NodeId) {
        self.assert_exists(node_id);
        let _ = self.dead.remove(&node_id);
    }

    pub fn make_internals_dead(&mut self) {
        let internal_ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| !node.is_leaf())
            .map(|(node_id, _)| node_id)
            .collect();
        self.dead.extend(internal_ids);
    }

    /// A node is alive only if it is a leaf not marked dead.
    pub fn is_node_alive(&self, node_id: NodeId) -> bool {
        self.is_leaf(node_id) && !self.dead.contains(&node_id)
    }

    pub fn is_node_dead(&self, node_id: NodeId) -> bool {
        !self.is_node_alive(node_id)
    }

    /// Marks a leaf dead. Leaves protected by `policy` are left untouched.
    pub fn kill_leaf(&mut self, node_id: NodeId, policy: PreservePolicy) {
        assert!(self.is_leaf(node_id), "only a leaf can be killed");
        let protected = match policy {
            PreservePolicy::None => false,
            PreservePolicy::Root => self.is_root(node_id),
            PreservePolicy::RootAndChildren => {
                self.is_root(node_id) || self.parent_id(node_id) == self.root_id
            }
        };
        if !protected {
            self.make_dead(node_id);
        }
    }

    // =========================================================================
    // Node Access
    // =========================================================================

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn node_exists(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub(crate) fn nodes_iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn is_empty(&self) -> bool {
        self.root_id.is_none()
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    pub fn root(&self) -> NodeId {
        match self.root_id {
            Some(root_id) => root_id,
            None => panic!("an empty tree has no root"),
        }
    }

    pub fn tree_name(&self) -> &str {
        &self.name
    }

    pub fn set_tree_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn node_name(&self, node_id: NodeId) -> Option<&str> {
        self.nodes[node_id].name()
    }

    pub fn set_node_name(&mut self, node_id: NodeId, name: &str) {
        self.nodes[node_id].set_name(Some(name));
    }

    pub fn branch_length(&self, node_id: NodeId) -> TreeFloat {
        self.nodes[node_id].branch_length()
    }

    pub fn set_branch_length(&mut self, node_id: NodeId, branch_length: TreeFloat) {
        self.nodes[node_id].set_branch_length(branch_length);
    }

    /// True if any edge, the root's stem included, has a nonzero length.
    pub fn has_branch_lengths(&self) -> bool {
        self.nodes.values().any(|node| node.branch_length() != 0e0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.values().filter(|node| node.is_leaf()).count()
    }

    pub fn internal_node_count(&self) -> usize {
        self.node_count() - self.leaf_count()
    }

    pub fn node_id_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_ids_preorder()
            .into_iter()
            .find(|&node_id| self.node_name(node_id) == Some(name))
    }

    // =========================================================================
    // Tree Traversal
    // =========================================================================

    pub fn parent_id(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes[node_id].parent_id().copied()
    }

    pub fn child_ids(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes[node_id].child_ids()
    }

    pub fn child_count(&self, node_id: NodeId) -> usize {
        self.nodes[node_id].child_node_count()
    }

    /// Position of `node_id` among its siblings; `None` for the root.
    pub fn child_index(&self, node_id: NodeId) -> Option<usize> {
        let parent_id = self.parent_id(node_id)?;
        self.child_ids(parent_id).iter().position(|&id| id == node_id)
    }

    pub fn is_leaf(&self, node_id: NodeId) -> bool {
        self.nodes[node_id].is_leaf()
    }

    pub fn is_root(&self, node_id: NodeId) -> bool {
        self.nodes[node_id].is_root()
    }

    /// True if `ancestor_id` lies strictly above `node_id`.
    pub fn is_ancestor(&self, ancestor_id: NodeId, node_id: NodeId) -> bool {
        let mut current = self.parent_id(node_id);
        while let Some(id) = current {
            if id == ancestor_id {
                return true;
            }
            current = self.parent_id(id);
        }
        false
    }

    pub fn node_ids_preorder(&self) -> Vec<NodeId> {
        match self.root_id {
            Some(root_id) => self.subtree_preorder(root_id),
            None => Vec::new(),
        }
    }

    /// `node_id` followed by its descendants, children in stored order.
    pub fn subtree_preorder(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(self.child_ids(id).iter().rev());
        }
        result
    }

    pub fn leaf_ids(&self) -> Vec<NodeId> {
        self.node_ids_preorder()
            .into_iter()
            .filter(|&node_id| self.is_leaf(node_id))
            .collect()
    }

    /// Names of the named leaves, in pre-order.
    pub fn leaf_names(&self) -> Vec<&str> {
        self.leaf_ids()
            .into_iter()
            .filter_map(|node_id| self.node_name(node_id))
            .collect()
    }

    /// Leftmost tip of the clade rooted at `node_id`.
    pub fn first_tip_id(&self, node_id: NodeId) -> NodeId {
        let mut current = node_id;
        while let Some(&child_id) = self.child_ids(current).first() {
            current = child_id;
        }
        current
    }

    // =========================================================================
    // Structure Predicates
    // =========================================================================

    pub fn is_node_bifurcating(&self, node_id: NodeId) -> bool {
        self.child_count(node_id) == 2
    }

    pub fn is_node_singleton(&self, node_id: NodeId) -> bool {
        self.child_count(node_id) == 1
    }

    pub fn is_tree_bifurcating(&self) -> bool {
        self.nodes
            .values()
            .all(|node| node.is_leaf() || node.child_node_count() == 2)
    }

    pub fn has_tree_singletons(&self) -> bool {
        self.nodes.values().any(|node| node.child_node_count() == 1)
    }

    /// True if any tip has gone extinct.
    pub fn is_tree_paleo(&self) -> bool {
        self.dead.iter().any(|&node_id| self.is_leaf(node_id))
    }

    pub fn is_tree_neo(&self) -> bool {
        !self.is_tree_paleo()
    }

    pub fn is_tree_alive(&self) -> bool {
        self.nodes.keys().any(|node_id| self.is_node_alive(node_id))
    }

    pub fn count_alive_leaves(&self) -> usize {
        self.nodes.keys().filter(|&node_id| self.is_node_alive(node_id)).count()
    }

    pub fn summary(&self) -> TreeSummary {
        TreeSummary {
            nodes: self.node_count(),
            leaves: self.leaf_count(),
            living_leaves: self.count_alive_leaves(),
        }
    }

    // =========================================================================
    // Labels & CAIC Codes
    // =========================================================================

    /// "root" for the root, the name for a leaf, and
    /// "firstTipOfChild0/firstTipOfChild1" for other internal nodes. Further
    /// children of a multifurcation are not consulted.
    pub fn node_label_phylo(&self, node_id: NodeId) -> String {
        if self.is_root(node_id) {
            return "root".to_string();
        }
        if self.is_leaf(node_id) {
            return self.node_name(node_id).unwrap_or_default().to_string();
        }
        let tip_name = |child_id: NodeId| {
            self.node_name(self.first_tip_id(child_id)).unwrap_or_default()
        };
        match self.child_ids(node_id) {
            [only] => tip_name(*only).to_string(),
            [first, second, ..] => format!("{}/{}", tip_name(*first), tip_name(*second)),
            [] => String::new(),
        }
    }

    /// Child indices along the path from the root down to `node_id`.
    fn child_index_path(&self, node_id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = node_id;
        while let Some(parent_id) = self.parent_id(current) {
            path.extend(self.child_index(current));
            current = parent_id;
        }
        path.reverse();
        path
    }

    pub fn caic_code(&self, node_id: NodeId) -> CaicCode {
        let mut code = CaicCode::new();
        for index in self.child_index_path(node_id) {
            code.extend(index);
        }
        code
    }

    pub fn node_label_caic(&self, node_id: NodeId) -> String {
        self.caic_code(node_id).to_string()
    }

    /// Like the CAIC label but with zero-padded decimal child indices, e.g.
    /// "root.00.01".
    pub fn node_label_series(&self, node_id: NodeId) -> String {
        let mut label = "root".to_string();
        for index in self.child_index_path(node_id) {
            label.push_str(&format!(".{index:0width$}", width = SERIES_INDEX_WIDTH));
        }
        label
    }

    /// Walks `code` down from the root. `None` if a step names a missing
    /// child or the overflow character.
    pub fn node_by_caic_code(&self, code: &CaicCode) -> Option<NodeId> {
        let mut current = self.root_id?;
        let mut remaining = code.clone();
        while !remaining.is_empty() {
            let c = remaining.pop_front();
            if c == CAIC_OVERFLOW {
                return None;
            }
            current = *self.child_ids(current).get(char_to_index(c))?;
        }
        Some(current)
    }

    /// Returns the node addressed by `code`, creating the root and any
    /// missing children along the way.
    pub fn add_node(&mut self, code: &CaicCode) -> NodeId {
        if self.is_empty() {
            let _ = self.insert_root();
        }
        let mut current = self.root();
        let mut remaining = code.clone();
        while !remaining.is_empty() {
            let c = remaining.pop_front();
            assert!(
                c != CAIC_OVERFLOW,
                "CAIC code {code} uses the overflow character '{CAIC_OVERFLOW}'"
            );
            let index = char_to_index(c);
            while self.child_count(current) <= index {
                let _ = self.insert_child(current);
            }
            current = self.child_ids(current)[index];
        }
        current
    }

    /// Adds one entry of a CAIC listing: a code, an optional name and an
    /// optional distance to the parent.
    pub fn add_caic_node(
        &mut self,
        code: &CaicCode,
        name: Option<&str>,
        distance: Option<TreeFloat>,
    ) -> NodeId {
        let node_id = self.add_node(code);
        if let Some(name) = name {
            self.set_node_name(node_id, name);
        }
        self.set_branch_length(node_id, distance.unwrap_or(UNKNOWN_DISTANCE));
        node_id
    }

    /// Renames leaves whose names are translation indices back to the
    /// names registered under those indices.
    pub fn apply_translation(
        &mut self,
        table: &TranslationTable,
    ) -> Result<(), TranslationTableError> {
        for node_id in self.leaf_ids() {
            let index = self.node_name(node_id).and_then(|name| name.parse::<usize>().ok());
            if let Some(index) = index {
                let name = table.get_name(index)?.to_string();
                self.set_node_name(node_id, &name);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Display
    // =========================================================================

    fn print_tree(&self) -> String {
        let mut result: String = String::new();
        result.push_str(&format!(
            "Tree: {}\n{}\nBifurcating: {}\n\n",
            if self.name.is_empty() { "(unnamed)" } else { self.name.as_str() },
            self.summary(),
            self.is_tree_bifurcating(),
        ));

        let mut stack: Vec<(NodeId, usize)> =
            self.root_id.map(|root_id| (root_id, 0)).into_iter().collect();
        while let Some((node_id, level)) = stack.pop() {
            result.push_str(&format!(
                "{}- {} | {} | {:<5.3} | {}\n",
                " ".repeat(level * 4),
                self.node_label_series(node_id),
                self.node_name(node_id).unwrap_or("None"),
                self.branch_length(node_id),
                if self.is_node_alive(node_id) { "Alive" } else { "Dead" },
            ));
            for &child_id in self.child_ids(node_id).iter().rev() {
                stack.push((child_id, level + 1));
            }
        }

        result
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print_tree())
    }
}

use super::TreeFloat;
use slotmap::new_key_type;
use std::{fmt::Display, sync::Arc};

new_key_type! { pub struct NodeId; }

/// One record in a [Tree](super::Tree) arena.
///
/// The branch length is the distance from this node to its parent. For the
/// root it is the optional stem length.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Node {
    parent_id: Option<NodeId>,
    child_ids: Vec<NodeId>,
    branch_length: TreeFloat,
    name: Option<Arc<str>>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_leaf(&self) -> bool {
        self.child_ids.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn child_ids(&self) -> &[NodeId] {
        &self.child_ids
    }

    pub fn child_node_count(&self) -> usize {
        self.child_ids.len()
    }

    pub(crate) fn add_child_id(&mut self, node_id: NodeId) {
        self.child_ids.push(node_id)
    }

    pub(crate) fn insert_child_id(&mut self, index: usize, node_id: NodeId) {
        self.child_ids.insert(index, node_id)
    }

    /// Removes `node_id` from the child list, keeping the order of the
    /// remaining children. Returns the position it occupied.
    pub(crate) fn remove_child_id(&mut self, node_id: &NodeId) -> Option<usize> {
        let idx = self.child_ids.iter().position(|id| id == node_id)?;
        let _ = self.child_ids.remove(idx);
        Some(idx)
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent_id.as_ref()
    }

    pub(crate) fn set_parent_id(&mut self, node_id: Option<NodeId>) {
        self.parent_id = node_id;
    }

    pub fn branch_length(&self) -> TreeFloat {
        self.branch_length
    }

    pub(crate) fn set_branch_length(&mut self, branch_length: TreeFloat) {
        assert!(
            branch_length.is_finite() && branch_length >= 0e0,
            "branch length must be finite and non-negative, got {branch_length}"
        );
        self.branch_length = branch_length;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn set_name<'a>(&mut self, name: Option<impl Into<&'a str>>) {
        self.name = match name.map(|name| name.into()) {
            None | Some("") => None,
            Some(name) => Some(name.into()),
        };
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let disp = format!("{self:?}");
        write!(f, "{}", &disp[7..disp.len() - 1])
    }
}

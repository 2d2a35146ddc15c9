//! HierarchyNode - one element of a decision hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::NodeId;

/// The role a node plays in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Goal,
    Criterion,
    Subcriterion,
    Alternative,
}

impl NodeKind {
    /// Returns true for goal, criterion and subcriterion nodes.
    pub fn is_criteria_tree(&self) -> bool {
        !matches!(self, NodeKind::Alternative)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Goal => "goal",
            NodeKind::Criterion => "criterion",
            NodeKind::Subcriterion => "subcriterion",
            NodeKind::Alternative => "alternative",
        };
        write!(f, "{}", s)
    }
}

/// A node as delivered by the hierarchy store.
///
/// `local_weight` is the node's share of its sibling group and
/// `global_weight` the product of local weights along the root path. Both
/// stay `None` until the weight propagator has run for the owning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub kind: NodeKind,
    pub position: u32,
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_weight: Option<f64>,
}

impl HierarchyNode {
    /// Creates the goal (root) node at level 0.
    pub fn goal(id: NodeId) -> Self {
        Self {
            id,
            parent_id: None,
            kind: NodeKind::Goal,
            position: 0,
            level: 0,
            name: None,
            local_weight: None,
            global_weight: None,
        }
    }

    /// Creates a child node one level below its parent.
    pub fn child(
        id: NodeId,
        parent: &HierarchyNode,
        kind: NodeKind,
        position: u32,
    ) -> Self {
        Self {
            id,
            parent_id: Some(parent.id.clone()),
            kind,
            position,
            level: parent.level + 1,
            name: None,
            local_weight: None,
            global_weight: None,
        }
    }

    /// Sets a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

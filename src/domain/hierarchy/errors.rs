//! Structural errors raised while validating a hierarchy.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, NodeId};

/// A hierarchy that cannot be evaluated. Never repaired silently.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HierarchyError {
    #[error("Hierarchy has no root node")]
    NoRoot,

    #[error("Hierarchy has {} root nodes, expected exactly one", .0.len())]
    MultipleRoots(Vec<NodeId>),

    #[error("Root node '{0}' must be a goal")]
    RootNotGoal(NodeId),

    #[error("Goal node '{0}' must not have a parent")]
    NestedGoal(NodeId),

    #[error("Node id '{0}' appears more than once")]
    DuplicateNode(NodeId),

    #[error("Node '{node}' references missing parent '{parent}'")]
    DanglingParent { node: NodeId, parent: NodeId },

    #[error("Node '{0}' is its own ancestor")]
    Cycle(NodeId),

    #[error("Node '{node}' has level {level}, expected {expected}")]
    LevelInversion {
        node: NodeId,
        level: u32,
        expected: u32,
    },

    #[error("Alternative '{0}' must be attached to the goal")]
    MisplacedAlternative(NodeId),

    #[error("Node '{0}' cannot be the child of an alternative")]
    AlternativeParent(NodeId),

    #[error("Node '{node}' has weight {weight} outside [0, 1]")]
    WeightOutOfRange { node: NodeId, weight: f64 },

    #[error("Node '{0}' not found in hierarchy")]
    UnknownNode(NodeId),
}

impl From<HierarchyError> for DomainError {
    fn from(err: HierarchyError) -> Self {
        let code = match &err {
            HierarchyError::UnknownNode(_) => ErrorCode::NodeNotFound,
            _ => ErrorCode::InvalidHierarchy,
        };
        DomainError::new(code, err.to_string())
    }
}

//! Hierarchy - validated arena of decision hierarchy nodes.
//!
//! Nodes live in a flat `Vec` and refer to each other by index, so parent
//! links never form owning cycles and structural validation is a simple
//! visited-set walk.
//!
//! # Shape
//!
//! ```text
//! goal ─┬─ criterion ─┬─ subcriterion   (leaf criterion)
//!       │             └─ subcriterion   (leaf criterion)
//!       └─ criterion                    (leaf criterion)
//!
//! alternatives: attached to the goal, compared under every leaf criterion
//! ```

use std::collections::{HashMap, HashSet, VecDeque};

use crate::domain::foundation::NodeId;

use super::{HierarchyError, HierarchyNode, NodeKind};

/// Number of unordered pairs in a group of `n` elements.
pub fn pair_count(n: usize) -> usize {
    n.saturating_sub(1) * n / 2
}

/// A structurally valid hierarchy.
///
/// # Invariants
///
/// - exactly one root, and it is the goal
/// - every parent reference resolves and no node is its own ancestor
/// - child level = parent level + 1
/// - alternatives hang off the goal and have no children
/// - stored weights lie in [0, 1]
#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    index: HashMap<NodeId, usize>,
    root: usize,
    /// Criteria-tree children per node, ordered by position.
    children: Vec<Vec<usize>>,
    /// Alternatives ordered by position.
    alternatives: Vec<usize>,
}

impl Hierarchy {
    /// Validates a flat node list and builds the arena.
    ///
    /// # Errors
    ///
    /// Any structural defect (see [`HierarchyError`]) rejects the whole list.
    pub fn from_nodes(nodes: Vec<HierarchyNode>) -> Result<Self, HierarchyError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(HierarchyError::DuplicateNode(node.id.clone()));
            }
        }

        let roots: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_root())
            .map(|(i, _)| i)
            .collect();
        let root = match roots.as_slice() {
            [] => return Err(HierarchyError::NoRoot),
            [single] => *single,
            many => {
                return Err(HierarchyError::MultipleRoots(
                    many.iter().map(|&i| nodes[i].id.clone()).collect(),
                ))
            }
        };
        if nodes[root].kind != NodeKind::Goal {
            return Err(HierarchyError::RootNotGoal(nodes[root].id.clone()));
        }

        let mut parents = vec![None; nodes.len()];
        for (i, node) in nodes.iter().enumerate() {
            Self::check_weights(node)?;
            let Some(parent_id) = &node.parent_id else {
                continue;
            };
            if node.kind == NodeKind::Goal {
                return Err(HierarchyError::NestedGoal(node.id.clone()));
            }
            let parent = *index
                .get(parent_id)
                .ok_or_else(|| HierarchyError::DanglingParent {
                    node: node.id.clone(),
                    parent: parent_id.clone(),
                })?;
            parents[i] = Some(parent);
        }

        Self::check_acyclic(&nodes, &parents)?;

        let mut children = vec![Vec::new(); nodes.len()];
        let mut alternatives = Vec::new();
        for (i, node) in nodes.iter().enumerate() {
            let Some(parent) = parents[i] else {
                continue;
            };
            let parent_node = &nodes[parent];
            let expected = parent_node.level + 1;
            if node.level != expected {
                return Err(HierarchyError::LevelInversion {
                    node: node.id.clone(),
                    level: node.level,
                    expected,
                });
            }
            if parent_node.kind == NodeKind::Alternative {
                return Err(HierarchyError::AlternativeParent(node.id.clone()));
            }
            if node.kind == NodeKind::Alternative {
                if parent != root {
                    return Err(HierarchyError::MisplacedAlternative(node.id.clone()));
                }
                alternatives.push(i);
            } else {
                children[parent].push(i);
            }
        }

        let by_position = |a: &usize, b: &usize| {
            nodes[*a]
                .position
                .cmp(&nodes[*b].position)
                .then(a.cmp(b))
        };
        for group in children.iter_mut() {
            group.sort_by(by_position);
        }
        alternatives.sort_by(by_position);

        Ok(Self {
            nodes,
            index,
            root,
            children,
            alternatives,
        })
    }

    fn check_weights(node: &HierarchyNode) -> Result<(), HierarchyError> {
        for weight in [node.local_weight, node.global_weight].into_iter().flatten() {
            if !(0.0..=1.0).contains(&weight) {
                return Err(HierarchyError::WeightOutOfRange {
                    node: node.id.clone(),
                    weight,
                });
            }
        }
        Ok(())
    }

    /// Walks every parent chain; revisiting a node on one chain is a cycle.
    fn check_acyclic(
        nodes: &[HierarchyNode],
        parents: &[Option<usize>],
    ) -> Result<(), HierarchyError> {
        let mut reaches_root = vec![false; nodes.len()];
        for start in 0..nodes.len() {
            let mut visited = HashSet::new();
            let mut chain = Vec::new();
            let mut current = Some(start);
            while let Some(i) = current {
                if reaches_root[i] {
                    break;
                }
                if !visited.insert(i) {
                    return Err(HierarchyError::Cycle(nodes[i].id.clone()));
                }
                chain.push(i);
                current = parents[i];
            }
            for i in chain {
                reaches_root[i] = true;
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the goal node.
    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[self.root]
    }

    /// Returns the goal node's id.
    pub fn root_id(&self) -> &NodeId {
        &self.nodes[self.root].id
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&HierarchyNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Returns true if the id belongs to this hierarchy.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Returns all nodes in input order.
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    /// Returns the number of nodes, alternatives included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the hierarchy holds no nodes (never true once built).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the criteria-tree children of a node, ordered by position.
    pub fn children(&self, id: &NodeId) -> Vec<&HierarchyNode> {
        self.index
            .get(id)
            .map(|&i| self.children[i].iter().map(|&c| &self.nodes[c]).collect())
            .unwrap_or_default()
    }

    /// Returns the alternatives ordered by position.
    pub fn alternatives(&self) -> Vec<&HierarchyNode> {
        self.alternatives.iter().map(|&i| &self.nodes[i]).collect()
    }

    /// Returns the alternative ids ordered by position.
    pub fn alternative_ids(&self) -> Vec<NodeId> {
        self.alternatives
            .iter()
            .map(|&i| self.nodes[i].id.clone())
            .collect()
    }

    /// Returns true if the node is part of the criteria tree and has no
    /// criteria children. A goal without criteria is its own leaf.
    pub fn is_leaf_criterion(&self, id: &NodeId) -> bool {
        match self.index.get(id) {
            Some(&i) => self.nodes[i].kind.is_criteria_tree() && self.children[i].is_empty(),
            None => false,
        }
    }

    /// Returns the criteria-tree nodes in breadth-first order from the goal.
    ///
    /// Siblings are visited by position, so the order is deterministic.
    pub fn breadth_first(&self) -> Vec<&HierarchyNode> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([self.root]);
        while let Some(i) = queue.pop_front() {
            order.push(&self.nodes[i]);
            queue.extend(self.children[i].iter().copied());
        }
        order
    }

    /// Returns the leaf criteria in breadth-first order.
    pub fn leaf_criteria(&self) -> Vec<&HierarchyNode> {
        self.breadth_first()
            .into_iter()
            .filter(|n| self.is_leaf_criterion(&n.id))
            .collect()
    }

    /// Returns the ids compared with each other under `id`.
    ///
    /// Criteria children for branching nodes, the alternatives for leaf
    /// criteria, and nothing for alternatives or unknown ids.
    pub fn comparison_group(&self, id: &NodeId) -> Vec<NodeId> {
        let Some(&i) = self.index.get(id) else {
            return Vec::new();
        };
        if !self.nodes[i].kind.is_criteria_tree() {
            return Vec::new();
        }
        if self.children[i].is_empty() {
            self.alternative_ids()
        } else {
            self.children[i]
                .iter()
                .map(|&c| self.nodes[c].id.clone())
                .collect()
        }
    }

    /// Returns the ids from the node up to and including the goal.
    pub fn path_to_root(&self, id: &NodeId) -> Result<Vec<NodeId>, HierarchyError> {
        let mut current = self
            .node(id)
            .ok_or_else(|| HierarchyError::UnknownNode(id.clone()))?;
        let mut path = vec![current.id.clone()];
        while let Some(parent_id) = &current.parent_id {
            current = self
                .node(parent_id)
                .ok_or_else(|| HierarchyError::UnknownNode(parent_id.clone()))?;
            path.push(current.id.clone());
        }
        Ok(path)
    }

    /// Returns the nodes that need a pairwise comparison matrix
    /// (groups of two or more), in breadth-first order.
    pub fn evaluable_nodes(&self) -> Vec<NodeId> {
        self.breadth_first()
            .into_iter()
            .filter(|n| self.comparison_group(&n.id).len() >= 2)
            .map(|n| n.id.clone())
            .collect()
    }

    /// Total comparisons a rater must submit to finish the hierarchy.
    ///
    /// Σ over branching nodes of C(children, 2) plus, for every leaf
    /// criterion, C(alternatives, 2).
    pub fn total_required_comparisons(&self) -> usize {
        self.breadth_first()
            .into_iter()
            .map(|n| pair_count(self.comparison_group(&n.id).len()))
            .sum()
    }

    /// Overwrites the stored weights of one node.
    pub(crate) fn set_weights(
        &mut self,
        id: &NodeId,
        local_weight: Option<f64>,
        global_weight: Option<f64>,
    ) -> Result<(), HierarchyError> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| HierarchyError::UnknownNode(id.clone()))?;
        let node = &mut self.nodes[i];
        node.local_weight = local_weight.map(|w| w.clamp(0.0, 1.0));
        node.global_weight = global_weight.map(|w| w.clamp(0.0, 1.0));
        Ok(())
    }
}

//! Shared wiring for handler tests.

use std::sync::Arc;

use crate::adapters::memory::{InMemoryEvaluationSessionRepository, InMemoryHierarchyReader};
use crate::adapters::progress::RecordingProgressChannel;
use crate::domain::analysis::{ConsistencyValidator, PairwiseComparison};
use crate::domain::foundation::{NodeId, ProjectId};
use crate::domain::hierarchy::fixtures::flat_hierarchy;

use super::ActiveEvaluations;

pub struct TestHarness {
    pub reader: Arc<InMemoryHierarchyReader>,
    pub repository: Arc<InMemoryEvaluationSessionRepository>,
    pub channel: Arc<RecordingProgressChannel>,
    pub evaluations: Arc<ActiveEvaluations>,
}

impl TestHarness {
    pub async fn new() -> Self {
        let reader = Arc::new(InMemoryHierarchyReader::new());
        let repository = Arc::new(InMemoryEvaluationSessionRepository::new());
        let channel = Arc::new(RecordingProgressChannel::new());
        let evaluations = Arc::new(ActiveEvaluations::new(
            reader.clone(),
            repository.clone(),
            channel.clone(),
            ConsistencyValidator::default(),
        ));
        Self {
            reader,
            repository,
            channel,
            evaluations,
        }
    }
}

/// Seeds goal → {c1, c2} with alternatives a1, a2.
pub async fn two_criteria_project(harness: &TestHarness) -> ProjectId {
    let project = ProjectId::new();
    let nodes = flat_hierarchy(&["c1", "c2"], &["a1", "a2"]).nodes().to_vec();
    harness.reader.insert(project, nodes).await;
    project
}

/// Seeds goal → {c1, c2, c3} with alternatives a1, a2.
pub async fn three_criteria_project(harness: &TestHarness) -> ProjectId {
    let project = ProjectId::new();
    let nodes = flat_hierarchy(&["c1", "c2", "c3"], &["a1", "a2"]).nodes().to_vec();
    harness.reader.insert(project, nodes).await;
    project
}

pub fn node(s: &str) -> NodeId {
    NodeId::new(s).unwrap()
}

pub fn cmp(a: &str, b: &str, value: f64) -> PairwiseComparison {
    PairwiseComparison::new(node(a), node(b), value).unwrap()
}

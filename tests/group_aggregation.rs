//! Integration tests for multi-rater aggregation.
//!
//! Three raters complete the same hierarchy through the handlers; the group
//! handlers then aggregate the stored sessions per node and across the
//! whole hierarchy.

use std::collections::HashMap;
use std::sync::Arc;

use ahp_engine::adapters::{
    InMemoryEvaluationSessionRepository, InMemoryHierarchyReader, RecordingProgressChannel,
};
use ahp_engine::application::{
    ActiveEvaluations, CalculateGroupRankingHandler, CalculateGroupRankingQuery,
    CalculateGroupResultHandler, CalculateGroupResultQuery, StartEvaluationCommand,
    StartEvaluationHandler, SubmitComparisonsCommand, SubmitComparisonsHandler,
};
use ahp_engine::config::EngineConfig;
use ahp_engine::domain::analysis::PairwiseComparison;
use ahp_engine::domain::evaluation::StepOutcome;
use ahp_engine::domain::foundation::{NodeId, ProjectId, RaterId};
use ahp_engine::domain::group::{AggregatedOutcome, AggregationStrategy, ResolutionHint};
use ahp_engine::domain::hierarchy::{HierarchyNode, NodeKind};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn id(s: &str) -> NodeId {
    NodeId::new(s).unwrap()
}

fn rater(s: &str) -> RaterId {
    RaterId::new(s).unwrap()
}

fn cmp(a: &str, b: &str, value: f64) -> PairwiseComparison {
    PairwiseComparison::new(id(a), id(b), value).unwrap()
}

/// goal → {cost, quality}; alternatives A, B, C.
fn hierarchy() -> Vec<HierarchyNode> {
    let goal = HierarchyNode::goal(id("goal"));
    let mut nodes = vec![
        goal.clone(),
        HierarchyNode::child(id("cost"), &goal, NodeKind::Criterion, 0),
        HierarchyNode::child(id("quality"), &goal, NodeKind::Criterion, 1),
    ];
    for (i, alt) in ["A", "B", "C"].iter().enumerate() {
        nodes.push(HierarchyNode::child(id(alt), &goal, NodeKind::Alternative, i as u32));
    }
    nodes
}

struct Panel {
    reader: Arc<InMemoryHierarchyReader>,
    repository: Arc<InMemoryEvaluationSessionRepository>,
    evaluations: Arc<ActiveEvaluations>,
    config: EngineConfig,
    project: ProjectId,
}

impl Panel {
    async fn new() -> Self {
        let config = EngineConfig::default();
        let reader = Arc::new(InMemoryHierarchyReader::new());
        let repository = Arc::new(InMemoryEvaluationSessionRepository::new());
        let project = ProjectId::new();
        reader.insert(project, hierarchy()).await;
        let evaluations = Arc::new(ActiveEvaluations::new(
            reader.clone(),
            repository.clone(),
            Arc::new(RecordingProgressChannel::new()),
            config.validator(),
        ));
        Self {
            reader,
            repository,
            evaluations,
            config,
            project,
        }
    }

    /// Runs a complete evaluation; `cost_over_quality` is the only
    /// judgment that differs between raters.
    async fn evaluate(&self, name: &str, cost_over_quality: f64) {
        let started = StartEvaluationHandler::new(self.evaluations.clone())
            .handle(StartEvaluationCommand {
                project_id: self.project,
                rater_id: rater(name),
            })
            .await
            .unwrap();

        let batches: HashMap<NodeId, Vec<PairwiseComparison>> = HashMap::from([
            (id("goal"), vec![cmp("cost", "quality", cost_over_quality)]),
            (
                id("cost"),
                vec![cmp("A", "B", 3.0), cmp("A", "C", 5.0), cmp("B", "C", 2.0)],
            ),
            (
                id("quality"),
                vec![cmp("B", "A", 2.0), cmp("C", "A", 4.0), cmp("C", "B", 2.0)],
            ),
        ]);

        let submit = SubmitComparisonsHandler::new(self.evaluations.clone());
        let mut outcome = started.outcome;
        loop {
            let node = match &outcome {
                StepOutcome::Ready { node_id } => node_id.clone(),
                StepOutcome::Advanced { to, .. } => to.clone(),
                StepOutcome::Completed { .. } => break,
                other => panic!("unexpected outcome {other:?}"),
            };
            outcome = submit
                .handle(SubmitComparisonsCommand {
                    session_id: started.session_id,
                    node_id: node.clone(),
                    comparisons: batches[&node].clone(),
                })
                .await
                .unwrap()
                .outcome;
        }
    }

    fn result_handler(&self) -> CalculateGroupResultHandler {
        CalculateGroupResultHandler::new(
            self.reader.clone(),
            self.repository.clone(),
            self.config.aggregator(),
        )
    }

    fn ranking_handler(&self) -> CalculateGroupRankingHandler {
        CalculateGroupRankingHandler::new(
            self.reader.clone(),
            self.repository.clone(),
            self.config.aggregator(),
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn aij_flags_the_dissenting_rater() {
    let panel = Panel::new().await;
    panel.evaluate("alice", 3.0).await;
    panel.evaluate("bob", 1.0 / 3.0).await;
    panel.evaluate("carol", 3.0).await;

    let result = panel
        .result_handler()
        .handle(CalculateGroupResultQuery {
            project_id: panel.project,
            node_id: id("goal"),
            strategy: AggregationStrategy::Aij,
            rater_weights: HashMap::new(),
        })
        .await
        .unwrap();

    // geometric mean of 3, 1/3 and 3 is 3^(1/3)
    let AggregatedOutcome::Matrix { matrix, .. } = &result.outcome else {
        panic!("AIJ yields a group matrix");
    };
    assert!((matrix.get(0, 1) - 3f64.cbrt()).abs() < 1e-9);

    let disagreements = &result.consensus.disagreements;
    assert_eq!(disagreements.len(), 1);
    assert_eq!(disagreements[0].rater_id, rater("bob"));
    assert!(matches!(
        disagreements[0].hint,
        ResolutionHint::SuggestGeometricMean { .. }
    ));

    assert!(result.consensus.consensus_index < 1.0);
    assert!((0.0..=1.0).contains(&result.consensus.kendall_w));
    assert_eq!(result.consensus.distance_matrix.len(), 3);
    assert_eq!(result.consensus.distance_matrix[0][2], 0.0);
}

#[tokio::test]
async fn identical_alternative_judgments_reach_full_consensus() {
    let panel = Panel::new().await;
    panel.evaluate("alice", 3.0).await;
    panel.evaluate("bob", 1.0 / 3.0).await;

    let result = panel
        .result_handler()
        .handle(CalculateGroupResultQuery {
            project_id: panel.project,
            node_id: id("cost"),
            strategy: AggregationStrategy::Aij,
            rater_weights: HashMap::new(),
        })
        .await
        .unwrap();

    assert!((result.consensus.consensus_index - 1.0).abs() < 1e-9);
    assert!((result.consensus.kendall_w - 1.0).abs() < 1e-9);
    assert!(result.consensus.disagreements.is_empty());
    assert!((result.priority_of(&id("A")).unwrap() - 0.6483).abs() < 1e-3);
}

#[tokio::test]
async fn aip_respects_rater_weights() {
    let panel = Panel::new().await;
    panel.evaluate("alice", 3.0).await;
    panel.evaluate("bob", 1.0 / 3.0).await;

    let query = |bob_weight: f64| CalculateGroupResultQuery {
        project_id: panel.project,
        node_id: id("goal"),
        strategy: AggregationStrategy::Aip,
        rater_weights: HashMap::from([(rater("bob"), bob_weight)]),
    };

    let even = panel.result_handler().handle(query(1.0)).await.unwrap();
    let bob_heavy = panel.result_handler().handle(query(3.0)).await.unwrap();

    assert!((even.priority_of(&id("cost")).unwrap() - 0.5).abs() < 1e-9);
    assert!(bob_heavy.priority_of(&id("quality")).unwrap() > 0.5);
    let effective: f64 = bob_heavy.contributions.iter().map(|c| c.effective_weight).sum();
    assert!((effective - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn group_ranking_propagates_aggregated_priorities() {
    let panel = Panel::new().await;
    panel.evaluate("alice", 3.0).await;
    panel.evaluate("bob", 1.0 / 3.0).await;
    panel.evaluate("carol", 3.0).await;

    let result = panel
        .ranking_handler()
        .handle(CalculateGroupRankingQuery {
            project_id: panel.project,
            strategy: AggregationStrategy::Aij,
            rater_weights: HashMap::new(),
        })
        .await
        .unwrap();

    assert_eq!(result.nodes.len(), 3);
    assert!((result.ranking.leaf_weight_sum() - 1.0).abs() < 1e-9);
    let total: f64 = result.ranking.alternatives.iter().map(|a| a.total_score).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(result.ranking.alternatives[0].rank, 1);

    let goal = &result.nodes[&id("goal")];
    let cost = result.ranking.criterion(&id("cost")).unwrap().global_weight;
    assert!((cost - goal.priority_of(&id("cost")).unwrap()).abs() < 1e-12);
}

#[tokio::test]
async fn project_without_completed_sessions_has_no_group_result() {
    let panel = Panel::new().await;
    let err = panel
        .ranking_handler()
        .handle(CalculateGroupRankingQuery {
            project_id: panel.project,
            strategy: AggregationStrategy::Aij,
            rater_weights: HashMap::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ahp_engine::domain::foundation::ErrorCode::InsufficientData);
}

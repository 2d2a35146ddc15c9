//! Group query handlers.
//!
//! Both handlers read the completed sessions of a project and hand each
//! rater's judgments for a node to the `GroupAggregator`.

mod calculate_group_ranking;
mod calculate_group_result;

pub use calculate_group_ranking::{
    CalculateGroupRankingHandler, CalculateGroupRankingQuery, GroupRankingResult,
};
pub use calculate_group_result::{CalculateGroupResultHandler, CalculateGroupResultQuery};

use std::collections::HashMap;
use tracing::warn;

use crate::domain::analysis::{ComparisonSet, MatrixBuilder};
use crate::domain::evaluation::EvaluationSession;
use crate::domain::foundation::{DomainError, NodeId, RaterId};
use crate::domain::group::RaterJudgment;
use crate::domain::hierarchy::{Hierarchy, HierarchyError};

/// Builds one `RaterJudgment` per completed session for `node_id`.
///
/// Sessions without a complete matrix for the node are skipped. Raters
/// missing from `rater_weights` weigh 1.
fn collect_judgments(
    hierarchy: &Hierarchy,
    sessions: &[EvaluationSession],
    node_id: &NodeId,
    rater_weights: &HashMap<RaterId, f64>,
) -> Result<Vec<RaterJudgment>, DomainError> {
    if !hierarchy.contains(node_id) {
        return Err(HierarchyError::UnknownNode(node_id.clone()).into());
    }
    let elements = hierarchy.comparison_group(node_id);
    let empty = ComparisonSet::new();

    let mut judgments = Vec::with_capacity(sessions.len());
    for session in sessions {
        let set = session.judgments_for(node_id).unwrap_or(&empty);
        let built = MatrixBuilder::build(&elements, set)?;
        if !built.is_complete() {
            warn!(
                session_id = %session.id(),
                node_id = %node_id,
                remaining_pairs = built.remaining_pairs(),
                "Skipping rater with incomplete judgments"
            );
            continue;
        }
        let weight = rater_weights.get(session.rater_id()).copied().unwrap_or(1.0);
        judgments.push(RaterJudgment::new(session.rater_id().clone(), built.matrix).with_weight(weight));
    }
    Ok(judgments)
}

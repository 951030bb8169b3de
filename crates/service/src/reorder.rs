//! Moving a service one slot up or down.
//!
//! The local list is swapped first; how the changed order values reach the
//! backend is a [`ReorderStrategy`]. With `Paired` each write is
//! independent, so a half-applied move is possible and is reported as
//! [`ReorderOutcome::Inconsistent`].

use std::collections::HashMap;

use futures::future::join_all;
use models::{Id, OrderAssignment, Service};
use tracing::{info, instrument, warn};

use crate::errors::ApiError;
use crate::repository::ServiceOrdering;
use crate::session::Session;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReorderStrategy {
    /// One concurrent single-service write per changed row.
    #[default]
    Paired,
    /// One request carrying every changed assignment.
    Batched,
}

impl From<configs::ReorderStrategyKind> for ReorderStrategy {
    fn from(kind: configs::ReorderStrategyKind) -> Self {
        match kind {
            configs::ReorderStrategyKind::Paired => ReorderStrategy::Paired,
            configs::ReorderStrategyKind::Batched => ReorderStrategy::Batched,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub enum ReorderOutcome {
    /// Already at the edge; nothing sent.
    Unchanged,
    Persisted,
    /// Local swap kept, but these writes failed; the backend disagrees.
    Inconsistent { failed: Vec<(Id, ApiError)> },
    /// Local swap undone after the batched write failed.
    Reverted(ApiError),
}

impl ReorderOutcome {
    pub fn is_persisted(&self) -> bool { matches!(self, ReorderOutcome::Persisted) }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            ReorderOutcome::Inconsistent { failed } => failed.first().map(|(_, e)| e),
            ReorderOutcome::Reverted(e) => Some(e),
            _ => None,
        }
    }
}

/// Whether `services` already reads in display order: `(order, id)` strictly ascending.
fn is_ranked(services: &[Service]) -> bool {
    services.windows(2).all(|w| (w[0].order, w[0].id) < (w[1].order, w[1].id))
}

/// Swap `services[index]` with its neighbour in `direction`, in place.
///
/// The two rows trade slots and each slot keeps its order value. If that
/// still disagrees with the display order (ties, or equal orders broken by
/// id) every row is renumbered to its position instead. Returns the
/// assignments that changed, or `None` at an edge.
pub fn swap_adjacent(services: &mut [Service], index: usize, direction: Direction) -> Option<Vec<OrderAssignment>> {
    if index >= services.len() {
        return None;
    }
    let other = match direction {
        Direction::Up => index.checked_sub(1)?,
        Direction::Down => index.checked_add(1).filter(|i| *i < services.len())?,
    };

    let previous: HashMap<Id, i32> = services.iter().map(|s| (s.id, s.order)).collect();
    let (a, b) = (services[index].order, services[other].order);
    services.swap(index, other);
    services[index].order = a;
    services[other].order = b;
    if !is_ranked(services) {
        for (position, s) in services.iter_mut().enumerate() {
            s.order = position as i32;
        }
    }

    Some(
        services
            .iter()
            .filter(|s| previous.get(&s.id) != Some(&s.order))
            .map(|s| OrderAssignment { id: s.id, order: s.order })
            .collect(),
    )
}

/// Move one service and persist the change with `strategy`.
#[instrument(skip(repo, session, services))]
pub async fn move_service<R>(
    repo: &R,
    session: &Session,
    services: &mut Vec<Service>,
    index: usize,
    direction: Direction,
    strategy: ReorderStrategy,
) -> ReorderOutcome
where
    R: ServiceOrdering + ?Sized,
{
    let before = services.clone();
    let Some(assignments) = swap_adjacent(services, index, direction) else {
        return ReorderOutcome::Unchanged;
    };
    let ids: Vec<Id> = assignments.iter().map(|a| a.id).collect();

    match strategy {
        ReorderStrategy::Paired => {
            let results = join_all(assignments.iter().map(|a| repo.set_order(session, a.id, a.order))).await;
            let failed: Vec<(Id, ApiError)> = ids
                .iter()
                .zip(results)
                .filter_map(|(id, r)| r.err().map(|e| (*id, e)))
                .collect();
            if failed.is_empty() {
                info!(?ids, "services_reordered");
                ReorderOutcome::Persisted
            } else {
                warn!(failed = ?failed.iter().map(|(id, _)| *id).collect::<Vec<_>>(), "service order left inconsistent");
                ReorderOutcome::Inconsistent { failed }
            }
        }
        ReorderStrategy::Batched => match repo.set_orders(session, &assignments).await {
            Ok(_) => {
                info!(?ids, "services_reordered");
                ReorderOutcome::Persisted
            }
            Err(e) => {
                warn!(error = %e, "batched reorder failed; reverting");
                *services = before;
                ReorderOutcome::Reverted(e)
            }
        },
    }
}

use serde::{Deserialize, Serialize};

use crate::db_types::Contribution;

/// Emitted when a new contribution record is opened in `Created` status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionCreatedEvent {
    pub contribution: Contribution,
}

impl ContributionCreatedEvent {
    pub fn new(contribution: Contribution) -> Self {
        Self { contribution }
    }
}

/// Emitted exactly once per order, when the guarded `Created → Success` transition is applied.
///
/// Repeat gateway callbacks do not re-emit this event, though observers tolerate duplicates anyway,
/// since aggregate views always recompute from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionPaidEvent {
    pub contribution: Contribution,
}

impl ContributionPaidEvent {
    pub fn new(contribution: Contribution) -> Self {
        Self { contribution }
    }
}

/// Emitted when the gateway reports a failed payment and the record transitions to `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionFailedEvent {
    pub contribution: Contribution,
    pub reason: Option<String>,
}

impl ContributionFailedEvent {
    pub fn new(contribution: Contribution, reason: Option<String>) -> Self {
        Self { contribution, reason }
    }
}

use crate::db_types::Contribution;

/// The result of a guarded terminal-state transition.
///
/// Gateway callbacks can be delivered more than once, and a verify and a failure notification can race
/// for the same order. The store applies each transition as a compare-and-set from `Created`, and reports
/// which of the three possible situations it found.
#[derive(Debug, Clone)]
pub enum SettlementOutcome {
    /// The record was in `Created` status and this call applied the transition.
    Applied(Contribution),
    /// The record was already in the requested terminal status. Nothing was changed.
    AlreadySettled(Contribution),
    /// The record is in the *other* terminal status. Nothing was changed; the caller decides whether
    /// that is an idempotent no-op or a conflict.
    Conflict(Contribution),
}

impl SettlementOutcome {
    pub fn contribution(&self) -> &Contribution {
        match self {
            SettlementOutcome::Applied(c) | SettlementOutcome::AlreadySettled(c) | SettlementOutcome::Conflict(c) => c,
        }
    }
}

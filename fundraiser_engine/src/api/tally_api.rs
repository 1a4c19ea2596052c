use std::fmt::Debug;

use log::*;

use crate::{
    tally_objects::{HistoryPage, Pagination, TallySnapshot},
    traits::{ContributionDatabase, ContributionDbError},
};

/// Read-side API: the aggregate totals and the paginated, redacted history listing.
///
/// Both views cover successful contributions only, and both are recomputed from the store on every call.
/// There is deliberately no incremental counter to drift out of sync; the dashboard trades an extra scan
/// per read for totals that are always consistent with the store at read time.
pub struct TallyApi<B> {
    db: B,
}

impl<B> Debug for TallyApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TallyApi")
    }
}

impl<B> TallyApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> TallyApi<B>
where B: ContributionDatabase
{
    pub async fn stats(&self) -> Result<TallySnapshot, ContributionDbError> {
        let snapshot = self.db.fetch_tally().await?;
        trace!(
            "🧮️ Tally: {} over {} packs across {} wards",
            snapshot.total_amount,
            snapshot.total_quantity,
            snapshot.ward_totals.len()
        );
        Ok(snapshot)
    }

    pub async fn history(&self, pagination: Pagination) -> Result<HistoryPage, ContributionDbError> {
        self.db.fetch_history_page(pagination.clamped()).await
    }
}

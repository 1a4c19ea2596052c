use std::collections::HashMap;

use chrono::{DateTime, Utc};
use fps_common::Rupees;
use serde::{Deserialize, Serialize};

use crate::db_types::{Contribution, ContributionStatus, PaymentId, Ward};

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

//--------------------------------------    TallySnapshot      -------------------------------------------------------
/// The aggregate view over successful contributions.
///
/// Never cached: each snapshot is recomputed from the store at read time, so it is always consistent
/// with the successful subset as of the scan. Wards with no successful contribution are absent from
/// `ward_totals`; readers treat a missing key as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallySnapshot {
    pub total_amount: Rupees,
    pub total_quantity: i64,
    pub ward_totals: HashMap<String, Rupees>,
}

//--------------------------------------      Pagination       -------------------------------------------------------
/// A 1-based page request. Out-of-range values are clamped rather than rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, page_size: DEFAULT_PAGE_SIZE }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Clamps the request to sane bounds: page ≥ 1, 1 ≤ page_size ≤ [`MAX_PAGE_SIZE`].
    pub fn clamped(self) -> Self {
        Self { page: self.page.max(1), page_size: self.page_size.clamp(1, MAX_PAGE_SIZE) }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.clamped().page_size)
    }

    pub fn offset(&self) -> i64 {
        let p = self.clamped();
        i64::from(p.page - 1) * i64::from(p.page_size)
    }
}

//--------------------------------------     HistoryEntry      -------------------------------------------------------
/// The redacted projection used for bulk listings.
///
/// Contact data stays out of listings: no mobile number, no gateway order id. The gateway payment id is
/// retained since it appears on the contributor's receipt anyway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub ward: Ward,
    pub amount: Rupees,
    pub quantity: i64,
    pub payment_id: PaymentId,
    pub status: ContributionStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Contribution> for HistoryEntry {
    fn from(c: Contribution) -> Self {
        Self {
            name: c.name,
            ward: c.ward,
            amount: c.amount,
            quantity: c.quantity,
            payment_id: c.payment_id,
            status: c.status,
            created_at: c.created_at,
        }
    }
}

//--------------------------------------      HistoryPage      -------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

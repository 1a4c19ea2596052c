use fundraiser_engine::{
    db_types::{Contribution, NewContribution, OrderId, PaymentId},
    tally_objects::{HistoryPage, Pagination, TallySnapshot},
    traits::{ContributionDatabase, ContributionDbError, SettlementOutcome},
};
use mockall::mock;

mock! {
    pub ContributionDb {}
    impl ContributionDatabase for ContributionDb {
        fn url(&self) -> &str;
        async fn insert_contribution(&self, contribution: NewContribution, order_id: &OrderId) -> Result<Contribution, ContributionDbError>;
        async fn fetch_contribution_by_order_id(&self, order_id: &OrderId) -> Result<Option<Contribution>, ContributionDbError>;
        async fn mark_success(&self, order_id: &OrderId, payment_id: &PaymentId) -> Result<SettlementOutcome, ContributionDbError>;
        async fn mark_failed<'a>(&self, order_id: &OrderId, payment_id: Option<&'a PaymentId>) -> Result<SettlementOutcome, ContributionDbError>;
        async fn fetch_tally(&self) -> Result<TallySnapshot, ContributionDbError>;
        async fn fetch_history_page(&self, pagination: Pagination) -> Result<HistoryPage, ContributionDbError>;
    }
}

use thiserror::Error;

use crate::{db_types::OrderId, traits::ContributionDbError};

#[derive(Debug, Clone, Error)]
pub enum PaymentFlowError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("A contribution already exists for order {0}")]
    ContributionAlreadyExists(OrderId),
    #[error("No contribution found for order {0}")]
    OrderNotFound(OrderId),
    #[error("The signature supplied for order {0} does not match")]
    SignatureMismatch(OrderId),
    #[error("Order {0} already failed; a failed contribution cannot be marked as paid")]
    OrderAlreadyFailed(OrderId),
    #[error("Order {0} is already paid; a successful contribution cannot be marked as failed")]
    OrderAlreadyPaid(OrderId),
}

impl From<ContributionDbError> for PaymentFlowError {
    fn from(e: ContributionDbError) -> Self {
        match e {
            ContributionDbError::DatabaseError(e) => PaymentFlowError::DatabaseError(e),
            ContributionDbError::ContributionAlreadyExists(id) => PaymentFlowError::ContributionAlreadyExists(id),
            ContributionDbError::ContributionNotFound(id) => PaymentFlowError::OrderNotFound(id),
        }
    }
}

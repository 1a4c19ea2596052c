use std::fmt::Debug;

use log::*;

use crate::{
    api::PaymentFlowError,
    db_types::{Contribution, NewContribution, OrderId, PaymentId},
    events::{ContributionCreatedEvent, ContributionFailedEvent, ContributionPaidEvent, EventProducers},
    helpers::CallbackVerifier,
    traits::{ContributionDatabase, SettlementOutcome},
};

/// `PaymentFlowApi` is the primary API for the contribution lifecycle: opening a pending record when an
/// order is created, and reconciling it to a terminal state from the gateway's callbacks.
pub struct PaymentFlowApi<B> {
    db: B,
    verifier: CallbackVerifier,
    producers: EventProducers,
}

impl<B> Debug for PaymentFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<B> PaymentFlowApi<B> {
    pub fn new(db: B, verifier: CallbackVerifier, producers: EventProducers) -> Self {
        Self { db, verifier, producers }
    }
}

impl<B> PaymentFlowApi<B>
where B: ContributionDatabase
{
    /// Records a brand-new contribution against the gateway order id.
    ///
    /// The caller must already hold an order id from the gateway; if the gateway call failed, nothing is
    /// persisted and this method is never reached. The record is stored in `Created` status with the
    /// pending payment id, and a `payment_created` event is published once the write has committed.
    pub async fn process_new_contribution(
        &self,
        contribution: NewContribution,
        order_id: OrderId,
    ) -> Result<Contribution, PaymentFlowError> {
        let contribution = self.db.insert_contribution(contribution, &order_id).await?;
        debug!("🔄️📦️ Contribution for order [{order_id}] opened at {} x{}", contribution.amount, contribution.quantity);
        self.call_contribution_created_hook(&contribution).await;
        Ok(contribution)
    }

    /// Reconciles a gateway success callback against the stored record.
    ///
    /// The signature binds the order id and payment id; it is checked before anything is mutated, so an
    /// attacker-supplied pair can never flip a record to success. A valid callback applies the guarded
    /// `Created → Success` transition and publishes `payment_success`. A repeated callback for an
    /// already-successful order is a no-op success (callbacks may be delivered more than once), and the
    /// event is not re-published. A valid callback for a *failed* order is rejected: failure is terminal,
    /// and a contributor retries with a fresh order.
    pub async fn confirm_payment(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
        signature: &str,
    ) -> Result<Contribution, PaymentFlowError> {
        if self.db.fetch_contribution_by_order_id(order_id).await?.is_none() {
            return Err(PaymentFlowError::OrderNotFound(order_id.clone()));
        }
        if !self.verifier.verify(order_id, payment_id, signature) {
            warn!("🔄️🕵️ Signature mismatch on order [{order_id}]. Possible tampering attempt; record left untouched.");
            return Err(PaymentFlowError::SignatureMismatch(order_id.clone()));
        }
        match self.db.mark_success(order_id, payment_id).await? {
            SettlementOutcome::Applied(contribution) => {
                info!("🔄️✅️ Order [{order_id}] verified. {} credited to {}", contribution.amount, contribution.ward);
                self.call_contribution_paid_hook(&contribution).await;
                Ok(contribution)
            },
            SettlementOutcome::AlreadySettled(contribution) => {
                debug!("🔄️✅️ Order [{order_id}] was already verified. Treating the repeat callback as applied.");
                Ok(contribution)
            },
            SettlementOutcome::Conflict(_) => Err(PaymentFlowError::OrderAlreadyFailed(order_id.clone())),
        }
    }

    /// Handles the gateway's out-of-band failure notification.
    ///
    /// Safe to call whether or not a verify callback ever arrives: the guarded `Created → Failed`
    /// transition means whichever of verify/failure lands first wins. A repeat failure report is a no-op
    /// ack; a failure report for an order that already succeeded is rejected, since success is never
    /// overturned.
    pub async fn report_failure(
        &self,
        order_id: &OrderId,
        payment_id: Option<&PaymentId>,
        reason: Option<String>,
    ) -> Result<Contribution, PaymentFlowError> {
        match self.db.mark_failed(order_id, payment_id).await? {
            SettlementOutcome::Applied(contribution) => {
                info!(
                    "🔄️❌️ Order [{order_id}] marked as failed. Reason: {}",
                    reason.as_deref().unwrap_or("not given")
                );
                self.call_contribution_failed_hook(&contribution, reason).await;
                Ok(contribution)
            },
            SettlementOutcome::AlreadySettled(contribution) => {
                debug!("🔄️❌️ Order [{order_id}] was already failed. Acknowledging the repeat report.");
                Ok(contribution)
            },
            SettlementOutcome::Conflict(_) => Err(PaymentFlowError::OrderAlreadyPaid(order_id.clone())),
        }
    }

    async fn call_contribution_created_hook(&self, contribution: &Contribution) {
        for emitter in &self.producers.contribution_created_producer {
            trace!("🔄️📦️ Notifying contribution created hook subscribers");
            let event = ContributionCreatedEvent::new(contribution.clone());
            emitter.publish_event(event).await;
        }
    }

    async fn call_contribution_paid_hook(&self, contribution: &Contribution) {
        for emitter in &self.producers.contribution_paid_producer {
            trace!("🔄️✅️ Notifying contribution paid hook subscribers");
            let event = ContributionPaidEvent::new(contribution.clone());
            emitter.publish_event(event).await;
        }
    }

    async fn call_contribution_failed_hook(&self, contribution: &Contribution, reason: Option<String>) {
        for emitter in &self.producers.contribution_failed_producer {
            trace!("🔄️❌️ Notifying contribution failed hook subscribers");
            let event = ContributionFailedEvent::new(contribution.clone(), reason.clone());
            emitter.publish_event(event).await;
        }
    }
}

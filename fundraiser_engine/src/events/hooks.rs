use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    ContributionCreatedEvent,
    ContributionFailedEvent,
    ContributionPaidEvent,
    EventHandler,
    EventProducer,
    Handler,
};

/// The set of producers handed to [`crate::PaymentFlowApi`]. Each lifecycle transition is published to
/// every producer registered for that event kind, fire-and-forget.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub contribution_created_producer: Vec<EventProducer<ContributionCreatedEvent>>,
    pub contribution_paid_producer: Vec<EventProducer<ContributionPaidEvent>>,
    pub contribution_failed_producer: Vec<EventProducer<ContributionFailedEvent>>,
}

pub struct EventHandlers {
    pub on_contribution_created: Option<EventHandler<ContributionCreatedEvent>>,
    pub on_contribution_paid: Option<EventHandler<ContributionPaidEvent>>,
    pub on_contribution_failed: Option<EventHandler<ContributionFailedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_contribution_created = hooks.on_contribution_created.map(|f| EventHandler::new(buffer_size, f));
        let on_contribution_paid = hooks.on_contribution_paid.map(|f| EventHandler::new(buffer_size, f));
        let on_contribution_failed = hooks.on_contribution_failed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_contribution_created, on_contribution_paid, on_contribution_failed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_contribution_created {
            result.contribution_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_contribution_paid {
            result.contribution_paid_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_contribution_failed {
            result.contribution_failed_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_contribution_created {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_contribution_paid {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_contribution_failed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_contribution_created: Option<Handler<ContributionCreatedEvent>>,
    pub on_contribution_paid: Option<Handler<ContributionPaidEvent>>,
    pub on_contribution_failed: Option<Handler<ContributionFailedEvent>>,
}

impl EventHooks {
    pub fn on_contribution_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ContributionCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_contribution_created = Some(Arc::new(f));
        self
    }

    pub fn on_contribution_paid<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ContributionPaidEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_contribution_paid = Some(Arc::new(f));
        self
    }

    pub fn on_contribution_failed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ContributionFailedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_contribution_failed = Some(Arc::new(f));
        self
    }
}

use std::{
    future::Future,
    pin::Pin,
    str::FromStr,
    sync::{atomic::AtomicU64, Arc},
};

use fps_common::{Rupees, Secret};
use fundraiser_engine::{
    db_types::{NewContribution, OrderId, PaymentId, Ward},
    events::{ContributionPaidEvent, EventHandler, EventProducers},
    helpers::CallbackVerifier,
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    traits::ContributionDatabase,
    PaymentFlowApi,
    SqliteDatabase,
};
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

const TEST_SECRET: &str = "test_key_secret";

#[tokio::test]
async fn paid_hook_fires_exactly_once_per_order() {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    let verifier = CallbackVerifier::new(Secret::new(TEST_SECRET.to_string()));

    let packs = Arc::new(AtomicU64::new(0));
    let counter = packs.clone();
    let handler = Arc::new(move |ev: ContributionPaidEvent| {
        let counter = counter.clone();
        Box::pin(async move {
            info!("🪝️ {:?}", ev.contribution.order_id);
            #[allow(clippy::cast_sign_loss)]
            let quantity = ev.contribution.quantity as u64;
            let _ = counter.fetch_add(quantity, std::sync::atomic::Ordering::SeqCst);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let event_handler = EventHandler::new(10, handler);
    let mut producers = EventProducers::default();
    producers.contribution_paid_producer.push(event_handler.subscribe());

    let api = PaymentFlowApi::new(db.clone(), verifier.clone(), producers);
    for (i, quantity) in [(1_i64, 2_i64), (2, 3)] {
        let order_id = OrderId::from(format!("order_100{i}"));
        let c = NewContribution::try_new("Asha", "9999999999", Ward::Karimpuzha, Some(quantity), Rupees::from(350))
            .unwrap();
        api.process_new_contribution(c, order_id.clone()).await.expect("Error processing contribution");
        let payment_id = PaymentId::from_str(&format!("pay_100{i}")).unwrap();
        let signature = verifier.sign(&order_id, &payment_id);
        api.confirm_payment(&order_id, &payment_id, &signature).await.expect("Error verifying payment");
        // a duplicate callback is acknowledged but must not re-emit the event
        api.confirm_payment(&order_id, &payment_id, &signature).await.expect("Error re-verifying payment");
    }

    // dropping the api drops the last producer, which lets the handler drain and shut down
    drop(api);
    event_handler.start_handler().await;
    assert_eq!(packs.load(std::sync::atomic::Ordering::SeqCst), 5);

    let mut db = db;
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    Sqlite::drop_database(&url).await.unwrap();
    info!("🪝️ test complete");
}

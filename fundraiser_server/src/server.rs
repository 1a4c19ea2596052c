use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use fundraiser_engine::{
    events::{EventHandlers, EventProducers},
    helpers::CallbackVerifier,
    PaymentFlowApi,
    SqliteDatabase,
    TallyApi,
};
use razorpay_tools::RazorpayApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    live::LiveFeed,
    routes::{
        health,
        live_events,
        CreateOrderRoute,
        HistoryRoute,
        PaymentFailureRoute,
        StatsRoute,
        VerifyPaymentRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    // The live feed subscribes to the engine's lifecycle events and republishes them over SSE. The
    // handlers must be running before the first request can publish anything.
    let live = LiveFeed::new(config.event_buffer_size);
    let handlers = EventHandlers::new(config.event_buffer_size, live.hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers, live)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
    live: LiveFeed,
) -> Result<Server, ServerError> {
    let razorpay =
        RazorpayApi::new(config.razorpay.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let verifier = CallbackVerifier::new(config.razorpay.key_secret.clone());
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let flow_api = PaymentFlowApi::new(db.clone(), verifier.clone(), producers.clone());
        let tally_api = TallyApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("fps::access_log"))
            .app_data(web::Data::new(flow_api))
            .app_data(web::Data::new(tally_api))
            .app_data(web::Data::new(razorpay.clone()))
            .app_data(web::Data::new(live.clone()))
            .app_data(web::Data::new(config.clone()))
            .service(health)
            .service(live_events)
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(VerifyPaymentRoute::<SqliteDatabase>::new())
            .service(PaymentFailureRoute::<SqliteDatabase>::new())
            .service(StatsRoute::<SqliteDatabase>::new())
            .service(HistoryRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

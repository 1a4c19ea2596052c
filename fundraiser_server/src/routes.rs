//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, gateway calls) is expressed as an async function, so that worker threads can interleave
//! request handling.
use actix_web::{get, http::header, web, HttpResponse, Responder};
use fundraiser_engine::{
    db_types::{NewContribution, OrderId, Ward},
    tally_objects::{Pagination, DEFAULT_PAGE_SIZE},
    traits::ContributionDatabase,
    PaymentFlowApi,
    TallyApi,
};
use log::*;
use razorpay_tools::{new_receipt_id, RazorpayApi};

use crate::{
    config::ServerConfig,
    data_objects::{
        CreateOrderRequest,
        CreateOrderResponse,
        HistoryParams,
        HistoryResponse,
        JsonResponse,
        PaymentFailureRequest,
        StatsResponse,
        VerifyPaymentRequest,
        VerifyPaymentResponse,
    },
    errors::ServerError,
    live::{event_stream, LiveFeed},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Create order  -----------------------------------------------
route!(create_order => Post "/api/payment/create-order" impl ContributionDatabase);
/// Route handler for the create-order endpoint
///
/// Validates the submitted contribution, opens an order on the payment gateway, and persists a pending
/// record keyed by the gateway's order id. The response carries everything the checkout widget needs.
///
/// Nothing is persisted when validation fails or the gateway is unreachable; the client can simply retry,
/// and a fresh order id is issued for each attempt.
pub async fn create_order<B: ContributionDatabase>(
    body: web::Json<CreateOrderRequest>,
    api: web::Data<PaymentFlowApi<B>>,
    gateway: web::Data<RazorpayApi>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    let ward = request
        .ward
        .parse::<Ward>()
        .map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    let contribution = NewContribution::try_new(&request.name, &request.mobile, ward, request.quantity, config.unit_price)?;
    debug!("💻️ POST create-order: {} x{} for {}", contribution.amount, contribution.quantity, contribution.ward);
    let order = gateway.create_order(contribution.amount, new_receipt_id()).await.map_err(|e| {
        warn!("💻️ Gateway order creation failed. {e}");
        ServerError::from(e)
    })?;
    let amount = contribution.amount;
    let quantity = contribution.quantity;
    let record = api.process_new_contribution(contribution, OrderId::from(order.id)).await?;
    let response = CreateOrderResponse {
        order_id: record.order_id,
        amount,
        currency: order.currency,
        quantity,
        key_id: gateway.key_id().to_string(),
    };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Verify  -----------------------------------------------------
route!(verify_payment => Post "/api/payment/verify" impl ContributionDatabase);
/// Route handler for the verify endpoint
///
/// The client relays the gateway's signed confirmation here. The engine checks the signature before
/// touching the record, so a forged payment id can never flip a contribution to success. Duplicate
/// callbacks for an already-verified order are answered with the same success response.
pub async fn verify_payment<B: ContributionDatabase>(
    body: web::Json<VerifyPaymentRequest>,
    api: web::Data<PaymentFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST verify for order [{}]", request.razorpay_order_id);
    let contribution = api
        .confirm_payment(&request.razorpay_order_id, &request.razorpay_payment_id, &request.razorpay_signature)
        .await?;
    Ok(HttpResponse::Ok().json(VerifyPaymentResponse::success(contribution)))
}

//----------------------------------------------   Failure  ----------------------------------------------------
route!(payment_failure => Post "/api/payment/failure" impl ContributionDatabase);
/// Route handler for the gateway's failure notification
///
/// Safe to call whether or not the verify callback ever arrives, and safe to repeat: the terminal
/// transition is guarded, so only the first report changes anything.
pub async fn payment_failure<B: ContributionDatabase>(
    body: web::Json<PaymentFailureRequest>,
    api: web::Data<PaymentFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST failure for order [{}]", request.order_id);
    let contribution = api.report_failure(&request.order_id, request.payment_id.as_ref(), request.reason).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Order {} recorded as failed.", contribution.order_id))))
}

//----------------------------------------------   Stats  ------------------------------------------------------
route!(stats => Get "/api/payment/stats" impl ContributionDatabase);
/// Route handler for the stats endpoint
///
/// Returns the total amount raised, the total packs, and the per-ward breakdown over successful
/// contributions. Recomputed from the store on every request.
pub async fn stats<B: ContributionDatabase>(api: web::Data<TallyApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET stats");
    let snapshot = api.stats().await?;
    Ok(HttpResponse::Ok().json(StatsResponse::from(snapshot)))
}

//----------------------------------------------   History  ----------------------------------------------------
route!(history => Get "/api/payment/history" impl ContributionDatabase);
/// Route handler for the history endpoint
///
/// A paginated listing of successful contributions, newest first, with contact data stripped.
pub async fn history<B: ContributionDatabase>(
    query: web::Query<HistoryParams>,
    api: web::Data<TallyApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let params = query.into_inner();
    let pagination = Pagination::new(params.page.unwrap_or(1), params.page_size.unwrap_or(DEFAULT_PAGE_SIZE));
    debug!("💻️ GET history page {} ({} per page)", pagination.page, pagination.page_size);
    let page = api.history(pagination).await?;
    Ok(HttpResponse::Ok().json(HistoryResponse::from(page)))
}

//----------------------------------------------   Live events  ------------------------------------------------
/// Route handler for the live event feed
///
/// Streams `payment_created`, `payment_success` and `payment_failed` events as Server-Sent Events. New
/// observers receive nothing until the next event fires; they are expected to call the stats and history
/// endpoints on connect and use this feed for incremental freshness only.
#[get("/live")]
pub async fn live_events(feed: web::Data<LiveFeed>) -> HttpResponse {
    trace!("💻️ New live event observer connected");
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(event_stream(feed.subscribe()))
}

use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::{TimeZone, Utc};
use fps_common::{Rupees, Secret};
use fundraiser_engine::{
    db_types::{Contribution, ContributionStatus, OrderId, PaymentId, Ward},
    helpers::CallbackVerifier,
};
use log::debug;
use serde::Serialize;

pub const TEST_SECRET: &str = "test_key_secret";

pub fn verifier() -> CallbackVerifier {
    CallbackVerifier::new(Secret::new(TEST_SECRET.to_string()))
}

/// A fixed-timestamp record so that response bodies are deterministic.
pub fn sample_contribution(status: ContributionStatus) -> Contribution {
    let timestamp = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
    let payment_id = match status {
        ContributionStatus::Created => PaymentId::pending(),
        _ => PaymentId("pay_P1".to_string()),
    };
    Contribution {
        id: 1,
        order_id: OrderId("order_O1".to_string()),
        payment_id,
        name: "Asha".to_string(),
        ward: Ward::Karimpuzha,
        mobile: "9999999999".to_string(),
        amount: Rupees::from(700),
        quantity: 2,
        status,
        created_at: timestamp,
        updated_at: timestamp,
    }
}

pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    let req = TestRequest::get().uri(path).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making GET request to {path}");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub async fn post_request<B: Serialize>(
    path: &str,
    body: &B,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::post().uri(path).set_json(body).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making POST request to {path}");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

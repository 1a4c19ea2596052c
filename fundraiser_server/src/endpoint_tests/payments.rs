use std::collections::HashMap;

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use fps_common::Rupees;
use fundraiser_engine::{
    db_types::{ContributionStatus, OrderId, PaymentId},
    events::EventProducers,
    tally_objects::{HistoryEntry, HistoryPage, TallySnapshot},
    traits::SettlementOutcome,
    PaymentFlowApi,
    TallyApi,
};
use razorpay_tools::{RazorpayApi, RazorpayConfig};
use serde_json::{json, Value};

use super::{
    helpers::{get_request, post_request, sample_contribution, verifier},
    mocks::MockContributionDb,
};
use crate::{
    config::ServerConfig,
    routes::{CreateOrderRoute, HistoryRoute, PaymentFailureRoute, StatsRoute, VerifyPaymentRoute},
};

fn valid_signature() -> String {
    verifier().sign(&OrderId("order_O1".to_string()), &PaymentId("pay_P1".to_string()))
}

//----------------------------------------------   Verify  -----------------------------------------------------

#[actix_web::test]
async fn verify_payment_happy_path() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "razorpay_order_id": "order_O1",
        "razorpay_payment_id": "pay_P1",
        "razorpay_signature": valid_signature(),
    });
    let (status, body) = post_request("/api/payment/verify", &body, configure_verify_ok).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["status"], "success");
    assert_eq!(response["contribution"]["amount"], 700);
    assert_eq!(response["contribution"]["ward"], "KARIMPUZHA");
    assert_eq!(response["contribution"]["status"], "success");
    assert_eq!(response["contribution"]["payment_id"], "pay_P1");
}

#[actix_web::test]
async fn verify_payment_with_bad_signature_leaves_record_alone() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "razorpay_order_id": "order_O1",
        "razorpay_payment_id": "pay_P1",
        "razorpay_signature": "deadbeef",
    });
    let err = post_request("/api/payment/verify", &body, configure_verify_never_settles)
        .await
        .expect_err("Expected error");
    assert_eq!(err, "Payment signature verification failed.");
}

#[actix_web::test]
async fn verify_payment_unknown_order() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "razorpay_order_id": "order_unknown",
        "razorpay_payment_id": "pay_P1",
        "razorpay_signature": valid_signature(),
    });
    let err = post_request("/api/payment/verify", &body, configure_verify_not_found).await.expect_err("Expected error");
    assert_eq!(err, "The data was not found. No contribution for order order_unknown.");
}

fn configure_verify_ok(cfg: &mut ServiceConfig) {
    let mut db = MockContributionDb::new();
    db.expect_fetch_contribution_by_order_id()
        .returning(|_| Ok(Some(sample_contribution(ContributionStatus::Created))));
    db.expect_mark_success()
        .returning(|_, _| Ok(SettlementOutcome::Applied(sample_contribution(ContributionStatus::Success))));
    let flow_api = PaymentFlowApi::new(db, verifier(), EventProducers::default());
    cfg.service(VerifyPaymentRoute::<MockContributionDb>::new()).app_data(web::Data::new(flow_api));
}

fn configure_verify_never_settles(cfg: &mut ServiceConfig) {
    let mut db = MockContributionDb::new();
    db.expect_fetch_contribution_by_order_id()
        .returning(|_| Ok(Some(sample_contribution(ContributionStatus::Created))));
    // an invalid signature must never reach the store
    db.expect_mark_success().never();
    let flow_api = PaymentFlowApi::new(db, verifier(), EventProducers::default());
    cfg.service(VerifyPaymentRoute::<MockContributionDb>::new()).app_data(web::Data::new(flow_api));
}

fn configure_verify_not_found(cfg: &mut ServiceConfig) {
    let mut db = MockContributionDb::new();
    db.expect_fetch_contribution_by_order_id().returning(|_| Ok(None));
    db.expect_mark_success().never();
    let flow_api = PaymentFlowApi::new(db, verifier(), EventProducers::default());
    cfg.service(VerifyPaymentRoute::<MockContributionDb>::new()).app_data(web::Data::new(flow_api));
}

//----------------------------------------------   Failure  ----------------------------------------------------

#[actix_web::test]
async fn failure_report_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "order_id": "order_O1", "reason": "payment declined" });
    let (status, body) =
        post_request("/api/payment/failure", &body, configure_failure_applied).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["success"], true);
}

#[actix_web::test]
async fn failure_report_cannot_overturn_success() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "order_id": "order_O1", "payment_id": "pay_P1" });
    let err = post_request("/api/payment/failure", &body, configure_failure_conflict)
        .await
        .expect_err("Expected error");
    assert_eq!(err, "The requested transition conflicts with the order's terminal state. Order order_O1 is already paid.");
}

#[actix_web::test]
async fn repeated_failure_report_is_a_noop_ack() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "order_id": "order_O1" });
    let (status, body) =
        post_request("/api/payment/failure", &body, configure_failure_already_failed).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["success"], true);
}

fn configure_failure_applied(cfg: &mut ServiceConfig) {
    let mut db = MockContributionDb::new();
    db.expect_mark_failed()
        .returning(|_, _| Ok(SettlementOutcome::Applied(sample_contribution(ContributionStatus::Failed))));
    let flow_api = PaymentFlowApi::new(db, verifier(), EventProducers::default());
    cfg.service(PaymentFailureRoute::<MockContributionDb>::new()).app_data(web::Data::new(flow_api));
}

fn configure_failure_conflict(cfg: &mut ServiceConfig) {
    let mut db = MockContributionDb::new();
    db.expect_mark_failed()
        .returning(|_, _| Ok(SettlementOutcome::Conflict(sample_contribution(ContributionStatus::Success))));
    let flow_api = PaymentFlowApi::new(db, verifier(), EventProducers::default());
    cfg.service(PaymentFailureRoute::<MockContributionDb>::new()).app_data(web::Data::new(flow_api));
}

fn configure_failure_already_failed(cfg: &mut ServiceConfig) {
    let mut db = MockContributionDb::new();
    db.expect_mark_failed()
        .returning(|_, _| Ok(SettlementOutcome::AlreadySettled(sample_contribution(ContributionStatus::Failed))));
    let flow_api = PaymentFlowApi::new(db, verifier(), EventProducers::default());
    cfg.service(PaymentFailureRoute::<MockContributionDb>::new()).app_data(web::Data::new(flow_api));
}

//----------------------------------------------   Stats  ------------------------------------------------------

#[actix_web::test]
async fn stats_are_served_from_the_tally() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/api/payment/stats", configure_stats).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["total_amount"], 700);
    assert_eq!(response["total_count"], 2);
    assert_eq!(response["ward_wise"]["KARIMPUZHA"], 700);
    // absent wards are missing keys, not zeroes
    assert!(response["ward_wise"].get("POMBRA").is_none());
}

fn configure_stats(cfg: &mut ServiceConfig) {
    let mut db = MockContributionDb::new();
    db.expect_fetch_tally().returning(|| {
        let mut ward_totals = HashMap::new();
        ward_totals.insert("KARIMPUZHA".to_string(), Rupees::from(700));
        Ok(TallySnapshot { total_amount: Rupees::from(700), total_quantity: 2, ward_totals })
    });
    let tally_api = TallyApi::new(db);
    cfg.service(StatsRoute::<MockContributionDb>::new()).app_data(web::Data::new(tally_api));
}

//----------------------------------------------   History  ----------------------------------------------------

#[actix_web::test]
async fn history_is_paginated_and_redacted() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request("/api/payment/history?page=2&page_size=10", configure_history).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["total"], 25);
    assert_eq!(response["page"], 2);
    assert_eq!(response["page_size"], 10);
    assert_eq!(response["has_more"], true);
    assert_eq!(response["records"][0]["name"], "Asha");
    // the redacted projection never carries contact data or the gateway order id
    assert!(body.find("mobile").is_none());
    assert!(body.find("9999999999").is_none());
    assert!(body.find("order_O1").is_none());
}

fn configure_history(cfg: &mut ServiceConfig) {
    let mut db = MockContributionDb::new();
    db.expect_fetch_history_page().returning(|pagination| {
        let entries = vec![HistoryEntry::from(sample_contribution(ContributionStatus::Success))];
        Ok(HistoryPage { entries, total: 25, page: pagination.page, page_size: pagination.page_size, has_more: true })
    });
    let tally_api = TallyApi::new(db);
    cfg.service(HistoryRoute::<MockContributionDb>::new()).app_data(web::Data::new(tally_api));
}

//----------------------------------------------   Create order  -----------------------------------------------

#[actix_web::test]
async fn create_order_rejects_bad_submissions_before_the_gateway() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "name": "Asha", "mobile": "12345", "ward": "KARIMPUZHA", "quantity": 1 });
    let err = post_request("/api/payment/create-order", &body, configure_create_order).await.expect_err("Expected error");
    assert_eq!(err, "Invalid contribution details. Mobile number must be exactly 10 digits, got '12345'");

    let body = json!({ "name": "", "mobile": "9999999999", "ward": "KARIMPUZHA" });
    let err = post_request("/api/payment/create-order", &body, configure_create_order).await.expect_err("Expected error");
    assert_eq!(err, "Invalid contribution details. Contributor name must not be empty");

    let body = json!({ "name": "Asha", "mobile": "9999999999", "ward": "KARIMPUZHA", "quantity": 0 });
    let err = post_request("/api/payment/create-order", &body, configure_create_order).await.expect_err("Expected error");
    assert_eq!(err, "Invalid contribution details. Quantity must be a positive integer, got 0");
}

fn configure_create_order(cfg: &mut ServiceConfig) {
    // validation fires before any gateway or store access, so neither needs expectations
    let db = MockContributionDb::new();
    let flow_api = PaymentFlowApi::new(db, verifier(), EventProducers::default());
    let gateway = RazorpayApi::new(RazorpayConfig::default()).expect("Error creating gateway client");
    cfg.service(CreateOrderRoute::<MockContributionDb>::new())
        .app_data(web::Data::new(flow_api))
        .app_data(web::Data::new(gateway))
        .app_data(web::Data::new(ServerConfig::default()));
}

use std::{collections::HashMap, fmt::Display};

use fps_common::Rupees;
use fundraiser_engine::{
    db_types::{Contribution, OrderId, PaymentId},
    tally_objects::{HistoryEntry, HistoryPage, TallySnapshot},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// The contribution form as submitted by the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub name: String,
    pub mobile: String,
    pub ward: String,
    #[serde(default)]
    pub quantity: Option<i64>,
}

/// Everything the checkout widget needs to take the contributor through payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: OrderId,
    pub amount: Rupees,
    pub currency: String,
    pub quantity: i64,
    /// The public gateway key id the widget must be initialised with.
    pub key_id: String,
}

/// The signed confirmation the gateway hands to the client after a successful checkout. Field names
/// follow the gateway's callback payload verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: OrderId,
    pub razorpay_payment_id: PaymentId,
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub status: String,
    pub contribution: Contribution,
}

impl VerifyPaymentResponse {
    pub fn success(contribution: Contribution) -> Self {
        Self { status: "success".to_string(), contribution }
    }
}

/// The gateway's out-of-band failure notification, relayed by the client when a checkout fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFailureRequest {
    pub order_id: OrderId,
    #[serde(default)]
    pub payment_id: Option<PaymentId>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_amount: Rupees,
    /// Total packs across all successful contributions, not a row count.
    pub total_count: i64,
    pub ward_wise: HashMap<String, Rupees>,
}

impl From<TallySnapshot> for StatsResponse {
    fn from(snapshot: TallySnapshot) -> Self {
        Self {
            total_amount: snapshot.total_amount,
            total_count: snapshot.total_quantity,
            ward_wise: snapshot.ward_totals,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub records: Vec<HistoryEntry>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

impl From<HistoryPage> for HistoryResponse {
    fn from(page: HistoryPage) -> Self {
        Self {
            records: page.entries,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            has_more: page.has_more,
        }
    }
}

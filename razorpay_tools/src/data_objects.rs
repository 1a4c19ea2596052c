use fps_common::{Rupees, INR_CURRENCY_CODE};
use serde::{Deserialize, Serialize};

/// The request body for `POST /v1/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderRequest {
    /// Amount in paise. Razorpay only accepts the smallest currency unit.
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

impl NewOrderRequest {
    pub fn new(amount: Rupees, receipt: String) -> Self {
        Self { amount: amount.as_paise(), currency: INR_CURRENCY_CODE.to_string(), receipt }
    }
}

/// An order record as returned by the Razorpay Orders API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOrder {
    /// The opaque order id, `order_...`. This is the key the whole payment lifecycle hangs off.
    pub id: String,
    /// Amount in paise.
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
    /// Unix timestamp assigned by Razorpay.
    #[serde(default)]
    pub created_at: i64,
}

impl RazorpayOrder {
    /// The order amount in whole rupees.
    pub fn amount_in_rupees(&self) -> Rupees {
        Rupees::from(self.amount / 100)
    }
}

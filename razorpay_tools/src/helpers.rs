use chrono::Utc;
use rand::Rng;

/// Generates a fresh receipt id for an order creation request.
///
/// Razorpay treats the receipt as an opaque merchant reference. The millisecond timestamp keeps receipts
/// roughly sortable; the random suffix keeps two orders created in the same millisecond distinct.
pub fn new_receipt_id() -> String {
    let nonce = rand::thread_rng().gen_range(1000..10_000);
    format!("receipt_{}_{nonce}", Utc::now().timestamp_millis())
}

//! Verification of the gateway's signed payment confirmation.
//!
//! When a payment completes, the gateway hands the client a signature over `"{order_id}|{payment_id}"`:
//! `HMAC-SHA256` keyed with the API secret shared between the gateway and this server, hex-encoded. The
//! client relays it to the verify endpoint, and nothing about the payment is trusted until the signature
//! checks out here.
use fps_common::Secret;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::db_types::{OrderId, PaymentId};

type HmacSha256 = Hmac<Sha256>;

/// The exact byte string the gateway signs.
pub fn signature_message(order_id: &OrderId, payment_id: &PaymentId) -> String {
    format!("{}|{}", order_id.as_str(), payment_id.as_str())
}

/// Checks gateway callback signatures against the shared secret.
///
/// The comparison runs in constant time regardless of where the first mismatching byte occurs; the
/// verifier is exposed to attacker-supplied signatures, so a timing side-channel here would leak the
/// expected MAC byte by byte.
#[derive(Clone)]
pub struct CallbackVerifier {
    secret: Secret<String>,
}

impl CallbackVerifier {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    /// Returns true iff `signature` is the hex-encoded HMAC of `"{order_id}|{payment_id}"` under the
    /// shared secret. Malformed hex is simply a failed verification, never an error.
    pub fn verify(&self, order_id: &OrderId, payment_id: &PaymentId, signature: &str) -> bool {
        let claimed = match hex::decode(signature.trim()) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let mut mac = HmacSha256::new_from_slice(self.secret.reveal().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signature_message(order_id, payment_id).as_bytes());
        mac.verify_slice(&claimed).is_ok()
    }

    /// Produces the signature the gateway would issue for this order/payment pair. Used by the test
    /// suites and local tooling; the server itself only ever verifies.
    pub fn sign(&self, order_id: &OrderId, payment_id: &PaymentId) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.reveal().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signature_message(order_id, payment_id).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

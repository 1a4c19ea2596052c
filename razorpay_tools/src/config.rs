use fps_common::Secret;
use log::*;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com";
pub const DEFAULT_RAZORPAY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// The public key id, `rzp_test_...` or `rzp_live_...`. Also handed to the checkout widget.
    pub key_id: String,
    /// The API secret. Doubles as the HMAC key with which Razorpay signs payment confirmations.
    pub key_secret: Secret<String>,
    /// Base URL for the REST API. Overridable so that tests can point at a local stub.
    pub api_url: String,
    /// Upper bound on any single request to the gateway.
    pub timeout_secs: u64,
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self {
            key_id: String::default(),
            key_secret: Secret::default(),
            api_url: DEFAULT_RAZORPAY_API_URL.to_string(),
            timeout_secs: DEFAULT_RAZORPAY_TIMEOUT_SECS,
        }
    }
}

impl RazorpayConfig {
    pub fn new_from_env_or_default() -> Self {
        let key_id = std::env::var("RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("🛒️ RAZORPAY_KEY_ID not set, using a (probably useless) default");
            "rzp_test_0000000000".to_string()
        });
        let key_secret = Secret::new(std::env::var("RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            warn!("🛒️ RAZORPAY_KEY_SECRET not set, using a (probably useless) default");
            "00000000000000".to_string()
        }));
        let api_url = std::env::var("RAZORPAY_API_URL").unwrap_or_else(|_| DEFAULT_RAZORPAY_API_URL.to_string());
        let timeout_secs = std::env::var("RAZORPAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RAZORPAY_TIMEOUT_SECS);
        Self { key_id, key_secret, api_url, timeout_secs }
    }
}

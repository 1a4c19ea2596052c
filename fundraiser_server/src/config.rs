use std::env;

use fps_common::Rupees;
use log::*;
use razorpay_tools::RazorpayConfig;

const DEFAULT_FPS_HOST: &str = "127.0.0.1";
const DEFAULT_FPS_PORT: u16 = 8360;
const DEFAULT_UNIT_PRICE: i64 = 350;
const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The fixed price of a single pack, in whole rupees. Every contribution amount is this price times
    /// the quantity, computed once at order creation.
    pub unit_price: Rupees,
    /// Depth of the engine's event hook channels and of the live SSE fan-out buffer.
    pub event_buffer_size: usize,
    /// Razorpay credentials. The key secret is also the HMAC key for verifying payment callbacks.
    pub razorpay: RazorpayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FPS_HOST.to_string(),
            port: DEFAULT_FPS_PORT,
            database_url: String::default(),
            unit_price: Rupees::from(DEFAULT_UNIT_PRICE),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            razorpay: RazorpayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("FPS_HOST").ok().unwrap_or_else(|| DEFAULT_FPS_HOST.into());
        let port = env::var("FPS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for FPS_PORT. {e} Using the default, {DEFAULT_FPS_PORT}, instead."
                    );
                    DEFAULT_FPS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FPS_PORT);
        let database_url = env::var("FPS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ FPS_DATABASE_URL is not set. Please set it to the URL for the fundraiser database.");
            String::default()
        });
        let unit_price = env::var("FPS_UNIT_PRICE")
            .map(|s| {
                s.parse::<i64>().map(Rupees::from).unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid amount for FPS_UNIT_PRICE. {e} Using the default, \
                         {DEFAULT_UNIT_PRICE}, instead."
                    );
                    Rupees::from(DEFAULT_UNIT_PRICE)
                })
            })
            .ok()
            .unwrap_or_else(|| Rupees::from(DEFAULT_UNIT_PRICE));
        let event_buffer_size = env::var("FPS_EVENT_BUFFER_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        let razorpay = RazorpayConfig::new_from_env_or_default();
        Self { host, port, database_url, unit_price, event_buffer_size, razorpay }
    }
}

//! A minimal client for the Razorpay Orders API.
//!
//! The fundraiser server only needs one call: creating an order that the frontend checkout widget can
//! present to the contributor. Payment capture and the signed confirmation callback are handled by
//! Razorpay itself; the server reconciles the callback in `fundraiser_engine`.

mod api;
mod config;
mod error;
mod helpers;

mod data_objects;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{NewOrderRequest, RazorpayOrder};
pub use error::RazorpayApiError;
pub use helpers::new_receipt_id;

//! # Shopfront API Entry Point
//!
//! Reads one JSON request per line from stdin and writes one JSON envelope
//! per line to stdout. Logs go to stderr.
//!
//! ## Example Session
//! ```text
//! $ shopfront-api
//! {"op":"addItemToOrder","token":"Bearer t1","variantId":"var-3-1","quantity":2}
//! {"success":true,"data":{"code":"ORD-3F9A21C0","state":"AddingItems",...}}
//! {"op":"applyCouponCode","token":"Bearer t1","couponCode":"nope"}
//! {"success":false,"errorCode":"COUPON_CODE_INVALID_ERROR","message":"..."}
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration from `SHOPFRONT_*` variables
//! 3. Open the store (seeded with demo data by default)
//! 4. Serve until stdin closes

fn main() -> anyhow::Result<()> {
    // The actual setup is in lib.rs for better testability
    shopfront_api::run()
}

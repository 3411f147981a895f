//! Domain Module
//!
//! Entities persisted in the document store and the small value rules
//! (identifiers, money rounding, timestamps) they depend on.

mod category;
mod product;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

pub use category::Category;
pub use product::Product;

/// Stock strictly below this quantity is reported as low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

// == Identifiers ==
/// Generates a new document identifier.
///
/// UUID v7 in simple (32 hex chars) form, so identifiers sort by creation time.
pub fn new_id() -> String {
    Uuid::now_v7().simple().to_string()
}

// == Money ==
/// Rounds a monetary amount to cents, midpoint away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// == Timestamps ==
/// Current UTC time truncated to milliseconds, the precision the store keeps.
pub fn timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

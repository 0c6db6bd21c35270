//! Flat-percentage discounting applied after retrieval.
//!
//! Upstream data is never altered at the source; discounting rewrites the
//! fetched records while keeping the original price alongside.

use crate::azure::models::PriceRecord;
use serde::Serialize;

/// Marker attached to results whose prices were discounted.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountNote {
    pub percentage: f64,
    pub note: String,
}

impl DiscountNote {
    /// Creates the standard note for an applied percentage.
    pub fn new(percentage: f64) -> Self {
        Self { percentage, note: "Prices shown are after discount".to_string() }
    }
}

/// Rounds to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to 6 decimal places.
pub fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Returns `price` reduced by `percentage`, rounded to 6 decimal places.
pub fn discounted_price(price: f64, percentage: f64) -> f64 {
    round6(price * (1.0 - percentage / 100.0))
}

/// Applies a flat discount to every positively-priced record in place,
/// preserving the original under `original_price`.
///
/// Savings-plan prices are discounted the same way. Records without a
/// positive price are left untouched; a non-positive percentage is a no-op.
/// Items are never removed or reordered.
pub fn apply_discount(items: &mut [PriceRecord], percentage: f64) {
    if percentage <= 0.0 {
        return;
    }

    for item in items.iter_mut() {
        if item.retail_price > 0.0 {
            item.original_price = Some(item.retail_price);
            item.retail_price = discounted_price(item.retail_price, percentage);
        }

        for plan in item.savings_plans.iter_mut() {
            if plan.retail_price > 0.0 {
                plan.original_price = Some(plan.retail_price);
                plan.retail_price = discounted_price(plan.retail_price, percentage);
            }
        }
    }
}

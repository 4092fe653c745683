//! crates/nestuity_core/src/usage.rs
//!
//! Projects how long the diapers at home will last and how many boxes to buy.

use crate::domain::{DiaperSupply, UsageProjection};

pub const MISSING_WEIGHT_MESSAGE: &str = "Please enter your baby's weight to calculate usage.";

/// Computes a restock projection.
///
/// Without a positive weight only a prompt message is returned. A supply with no
/// preferred minimum or no per-box count never recommends a purchase.
pub fn project(
    weight_kg: Option<f64>,
    daily_usage: u32,
    supply: &DiaperSupply,
) -> UsageProjection {
    if !weight_kg.is_some_and(|weight| weight > 0.0) {
        return UsageProjection {
            remaining_supply: None,
            days_left: 0,
            recommended_purchase: 0,
            message: Some(MISSING_WEIGHT_MESSAGE.to_string()),
        };
    }

    let remaining = supply.remaining_diapers;
    let days_left = if daily_usage > 0 && remaining > 0.0 {
        (remaining / f64::from(daily_usage)).floor() as u32
    } else {
        0
    };

    let recommended_purchase = if supply.preferred_min_days > 0 && supply.diapers_per_box > 0.0 {
        let short_days = f64::from(supply.preferred_min_days) - f64::from(days_left);
        let boxes = (short_days * f64::from(daily_usage) / supply.diapers_per_box).ceil();
        boxes.max(0.0) as u32
    } else {
        0
    };

    let message = (recommended_purchase == 0)
        .then(|| format!("You have enough diapers for at least {days_left} days!"));

    UsageProjection {
        remaining_supply: Some(remaining),
        days_left,
        recommended_purchase,
        message,
    }
}

//! crates/nestuity_core/src/pricing.rs
//!
//! Per-retailer price statistics and a date-grouped price timeline for a
//! product's price history. Retailer names are matched case-insensitively and
//! keyed by their lowercase form.

use crate::domain::PriceHistoryItem;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A current price at most this factor above the lowest seen counts as a good deal.
pub const GOOD_DEAL_MARGIN: f64 = 1.05;

/// Price statistics for one retailer. All zero when the retailer has no prices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSummary {
    pub current: f64,
    pub lowest: f64,
    pub highest: f64,
    pub average: f64,
    /// Product link from the most recent entry.
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VendorSummary {
    /// Lowercase retailer key.
    pub key: String,
    /// The key with its first letter capitalised.
    pub name: String,
    pub summary: PriceSummary,
    pub is_good_deal: bool,
}

/// Prices observed on one calendar day, keyed by retailer.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub prices: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceTimeline {
    /// Ascending by date.
    pub points: Vec<PricePoint>,
    /// Retailer keys in order of first appearance.
    pub vendors: Vec<String>,
    /// First product link seen for each retailer.
    pub vendor_urls: BTreeMap<String, String>,
}

fn vendor_key(retailer: &str) -> String {
    retailer.trim().to_lowercase()
}

fn display_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Summarises the prices recorded for `retailer`.
///
/// The current price is the entry with the latest date. Undated entries count
/// as older than any dated one, and among equal dates the later entry wins.
pub fn summarize(history: &[PriceHistoryItem], retailer: &str) -> PriceSummary {
    let key = vendor_key(retailer);
    let entries: Vec<&PriceHistoryItem> = history
        .iter()
        .filter(|item| vendor_key(&item.retailer) == key)
        .collect();

    let Some(latest) = entries.iter().copied().max_by_key(|item| item.date) else {
        return PriceSummary::default();
    };

    let prices = entries.iter().map(|item| item.price);
    let lowest = prices.clone().fold(f64::INFINITY, f64::min);
    let highest = prices.clone().fold(f64::NEG_INFINITY, f64::max);
    let average = prices.sum::<f64>() / entries.len() as f64;

    PriceSummary {
        current: latest.price,
        lowest,
        highest,
        average,
        url: latest.product_url.clone(),
    }
}

/// One summary per retailer, in order of first appearance in `history`.
pub fn vendor_summaries(history: &[PriceHistoryItem]) -> Vec<VendorSummary> {
    let mut keys: Vec<String> = Vec::new();
    for item in history {
        let key = vendor_key(&item.retailer);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    keys.into_iter()
        .map(|key| {
            let summary = summarize(history, &key);
            VendorSummary {
                name: display_name(&key),
                is_good_deal: summary.current <= summary.lowest * GOOD_DEAL_MARGIN,
                key,
                summary,
            }
        })
        .collect()
}

/// Groups prices by calendar day for charting.
///
/// When a retailer has several prices on one day the later entry wins. Undated
/// entries still register their retailer but add no point.
pub fn price_timeline(history: &[PriceHistoryItem]) -> PriceTimeline {
    let mut by_day: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
    let mut timeline = PriceTimeline::default();

    for item in history {
        let key = vendor_key(&item.retailer);
        if let Some(date) = item.date {
            by_day
                .entry(date.date())
                .or_default()
                .insert(key.clone(), item.price);
        }
        if let Some(url) = &item.product_url {
            timeline
                .vendor_urls
                .entry(key.clone())
                .or_insert_with(|| url.clone());
        }
        if !timeline.vendors.contains(&key) {
            timeline.vendors.push(key);
        }
    }

    timeline.points = by_day
        .into_iter()
        .map(|(date, prices)| PricePoint { date, prices })
        .collect();
    timeline
}

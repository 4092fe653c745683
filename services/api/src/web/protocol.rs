//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API
//! server. Field names are camelCase to match the backend's reminder and baby
//! records.

use crate::timestamps;
use chrono::{NaiveDate, NaiveDateTime};
use nestuity_core::domain::{
    BabyProduct, Frequency, PriceHistoryItem, Recommendation, ReminderRange, ReminderRecord,
    ReminderType, SizeSuggestion, UsageProjection,
};
use nestuity_core::pricing::{self, PricePoint, PriceSummary, VendorSummary};
use nestuity_core::reminders::{ReminderBuckets, ReminderCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

//=========================================================================================
// Reminders
//=========================================================================================

/// A reminder as sent by the client or returned inside a bucket.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDto {
    pub id: i64,
    #[serde(default)]
    pub baby_id: Option<i64>,
    /// TASK, VACCINATION or MILESTONE. Anything else is treated as a task.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    /// TODAY, UPCOMING_WEEK, UPCOMING_MONTH, FUTURE, OVERDUE or COMPLETED.
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Any ISO date or date-time. Unreadable values come back as `null`.
    #[serde(default, deserialize_with = "timestamps::lenient")]
    pub completed_on: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamps::lenient")]
    pub next_due: Option<NaiveDateTime>,
    #[serde(default)]
    pub user_created: bool,
}

impl ReminderDto {
    pub fn into_domain(self) -> ReminderRecord {
        ReminderRecord {
            id: self.id,
            baby_id: self.baby_id,
            kind: self
                .kind
                .as_deref()
                .map_or(ReminderType::Unrecognized, ReminderType::from_tag),
            frequency: self
                .frequency
                .as_deref()
                .map_or(Frequency::Unrecognized, Frequency::from_tag),
            range: self
                .range
                .as_deref()
                .map_or(ReminderRange::Unrecognized, ReminderRange::from_tag),
            title: self.title,
            description: self.description,
            completed_on: self.completed_on,
            next_due: self.next_due,
            user_created: self.user_created,
        }
    }
}

impl From<&ReminderRecord> for ReminderDto {
    fn from(record: &ReminderRecord) -> Self {
        Self {
            id: record.id,
            baby_id: record.baby_id,
            kind: Some(record.kind.as_tag().to_string()),
            frequency: Some(record.frequency.as_tag().to_string()),
            range: Some(record.range.as_tag().to_string()),
            title: record.title.clone(),
            description: record.description.clone(),
            completed_on: record.completed_on,
            next_due: record.next_due,
            user_created: record.user_created,
        }
    }
}

/// Request body for `POST /reminders/classify`.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    pub reminders: Vec<ReminderDto>,
    /// all, daily, weekly or monthly. Defaults to all.
    #[serde(default)]
    pub scope: Option<String>,
    /// all, tasks, vaccinations, completed or overdue. Defaults to all.
    #[serde(default)]
    pub category: Option<String>,
}

/// The four reminder buckets plus which of them the client asked to see.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BucketsResponse {
    pub scope: String,
    /// Bucket keys selected by the category filter, in display order.
    pub visible: Vec<String>,
    pub tasks: Vec<ReminderDto>,
    pub vaccinations: Vec<ReminderDto>,
    pub completed: Vec<ReminderDto>,
    pub overdue: Vec<ReminderDto>,
}

impl BucketsResponse {
    pub fn new(scope: &str, visible: &[ReminderCategory], buckets: &ReminderBuckets) -> Self {
        let dtos = |records: &[ReminderRecord]| -> Vec<ReminderDto> {
            records.iter().map(ReminderDto::from).collect()
        };
        Self {
            scope: scope.to_string(),
            visible: visible.iter().map(|c| c.key().to_string()).collect(),
            tasks: dtos(&buckets.tasks),
            vaccinations: dtos(&buckets.vaccinations),
            completed: dtos(&buckets.completed),
            overdue: dtos(&buckets.overdue),
        }
    }
}

/// Query string for `GET /babies/{baby_id}/reminders`.
#[derive(Deserialize, Debug, Default)]
pub struct ReminderQuery {
    pub scope: Option<String>,
    pub category: Option<String>,
}

//=========================================================================================
// Diaper Sizes
//=========================================================================================

/// A size table row. Unbounded limits are `null`.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizeSuggestionDto {
    pub size: String,
    pub weight_min: Option<f64>,
    pub weight_max: Option<f64>,
    pub age_min_months: Option<f64>,
    pub age_max_months: Option<f64>,
    pub weight_range: String,
    pub avg_usage: String,
    pub age_range: String,
    pub per_box: String,
}

impl From<&SizeSuggestion> for SizeSuggestionDto {
    fn from(s: &SizeSuggestion) -> Self {
        let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
        Self {
            size: s.size.clone(),
            weight_min: finite(s.weight_min),
            weight_max: finite(s.weight_max),
            age_min_months: finite(s.age_min_months),
            age_max_months: finite(s.age_max_months),
            weight_range: s.weight_range.clone(),
            avg_usage: s.avg_usage.clone(),
            age_range: s.age_range.clone(),
            per_box: s.per_box.clone(),
        }
    }
}

/// Request body for `POST /sizes/recommend`.
#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub age_months: Option<f64>,
    /// Used to derive the age when `ageMonths` is absent.
    #[serde(default)]
    pub dob: Option<NaiveDate>,
}

pub const NEED_MORE_INPUT_MESSAGE: &str =
    "Please enter baby's weight and date of birth to see a suggestion.";

/// A previous/current/next suggestion, or only a prompt when input was missing.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub previous: Option<SizeSuggestionDto>,
    pub current: Option<SizeSuggestionDto>,
    pub next: Option<SizeSuggestionDto>,
    pub age_months: Option<f64>,
    pub message: Option<String>,
}

impl RecommendationResponse {
    pub fn new(recommendation: Option<Recommendation<'_>>, age_months: Option<f64>) -> Self {
        match recommendation {
            Some(rec) => Self {
                previous: rec.previous.map(SizeSuggestionDto::from),
                current: Some(SizeSuggestionDto::from(rec.current)),
                next: rec.next.map(SizeSuggestionDto::from),
                age_months,
                message: None,
            },
            None => Self {
                previous: None,
                current: None,
                next: None,
                age_months,
                message: Some(NEED_MORE_INPUT_MESSAGE.to_string()),
            },
        }
    }
}

//=========================================================================================
// Usage Projection
//=========================================================================================

/// Request body for `POST /usage/projection`.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsageRequest {
    #[serde(default)]
    pub weight_kg: Option<f64>,
    pub daily_usage: u32,
    pub boxes_at_home: f64,
    pub diapers_per_box: f64,
    #[serde(default)]
    pub preferred_supply_min_days: Option<u32>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    pub remaining_supply: Option<f64>,
    pub days_left: u32,
    pub recommended_purchase: u32,
    pub message: Option<String>,
}

impl From<UsageProjection> for UsageResponse {
    fn from(p: UsageProjection) -> Self {
        Self {
            remaining_supply: p.remaining_supply,
            days_left: p.days_left,
            recommended_purchase: p.recommended_purchase,
            message: p.message,
        }
    }
}

//=========================================================================================
// Price Comparison
//=========================================================================================

/// One observed retailer price.
#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryDto {
    pub retailer: String,
    #[serde(default)]
    pub product_url: Option<String>,
    pub price: f64,
    #[serde(default, deserialize_with = "timestamps::lenient")]
    pub date: Option<NaiveDateTime>,
}

impl PriceHistoryDto {
    pub fn into_domain(self) -> PriceHistoryItem {
        PriceHistoryItem {
            retailer: self.retailer,
            product_url: self.product_url,
            price: self.price,
            date: self.date,
        }
    }
}

/// Request body for `POST /prices/summary`.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummaryRequest {
    pub price_history: Vec<PriceHistoryDto>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummaryDto {
    pub current: f64,
    pub lowest: f64,
    pub highest: f64,
    pub average: f64,
    pub url: Option<String>,
}

impl From<PriceSummary> for PriceSummaryDto {
    fn from(s: PriceSummary) -> Self {
        Self {
            current: s.current,
            lowest: s.lowest,
            highest: s.highest,
            average: s.average,
            url: s.url,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorSummaryDto {
    pub key: String,
    pub name: String,
    pub summary: PriceSummaryDto,
    /// Current price within 5% of the lowest seen.
    pub is_good_deal: bool,
}

impl From<VendorSummary> for VendorSummaryDto {
    fn from(v: VendorSummary) -> Self {
        Self {
            key: v.key,
            name: v.name,
            summary: PriceSummaryDto::from(v.summary),
            is_good_deal: v.is_good_deal,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricePointDto {
    pub date: NaiveDate,
    /// Price per retailer key on this day.
    pub prices: BTreeMap<String, f64>,
}

impl From<PricePoint> for PricePointDto {
    fn from(p: PricePoint) -> Self {
        Self {
            date: p.date,
            prices: p.prices,
        }
    }
}

/// Per-retailer summaries plus a day-by-day timeline for one price history.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceReportResponse {
    pub product_id: Option<i64>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub vendors: Vec<VendorSummaryDto>,
    pub timeline: Vec<PricePointDto>,
    pub vendor_urls: BTreeMap<String, String>,
}

impl PriceReportResponse {
    pub fn from_history(history: &[PriceHistoryItem]) -> Self {
        let timeline = pricing::price_timeline(history);
        Self {
            product_id: None,
            name: None,
            currency: None,
            vendors: pricing::vendor_summaries(history)
                .into_iter()
                .map(VendorSummaryDto::from)
                .collect(),
            timeline: timeline.points.into_iter().map(PricePointDto::from).collect(),
            vendor_urls: timeline.vendor_urls,
        }
    }

    pub fn for_product(product: &BabyProduct) -> Self {
        Self {
            product_id: Some(product.id),
            name: Some(product.name.clone()),
            currency: product.currency.clone(),
            ..Self::from_history(&product.price_history)
        }
    }
}

//! crates/nestuity_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any backend or serialization format.

use chrono::{NaiveDate, NaiveDateTime};

/// Identifier assigned to a reminder by the backend.
pub type ReminderId = i64;

/// Identifier assigned to a baby profile by the backend.
pub type BabyId = i64;

/// Identifier assigned to a baby product by the backend.
pub type ProductId = i64;

//=========================================================================================
// Reminder Tags
//=========================================================================================

/// What kind of care item a reminder represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderType {
    Task,
    Vaccination,
    Milestone,
    /// Any tag the backend sends that this build does not know about.
    Unrecognized,
}

impl ReminderType {
    /// Parses a backend tag. Unknown tags fall back to `Unrecognized`, never an error.
    pub fn from_tag(tag: &str) -> Self {
        match normalize(tag).as_str() {
            "TASK" => Self::Task,
            "VACCINATION" => Self::Vaccination,
            "MILESTONE" => Self::Milestone,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Task => "TASK",
            Self::Vaccination => "VACCINATION",
            Self::Milestone => "MILESTONE",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }
}

/// How often a reminder repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Once,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
    Unrecognized,
}

impl Frequency {
    pub fn from_tag(tag: &str) -> Self {
        match normalize(tag).as_str() {
            "ONCE" => Self::Once,
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "QUARTERLY" => Self::Quarterly,
            "ANNUAL" => Self::Annual,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Once => "ONCE",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
            Self::Annual => "ANNUAL",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }
}

/// Where a reminder's due date falls relative to "now", as computed upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderRange {
    Today,
    UpcomingWeek,
    UpcomingMonth,
    Future,
    Overdue,
    Completed,
    /// Missing or unknown range; never part of an allowed set.
    Unrecognized,
}

impl ReminderRange {
    pub fn from_tag(tag: &str) -> Self {
        match normalize(tag).as_str() {
            "TODAY" => Self::Today,
            "UPCOMING_WEEK" => Self::UpcomingWeek,
            "UPCOMING_MONTH" => Self::UpcomingMonth,
            "FUTURE" => Self::Future,
            "OVERDUE" => Self::Overdue,
            "COMPLETED" => Self::Completed,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Today => "TODAY",
            Self::UpcomingWeek => "UPCOMING_WEEK",
            Self::UpcomingMonth => "UPCOMING_MONTH",
            Self::Future => "FUTURE",
            Self::Overdue => "OVERDUE",
            Self::Completed => "COMPLETED",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }
}

fn normalize(tag: &str) -> String {
    tag.trim().to_ascii_uppercase()
}

//=========================================================================================
// Reminders
//=========================================================================================

/// A single care reminder as supplied by the backend.
///
/// `range` is trusted as-is. `completed_on` is carried for display only and
/// does not influence bucket placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderRecord {
    pub id: ReminderId,
    pub baby_id: Option<BabyId>,
    pub kind: ReminderType,
    pub frequency: Frequency,
    pub range: ReminderRange,
    pub title: String,
    pub description: Option<String>,
    pub completed_on: Option<NaiveDateTime>,
    pub next_due: Option<NaiveDateTime>,
    pub user_created: bool,
}

//=========================================================================================
// Baby Profile
//=========================================================================================

/// The subset of a baby profile the sizing and usage logic reads.
#[derive(Debug, Clone, PartialEq)]
pub struct BabyProfile {
    pub id: BabyId,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub weight_kg: Option<f64>,
    pub diaper_size: Option<String>,
    pub daily_usage: Option<u32>,
}

//=========================================================================================
// Diaper Sizing
//=========================================================================================

/// One row of the static size suggestion table.
///
/// Only the numeric bounds take part in matching; the text fields are display data.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeSuggestion {
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

impl SizeSuggestion {
    /// Inclusive containment; a missing bound is unbounded.
    pub fn fits_weight(&self, weight_kg: f64) -> bool {
        weight_kg >= self.weight_min.unwrap_or(f64::NEG_INFINITY)
            && weight_kg <= self.weight_max.unwrap_or(f64::INFINITY)
    }

    pub fn fits_age(&self, age_months: f64) -> bool {
        age_months >= self.age_min_months.unwrap_or(f64::NEG_INFINITY)
            && age_months <= self.age_max_months.unwrap_or(f64::INFINITY)
    }

    /// Midpoint of the weight range. Missing bounds count as zero here.
    pub fn weight_midpoint(&self) -> f64 {
        (self.weight_min.unwrap_or(0.0) + self.weight_max.unwrap_or(0.0)) / 2.0
    }
}

/// A matched size row together with its table neighbours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation<'a> {
    pub previous: Option<&'a SizeSuggestion>,
    pub current: &'a SizeSuggestion,
    pub next: Option<&'a SizeSuggestion>,
}

//=========================================================================================
// Diaper Supply
//=========================================================================================

/// Preferred days of supply used when the user never set one.
pub const DEFAULT_PREFERRED_SUPPLY_MIN_DAYS: u32 = 14;

/// Diapers currently at home and how many days of stock the parent wants to keep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiaperSupply {
    pub remaining_diapers: f64,
    pub diapers_per_box: f64,
    pub preferred_min_days: u32,
}

impl DiaperSupply {
    /// Builds a supply from a box count, converting to single diapers.
    pub fn from_boxes(boxes: f64, diapers_per_box: f64, preferred_min_days: Option<u32>) -> Self {
        Self {
            remaining_diapers: boxes * diapers_per_box,
            diapers_per_box,
            preferred_min_days: preferred_min_days.unwrap_or(DEFAULT_PREFERRED_SUPPLY_MIN_DAYS),
        }
    }
}

/// Result of a restock projection.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageProjection {
    pub remaining_supply: Option<f64>,
    pub days_left: u32,
    pub recommended_purchase: u32,
    pub message: Option<String>,
}

//=========================================================================================
// Products and Prices
//=========================================================================================

/// One observed price for a product at a retailer.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistoryItem {
    pub retailer: String,
    pub product_url: Option<String>,
    pub price: f64,
    /// `None` when the source date could not be read.
    pub date: Option<NaiveDateTime>,
}

/// A tracked product and every price seen for it.
#[derive(Debug, Clone, PartialEq)]
pub struct BabyProduct {
    pub id: ProductId,
    pub name: String,
    pub brand: Option<String>,
    pub currency: Option<String>,
    pub price_history: Vec<PriceHistoryItem>,
}

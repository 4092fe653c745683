pub mod domain;
pub mod ports;
pub mod pricing;
pub mod reminders;
pub mod schedule;
pub mod sizing;
pub mod usage;

pub use domain::{
    BabyId, BabyProduct, BabyProfile, DiaperSupply, Frequency, PriceHistoryItem, ProductId,
    Recommendation, ReminderId, ReminderRange, ReminderRecord, ReminderType, SizeSuggestion,
    UsageProjection,
};
pub use ports::{BackendService, PortError, PortResult};
pub use pricing::{price_timeline, summarize, vendor_summaries, PriceSummary, VendorSummary};
pub use reminders::{
    classify, CategoryFilter, ParseFilterError, ReminderBuckets, ReminderCategory, TimeScope,
};
pub use sizing::{age_in_months, recommend, RecommendError, SizeTable, SizeTableError};

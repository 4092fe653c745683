//! crates/nestuity_core/src/reminders.rs
//!
//! Partitions a flat list of reminders into display buckets.
//!
//! Status (completed, overdue) always wins over the selected time scope, and the
//! time scope wins over the reminder type. The upstream `range` field is trusted;
//! nothing here looks at a clock.

use crate::domain::{ReminderRange, ReminderRecord, ReminderType};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Time Scope
//=========================================================================================

/// The time window a caller wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeScope {
    #[default]
    All,
    Daily,
    Weekly,
    Monthly,
}

impl TimeScope {
    /// Ranges that survive the scope filter. `Future` is never included.
    pub fn allowed_ranges(&self) -> &'static [ReminderRange] {
        match self {
            Self::Daily => &[ReminderRange::Today],
            Self::Weekly => &[ReminderRange::UpcomingWeek],
            Self::Monthly => &[ReminderRange::UpcomingMonth],
            Self::All => &[
                ReminderRange::Today,
                ReminderRange::UpcomingWeek,
                ReminderRange::UpcomingMonth,
                ReminderRange::Overdue,
            ],
        }
    }

    pub fn allows(&self, range: ReminderRange) -> bool {
        self.allowed_ranges().contains(&range)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFilterError {
    #[error("Unknown time scope: '{0}'")]
    UnknownTimeScope(String),
    #[error("Unknown reminder category: '{0}'")]
    UnknownCategory(String),
}

impl FromStr for TimeScope {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ParseFilterError::UnknownTimeScope(s.to_string())),
        }
    }
}

impl fmt::Display for TimeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================================
// Categories
//=========================================================================================

/// One of the four output buckets, listed in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderCategory {
    Tasks,
    Vaccinations,
    Completed,
    Overdue,
}

impl ReminderCategory {
    pub const ALL: [ReminderCategory; 4] = [
        ReminderCategory::Tasks,
        ReminderCategory::Vaccinations,
        ReminderCategory::Completed,
        ReminderCategory::Overdue,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Vaccinations => "vaccinations",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }
}

impl FromStr for ReminderCategory {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.key() == key)
            .ok_or_else(|| ParseFilterError::UnknownCategory(s.to_string()))
    }
}

/// Which buckets a caller wants back after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(ReminderCategory),
}

impl FromStr for CategoryFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

//=========================================================================================
// Buckets
//=========================================================================================

/// The classifier output. Each bucket keeps input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderBuckets {
    pub tasks: Vec<ReminderRecord>,
    pub vaccinations: Vec<ReminderRecord>,
    pub completed: Vec<ReminderRecord>,
    pub overdue: Vec<ReminderRecord>,
}

impl ReminderBuckets {
    pub fn get(&self, category: ReminderCategory) -> &[ReminderRecord] {
        match category {
            ReminderCategory::Tasks => &self.tasks,
            ReminderCategory::Vaccinations => &self.vaccinations,
            ReminderCategory::Completed => &self.completed,
            ReminderCategory::Overdue => &self.overdue,
        }
    }

    /// Total number of records placed in any bucket.
    pub fn len(&self) -> usize {
        self.tasks.len() + self.vaccinations.len() + self.completed.len() + self.overdue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buckets selected by `filter`, in display order.
    pub fn visible(&self, filter: CategoryFilter) -> Vec<(ReminderCategory, &[ReminderRecord])> {
        ReminderCategory::ALL
            .into_iter()
            .filter(|category| match filter {
                CategoryFilter::All => true,
                CategoryFilter::Only(only) => only == *category,
            })
            .map(|category| (category, self.get(category)))
            .collect()
    }

    fn bucket_mut(&mut self, category: ReminderCategory) -> &mut Vec<ReminderRecord> {
        match category {
            ReminderCategory::Tasks => &mut self.tasks,
            ReminderCategory::Vaccinations => &mut self.vaccinations,
            ReminderCategory::Completed => &mut self.completed,
            ReminderCategory::Overdue => &mut self.overdue,
        }
    }
}

//=========================================================================================
// Classification
//=========================================================================================

/// Decides which bucket a single reminder belongs to, or `None` when it is
/// outside the requested window.
pub fn categorize(reminder: &ReminderRecord, scope: TimeScope) -> Option<ReminderCategory> {
    match reminder.range {
        ReminderRange::Completed => Some(ReminderCategory::Completed),
        ReminderRange::Overdue => Some(ReminderCategory::Overdue),
        range if !scope.allows(range) => None,
        _ => match reminder.kind {
            ReminderType::Vaccination => Some(ReminderCategory::Vaccinations),
            ReminderType::Task | ReminderType::Milestone | ReminderType::Unrecognized => {
                Some(ReminderCategory::Tasks)
            }
        },
    }
}

/// Routes every reminder into at most one bucket in a single pass.
pub fn classify<I>(reminders: I, scope: TimeScope) -> ReminderBuckets
where
    I: IntoIterator<Item = ReminderRecord>,
{
    let mut buckets = ReminderBuckets::default();
    for reminder in reminders {
        if let Some(category) = categorize(&reminder, scope) {
            buckets.bucket_mut(category).push(reminder);
        }
    }
    buckets
}

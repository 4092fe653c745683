//! crates/nestuity_core/src/sizing.rs
//!
//! Diaper size recommendation over a static, ordered size table.

use crate::domain::{Recommendation, SizeSuggestion};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

//=========================================================================================
// Errors
//=========================================================================================

/// Reasons a size table is rejected at load time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SizeTableError {
    #[error("The size table has no entries")]
    Empty,
    #[error("Size '{size}' is invalid: {reason}")]
    InvalidEntry { size: String, reason: String },
    #[error("Size '{0}' appears more than once")]
    DuplicateSize(String),
    #[error("Size '{size}' starts below the previous size; the table must be ordered by weight")]
    OutOfOrder { size: String },
}

/// Input a recommendation cannot be computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecommendError {
    #[error("Weight must be a finite number")]
    NonFiniteWeight,
    #[error("Age must be a finite number")]
    NonFiniteAge,
}

//=========================================================================================
// Size Table
//=========================================================================================

/// A validated, non-empty size table. Row order defines adjacency.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeTable {
    entries: Vec<SizeSuggestion>,
}

impl SizeTable {
    pub fn new(entries: Vec<SizeSuggestion>) -> Result<Self, SizeTableError> {
        if entries.is_empty() {
            return Err(SizeTableError::Empty);
        }

        let mut seen = HashSet::new();
        let mut previous_min = f64::NEG_INFINITY;
        for entry in &entries {
            validate_bounds(entry, entry.weight_min, entry.weight_max, "weight")?;
            validate_bounds(entry, entry.age_min_months, entry.age_max_months, "age")?;

            if !seen.insert(entry.size.as_str()) {
                return Err(SizeTableError::DuplicateSize(entry.size.clone()));
            }

            let min = entry.weight_min.unwrap_or(f64::NEG_INFINITY);
            if min < previous_min {
                return Err(SizeTableError::OutOfOrder { size: entry.size.clone() });
            }
            previous_min = min;
        }

        Ok(Self { entries })
    }

    /// The built-in table shipped with the application.
    pub fn default_table() -> Self {
        Self { entries: default_entries() }
    }

    pub fn entries(&self) -> &[SizeSuggestion] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks a row up by its size label, ignoring case.
    pub fn find(&self, size: &str) -> Option<&SizeSuggestion> {
        let size = size.trim();
        self.entries.iter().find(|entry| entry.size.eq_ignore_ascii_case(size))
    }

    /// Picks the best-fitting row for a weight and optional age.
    ///
    /// Returns `Ok(None)` when the weight is missing or NaN, which callers treat
    /// as "ask for more input".
    pub fn recommend(
        &self,
        weight_kg: Option<f64>,
        age_months: Option<f64>,
    ) -> Result<Option<Recommendation<'_>>, RecommendError> {
        let weight_kg = match weight_kg {
            Some(weight) if weight.is_nan() => return Ok(None),
            Some(weight) if weight.is_infinite() => return Err(RecommendError::NonFiniteWeight),
            Some(weight) => weight,
            None => return Ok(None),
        };
        if age_months.is_some_and(|age| !age.is_finite()) {
            return Err(RecommendError::NonFiniteAge);
        }

        let weight_matches: Vec<usize> = (0..self.entries.len())
            .filter(|&i| self.entries[i].fits_weight(weight_kg))
            .collect();

        let index = match weight_matches.as_slice() {
            [only] => *only,
            [] => self.closest_by_midpoint(0..self.entries.len(), weight_kg),
            many => {
                let age_matches: Vec<usize> = match age_months {
                    Some(age) => {
                        many.iter().copied().filter(|&i| self.entries[i].fits_age(age)).collect()
                    }
                    None => Vec::new(),
                };
                if age_matches.is_empty() {
                    self.closest_by_midpoint(many.iter().copied(), weight_kg)
                } else {
                    self.closest_by_midpoint(age_matches, weight_kg)
                }
            }
        };

        Ok(Some(self.neighbourhood(index)))
    }

    /// First index whose midpoint is strictly closer than every earlier one.
    fn closest_by_midpoint<I>(&self, candidates: I, weight_kg: f64) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        let mut candidates = candidates.into_iter();
        let Some(mut best) = candidates.next() else {
            return 0;
        };
        let mut best_distance = (weight_kg - self.entries[best].weight_midpoint()).abs();
        for i in candidates {
            let distance = (weight_kg - self.entries[i].weight_midpoint()).abs();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }

    fn neighbourhood(&self, index: usize) -> Recommendation<'_> {
        Recommendation {
            previous: index.checked_sub(1).and_then(|i| self.entries.get(i)),
            current: &self.entries[index],
            next: self.entries.get(index + 1),
        }
    }
}

impl Default for SizeTable {
    fn default() -> Self {
        Self::default_table()
    }
}

/// Free-function form of [`SizeTable::recommend`].
pub fn recommend(
    table: &SizeTable,
    weight_kg: Option<f64>,
    age_months: Option<f64>,
) -> Result<Option<Recommendation<'_>>, RecommendError> {
    table.recommend(weight_kg, age_months)
}

fn validate_bounds(
    entry: &SizeSuggestion,
    min: Option<f64>,
    max: Option<f64>,
    what: &str,
) -> Result<(), SizeTableError> {
    let invalid = |reason: String| SizeTableError::InvalidEntry {
        size: entry.size.clone(),
        reason,
    };
    if min.is_some_and(f64::is_nan) || max.is_some_and(f64::is_nan) {
        return Err(invalid(format!("{what} bounds must be numbers")));
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(invalid(format!("{what} minimum {min} exceeds maximum {max}")));
        }
    }
    Ok(())
}

//=========================================================================================
// Age
//=========================================================================================

/// Whole months elapsed from `dob` to `today`, never negative.
pub fn age_in_months(dob: NaiveDate, today: NaiveDate) -> u32 {
    let years = today.year() - dob.year();
    let mut months = years * 12 + today.month() as i32 - dob.month() as i32;
    if today.day() < dob.day() {
        months -= 1;
    }
    months.max(0) as u32
}

//=========================================================================================
// Built-in Table
//=========================================================================================

fn row(
    size: &str,
    weight_range: &str,
    avg_usage: &str,
    age_range: &str,
    per_box: &str,
    weight: (f64, f64),
    age: (f64, f64),
) -> SizeSuggestion {
    SizeSuggestion {
        size: size.to_string(),
        weight_min: Some(weight.0),
        weight_max: Some(weight.1),
        age_min_months: Some(age.0),
        age_max_months: Some(age.1),
        weight_range: weight_range.to_string(),
        avg_usage: avg_usage.to_string(),
        age_range: age_range.to_string(),
        per_box: per_box.to_string(),
    }
}

fn default_entries() -> Vec<SizeSuggestion> {
    let inf = f64::INFINITY;
    vec![
        row("NB", "Up to 4.54 kg", "10-12", "0-1.5 mo", "76", (0.0, 4.54), (0.0, 1.5)),
        row("1", "3.63-6.35 kg", "8-10", "1-4 mo", "82", (3.63, 6.35), (1.0, 4.0)),
        row("2", "5.44-8.16 kg", "8-9", "3-8 mo", "74", (5.44, 8.16), (3.0, 8.0)),
        row("3", "7.26-12.70 kg", "6-7", "5-24 mo", "66", (7.26, 12.7), (5.0, 24.0)),
        row("4", "9.98-16.78 kg", "5-7", "18-36 mo", "58", (9.98, 16.78), (18.0, 36.0)),
        row("5", "12.25+ kg", "3-5", "2-3 yr", "48", (12.25, inf), (24.0, 36.0)),
        row("6", "12.25+ kg", "3-5", "2.5-3 yr", "42", (12.25, inf), (30.0, inf)),
    ]
}

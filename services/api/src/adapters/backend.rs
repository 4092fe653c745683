//! services/api/src/adapters/backend.rs
//!
//! This module contains the backend adapter, which is the concrete implementation
//! of the `BackendService` port from the `core` crate. It talks to the REST
//! backend that owns babies, reminders and products using `reqwest`.

use crate::timestamps;
use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime};
use nestuity_core::domain::{
    BabyId, BabyProduct, BabyProfile, Frequency, PriceHistoryItem, ProductId, ReminderRange,
    ReminderRecord, ReminderType,
};
use nestuity_core::ports::{BackendService, PortError, PortResult};
use nestuity_core::schedule::tag_range;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A backend adapter that implements the `BackendService` port over HTTP.
#[derive(Clone)]
pub struct HttpBackendAdapter {
    client: Client,
    base_url: String,
}

impl HttpBackendAdapter {
    /// Creates a new `HttpBackendAdapter` for the backend rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> PortResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PortError::NotFound(what.to_string()));
        }
        let response = response
            .error_for_status()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        response
            .json::<T>()
            .await
            .map_err(|e| PortError::InvalidResponse(e.to_string()))
    }
}

//=========================================================================================
// "Impure" Backend Record Structs
//=========================================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReminderJson {
    id: i64,
    baby_id: Option<i64>,
    #[serde(rename = "type")]
    kind: Option<String>,
    frequency: Option<String>,
    range: Option<String>,
    title: Option<String>,
    description: Option<String>,
    #[serde(default, deserialize_with = "timestamps::lenient")]
    completed_on: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamps::lenient")]
    next_due: Option<NaiveDateTime>,
    #[serde(default)]
    user_created: bool,
}

impl ReminderJson {
    /// Converts to the domain record. A missing range is derived from `next_due`
    /// relative to `today`; with no due date either, the range stays unrecognized.
    fn to_domain(self, today: NaiveDate) -> ReminderRecord {
        let range = match (self.range.as_deref(), self.next_due) {
            (Some(tag), _) => ReminderRange::from_tag(tag),
            (None, Some(next_due)) => tag_range(
                next_due.date(),
                self.completed_on.map(|c| c.date()),
                self.user_created,
                today,
            ),
            (None, None) => ReminderRange::Unrecognized,
        };

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
            range,
            title: self.title.unwrap_or_default(),
            description: self.description,
            completed_on: self.completed_on,
            next_due: self.next_due,
            user_created: self.user_created,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BabyJson {
    id: i64,
    name: Option<String>,
    weight: Option<f64>,
    diaper_size: Option<String>,
    dob: Option<String>,
    daily_usage: Option<i64>,
}

impl BabyJson {
    fn to_domain(self) -> BabyProfile {
        let dob = self.dob.as_deref().and_then(|raw| {
            let parsed = parse_dob(raw);
            if parsed.is_none() {
                warn!("Ignoring unreadable date of birth '{}' for baby {}", raw, self.id);
            }
            parsed
        });

        BabyProfile {
            id: self.id,
            name: self.name.unwrap_or_default(),
            dob,
            weight_kg: self.weight,
            diaper_size: self.diaper_size,
            daily_usage: self.daily_usage.and_then(|n| u32::try_from(n).ok()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceHistoryJson {
    retailer: Option<String>,
    product_url: Option<String>,
    price: Option<f64>,
    #[serde(default, deserialize_with = "timestamps::lenient")]
    date: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductJson {
    id: i64,
    name: Option<String>,
    brand: Option<String>,
    currency: Option<String>,
    #[serde(default)]
    price_history: Vec<PriceHistoryJson>,
}

impl ProductJson {
    /// Entries without a retailer or a finite price cannot be compared and are skipped.
    fn to_domain(self) -> BabyProduct {
        let total = self.price_history.len();
        let price_history: Vec<PriceHistoryItem> = self
            .price_history
            .into_iter()
            .filter_map(|entry| {
                let retailer = entry.retailer.filter(|r| !r.trim().is_empty())?;
                let price = entry.price.filter(|p| p.is_finite())?;
                Some(PriceHistoryItem {
                    retailer,
                    product_url: entry.product_url,
                    price,
                    date: entry.date,
                })
            })
            .collect();
        if price_history.len() < total {
            warn!(
                "Skipped {} unusable price entries for product {}",
                total - price_history.len(),
                self.id
            );
        }

        BabyProduct {
            id: self.id,
            name: self.name.unwrap_or_default(),
            brand: self.brand,
            currency: self.currency,
            price_history,
        }
    }
}

/// Reads the leading `YYYY-MM-DD` of a date or date-time string.
fn parse_dob(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

//=========================================================================================
// `BackendService` Trait Implementation
//=========================================================================================

#[async_trait]
impl BackendService for HttpBackendAdapter {
    async fn upcoming_reminders(&self, baby_id: BabyId) -> PortResult<Vec<ReminderRecord>> {
        let records: Vec<ReminderJson> = self
            .get_json(
                &format!("/api/reminders/baby/{}/upcoming", baby_id),
                &format!("Reminders for baby {}", baby_id),
            )
            .await?;

        let today = Local::now().date_naive();
        Ok(records.into_iter().map(|r| r.to_domain(today)).collect())
    }

    async fn baby_profile(&self, baby_id: BabyId) -> PortResult<BabyProfile> {
        let record: BabyJson = self
            .get_json(
                &format!("/api/babies/{}", baby_id),
                &format!("Baby {}", baby_id),
            )
            .await?;
        Ok(record.to_domain())
    }

    async fn baby_product(&self, product_id: ProductId) -> PortResult<BabyProduct> {
        let record: ProductJson = self
            .get_json(
                &format!("/api/baby-products/{}", product_id),
                &format!("Product {}", product_id),
            )
            .await?;
        Ok(record.to_domain())
    }
}

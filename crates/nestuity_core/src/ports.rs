//! crates/nestuity_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core expects from the outside world.
//! The backend that stores babies, reminders and products is reached only through these
//! traits, so the core stays independent of any transport.

use crate::domain::{BabyId, BabyProduct, BabyProfile, ProductId, ReminderRecord};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("The backend returned data that could not be read: {0}")]
    InvalidResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait BackendService: Send + Sync {
    /// Upcoming reminders for a baby, with `range` computed relative to request time.
    async fn upcoming_reminders(&self, baby_id: BabyId) -> PortResult<Vec<ReminderRecord>>;

    /// The stored profile for a baby.
    async fn baby_profile(&self, baby_id: BabyId) -> PortResult<BabyProfile>;

    /// A tracked product with its full price history.
    async fn baby_product(&self, product_id: ProductId) -> PortResult<BabyProduct>;
}

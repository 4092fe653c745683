//! services/api/src/lib.rs
//!
//! HTTP service exposing the reminder classifier, size recommender, usage
//! projection and price summaries from `nestuity_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod timestamps;
pub mod web;

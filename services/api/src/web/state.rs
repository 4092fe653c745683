//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use nestuity_core::ports::BackendService;
use nestuity_core::sizing::SizeTable;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// The size table is loaded and validated before the state is built and is never
/// mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn BackendService>,
    pub size_table: Arc<SizeTable>,
}

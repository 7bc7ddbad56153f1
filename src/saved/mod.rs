//! Owner-scoped saved searches, re-executed live against the current index
//! and the caller's current permissions rather than a frozen result set.

mod manager;
mod store;

pub use manager::{CreateSavedSearch, SavedSearchManager, UpdateSavedSearch};
pub use store::{InMemorySavedSearchStore, SavedSearch, SavedSearchStore};

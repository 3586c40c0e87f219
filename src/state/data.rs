/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the gallery state machine and the UI layer.

use super::category::Category;

/// A single numbered image on the CDN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Sequence id, 1-based
    pub id: u32,
    /// Full URL: `{base_url}/{id}.jpg`
    pub url: String,
}

impl ImageRef {
    pub fn new(category: Category, id: u32) -> Self {
        Self {
            id,
            url: format!("{}/{}.jpg", category.base_url(), id),
        }
    }
}

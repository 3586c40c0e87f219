/// State management module
///
/// This module handles all gallery state, including:
/// - The category table and CDN mapping (category.rs)
/// - Shared data structures (data.rs)
/// - The remote count table and its fallback (counts.rs)
/// - The paginated gallery session (gallery.rs)

pub mod category;
pub mod counts;
pub mod data;
pub mod gallery;

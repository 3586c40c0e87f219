/// User interface module
///
/// - `selector.rs` - category buttons
/// - `masonry.rs` - round-robin column layout of the image tiles
/// - `sentinel.rs` - trailing marker that requests the next page
/// - `lightbox.rs` - full-size overlay with navigation

pub mod lightbox;
pub mod masonry;
pub mod selector;
pub mod sentinel;

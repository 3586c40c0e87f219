/// Paginated gallery session
///
/// A session belongs to one category. It waits for the total count to be
/// resolved, then grows its image list one page at a time. The list is
/// always the prefix `1..=len` of `1..=total`.

use std::ops::RangeInclusive;

use super::category::Category;
use super::data::ImageRef;

/// Number of images appended per page
pub const IMAGES_PER_PAGE: u32 = 20;

/// A page that has been started but not yet committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Ids this page covers (clipped to the total count)
    pub ids: RangeInclusive<u32>,
}

/// State of one gallery session
#[derive(Debug, Clone)]
pub struct GallerySession {
    category: Category,
    /// Identifies this session; async results carrying another value are stale
    generation: u64,
    images: Vec<ImageRef>,
    /// Next page to load, starting at 1
    page: u32,
    /// Total count, `None` until resolved
    total: Option<u32>,
    loading: bool,
    initial_load_done: bool,
}

impl GallerySession {
    pub fn new(category: Category, generation: u64) -> Self {
        Self {
            category,
            generation,
            images: Vec::new(),
            page: 1,
            total: None,
            loading: false,
            initial_load_done: false,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    #[cfg(test)]
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total(&self) -> Option<u32> {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_count_resolved(&self) -> bool {
        self.total.is_some()
    }

    /// Record the total count. Only the first resolution is kept.
    pub fn resolve_count(&mut self, count: u32) {
        if self.total.is_none() {
            self.total = Some(count);
        }
    }

    /// Returns true exactly once per session, after the count is resolved,
    /// so the caller can kick off the first page.
    pub fn take_initial_load(&mut self) -> bool {
        if self.is_count_resolved() && !self.initial_load_done {
            self.initial_load_done = true;
            true
        } else {
            false
        }
    }

    /// Every image up to the total count has been appended
    pub fn is_complete(&self) -> bool {
        match self.total {
            Some(total) => self.images.len() as u64 >= u64::from(total),
            None => false,
        }
    }

    /// Start loading the next page.
    ///
    /// Returns `None` (and changes nothing) when a page is already in
    /// flight, the count is unresolved, or every image has been loaded.
    pub fn begin_page(&mut self) -> Option<PageRequest> {
        if self.loading {
            return None;
        }
        let total = self.total?;

        // Widened so a huge remote count cannot overflow the page arithmetic
        let start = u64::from(self.page.saturating_sub(1)) * u64::from(IMAGES_PER_PAGE) + 1;
        if start > u64::from(total) {
            return None;
        }
        let end = (u64::from(self.page) * u64::from(IMAGES_PER_PAGE)).min(u64::from(total));
        let (start, end) = (u32::try_from(start).ok()?, u32::try_from(end).ok()?);

        self.loading = true;
        Some(PageRequest {
            page: self.page,
            ids: start..=end,
        })
    }

    /// Commit a page started with `begin_page`.
    ///
    /// Returns the newly appended images, or `None` if the request does not
    /// match the page in flight.
    pub fn complete_page(&mut self, request: &PageRequest) -> Option<&[ImageRef]> {
        if !self.loading || request.page != self.page {
            return None;
        }

        let category = self.category;
        let first_new = self.images.len();
        self.images
            .extend(request.ids.clone().map(|id| ImageRef::new(category, id)));
        self.page = self.page.saturating_add(1);
        self.loading = false;

        Some(&self.images[first_new..])
    }

    /// Begin and commit a page in one step
    #[cfg(test)]
    pub fn load_next_page(&mut self) -> Option<&[ImageRef]> {
        let request = self.begin_page()?;
        self.complete_page(&request)
    }

    /// Text shown under the grid
    pub fn status_line(&self) -> String {
        if self.loading {
            "Loading…".to_string()
        } else if self.is_complete() {
            format!("All {} images loaded", self.total.unwrap_or_default())
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(session: &GallerySession) -> Vec<u32> {
        session.images().iter().map(|image| image.id).collect()
    }

    #[test]
    fn test_no_page_before_count_resolved() {
        let mut session = GallerySession::new(Category::Horizontal, 1);
        assert!(session.load_next_page().is_none());
        assert!(session.images().is_empty());
        assert!(!session.take_initial_load());
    }

    #[test]
    fn test_first_two_pages() {
        let mut session = GallerySession::new(Category::Horizontal, 1);
        session.resolve_count(788);

        let first: Vec<u32> = session.load_next_page().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(first, (1..=20).collect::<Vec<_>>());

        let second: Vec<u32> = session.load_next_page().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(second, (21..=40).collect::<Vec<_>>());
        assert_eq!(session.page(), 3);
    }

    #[test]
    fn test_horizontal_fallback_runs_to_completion() {
        let mut session = GallerySession::new(Category::Horizontal, 1);
        session.resolve_count(Category::Horizontal.fallback_count());

        for _ in 0..39 {
            assert!(session.load_next_page().is_some());
        }
        assert!(!session.is_complete());

        let last: Vec<u32> = session.load_next_page().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(last, (781..=788).collect::<Vec<_>>());
        assert!(session.is_complete());
        assert_eq!(session.status_line(), "All 788 images loaded");

        assert!(session.load_next_page().is_none());
        assert!(session.load_next_page().is_none());
        assert_eq!(session.images().len(), 788);
    }

    #[test]
    fn test_prefix_invariant_for_every_category() {
        for category in Category::ALL {
            let mut session = GallerySession::new(category, 1);
            let total = category.fallback_count();
            session.resolve_count(total);

            for n in 1..=5u32 {
                session.load_next_page();
                let expected: Vec<u32> = (1..=(n * IMAGES_PER_PAGE).min(total)).collect();
                assert_eq!(ids(&session), expected, "category {}", category);
            }
        }
    }

    #[test]
    fn test_begin_while_loading_is_noop() {
        let mut session = GallerySession::new(Category::Mia, 1);
        session.resolve_count(248);

        let request = session.begin_page().unwrap();
        assert!(session.is_loading());
        assert_eq!(session.status_line(), "Loading…");
        assert!(session.begin_page().is_none());
        assert!(session.load_next_page().is_none());

        assert_eq!(session.complete_page(&request).map(|p| p.len()), Some(20));
        assert!(!session.is_loading());
        assert_eq!(ids(&session), (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_stale_request_is_rejected() {
        let mut session = GallerySession::new(Category::Mia, 1);
        session.resolve_count(248);

        let request = session.begin_page().unwrap();
        assert!(session.complete_page(&request).is_some());
        // Same request a second time must not duplicate ids
        assert!(session.complete_page(&request).is_none());
        assert_eq!(session.images().len(), 20);
    }

    #[test]
    fn test_count_below_one_page() {
        let mut session = GallerySession::new(Category::Avatar, 1);
        session.resolve_count(7);
        assert_eq!(session.load_next_page().map(|p| p.len()), Some(7));
        assert!(session.is_complete());
        assert!(session.load_next_page().is_none());
    }

    #[test]
    fn test_zero_count_is_complete_immediately() {
        let mut session = GallerySession::new(Category::Avatar, 1);
        session.resolve_count(0);
        assert!(session.is_complete());
        assert!(session.begin_page().is_none());
        assert_eq!(session.status_line(), "All 0 images loaded");
    }

    #[test]
    fn test_initial_load_fires_once() {
        let mut session = GallerySession::new(Category::Vertical, 1);
        session.resolve_count(995);
        assert!(session.take_initial_load());
        assert!(!session.take_initial_load());
    }

    #[test]
    fn test_last_page_near_u32_max() {
        let mut session = GallerySession::new(Category::Avatar, 1);
        session.resolve_count(u32::MAX);
        session.page = u32::MAX / IMAGES_PER_PAGE + 1;

        let request = session.begin_page().unwrap();
        assert_eq!(request.ids, (u32::MAX - 14)..=u32::MAX);
        assert_eq!(session.complete_page(&request).map(|p| p.len()), Some(15));
        assert!(session.begin_page().is_none());
    }

    #[test]
    fn test_first_resolution_wins() {
        let mut session = GallerySession::new(Category::Vertical, 1);
        session.resolve_count(995);
        session.resolve_count(3);
        assert_eq!(session.total(), Some(995));
    }
}

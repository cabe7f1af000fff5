/// Fixed-size pagination shared by every feed.
///
/// Out-of-range requests are clamped instead of rejected: a missing or
/// non-numeric page means page 1, and a page past either end resolves to the
/// last page.
use serde::{Deserialize, Serialize};

/// Number of posts on one page of any feed
pub const PAGE_SIZE: i64 = 10;

/// `?page=` query parameter as sent by the client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref())
    }
}

/// Requested page number before it is clamped against the result size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest(i64);

impl PageRequest {
    pub fn new(number: i64) -> Self {
        Self(number)
    }

    pub fn first() -> Self {
        Self(1)
    }

    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<i64>().ok())
            .map(Self)
            .unwrap_or_else(Self::first)
    }

    pub fn number(&self) -> i64 {
        self.0
    }
}

/// Resolved window into an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub total_count: i64,
}

impl PageWindow {
    pub fn resolve(request: PageRequest, total_count: i64) -> Self {
        let num_pages = num_pages(total_count);
        let requested = request.number();
        let number = if requested < 1 || requested > num_pages {
            num_pages
        } else {
            requested
        };

        Self {
            number,
            num_pages,
            total_count,
        }
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * PAGE_SIZE
    }

    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            total_count: self.total_count,
            has_next: self.number < self.num_pages,
            has_previous: self.number > 1,
        }
    }
}

/// An empty result set still has one (empty) page.
fn num_pages(total_count: i64) -> i64 {
    if total_count <= 0 {
        1
    } else {
        (total_count + PAGE_SIZE - 1) / PAGE_SIZE
    }
}

/// One page of an ordered result set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub total_count: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_garbage_page_means_first() {
        assert_eq!(PageRequest::parse(None).number(), 1);
        assert_eq!(PageRequest::parse(Some("abc")).number(), 1);
        assert_eq!(PageRequest::parse(Some("")).number(), 1);
        assert_eq!(PageRequest::parse(Some(" 3 ")).number(), 3);
    }

    #[test]
    fn page_past_the_end_is_clamped_to_last() {
        let window = PageWindow::resolve(PageRequest::new(99), 13);
        assert_eq!(window.number, 2);
        assert_eq!(window.num_pages, 2);
        assert_eq!(window.offset(), 10);
    }

    #[test]
    fn non_positive_page_resolves_to_last() {
        let window = PageWindow::resolve(PageRequest::new(0), 25);
        assert_eq!(window.number, 3);

        let window = PageWindow::resolve(PageRequest::new(-4), 25);
        assert_eq!(window.number, 3);
    }

    #[test]
    fn empty_result_has_single_empty_page() {
        let window = PageWindow::resolve(PageRequest::new(5), 0);
        assert_eq!(window.number, 1);
        assert_eq!(window.offset(), 0);

        let page = window.into_page(Vec::<i64>::new());
        assert!(page.is_empty());
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let window = PageWindow::resolve(PageRequest::new(2), 20);
        assert_eq!(window.num_pages, 2);

        let page = window.into_page(vec![0; 10]);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }
}

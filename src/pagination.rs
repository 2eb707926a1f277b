//! Page/perPage handling for question listings.
//!
//! Pages are 1-indexed. A request for page 0, an empty page size, or a page
//! past the last one is reported as [`PageOutOfRange`].

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("page {page} with {per_page} items per page is outside limits")]
pub struct PageOutOfRange {
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Missing values fall back to page 1 and `default_per_page`; the page size
    /// is capped at `max_per_page`.
    pub fn new(
        page: Option<i64>,
        per_page: Option<i64>,
        default_per_page: i64,
        max_per_page: i64,
    ) -> Result<Self, PageOutOfRange> {
        let page = page.unwrap_or(1);
        let per_page = per_page.unwrap_or(default_per_page);
        if page < 1 || per_page < 1 {
            return Err(PageOutOfRange { page, per_page });
        }
        Ok(Self {
            page,
            per_page: per_page.min(max_per_page.max(1)),
        })
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Wraps a fetched page, rejecting pages past the end. The first page is
    /// always valid, even when there is nothing to show.
    pub fn into_page<T>(self, items: Vec<T>, total: i64) -> Result<Page<T>, PageOutOfRange> {
        if items.is_empty() && self.page > 1 {
            return Err(PageOutOfRange {
                page: self.page,
                per_page: self.per_page,
            });
        }
        Ok(Page {
            items,
            total,
            page: self.page,
            per_page: self.per_page,
        })
    }
}

#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

impl<T> Page<T> {
    /// Number of pages, 0 when there are no items at all.
    pub fn pages(&self) -> i64 {
        page_count(self.total, self.per_page)
    }
}

pub fn page_count(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        0
    } else {
        (total + per_page - 1) / per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_missing() {
        let request = PageRequest::new(None, None, 10, 100).unwrap();
        assert_eq!(request, PageRequest { page: 1, per_page: 10 });
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let request = PageRequest::new(Some(3), Some(7), 10, 100).unwrap();
        assert_eq!(request.limit(), 7);
        assert_eq!(request.offset(), 14);
    }

    #[test]
    fn page_size_is_capped() {
        let request = PageRequest::new(Some(1), Some(5000), 10, 100).unwrap();
        assert_eq!(request.per_page, 100);
    }

    #[test]
    fn non_positive_values_are_rejected() {
        assert!(PageRequest::new(Some(0), None, 10, 100).is_err());
        assert!(PageRequest::new(Some(-2), None, 10, 100).is_err());
        assert!(PageRequest::new(None, Some(0), 10, 100).is_err());
    }

    #[test]
    fn empty_page_past_the_end_is_rejected() {
        let request = PageRequest::new(Some(300), None, 10, 100).unwrap();
        let err = request.into_page(Vec::<i64>::new(), 40).unwrap_err();
        assert_eq!(err, PageOutOfRange { page: 300, per_page: 10 });
    }

    #[test]
    fn empty_first_page_is_fine() {
        let request = PageRequest::new(None, None, 10, 100).unwrap();
        let page = request.into_page(Vec::<i64>::new(), 0).unwrap();
        assert_eq!(page.pages(), 0);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(40, 10), 4);
        assert_eq!(page_count(41, 10), 5);
        assert_eq!(page_count(40, 3), 14);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(0, 10), 0);
    }
}

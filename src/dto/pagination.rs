use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 1-based page number resolved against the configured page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, per_page: i64) -> Result<Self> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(Error::NotFound("Invalid page.".into()));
        }
        Ok(Self {
            page,
            per_page: per_page.max(1),
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// An empty collection still has one (empty) page.
    pub fn total_pages(&self, count: i64) -> i64 {
        ((count + self.per_page - 1) / self.per_page).max(1)
    }

    pub fn ensure_in_range(&self, count: i64) -> Result<()> {
        if self.page > self.total_pages(count) {
            return Err(Error::NotFound("Invalid page.".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub page: i64,
    pub total_pages: i64,
    pub next: Option<i64>,
    pub previous: Option<i64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, request: PageRequest) -> Self {
        let total_pages = request.total_pages(count);
        Self {
            count,
            page: request.page,
            total_pages,
            next: (request.page < total_pages).then_some(request.page + 1),
            previous: (request.page > 1).then_some(request.page - 1),
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            total_pages: self.total_pages,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_of_three_pages() {
        let request = PageRequest::new(None, 10).unwrap();
        let page = Page::new(vec![1; 10], 25, request);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.next, Some(2));
        assert_eq!(page.previous, None);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn last_page_has_no_next() {
        let request = PageRequest::new(Some(3), 10).unwrap();
        let page = Page::new(vec![1; 5], 25, request);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, Some(2));
        assert_eq!(request.offset(), 20);
    }

    #[test]
    fn out_of_range_pages_are_not_found() {
        assert!(PageRequest::new(Some(0), 10).is_err());
        let request = PageRequest::new(Some(4), 10).unwrap();
        assert!(request.ensure_in_range(25).is_err());
        assert!(PageRequest::new(Some(1), 10)
            .unwrap()
            .ensure_in_range(0)
            .is_ok());
    }
}

//! Page-number pagination

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
};

/// A resolved page window: 1-based page number and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Apply defaults and bounds to the raw `page` / `page_size` parameters.
    ///
    /// A page that is not an integer of at least 1 is rejected. A page size
    /// that is unparseable or non-positive falls back to the default and an
    /// oversized one is capped.
    pub fn resolve(
        page: Option<&str>,
        page_size: Option<&str>,
        config: &PaginationConfig,
    ) -> AppResult<Self> {
        let page = match page.map(str::trim).filter(|p| !p.is_empty()) {
            None => 1,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| AppError::BadRequest("Invalid page.".to_string()))?,
        };

        let page_size = match page_size.and_then(|s| s.trim().parse::<i64>().ok()) {
            Some(size) if size > 0 => size.min(config.max_page_size),
            _ => config.default_page_size,
        };

        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// A page of results together with the total match count
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub count: i64,
    pub request: PageRequest,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.request.page.saturating_mul(self.request.page_size) < self.count
    }

    pub fn has_previous(&self) -> bool {
        self.request.page > 1
    }

    /// Link to the following page, if any
    pub fn next_link(&self, path: &str, query: Option<&str>) -> Option<String> {
        self.has_next()
            .then(|| page_link(path, query, Some(self.request.page + 1)))
    }

    /// Link to the preceding page, if any. Page 1 is addressed without `page`.
    pub fn previous_link(&self, path: &str, query: Option<&str>) -> Option<String> {
        self.has_previous().then(|| {
            let previous = self.request.page - 1;
            page_link(path, query, (previous > 1).then_some(previous))
        })
    }
}

/// Slice an ordered sequence to the requested page.
///
/// A page past the end yields no items; the count is always the full length.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Paginated<T> {
    let count = items.len() as i64;
    let start = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let size = usize::try_from(request.limit()).unwrap_or(usize::MAX);

    let items = items.into_iter().skip(start).take(size).collect();

    Paginated {
        items,
        count,
        request,
    }
}

/// Rebuild `path?query` with only the `page` pair replaced.
///
/// Other pairs are kept verbatim, so their encoding is preserved.
fn page_link(path: &str, query: Option<&str>, page: Option<i64>) -> String {
    let mut pairs: Vec<String> = query
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some("page"))
        .map(str::to_string)
        .collect();

    if let Some(page) = page {
        pairs.push(format!("page={}", page));
    }

    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, pairs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: i64, page_size: i64) -> PageRequest {
        PageRequest { page, page_size }
    }

    #[test]
    fn test_resolve_defaults() {
        let config = PaginationConfig::default();
        assert_eq!(
            PageRequest::resolve(None, None, &config).unwrap(),
            request(1, 10)
        );
    }

    #[test]
    fn test_resolve_page_size_bounds() {
        let config = PaginationConfig::default();
        assert_eq!(
            PageRequest::resolve(Some("2"), Some("5"), &config).unwrap(),
            request(2, 5)
        );
        assert_eq!(
            PageRequest::resolve(None, Some("0"), &config).unwrap(),
            request(1, 10)
        );
        assert_eq!(
            PageRequest::resolve(None, Some("1000"), &config).unwrap(),
            request(1, 100)
        );
    }

    #[test]
    fn test_resolve_unparseable_page_size_uses_default() {
        let config = PaginationConfig::default();
        for raw in ["abc", "", "2.5"] {
            assert_eq!(
                PageRequest::resolve(Some("3"), Some(raw), &config).unwrap(),
                request(3, 10),
                "page_size={:?}",
                raw
            );
        }
    }

    #[test]
    fn test_resolve_rejects_bad_page() {
        let config = PaginationConfig::default();
        for raw in ["0", "-1", "abc"] {
            assert!(matches!(
                PageRequest::resolve(Some(raw), None, &config),
                Err(AppError::BadRequest(_))
            ));
        }
        assert_eq!(
            PageRequest::resolve(Some(""), None, &config).unwrap(),
            request(1, 10)
        );
    }

    #[test]
    fn test_paginate_second_page() {
        let page = paginate((1..=15).collect::<Vec<_>>(), request(2, 10));
        assert_eq!(page.items, vec![11, 12, 13, 14, 15]);
        assert_eq!(page.count, 15);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_paginate_past_the_end_is_empty() {
        let page = paginate((1..=15).collect::<Vec<_>>(), request(4, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.count, 15);
    }

    #[test]
    fn test_links_keep_other_parameters() {
        let page = paginate((1..=30).collect::<Vec<_>>(), request(2, 10));
        let query = Some("author=Test%20Author&page=2");

        assert_eq!(
            page.next_link("/books/", query).as_deref(),
            Some("/books/?author=Test%20Author&page=3")
        );
        assert_eq!(
            page.previous_link("/books/", query).as_deref(),
            Some("/books/?author=Test%20Author")
        );
    }

    #[test]
    fn test_first_page_links() {
        let page = paginate((1..=5).collect::<Vec<_>>(), request(1, 10));
        assert_eq!(page.next_link("/books/", None), None);
        assert_eq!(page.previous_link("/books/", None), None);
    }
}

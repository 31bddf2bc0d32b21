//! Paged responses from the booking API.

use serde::{Deserialize, Serialize};

/// A page of results plus paging metadata.
///
/// `page` is 1-indexed, matching the `page` query parameter the API accepts.
/// Payloads that only carry a 0-based `number` are shifted on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    from = "PagedWire<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct PagedResponse<T> {
    /// The items on this page.
    pub content: Vec<T>,
    /// Current page (1-indexed).
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Total number of items across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

/// Wire shape of a page, accepting both 1-based `page` and 0-based `number`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedWire<T> {
    #[serde(default = "Vec::new")]
    content: Vec<T>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    number: Option<u32>,
    #[serde(alias = "limit", default)]
    size: u32,
    #[serde(alias = "total", default)]
    total_elements: u64,
    #[serde(default)]
    total_pages: u32,
}

impl<T> From<PagedWire<T>> for PagedResponse<T> {
    fn from(wire: PagedWire<T>) -> Self {
        let page = wire
            .page
            .or_else(|| wire.number.map(|n| n.saturating_add(1)))
            .unwrap_or(1)
            .max(1);
        Self {
            content: wire.content,
            page,
            size: wire.size,
            total_elements: wire.total_elements,
            total_pages: wire.total_pages,
        }
    }
}

impl<T> PagedResponse<T> {
    /// Create a page, deriving the page count from the totals.
    pub fn new(content: Vec<T>, page: u32, size: u32, total_elements: u64) -> Self {
        let total_pages = if total_elements == 0 || size == 0 {
            1
        } else {
            total_elements.div_ceil(size as u64) as u32
        };

        Self {
            content,
            page: page.max(1),
            size,
            total_elements,
            total_pages,
        }
    }

    /// Create an empty first page.
    pub fn empty(size: u32) -> Self {
        Self::new(Vec::new(), 1, size, 0)
    }

    /// Whether there's a next page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Get start item number (1-indexed).
    pub fn start_item(&self) -> u64 {
        if self.total_elements == 0 {
            0
        } else {
            (self.page as u64).saturating_sub(1) * self.size as u64 + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> u64 {
        (self.start_item() + self.content.len() as u64)
            .saturating_sub(1)
            .min(self.total_elements)
    }

    /// Keep only the items `f` turns into `Some`, leaving the totals untouched.
    pub fn filter_map<U, F: FnMut(T) -> Option<U>>(self, f: F) -> PagedResponse<U> {
        PagedResponse {
            content: self.content.into_iter().filter_map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_computes_total_pages() {
        let page = PagedResponse::new(vec![1, 2, 3], 1, 3, 10);
        assert_eq!(page.total_pages, 4);
        assert!(page.has_next());
        assert!(!page.has_prev());
    }

    #[test]
    fn test_empty_page() {
        let page: PagedResponse<u8> = PagedResponse::empty(10);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.start_item(), 0);
        assert_eq!(page.end_item(), 0);
        assert!(!page.has_next());
    }

    #[test]
    fn test_item_range_on_last_page() {
        let page = PagedResponse::new(vec!['a', 'b'], 3, 4, 10);
        assert_eq!(page.start_item(), 9);
        assert_eq!(page.end_item(), 10);
        assert!(page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_deserialize_wire_aliases() {
        let json = r#"{"content":[1,2],"page":2,"limit":2,"total":6,"totalPages":3}"#;
        let page: PagedResponse<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.size, 2);
        assert_eq!(page.total_elements, 6);
        assert_eq!(page.content, vec![1, 2]);
    }

    #[test]
    fn test_zero_based_number_is_shifted() {
        let json = r#"{"number":0,"size":2,"totalElements":6,"totalPages":3}"#;
        let page: PagedResponse<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 1);
        assert!(!page.has_prev());
        assert!(page.has_next());
        assert_eq!(page.start_item(), 1);
        assert!(page.content.is_empty());
    }

    #[test]
    fn test_page_wins_over_number_and_zero_is_floored() {
        let both: PagedResponse<u32> =
            serde_json::from_str(r#"{"page":2,"number":1,"size":2,"totalElements":6}"#).unwrap();
        assert_eq!(both.page, 2);

        let zero: PagedResponse<u32> =
            serde_json::from_str(r#"{"page":0,"size":2,"totalElements":6}"#).unwrap();
        assert_eq!(zero.page, 1);
    }

    #[test]
    fn test_item_range_never_underflows() {
        let mut page = PagedResponse::new(vec![1], 1, 5, 3);
        page.page = 0;
        assert_eq!(page.start_item(), 1);
    }

    #[test]
    fn test_filter_map_keeps_totals() {
        let page = PagedResponse::new(vec![1, 2, 3, 4], 1, 4, 40);
        let evens = page.filter_map(|n| (n % 2 == 0).then_some(n));
        assert_eq!(evens.content, vec![2, 4]);
        assert_eq!(evens.total_elements, 40);
    }
}

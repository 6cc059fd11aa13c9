//! Pagination: the page envelope, the array-or-page listing shape, and the
//! `page`/`size` query parameters.

use serde::{Deserialize, Serialize};

/// Paginated list response.
///
/// Metadata fields default when a service omits them; `content` is
/// required so that an arbitrary object is never mistaken for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            size: 0,
            number: 0,
            first: true,
            last: true,
        }
    }
}

impl<T> Page<T> {
    /// Wrap a complete list as a single page.
    pub fn single(content: Vec<T>) -> Self {
        let len = content.len();
        Self {
            total_elements: u64::try_from(len).unwrap_or(u64::MAX),
            total_pages: u32::from(len > 0),
            size: u32::try_from(len).unwrap_or(u32::MAX),
            number: 0,
            first: true,
            last: true,
            content,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether a following page exists.
    pub fn has_next(&self) -> bool {
        !self.last && self.number.saturating_add(1) < self.total_pages
    }
}

/// A list endpoint's body: either a raw JSON array or a [`Page`].
///
/// Some services changed shape between versions; callers that accept both
/// normalize through [`into_vec`](Self::into_vec) or
/// [`into_page`](Self::into_page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    List(Vec<T>),
    Page(Page<T>),
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::List(items) => items,
            Self::Page(page) => page.content,
        }
    }

    pub fn into_page(self) -> Page<T> {
        match self {
            Self::List(items) => Page::single(items),
            Self::Page(page) => page,
        }
    }
}

/// Zero-based page selection sent as `page` and `size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 20 }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// The next page with the same size.
    pub fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self
        }
    }

    pub(crate) fn to_query(self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("size", self.size.to_string())]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn raw_array_and_page_normalize_to_the_same_list() {
        let raw: Listing<String> = serde_json::from_value(json!(["a", "b"])).unwrap();
        let paged: Listing<String> = serde_json::from_value(json!({
            "content": ["a", "b"],
            "totalElements": 2,
            "totalPages": 1,
            "size": 20,
            "number": 0,
            "first": true,
            "last": true
        }))
        .unwrap();

        assert_eq!(raw.into_vec(), paged.into_vec());
    }

    #[test]
    fn raw_array_becomes_a_single_page() {
        let raw: Listing<u32> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        let page = raw.into_page();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 1);
        assert!(page.first && page.last);
        assert!(!page.has_next());
    }

    #[test]
    fn object_without_content_is_not_a_listing() {
        let res = serde_json::from_value::<Listing<u32>>(json!({ "message": "nope" }));
        assert!(res.is_err());
    }

    #[test]
    fn sparse_page_metadata_defaults() {
        let page: Page<u32> = serde_json::from_value(json!({ "content": [7] })).unwrap();
        assert_eq!(page.content, vec![7]);
        assert_eq!(page.total_elements, 0);
        assert!(!page.last);
    }

    #[test]
    fn has_next_respects_total_pages() {
        let page = Page {
            content: vec![1],
            total_elements: 41,
            total_pages: 3,
            size: 20,
            number: 1,
            first: false,
            last: false,
        };
        assert!(page.has_next());
        assert_eq!(PageRequest::new(1, 20).next(), PageRequest::new(2, 20));
    }

    #[test]
    fn default_page_request_query() {
        assert_eq!(
            PageRequest::default().to_query(),
            vec![("page", "0".to_owned()), ("size", "20".to_owned())]
        );
    }
}

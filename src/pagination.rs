//! Page object exchanged with the backend and the page links derived from it.

use serde::{Deserialize, Serialize};

use crate::domain::grid::PaginationModel;
use crate::domain::types::PageSize;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One page of rows as returned by the backend. Page numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub current_page: usize,
    pub last_page: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: usize, pagination: &PaginationModel) -> Self {
        let per_page = pagination.page_size.get();
        Self {
            data,
            total,
            current_page: pagination.page + 1,
            last_page: total.div_ceil(per_page).max(1),
            per_page,
        }
    }

    /// Page numbers for a pagination toolbar; `None` marks a gap.
    pub fn page_links(&self) -> Vec<Option<usize>> {
        let current_page = if self.current_page == 0 { 1 } else { self.current_page };
        get_pages(self.last_page, current_page, 2, 2, 4, 2)
    }

    /// The grid pagination this page answers, if `per_page` is usable.
    pub fn pagination(&self) -> Option<PaginationModel> {
        let page_size = PageSize::new(self.per_page).ok()?;
        Some(PaginationModel::new(
            self.current_page.saturating_sub(1),
            page_size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination(page: usize, size: usize) -> PaginationModel {
        PaginationModel::new(page, PageSize::new(size).unwrap())
    }

    #[test]
    fn new_page_uses_one_based_numbers() {
        let page = Page::new(vec![1, 2], 42, &pagination(1, 20));

        assert_eq!(page.current_page, 2);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.per_page, 20);
        assert_eq!(page.pagination(), Some(pagination(1, 20)));
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let page: Page<u8> = Page::new(vec![], 0, &pagination(0, 10));

        assert_eq!(page.last_page, 1);
        assert_eq!(page.page_links(), vec![Some(1)]);
    }

    #[test]
    fn links_collapse_distant_pages() {
        let page: Page<u8> = Page {
            data: vec![],
            total: 200,
            current_page: 10,
            last_page: 20,
            per_page: 10,
        };

        assert_eq!(
            page.page_links(),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20),
            ]
        );
    }

    #[test]
    fn deserializes_backend_payload_with_extra_fields() {
        let page: Page<String> = serde_json::from_str(
            r#"{"data": ["a"], "total": 1, "current_page": 1, "last_page": 1,
                "per_page": 20, "from": 1, "to": 1, "links": []}"#,
        )
        .unwrap();

        assert_eq!(page.data, vec!["a".to_string()]);
        assert_eq!(page.pagination(), Some(pagination(0, 20)));
    }
}

//! Offset pagination over the role- and search-filtered recipe list.

use serde::Serialize;

/// Page number used when the caller supplies none or an unparsable one.
pub const DEFAULT_PAGE: i64 = 1;
/// Upper bound on page labels a pager renders at once.
const MAX_PAGE_LABELS: usize = 5;

/// Pagination metadata computed per request.
///
/// The zero value is returned for malformed windows (`page <= 0` or
/// `page_size <= 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PaginationInfo {
    /// Matching recipes after role and search filtering.
    pub total_recipes: usize,
    /// The requested page, echoed even when it lies beyond the last page.
    pub current_page: i64,
    /// `ceil(total_recipes / page_size)`, zero when nothing matches.
    pub total_pages: usize,
}

impl PaginationInfo {
    /// Number of page labels a pager should show.
    pub fn page_labels(&self) -> usize {
        self.total_pages.min(MAX_PAGE_LABELS)
    }
}

/// One window of results plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationInfo::default(),
        }
    }
}

/// Returns true when both values describe a usable window.
pub fn is_valid_window(page: i64, page_size: i64) -> bool {
    page > 0 && page_size > 0
}

/// Cut the 1-based `page` of width `page_size` out of `items`.
///
/// Malformed windows yield an empty page with zero metadata. Pages past the
/// end yield no items but still report the true totals.
pub fn paginate<T>(items: Vec<T>, page: i64, page_size: i64) -> Page<T> {
    if !is_valid_window(page, page_size) {
        return Page::default();
    }

    let total = items.len();
    let mut pagination = PaginationInfo {
        total_recipes: total,
        current_page: page,
        total_pages: 0,
    };
    if total == 0 {
        return Page {
            items,
            pagination,
        };
    }

    // Both values are positive here; saturate on targets where they exceed usize.
    let size = usize::try_from(page_size).unwrap_or(usize::MAX);
    let index = usize::try_from(page - 1).unwrap_or(usize::MAX);
    pagination.total_pages = total.div_ceil(size);

    let start = match index.checked_mul(size) {
        Some(start) if start < total => start,
        _ => {
            return Page {
                items: Vec::new(),
                pagination,
            };
        }
    };
    let end = start.saturating_add(size).min(total);

    let items = items.into_iter().skip(start).take(end - start).collect();
    Page { items, pagination }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(count: u64) -> Vec<u64> {
        (1..=count).rev().collect()
    }

    #[test]
    fn first_page_of_two() {
        let page = paginate(numbers(10), 1, 5);

        assert_eq!(page.items, vec![10, 9, 8, 7, 6]);
        assert_eq!(
            page.pagination,
            PaginationInfo {
                total_recipes: 10,
                current_page: 1,
                total_pages: 2,
            }
        );
    }

    #[test]
    fn last_page_is_partial() {
        let page = paginate(numbers(10), 4, 3);

        assert_eq!(page.items, vec![1]);
        assert_eq!(page.pagination.total_pages, 4);
    }

    #[test]
    fn page_beyond_range_keeps_metadata() {
        let page = paginate(numbers(10), 2, 10);

        assert!(page.items.is_empty());
        assert_eq!(
            page.pagination,
            PaginationInfo {
                total_recipes: 10,
                current_page: 2,
                total_pages: 1,
            }
        );
    }

    #[test]
    fn malformed_windows_yield_zero_info() {
        for (page, size) in [(0, 5), (1, 0), (-1, 5), (1, -3), (0, 0)] {
            let result = paginate(numbers(10), page, size);
            assert!(result.items.is_empty(), "page={page} size={size}");
            assert_eq!(result.pagination, PaginationInfo::default());
        }
    }

    #[test]
    fn empty_input_reports_zero_pages_but_echoes_page() {
        let page = paginate(Vec::<u64>::new(), 3, 5);

        assert!(page.items.is_empty());
        assert_eq!(
            page.pagination,
            PaginationInfo {
                total_recipes: 0,
                current_page: 3,
                total_pages: 0,
            }
        );
    }

    #[test]
    fn window_length_matches_closed_form() {
        for total in 0..=12u64 {
            for size in 1..=6i64 {
                for page in 1..=6i64 {
                    let result = paginate(numbers(total), page, size);
                    let remaining = total as i64 - (page - 1) * size;
                    let expected = remaining.clamp(0, size) as usize;
                    assert_eq!(
                        result.items.len(),
                        expected,
                        "total={total} size={size} page={page}"
                    );
                    assert_eq!(
                        result.pagination.total_pages,
                        (total as usize).div_ceil(size as usize)
                    );
                }
            }
        }
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let page = paginate(numbers(3), i64::MAX, i64::MAX);

        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.pagination.current_page, i64::MAX);
    }

    #[test]
    fn page_labels_are_capped() {
        let mut info = PaginationInfo {
            total_pages: 3,
            ..Default::default()
        };
        assert_eq!(info.page_labels(), 3);

        info.total_pages = 12;
        assert_eq!(info.page_labels(), 5);
    }
}

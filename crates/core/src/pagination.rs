//! Fixed-size page slicing for list views.

use serde::Serialize;

/// Rows per page on the movement log and job history.
pub const PAGE_SIZE: usize = 50;

/// Max page buttons shown before ellipses kick in.
const MAX_PAGE_BUTTONS: usize = 5;

/// One page of a list plus the paging metadata the UI needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

/// `max(1, ceil(len / page_size))`.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Clamp a requested page into `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slice `items` into the requested page (1-based, clamped).
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let total_pages = total_pages(items.len(), page_size);
    let page = clamp_page(page, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    Page {
        items: items.get(start..end).unwrap_or_default().to_vec(),
        page,
        total_pages,
        total_items: items.len(),
        page_size,
    }
}

/// A page button, or a gap between buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageButton {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u64(*n as u64),
            Self::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Page buttons around `current`, always keeping the first and last page.
///
/// Up to five pages are listed directly; beyond that the window is
/// `1 ... c-1 c c+1 ... last`, shifted at either end.
pub fn page_numbers(current: usize, total: usize) -> Vec<PageButton> {
    let total = total.max(1);
    let current = clamp_page(current, total);

    if total <= MAX_PAGE_BUTTONS {
        return (1..=total).map(PageButton::Page).collect();
    }

    let mut buttons = Vec::new();
    if current <= 3 {
        buttons.extend((1..=4).map(PageButton::Page));
        buttons.push(PageButton::Ellipsis);
        buttons.push(PageButton::Page(total));
    } else if current >= total - 2 {
        buttons.push(PageButton::Page(1));
        buttons.push(PageButton::Ellipsis);
        buttons.extend((total - 3..=total).map(PageButton::Page));
    } else {
        buttons.push(PageButton::Page(1));
        buttons.push(PageButton::Ellipsis);
        buttons.extend((current - 1..=current + 1).map(PageButton::Page));
        buttons.push(PageButton::Ellipsis);
        buttons.push(PageButton::Page(total));
    }
    buttons
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PageButton::{Ellipsis, Page as P};

    #[test]
    fn empty_list_has_one_page() {
        let page = paginate::<u32>(&[], 3, PAGE_SIZE);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn pages_cover_every_item_once() {
        let items: Vec<u32> = (0..123).collect();
        let pages = total_pages(items.len(), PAGE_SIZE);
        assert_eq!(pages, 3);

        let mut seen = Vec::new();
        for n in 1..=pages {
            seen.extend(paginate(&items, n, PAGE_SIZE).items);
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let items: Vec<u32> = (0..60).collect();
        assert_eq!(paginate(&items, 0, PAGE_SIZE).page, 1);
        let last = paginate(&items, 99, PAGE_SIZE);
        assert_eq!(last.page, 2);
        assert_eq!(last.items.len(), 10);
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() {
        assert_eq!(total_pages(100, PAGE_SIZE), 2);
        assert_eq!(total_pages(101, PAGE_SIZE), 3);
    }

    #[test]
    fn few_pages_listed_directly() {
        assert_eq!(page_numbers(2, 4), vec![P(1), P(2), P(3), P(4)]);
    }

    #[test]
    fn ellipsis_near_start_middle_and_end() {
        assert_eq!(page_numbers(2, 10), vec![P(1), P(2), P(3), P(4), Ellipsis, P(10)]);
        assert_eq!(
            page_numbers(5, 10),
            vec![P(1), Ellipsis, P(4), P(5), P(6), Ellipsis, P(10)]
        );
        assert_eq!(page_numbers(9, 10), vec![P(1), Ellipsis, P(7), P(8), P(9), P(10)]);
    }

    #[test]
    fn ellipsis_serializes_as_dots() {
        let json = serde_json::to_string(&page_numbers(1, 8)).unwrap();
        assert_eq!(json, r#"[1,2,3,4,"...",8]"#);
    }
}

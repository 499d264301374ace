//! Page-window math for pagination controls.
//!
//! Computes which page numbers a pager should render, collapsing long runs
//! into ellipsis markers, and validates page navigation input. Everything
//! here is pure arithmetic over the current page, item count, and page size.

/// Pages shown on each side of the current page.
pub const PAGE_RANGE: u32 = 2;

/// One renderable pager entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEntry {
    /// A clickable page number.
    Page(u32),
    /// A collapsed run of hidden pages.
    Ellipsis,
}

/// Total page count for an item count and page size.
///
/// A zero page size yields zero pages rather than dividing by zero; callers
/// are expected to keep `items_per_page` positive.
pub fn total_pages(total_items: u32, items_per_page: u32) -> u32 {
    if items_per_page == 0 {
        return 0;
    }
    total_items.div_ceil(items_per_page)
}

/// Compute the pager entries for the given position.
///
/// Rules: page 1 and the last page always render; a window of
/// `2 * range + 1` pages renders around the current page, sliding inward at
/// the edges so it never shrinks; each gap collapses to a single ellipsis.
/// With one page or none there is nothing to paginate and the result is
/// empty.
pub fn page_window(
    current_page: u32,
    total_items: u32,
    items_per_page: u32,
    range: u32,
) -> Vec<PageEntry> {
    let total = total_pages(total_items, items_per_page);
    if total <= 1 {
        return Vec::new();
    }

    let width = (2 * range + 1).min(total);
    let mut start = current_page.saturating_sub(range).max(1);
    if start + width - 1 > total {
        start = total - width + 1;
    }
    let end = start + width - 1;

    let mut entries = Vec::new();
    let mut prev = 0u32;
    for page in 1..=total {
        let included = page == 1 || page == total || (page >= start && page <= end);
        if !included {
            continue;
        }
        if prev != 0 && page > prev + 1 {
            entries.push(PageEntry::Ellipsis);
        }
        entries.push(PageEntry::Page(page));
        prev = page;
    }

    entries
}

/// Validate a page-button click. Out-of-range targets are a no-op.
pub fn page_click(target: u32, total_pages: u32) -> Option<u32> {
    if (1..=total_pages).contains(&target) {
        Some(target)
    } else {
        None
    }
}

/// Outcome of free-text jump-to-page input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Navigate to this page and clear the input field.
    Jump(u32),
    /// No navigation; the input field keeps its text.
    Invalid,
}

/// Parse and validate jump-to-page input.
pub fn jump_to_page(raw: &str, total_pages: u32) -> JumpOutcome {
    match raw.trim().parse::<u32>() {
        Ok(page) if (1..=total_pages).contains(&page) => JumpOutcome::Jump(page),
        _ => JumpOutcome::Invalid,
    }
}

/// Whether the jump control is worth rendering. Below this threshold every
/// page number is already visible in the window.
pub fn shows_jump_control(total_pages: u32, range: u32) -> bool {
    total_pages > range * 2 + 2
}

/// Pagination position of one listing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub total_items: u32,
    pub items_per_page: u32,
}

impl PageState {
    pub fn new(items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            total_items: 0,
            items_per_page,
        }
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_items, self.items_per_page)
    }

    /// Pager entries at the default window range.
    pub fn window(&self) -> Vec<PageEntry> {
        page_window(
            self.current_page,
            self.total_items,
            self.items_per_page,
            PAGE_RANGE,
        )
    }

    /// Whether any pagination UI is needed at all.
    pub fn is_paginated(&self) -> bool {
        self.total_pages() > 1
    }

    /// Apply a validated page click; returns true when the page changed.
    pub fn go_to(&mut self, target: u32) -> bool {
        match page_click(target, self.total_pages()) {
            Some(page) if page != self.current_page => {
                self.current_page = page;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use PageEntry::{Ellipsis, Page};

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 30), 0);
        assert_eq!(total_pages(1, 30), 1);
        assert_eq!(total_pages(30, 30), 1);
        assert_eq!(total_pages(31, 30), 2);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn test_window_empty_when_single_page() {
        assert_eq!(page_window(1, 0, 30, PAGE_RANGE), vec![]);
        assert_eq!(page_window(1, 30, 30, PAGE_RANGE), vec![]);
        assert_eq!(page_window(1, 12, 30, PAGE_RANGE), vec![]);
    }

    #[test]
    fn test_window_middle_of_ten_pages() {
        // 10 pages of 30, standing on page 5.
        let entries = page_window(5, 300, 30, PAGE_RANGE);
        assert_eq!(
            entries,
            vec![
                Page(1),
                Ellipsis,
                Page(3),
                Page(4),
                Page(5),
                Page(6),
                Page(7),
                Ellipsis,
                Page(10),
            ]
        );
    }

    #[test]
    fn test_window_five_pages_never_collapses() {
        for current in 1..=5 {
            let entries = page_window(current, 150, 30, PAGE_RANGE);
            assert_eq!(
                entries,
                vec![Page(1), Page(2), Page(3), Page(4), Page(5)],
                "current page {}",
                current
            );
        }
    }

    #[test]
    fn test_window_slides_at_edges() {
        let entries = page_window(1, 300, 30, PAGE_RANGE);
        assert_eq!(
            entries,
            vec![
                Page(1),
                Page(2),
                Page(3),
                Page(4),
                Page(5),
                Ellipsis,
                Page(10),
            ]
        );

        let entries = page_window(10, 300, 30, PAGE_RANGE);
        assert_eq!(
            entries,
            vec![
                Page(1),
                Ellipsis,
                Page(6),
                Page(7),
                Page(8),
                Page(9),
                Page(10),
            ]
        );
    }

    #[test]
    fn test_window_single_hidden_page_still_collapses() {
        // 8 pages, current 4: window 2..6, page 7 alone in the gap.
        let entries = page_window(4, 240, 30, PAGE_RANGE);
        assert_eq!(
            entries,
            vec![
                Page(1),
                Page(2),
                Page(3),
                Page(4),
                Page(5),
                Page(6),
                Ellipsis,
                Page(8),
            ]
        );
    }

    #[test]
    fn test_window_no_adjacent_ellipses() {
        for total in 2..40u32 {
            for current in 1..=total {
                let entries = page_window(current, total * 30, 30, PAGE_RANGE);
                for pair in entries.windows(2) {
                    assert!(
                        !(pair[0] == Ellipsis && pair[1] == Ellipsis),
                        "adjacent ellipses at total={} current={}",
                        total,
                        current
                    );
                }
                assert_eq!(entries.first(), Some(&Page(1)));
                assert_eq!(entries.last(), Some(&Page(total)));
            }
        }
    }

    #[test]
    fn test_page_click_bounds() {
        assert_eq!(page_click(3, 10), Some(3));
        assert_eq!(page_click(1, 10), Some(1));
        assert_eq!(page_click(10, 10), Some(10));
        assert_eq!(page_click(0, 10), None);
        assert_eq!(page_click(11, 10), None);
    }

    #[test]
    fn test_jump_to_page_valid() {
        assert_eq!(jump_to_page("3", 10), JumpOutcome::Jump(3));
        assert_eq!(jump_to_page("  7 ", 10), JumpOutcome::Jump(7));
    }

    #[test]
    fn test_jump_to_page_invalid() {
        assert_eq!(jump_to_page("99", 10), JumpOutcome::Invalid);
        assert_eq!(jump_to_page("0", 10), JumpOutcome::Invalid);
        assert_eq!(jump_to_page("three", 10), JumpOutcome::Invalid);
        assert_eq!(jump_to_page("", 10), JumpOutcome::Invalid);
        assert_eq!(jump_to_page("-2", 10), JumpOutcome::Invalid);
    }

    #[test]
    fn test_jump_control_threshold() {
        // With range 2, six pages are fully visible; seven are not.
        assert!(!shows_jump_control(6, PAGE_RANGE));
        assert!(shows_jump_control(7, PAGE_RANGE));
    }

    #[test]
    fn test_page_state_navigation() {
        let mut state = PageState::new(30);
        state.total_items = 300;
        assert!(state.is_paginated());
        assert!(state.go_to(4));
        assert_eq!(state.current_page, 4);
        assert!(!state.go_to(4));
        assert!(!state.go_to(11));
        assert_eq!(state.current_page, 4);
    }
}

//! Page-navigation helpers for list views.

use std::fmt;

use bestiary_model::ReconciledPage;

/// Pages shown on either side of the current page.
pub const WINDOW_DELTA: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    Ellipsis,
}

/// First page, a window around `current`, and the last page, with an
/// ellipsis wherever pages are skipped. Empty when there is nothing to
/// navigate.
pub fn visible_pages(current: u32, total: u32) -> Vec<PageSlot> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let window_start = current.saturating_sub(WINDOW_DELTA).max(2);
    let window_end = current.saturating_add(WINDOW_DELTA).min(total - 1);

    let mut slots = vec![PageSlot::Page(1)];
    if window_start > 2 {
        slots.push(PageSlot::Ellipsis);
    }
    slots.extend((window_start..=window_end).map(PageSlot::Page));
    if window_end < total - 1 {
        slots.push(PageSlot::Ellipsis);
    }
    slots.push(PageSlot::Page(total));
    slots
}

/// "Showing X to Y of Z items" for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSummary {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl RangeSummary {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let page_size = u64::from(page_size.max(1));
        let offset = u64::from(page.max(1) - 1) * page_size;
        if total == 0 || offset >= total {
            return Self {
                start: 0,
                end: 0,
                total,
            };
        }
        Self {
            start: offset + 1,
            end: (offset + page_size).min(total),
            total,
        }
    }

    pub fn for_page(page: &ReconciledPage, page_size: u32) -> Self {
        Self::new(page.page, page_size, page.effective_total)
    }
}

impl fmt::Display for RangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} items",
            self.start, self.end, self.total
        )
    }
}

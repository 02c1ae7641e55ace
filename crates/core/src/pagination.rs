//! Page-number window for the pagination control.

/// Pages shown on each side of the current page.
pub const WINDOW_DELTA: u32 = 2;

/// One slot of the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    /// Collapsed run of pages.
    Gap,
}

/// Slots to render for `current` out of `total` pages.
///
/// The first and last page are always present; pages within
/// [`WINDOW_DELTA`] of the current one are listed, anything else collapses
/// into a gap. A single page (or none) needs no control at all.
pub fn visible_pages(current: u32, total: u32) -> Vec<PageSlot> {
    if total <= 1 {
        return Vec::new();
    }

    let mut slots = vec![PageSlot::Page(1)];
    if current.saturating_sub(WINDOW_DELTA) > 2 {
        slots.push(PageSlot::Gap);
    }

    let low = current.saturating_sub(WINDOW_DELTA).max(2);
    let high = (current + WINDOW_DELTA).min(total - 1);
    slots.extend((low..=high).map(PageSlot::Page));

    if current + WINDOW_DELTA < total - 1 {
        slots.push(PageSlot::Gap);
    }
    slots.push(PageSlot::Page(total));
    slots
}

pub fn can_go_previous(current: u32) -> bool {
    current > 1
}

pub fn can_go_next(current: u32, total: u32) -> bool {
    current < total
}

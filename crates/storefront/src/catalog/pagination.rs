//! Fixed-size page slicing.

/// Products shown per catalog page.
pub const PAGE_SIZE: usize = 12;

/// Number of pages needed for `count` items.
#[must_use]
pub const fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Clamp a requested page to `[1, total_pages]`; page 1 when there are no pages.
#[must_use]
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

/// The items on `page` (1-based, already clamped).
pub fn page_slice<T>(items: Vec<T>, page: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE);
    items.into_iter().skip(start).take(PAGE_SIZE).collect()
}

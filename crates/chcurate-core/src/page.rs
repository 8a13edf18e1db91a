//! Fixed-size pagination helpers.

/// Number of pages needed for `len` items. An empty list still has one page.
#[must_use]
pub const fn page_count(len: usize, page_size: usize) -> usize {
    if len == 0 || page_size == 0 {
        1
    } else {
        len.div_ceil(page_size)
    }
}

/// Returns page `page` (0-based) of `items`. Out-of-range pages are empty.
#[must_use]
pub fn page_slice<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    let start = page.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    items.get(start..end).unwrap_or_default()
}

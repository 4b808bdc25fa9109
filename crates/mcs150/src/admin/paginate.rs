//! Client-side pagination of fetched lists.

/// One page of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Rows on this page.
    pub items: &'a [T],
    /// 1-based page number, clamped to the available pages.
    pub number: usize,
    /// Total pages; at least 1 even for an empty list.
    pub total_pages: usize,
    /// Rows across all pages.
    pub total_items: usize,
}

impl<'a, T> Page<'a, T> {
    /// Slice out page `number` (1-based) of `items`.
    ///
    /// Page 0 is treated as page 1 and a number past the end as the last page.
    /// A `page_size` of 0 puts everything on one page.
    #[must_use]
    pub fn of(items: &'a [T], number: usize, page_size: usize) -> Self {
        let page_size = if page_size == 0 {
            items.len().max(1)
        } else {
            page_size
        };
        let total_pages = items.len().div_ceil(page_size).max(1);
        let number = number.clamp(1, total_pages);
        let start = (number - 1) * page_size;
        let end = (start + page_size).min(items.len());

        Self {
            items: &items[start.min(end)..end],
            number,
            total_pages,
            total_items: items.len(),
        }
    }

    /// Whether a previous page exists.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// `Page n of m` footer.
    #[must_use]
    pub fn footer(&self) -> String {
        format!(
            "Page {} of {} ({} total)",
            self.number, self.total_pages, self.total_items
        )
    }
}

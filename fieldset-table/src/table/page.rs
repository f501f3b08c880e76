//! Page partitioning of the current row order

use std::ops::Range;

/// Partition of the row order into fixed-size pages.
///
/// Pages are numbered from 1 and each maps to a contiguous range of row
/// positions. The index is rebuilt wholesale whenever row order, row count
/// or page size changes. An empty table still has one (empty) page.
///
/// # Example
///
/// ```
/// use fieldset_table::table::PageIndex;
///
/// let pages = PageIndex::partition(23, 10);
/// assert_eq!(pages.total_pages(), 3);
/// assert_eq!(pages.page(3), Some(20..23));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIndex {
    pages: Vec<Range<usize>>,
    records_per_page: usize,
}

impl PageIndex {
    /// Splits `row_count` rows into pages of `records_per_page`.
    pub fn partition(row_count: usize, records_per_page: usize) -> Self {
        let records_per_page = records_per_page.max(1);
        let mut pages: Vec<Range<usize>> = (0..row_count)
            .step_by(records_per_page)
            .map(|start| start..(start + records_per_page).min(row_count))
            .collect();
        if pages.is_empty() {
            pages.push(0..0);
        }
        Self {
            pages,
            records_per_page,
        }
    }

    /// Returns the row range of a 1-based page number.
    pub fn page(&self, page: usize) -> Option<Range<usize>> {
        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx))
            .cloned()
    }

    /// Returns the number of pages (at least 1).
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Returns the page size the index was built with.
    pub fn records_per_page(&self) -> usize {
        self.records_per_page
    }

    /// Returns the page holding a row position.
    pub fn page_of(&self, position: usize) -> Option<usize> {
        self.pages
            .iter()
            .position(|range| range.contains(&position))
            .map(|idx| idx + 1)
    }

    /// Iterates over `(page number, row range)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Range<usize>)> + '_ {
        self.pages
            .iter()
            .enumerate()
            .map(|(idx, range)| (idx + 1, range.clone()))
    }
}

impl Default for PageIndex {
    fn default() -> Self {
        Self::partition(0, super::DEFAULT_RECORDS_PER_PAGE)
    }
}

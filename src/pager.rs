use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 1-based page cursor over a row count that may change underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page: usize,
    size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    /// A zero size falls back to [`DEFAULT_PAGE_SIZE`].
    pub fn new(size: usize) -> Self {
        Self {
            page: 1,
            size: if size == 0 { DEFAULT_PAGE_SIZE } else { size },
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Never less than 1, even for an empty table.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.size).max(1)
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Moves to `page`, clamped into `1..=page_count(total)`.
    pub fn go_to(&mut self, page: usize, total: usize) {
        self.page = page.clamp(1, self.page_count(total));
    }

    pub fn clamp_to(&mut self, total: usize) {
        self.go_to(self.page, total);
    }

    /// Row range of the current page inside a result of `total` rows.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.size).min(total);
        let end = start.saturating_add(self.size).min(total);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_three_rows_make_three_pages() {
        let mut p = PageState::new(10);
        assert_eq!(p.page_count(23), 3);
        p.go_to(3, 23);
        assert_eq!(p.range(23), 20..23);
        p.go_to(4, 23);
        assert_eq!(p.page(), 3);
        p.go_to(0, 23);
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn empty_table_has_one_empty_page() {
        let mut p = PageState::default();
        assert_eq!(p.page_count(0), 1);
        p.go_to(7, 0);
        assert_eq!(p.page(), 1);
        assert_eq!(p.range(0), 0..0);
    }

    #[test]
    fn shrinking_total_clamps_page() {
        let mut p = PageState::new(5);
        p.go_to(4, 20);
        p.clamp_to(11);
        assert_eq!(p.page(), 3);
        assert_eq!(PageState::new(0).size(), DEFAULT_PAGE_SIZE);
    }
}

use crate::model::{page_count, Page, PAGE_SIZE};

/// Position of the view within the incident collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub size: usize,
    pub total_pages: usize,
    pub total_elements: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(size: usize) -> Self {
        Self {
            page: 0,
            size,
            total_pages: 0,
            total_elements: 0,
        }
    }

    /// Adopts the counts and position the server reported.
    pub fn apply(&mut self, page: &Page) {
        self.page = page.current_page;
        self.total_pages = page.total_pages;
        self.total_elements = page.total_elements;
    }

    pub fn can_previous(&self) -> bool {
        self.page > 0
    }

    pub fn can_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    /// Page after `from`, or `None` when `from` is already the last one.
    pub fn next_from(&self, from: usize) -> Option<usize> {
        (from + 1 < self.total_pages).then_some(from + 1)
    }

    /// Page before `from`, or `None` on the first page.
    pub fn previous_from(&self, from: usize) -> Option<usize> {
        from.checked_sub(1)
    }

    /// Index of the last page once one more record has been appended.
    pub fn last_page_after_insert(&self) -> usize {
        page_count(self.total_elements + 1, self.size).saturating_sub(1)
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page + 1, self.total_pages)
    }
}

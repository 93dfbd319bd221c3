/*
[INPUT]:  Item counts, page sizes, and requested page indexes
[OUTPUT]: Clamped page windows and "1-10 of 25" range labels
[POS]:    Presentation helpers - client-side pagination
[UPDATE]: When pagination rules or labels change
*/

use std::ops::Range;

pub const TASK_PAGE_SIZE: usize = 10;
pub const HISTORY_PAGE_SIZE: usize = 5;

/// One page over `total` items. The index is always clamped to a page
/// that exists, so shrinking the list never leaves an empty page selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    index: usize,
    size: usize,
    total: usize,
}

impl Page {
    pub fn new(index: usize, size: usize, total: usize) -> Self {
        let size = size.max(1);
        let last = total.saturating_sub(1) / size;
        Self {
            index: index.min(last),
            size,
            total,
        }
    }

    /// The page that contains item `position`.
    pub fn containing(position: usize, size: usize, total: usize) -> Self {
        Self::new(position / size.max(1), size, total)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of pages, at least one.
    pub fn count(&self) -> usize {
        self.total.div_ceil(self.size).max(1)
    }

    pub fn range(&self) -> Range<usize> {
        let start = (self.index * self.size).min(self.total);
        let end = (start + self.size).min(self.total);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.size, self.total)
    }

    pub fn prev(self) -> Self {
        Self::new(self.index.saturating_sub(1), self.size, self.total)
    }

    /// e.g. `1-10 of 25 tasks`
    pub fn label(&self, noun: &str) -> String {
        let range = self.range();
        if range.is_empty() {
            return format!("0 of {} {noun}", self.total);
        }
        format!("{}-{} of {} {noun}", range.start + 1, range.end, self.total)
    }
}

//! Headless table state shared by the sales and users tables.

use std::{cmp::Ordering, collections::BTreeSet};

/// Rows that know how to compare themselves on one of their columns.
pub trait Sortable {
    type Column: Copy + PartialEq;

    fn compare_by(&self, other: &Self, column: Self::Column) -> Ordering;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sorting<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: Copy + PartialEq> Sorting<C> {
    pub fn new(column: C, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header click: an ascending column flips to descending, anything else
    /// (including a different column) sorts ascending.
    pub fn toggle(&mut self, column: C) {
        let direction = if self.column == column && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        *self = Self::new(column, direction);
    }
}

/// Stable sort, so equal rows keep their collection order.
pub fn sort_rows<T: Sortable>(rows: &mut [T], sorting: Sorting<T::Column>) {
    rows.sort_by(|a, b| {
        let cmp = a.compare_by(b, sorting.column);
        match sorting.direction {
            SortDirection::Ascending => cmp,
            SortDirection::Descending => cmp.reverse(),
        }
    });
}

/// Case-insensitive substring match, an empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Always at least one page, even when there are no rows.
    pub fn page_count(&self, rows: usize) -> usize {
        rows.div_ceil(self.page_size).max(1)
    }

    pub fn can_previous(&self) -> bool {
        self.page > 0
    }

    pub fn can_next(&self, rows: usize) -> bool {
        self.page + 1 < self.page_count(rows)
    }

    pub fn next(&mut self, rows: usize) {
        if self.can_next(rows) {
            self.page += 1;
        }
    }

    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// The rows of the current page, clamped to the last page that exists.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let page = self.page.min(self.page_count(rows.len()) - 1);
        let start = (page * self.page_size).min(rows.len());
        let end = (start + self.page_size).min(rows.len());
        &rows[start..end]
    }
}

/// Selected row ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSelection {
    ids: BTreeSet<String>,
}

impl RowSelection {
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    pub fn set(&mut self, id: &str, selected: bool) {
        if selected {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
    }

    /// Selects every id given, or clears when all of them are already selected.
    pub fn toggle_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let ids: Vec<&str> = ids.into_iter().collect();
        if !ids.is_empty() && ids.iter().all(|id| self.ids.contains(*id)) {
            self.ids.clear();
        } else {
            self.ids.extend(ids.into_iter().map(str::to_string));
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// `2 of 10 row(s) selected.`
    pub fn summary(&self, rows: usize) -> String {
        format!("{} of {} row(s) selected.", self.ids.len(), rows)
    }
}

/// Which columns are shown. Columns that cannot be hidden are always visible.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnVisibility<C> {
    hidden: Vec<C>,
    locked: Vec<C>,
}

impl<C: Copy + PartialEq> ColumnVisibility<C> {
    pub fn new(locked: impl IntoIterator<Item = C>) -> Self {
        Self {
            hidden: Vec::new(),
            locked: locked.into_iter().collect(),
        }
    }

    pub fn can_hide(&self, column: C) -> bool {
        !self.locked.contains(&column)
    }

    pub fn is_visible(&self, column: C) -> bool {
        !self.hidden.contains(&column)
    }

    pub fn set_visible(&mut self, column: C, visible: bool) {
        if visible {
            self.hidden.retain(|hidden| *hidden != column);
        } else if self.can_hide(column) && self.is_visible(column) {
            self.hidden.push(column);
        }
    }

    pub fn toggle(&mut self, column: C) {
        let visible = self.is_visible(column);
        self.set_visible(column, !visible);
    }

    pub fn visible<'a>(&'a self, columns: &'a [C]) -> impl Iterator<Item = C> + 'a {
        columns.iter().copied().filter(|c| self.is_visible(*c))
    }
}

//! The tabular data engine.
//!
//! A [`TableEngine`] owns a working copy of the records and derives the
//! visible page on demand, always in the same order:
//!
//! 1. every record in insertion order
//! 2. global search (any field contains the term)
//! 3. each active column filter (AND)
//! 4. stable sort on the active field
//! 5. slice out the current page
//!
//! Every transition is a plain `&mut self` call; unknown fields, unknown
//! column ids and out-of-range pages are ignored or clamped, never fatal.

use crate::{
    column::ColumnSpec,
    delete::{DeleteFlow, DeleteSettled, PendingDelete},
    error::TableError,
    export::{ExportOutcome, to_csv},
    filter::FilterState,
    hooks::TableHooks,
    pager::PageState,
    record::Record,
    sort::{SortOrder, SortState},
};
use log::{debug, warn};
use std::fmt;

/// Insertion index of a record, stable across filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub usize);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub id: RowId,
    pub record: &'a Record,
}

/// One rendered page.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub rows: Vec<Row<'a>>,
    /// Rows surviving search and filters, across all pages.
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
}

pub struct TableEngine {
    rows: Vec<(RowId, Record)>,
    columns: Vec<ColumnSpec>,
    filter: FilterState,
    sort: SortState,
    pager: PageState,
    delete: DeleteFlow,
    hooks: TableHooks,
}

impl TableEngine {
    pub fn new(records: impl IntoIterator<Item = Record>, columns: Vec<ColumnSpec>) -> Self {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| (RowId(i), r))
            .collect::<Vec<_>>();
        debug!("table mounted with {} rows, {} columns", rows.len(), columns.len());
        Self {
            rows,
            columns,
            filter: FilterState::default(),
            sort: SortState::default(),
            pager: PageState::default(),
            delete: DeleteFlow::default(),
            hooks: TableHooks::default(),
        }
    }

    pub fn with_page_size(mut self, size: usize) -> Self {
        self.pager = PageState::new(size);
        self
    }

    pub fn with_hooks(mut self, hooks: TableHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn hooks(&self) -> &TableHooks {
        &self.hooks
    }

    // ---- records and columns

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn record(&self, id: RowId) -> Option<&Record> {
        self.rows.iter().find(|(rid, _)| *rid == id).map(|(_, r)| r)
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn visible_columns(&self) -> Vec<&ColumnSpec> {
        self.columns.iter().filter(|c| c.visible).collect()
    }

    /// Flips visibility. Does not touch the page: the row count is the same.
    pub fn toggle_column_visibility(&mut self, id: &str) -> bool {
        let Some(col) = self.columns.iter_mut().find(|c| c.id == id) else {
            debug!("toggle visibility: unknown column {id:?}");
            return false;
        };
        col.visible = !col.visible;
        true
    }

    // ---- search and filters

    pub fn search_term(&self) -> &str {
        self.filter.search()
    }

    pub fn set_search_term(&mut self, term: &str) {
        if self.filter.set_search(term) {
            self.pager.reset();
        }
    }

    pub fn filter(&self, field: &str) -> Option<&str> {
        self.filter.filter(field)
    }

    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filter.active_filters()
    }

    /// `field` must be the accessor of a filterable column.
    pub fn set_filter(&mut self, field: &str, value: &str) -> bool {
        if !self.columns.iter().any(|c| c.filterable && c.accessor == field) {
            debug!("set filter: {field:?} is not a filterable field");
            return false;
        }
        let changed = self.filter.set_filter(field, value);
        if changed {
            self.pager.reset();
        }
        changed
    }

    pub fn clear_filters(&mut self) {
        if self.filter.clear_filters() {
            self.pager.reset();
        }
    }

    // ---- sorting

    pub fn sort(&self) -> Option<(&str, SortOrder)> {
        self.sort.active()
    }

    pub fn sort_order(&self, field: &str) -> Option<SortOrder> {
        self.sort.order_for(field)
    }

    /// Header click on `field`: unsorted -> ascend -> descend -> unsorted.
    pub fn set_sort(&mut self, field: &str) -> bool {
        if !self.columns.iter().any(|c| c.sortable && c.accessor == field) {
            debug!("set sort: {field:?} is not a sortable field");
            return false;
        }
        self.sort.cycle(field);
        true
    }

    pub fn clear_sort(&mut self) {
        self.sort.clear();
    }

    // ---- pagination

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn page_size(&self) -> usize {
        self.pager.size()
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.filtered_len())
    }

    /// Clamped into `1..=page_count()`.
    pub fn go_to_page(&mut self, page: usize) {
        let total = self.filtered_len();
        self.pager.go_to(page, total);
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page().saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.page().saturating_sub(1));
    }

    // ---- derived view

    /// Search and filters applied, sorted, not paginated.
    pub fn filtered_rows(&self) -> Vec<Row<'_>> {
        let mut rows = self
            .rows
            .iter()
            .filter(|(_, r)| self.filter.matches_search(r))
            .filter(|(_, r)| self.filter.matches_filters(r))
            .map(|(id, record)| Row { id: *id, record })
            .collect::<Vec<_>>();
        self.sort.apply(&mut rows, |row| row.record);
        rows
    }

    pub fn filtered_len(&self) -> usize {
        if self.filter.is_empty() {
            return self.rows.len();
        }
        self.rows.iter().filter(|(_, r)| self.filter.matches(r)).count()
    }

    pub fn view(&self) -> TableView<'_> {
        let mut rows = self.filtered_rows();
        let total = rows.len();
        // The stored page may point past the end after a delete or filter change.
        let mut pager = self.pager;
        pager.clamp_to(total);
        let range = pager.range(total);
        rows.truncate(range.end);
        rows.drain(..range.start);
        TableView {
            rows,
            total,
            page: pager.page(),
            page_count: pager.page_count(total),
            page_size: pager.size(),
        }
    }

    // ---- actions

    /// Defers to `on_export` when set, otherwise builds the CSV payload from
    /// every filtered row (not just the current page).
    pub fn export_csv(&self) -> ExportOutcome {
        if let Some(hook) = &self.hooks.on_export {
            hook();
            return ExportOutcome::Delegated;
        }
        let rows = self.filtered_rows();
        ExportOutcome::Csv(to_csv(&self.visible_columns(), rows.iter().map(|r| r.record)))
    }

    pub fn edit(&self, id: RowId) -> bool {
        self.call_record_hook(self.hooks.on_edit.as_ref(), id)
    }

    pub fn view_details(&self, id: RowId) -> bool {
        self.call_record_hook(self.hooks.on_view_details.as_ref(), id)
    }

    pub fn row_click(&self, id: RowId) -> bool {
        self.call_record_hook(self.hooks.on_row_click.as_ref(), id)
    }

    pub fn add_new(&self) -> bool {
        match &self.hooks.on_add_new {
            Some(hook) => {
                hook();
                true
            }
            None => false,
        }
    }

    fn call_record_hook(&self, hook: Option<&crate::hooks::RecordHook>, id: RowId) -> bool {
        match (hook, self.record(id)) {
            (Some(hook), Some(record)) => {
                hook(record);
                true
            }
            _ => false,
        }
    }

    // ---- two-phase delete

    /// Stages `id` for deletion. Needs an `on_delete` hook and is refused
    /// while another delete is confirming.
    pub fn request_delete(&mut self, id: RowId) -> bool {
        if self.hooks.on_delete.is_none() || self.record(id).is_none() {
            return false;
        }
        let staged = self.delete.stage(id);
        debug!("request delete {id}: staged={staged}");
        staged
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.delete.cancel()
    }

    pub fn staged_delete(&self) -> Option<RowId> {
        self.delete.staged()
    }

    pub fn delete_flow(&self) -> DeleteFlow {
        self.delete
    }

    /// True while a confirmed delete is waiting to settle.
    pub fn is_delete_pending(&self) -> bool {
        self.delete.is_pending()
    }

    /// Confirms the staged row. Returns `None` when nothing is staged.
    pub fn confirm_delete(&mut self) -> Option<PendingDelete> {
        let hook = self.hooks.on_delete.clone()?;
        let id = self.delete.begin()?;
        let Some(record) = self.record(id).cloned() else {
            self.delete.settle(id);
            return None;
        };
        debug!("confirm delete {id}");
        let task = hook(record.clone());
        Some(PendingDelete::new(id, record, task))
    }

    /// Applies a delete outcome. Success drops the row from the working copy;
    /// failure leaves every row in place and is returned for the caller to
    /// report. Either way the engine is idle afterwards.
    pub fn settle_delete(&mut self, settled: DeleteSettled) -> Result<Record, TableError> {
        let DeleteSettled { row, result } = settled;
        if !self.delete.settle(row) {
            return Err(TableError::UnexpectedSettle(row));
        }
        if let Err(source) = result {
            warn!("delete {row} failed: {source:#}");
            return Err(TableError::DeleteFailed { row, source });
        }
        let Some(pos) = self.rows.iter().position(|(rid, _)| *rid == row) else {
            return Err(TableError::UnexpectedSettle(row));
        };
        let (_, record) = self.rows.remove(pos);
        let total = self.filtered_len();
        self.pager.clamp_to(total);
        debug!("delete {row} settled, {} rows left", self.rows.len());
        Ok(record)
    }
}

impl fmt::Debug for TableEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableEngine")
            .field("rows", &self.rows.len())
            .field("columns", &self.columns)
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("pager", &self.pager)
            .field("delete", &self.delete)
            .field("hooks", &self.hooks)
            .finish()
    }
}

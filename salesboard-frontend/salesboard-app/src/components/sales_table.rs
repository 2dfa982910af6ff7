use std::{cell::RefCell, cmp::Ordering, rc::Rc};

use log::debug;
use salesboard_api_types::{PaymentMethod, Sale};

use crate::{
    components::table::{
        contains_ignore_case, sort_rows, ColumnVisibility, Pagination, RowSelection, SortDirection,
        Sortable, Sorting,
    },
    error::PersistError,
    global_state::{
        sales::{SalesStore, Subscription},
        toasts::Toasts,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SaleColumn {
    Id,
    Timestamp,
    Seller,
    Amount,
    PaymentMethod,
}

impl SaleColumn {
    pub const ALL: [SaleColumn; 5] = [
        SaleColumn::Id,
        SaleColumn::Timestamp,
        SaleColumn::Seller,
        SaleColumn::Amount,
        SaleColumn::PaymentMethod,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SaleColumn::Id => "ID",
            SaleColumn::Timestamp => "Date",
            SaleColumn::Seller => "Seller",
            SaleColumn::Amount => "Amount",
            SaleColumn::PaymentMethod => "Payment method",
        }
    }
}

impl Sortable for Sale {
    type Column = SaleColumn;

    fn compare_by(&self, other: &Self, column: SaleColumn) -> Ordering {
        match column {
            SaleColumn::Id => self.id.cmp(&other.id),
            SaleColumn::Timestamp => self.timestamp.cmp(&other.timestamp),
            SaleColumn::Seller => self
                .seller_name
                .to_lowercase()
                .cmp(&other.seller_name.to_lowercase()),
            SaleColumn::Amount => self.amount.cmp(&other.amount),
            SaleColumn::PaymentMethod => self.payment_method.cmp(&other.payment_method),
        }
    }
}

#[derive(Clone, Debug)]
struct TableState {
    sorting: Sorting<SaleColumn>,
    seller_filter: String,
    method_filter: Option<PaymentMethod>,
    columns: ColumnVisibility<SaleColumn>,
    selection: RowSelection,
    pagination: Pagination,
}

/// Sorting, filtering, paging and selection over the sales store.
///
/// Any change to the store clears the selection and returns to the first page.
pub struct SalesTable {
    store: SalesStore,
    toasts: Toasts,
    state: Rc<RefCell<TableState>>,
    _subscription: Subscription,
}

impl std::fmt::Debug for SalesTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesTable")
            .field("state", &self.state.borrow())
            .finish()
    }
}

impl SalesTable {
    pub fn new(store: SalesStore, toasts: Toasts, page_size: usize) -> Self {
        let state = Rc::new(RefCell::new(TableState {
            sorting: Sorting::new(SaleColumn::Timestamp, SortDirection::Descending),
            seller_filter: String::new(),
            method_filter: None,
            columns: ColumnVisibility::new([SaleColumn::Id]),
            selection: RowSelection::default(),
            pagination: Pagination::new(page_size),
        }));
        let subscription = store.subscribe({
            let state = Rc::downgrade(&state);
            move |_| {
                if let Some(state) = state.upgrade() {
                    let mut state = state.borrow_mut();
                    state.selection.clear();
                    state.pagination.reset();
                }
            }
        });
        Self {
            store,
            toasts,
            state,
            _subscription: subscription,
        }
    }

    pub fn sorting(&self) -> Sorting<SaleColumn> {
        self.state.borrow().sorting
    }

    pub fn toggle_sort(&self, column: SaleColumn) {
        self.state.borrow_mut().sorting.toggle(column);
    }

    pub fn set_seller_filter(&self, filter: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        state.seller_filter = filter.into();
        state.pagination.reset();
    }

    pub fn set_payment_method_filter(&self, method: Option<PaymentMethod>) {
        let mut state = self.state.borrow_mut();
        state.method_filter = method;
        state.pagination.reset();
    }

    /// Every row passing the filters, in display order.
    pub fn rows(&self) -> Vec<Sale> {
        let sales = self.store.sales();
        let state = self.state.borrow();
        let mut rows: Vec<Sale> = sales
            .iter()
            .filter(|sale| contains_ignore_case(&sale.seller_name, &state.seller_filter))
            .filter(|sale| {
                state
                    .method_filter
                    .map_or(true, |method| sale.payment_method == method)
            })
            .cloned()
            .collect();
        sort_rows(&mut rows, state.sorting);
        rows
    }

    pub fn page_rows(&self) -> Vec<Sale> {
        let rows = self.rows();
        self.state.borrow().pagination.slice(&rows).to_vec()
    }

    pub fn page(&self) -> usize {
        self.state.borrow().pagination.page
    }

    pub fn page_count(&self) -> usize {
        let rows = self.rows().len();
        self.state.borrow().pagination.page_count(rows)
    }

    pub fn can_previous(&self) -> bool {
        self.state.borrow().pagination.can_previous()
    }

    pub fn can_next(&self) -> bool {
        let rows = self.rows().len();
        self.state.borrow().pagination.can_next(rows)
    }

    pub fn next_page(&self) {
        let rows = self.rows().len();
        self.state.borrow_mut().pagination.next(rows);
    }

    pub fn previous_page(&self) {
        self.state.borrow_mut().pagination.previous();
    }

    pub fn is_column_visible(&self, column: SaleColumn) -> bool {
        self.state.borrow().columns.is_visible(column)
    }

    pub fn toggle_column(&self, column: SaleColumn) {
        self.state.borrow_mut().columns.toggle(column);
    }

    pub fn visible_columns(&self) -> Vec<SaleColumn> {
        self.state
            .borrow()
            .columns
            .visible(&SaleColumn::ALL)
            .collect()
    }

    pub fn toggle_row(&self, id: &str) {
        self.state.borrow_mut().selection.toggle(id);
    }

    /// Header checkbox, covers the current page.
    pub fn toggle_page_selection(&self) {
        let page = self.page_rows();
        self.state
            .borrow_mut()
            .selection
            .toggle_all(page.iter().map(|sale| sale.id.as_str()));
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.state.borrow().selection.is_selected(id)
    }

    pub fn selected_count(&self) -> usize {
        self.state.borrow().selection.len()
    }

    pub fn selection_summary(&self) -> String {
        let rows = self.rows().len();
        self.state.borrow().selection.summary(rows)
    }

    /// Row action. `None` when no sale has this id, otherwise the outcome of
    /// mirroring the removal. The row is gone either way.
    pub fn delete_row(&self, id: &str) -> Option<Result<(), PersistError>> {
        self.store.get(id)?;
        debug!("deleting sale {id} from the table");
        let persisted = self.store.remove(id);
        self.toasts.success(format!("Sale {id} deleted"));
        Some(persisted)
    }

    /// Row action. The id to put on the clipboard.
    pub fn copy_id(&self, id: &str) -> Option<String> {
        let sale = self.store.get(id)?;
        self.toasts.info(format!("Copied {}", sale.id));
        Some(sale.id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        config::ToastDurations,
        error::StorageError,
        global_state::{
            persistence::{SalesMirror, DEFAULT_STORAGE_KEY},
            storage::MemoryStorage,
        },
    };
    use salesboard_api_types::seed::seed_sales;

    fn table(page_size: usize) -> (SalesTable, SalesStore, Toasts) {
        let (store, _) = SalesStore::load(SalesMirror::detached());
        let toasts = Toasts::new(ToastDurations::default());
        let table = SalesTable::new(store.clone(), toasts.clone(), page_size);
        (table, store, toasts)
    }

    fn ids(rows: &[Sale]) -> Vec<&str> {
        rows.iter().map(|sale| sale.id.as_str()).collect()
    }

    #[test]
    fn newest_first_by_default() {
        let (table, _, _) = table(10);
        let rows = table.rows();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].id, "V003");
        assert_eq!(rows[9].id, "V010");
        assert_eq!(
            table.sorting(),
            Sorting::new(SaleColumn::Timestamp, SortDirection::Descending)
        );
    }

    #[test]
    fn header_toggle_sorts_ascending_first() {
        let (table, _, _) = table(10);
        table.toggle_sort(SaleColumn::Amount);
        assert_eq!(table.rows()[0].amount, 56_000);
        table.toggle_sort(SaleColumn::Amount);
        assert_eq!(table.rows()[0].amount, 320_000);
    }

    #[test]
    fn filters_combine() {
        let (table, _, _) = table(10);
        table.set_seller_filter("MARÍA");
        assert_eq!(ids(&table.rows()), vec!["V002", "V008"]);
        table.set_seller_filter("");
        table.set_payment_method_filter(Some(PaymentMethod::Credit));
        assert_eq!(table.rows().len(), 3);
        table.set_seller_filter("laura");
        assert_eq!(ids(&table.rows()), vec!["V006"]);
    }

    #[test]
    fn paging() {
        let (table, _, _) = table(4);
        assert_eq!(table.page_count(), 3);
        assert!(!table.can_previous());
        table.next_page();
        table.next_page();
        table.next_page();
        assert_eq!(table.page(), 2);
        assert!(!table.can_next());
        assert_eq!(table.page_rows().len(), 2);
        table.set_seller_filter("juan");
        assert_eq!(table.page(), 0);
    }

    #[test]
    fn store_changes_reset_selection_and_page() {
        let (table, store, _) = table(4);
        table.next_page();
        table.toggle_row("V001");
        table.toggle_row("V002");
        assert_eq!(table.selection_summary(), "2 of 10 row(s) selected.");

        let sale = Sale::new(
            "V0011",
            Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap(),
            "Usuario Ejemplo",
            1_000,
            PaymentMethod::Cash,
        );
        store.add(sale).unwrap();
        assert_eq!(table.page(), 0);
        assert_eq!(table.selected_count(), 0);
        assert_eq!(table.rows()[0].id, "V0011");
    }

    #[test]
    fn page_selection_covers_the_visible_rows() {
        let (table, _, _) = table(3);
        table.toggle_page_selection();
        assert_eq!(table.selected_count(), 3);
        assert!(table.is_selected("V003"));
        table.toggle_page_selection();
        assert_eq!(table.selected_count(), 0);
    }

    #[test]
    fn delete_row_removes_and_notifies() {
        let (table, store, toasts) = table(10);
        assert!(matches!(table.delete_row("V003"), Some(Ok(()))));
        assert_eq!(store.len(), 9);
        assert!(store.get("V003").is_none());
        assert_eq!(toasts.last().unwrap().message, "Sale V003 deleted");

        assert!(table.delete_row("V003").is_none());
        assert_eq!(toasts.len(), 1);
    }

    #[test]
    fn delete_row_reports_a_failed_write() {
        let (store, _) = SalesStore::load(SalesMirror::attached(
            MemoryStorage::with_quota(16),
            DEFAULT_STORAGE_KEY,
        ));
        let toasts = Toasts::default();
        let table = SalesTable::new(store.clone(), toasts.clone(), 10);

        let outcome = table.delete_row("V003");
        assert!(matches!(
            outcome,
            Some(Err(PersistError::Storage(StorageError::QuotaExceeded { .. })))
        ));
        assert_eq!(store.len(), 9);
        assert!(table.rows().iter().all(|sale| sale.id != "V003"));
        assert!(store.persistence_error().is_some());
    }

    #[test]
    fn columns_and_copy() {
        let (table, _, _) = table(10);
        table.toggle_column(SaleColumn::Id);
        table.toggle_column(SaleColumn::Seller);
        assert!(table.is_column_visible(SaleColumn::Id));
        assert_eq!(table.visible_columns().len(), 4);
        assert_eq!(table.copy_id("V005").as_deref(), Some("V005"));
        assert_eq!(table.copy_id("V999"), None);
    }

    #[test]
    fn dropping_the_table_unsubscribes() {
        let (table, store, _) = table(10);
        assert_eq!(store.subscriber_count(), 1);
        drop(table);
        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(*store.sales(), seed_sales());
    }
}

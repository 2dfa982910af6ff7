use std::rc::Rc;

use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use salesboard_api_types::PaymentMethod;

use crate::{
    analysis::{self, ChartRange, DailyTotal, MonthlyMethodTotals, SalesSummary, SellerTotal},
    components::{sale_form::SaleForm, sales_table::SalesTable, users_table::UsersTable},
    config::DashboardConfig,
    error::{AppResult, PersistError},
    global_state::{
        persistence::{LoadOutcome, SalesMirror},
        sale_ids::SaleIdGenerator,
        sales::SalesStore,
        storage::{browser_storage, KeyValueStorage},
        toasts::Toasts,
    },
};

/// Wires the store, its storage mirror and the toast queue together and
/// hands out the views built on top of them.
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    store: SalesStore,
    toasts: Toasts,
    ids: Rc<SaleIdGenerator>,
    load_outcome: LoadOutcome,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, storage: Option<Rc<dyn KeyValueStorage>>) -> Self {
        let mirror = SalesMirror::new(storage, config.storage_key.clone());
        let (store, load_outcome) = SalesStore::load(mirror);
        info!("dashboard started with {} sales ({load_outcome:?})", store.len());
        let ids = Rc::new(SaleIdGenerator::continuing_from(
            config.id_prefix.clone(),
            &store.sales(),
        ));
        let toasts = Toasts::new(config.toast_durations);
        Self {
            config,
            store,
            toasts,
            ids,
            load_outcome,
        }
    }

    /// Backed by `localStorage` when the browser offers it.
    pub fn in_browser(config: DashboardConfig) -> Self {
        Self::new(config, browser_storage())
    }

    pub fn from_env() -> AppResult<Self> {
        let config = DashboardConfig::from_env()?;
        Ok(Self::in_browser(config))
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn store(&self) -> &SalesStore {
        &self.store
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn persistence_error(&self) -> Option<PersistError> {
        self.store.persistence_error()
    }

    pub fn sale_form(&self) -> SaleForm {
        SaleForm::new(
            self.store.clone(),
            self.toasts.clone(),
            self.ids.clone(),
            self.config.seller_name.clone(),
        )
    }

    pub fn sales_table(&self) -> SalesTable {
        SalesTable::new(self.store.clone(), self.toasts.clone(), self.config.page_size)
    }

    pub fn users_table(&self) -> UsersTable {
        UsersTable::seeded(self.config.page_size)
    }

    pub fn summary(&self, now: DateTime<Utc>) -> SalesSummary {
        analysis::summarize(&self.store.sales(), now)
    }

    pub fn daily_chart(&self, range: ChartRange, end: NaiveDate) -> Vec<DailyTotal> {
        analysis::daily_totals(&self.store.sales(), range, end)
    }

    pub fn monthly_chart(&self) -> Vec<MonthlyMethodTotals> {
        analysis::monthly_by_payment_method(&self.store.sales())
    }

    pub fn payment_method_totals(&self) -> Vec<(PaymentMethod, u64)> {
        analysis::totals_by_payment_method(&self.store.sales())
    }

    pub fn sales_by_seller(&self) -> Vec<SellerTotal> {
        analysis::totals_by_seller(&self.store.sales())
    }
}

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use log::debug;
use salesboard_api_types::{seed::seed_sales, Sale, SalePatch};

use crate::{
    error::PersistError,
    global_state::persistence::{LoadOutcome, SalesMirror},
};

/// Immutable view of the collection at one point in time. Every committed
/// change produces a new snapshot, so `Rc::ptr_eq` tells whether anything moved.
pub type SalesSnapshot = Rc<Vec<Sale>>;

type Listener = Rc<dyn Fn(&SalesSnapshot)>;

struct StoreState {
    sales: SalesSnapshot,
    listeners: Vec<(u64, Listener)>,
    next_listener: u64,
    last_persist_error: Option<PersistError>,
}

/// Single source of truth for the sales collection.
///
/// Cloning yields another handle onto the same collection; hand a clone to each
/// consumer at construction time. Each mutation commits in memory, mirrors the
/// whole collection to storage, then notifies subscribers, all before returning.
#[derive(Clone)]
pub struct SalesStore {
    state: Rc<RefCell<StoreState>>,
    mirror: Rc<SalesMirror>,
}

impl std::fmt::Debug for SalesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SalesStore")
            .field("sales", &state.sales.len())
            .field("listeners", &state.listeners.len())
            .field("mirror", &self.mirror)
            .finish()
    }
}

impl SalesStore {
    /// Starts from whatever the mirror holds, or the seed sales.
    pub fn load(mirror: SalesMirror) -> (Self, LoadOutcome) {
        let (sales, outcome) = mirror.load_or_seed(seed_sales);
        (Self::with_sales(mirror, sales), outcome)
    }

    /// Starts from `sales` without reading storage.
    pub fn with_sales(mirror: SalesMirror, sales: Vec<Sale>) -> Self {
        Self {
            state: Rc::new(RefCell::new(StoreState {
                sales: Rc::new(sales),
                listeners: Vec::new(),
                next_listener: 0,
                last_persist_error: None,
            })),
            mirror: Rc::new(mirror),
        }
    }

    pub fn sales(&self) -> SalesSnapshot {
        self.state.borrow().sales.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<Sale> {
        self.state
            .borrow()
            .sales
            .iter()
            .find(|sale| sale.id == id)
            .cloned()
    }

    pub fn mirror(&self) -> &SalesMirror {
        &self.mirror
    }

    /// The error from the most recent mirror write, cleared by the next good write.
    pub fn persistence_error(&self) -> Option<PersistError> {
        self.state.borrow().last_persist_error.clone()
    }

    /// Puts `sale` at the head of the collection. The store does not validate.
    ///
    /// An `Err` only means the storage copy is stale; the sale is held regardless.
    pub fn add(&self, sale: Sale) -> Result<(), PersistError> {
        debug!("adding sale {}", sale.id);
        let current = self.sales();
        let mut next = Vec::with_capacity(current.len() + 1);
        next.push(sale);
        next.extend(current.iter().cloned());
        self.commit(next)
    }

    /// Drops every sale with this id. Unknown ids change nothing.
    pub fn remove(&self, id: &str) -> Result<(), PersistError> {
        let current = self.sales();
        if !current.iter().any(|sale| sale.id == id) {
            debug!("remove ignored, no sale {id}");
            return Ok(());
        }
        debug!("removing sale {id}");
        let next = current
            .iter()
            .filter(|sale| sale.id != id)
            .cloned()
            .collect();
        self.commit(next)
    }

    /// Merges `patch` into the sale with this id. Unknown ids change nothing.
    pub fn update(&self, id: &str, patch: &SalePatch) -> Result<(), PersistError> {
        let current = self.sales();
        let next: Vec<Sale> = current
            .iter()
            .map(|sale| {
                let mut sale = sale.clone();
                if sale.id == id {
                    sale.apply(patch);
                }
                sale
            })
            .collect();
        if next == *current {
            debug!("update of {id} changed nothing");
            return Ok(());
        }
        debug!("updating sale {id}");
        self.commit(next)
    }

    /// Calls `listener` with the new snapshot after every committed change.
    /// The listener stays registered until the returned handle is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&SalesSnapshot) + 'static) -> Subscription {
        let listener: Listener = Rc::new(listener);
        let mut state = self.state.borrow_mut();
        let id = state.next_listener;
        state.next_listener += 1;
        state.listeners.push((id, listener));
        Subscription {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    fn commit(&self, next: Vec<Sale>) -> Result<(), PersistError> {
        let snapshot: SalesSnapshot = Rc::new(next);
        self.state.borrow_mut().sales = snapshot.clone();

        let saved = self.mirror.save_logged(&snapshot).map(|_| ());
        let listeners: Vec<Listener> = {
            let mut state = self.state.borrow_mut();
            state.last_persist_error = saved.as_ref().err().cloned();
            state
                .listeners
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect()
        };
        // no borrow is held here, listeners may read or mutate the store
        for listener in listeners {
            listener(&snapshot);
        }
        saved
    }
}

/// Keeps a store listener registered. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    state: Weak<RefCell<StoreState>>,
}

impl Subscription {
    /// Keeps the listener for as long as the store lives.
    pub fn detach(mut self) {
        self.state = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

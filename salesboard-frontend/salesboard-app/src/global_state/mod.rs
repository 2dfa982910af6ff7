pub mod persistence;
pub mod sale_ids;
pub mod sales;
pub mod storage;
pub mod toasts;

pub use persistence::{LoadOutcome, SalesMirror, SaveOutcome, SeedReason};
pub use sale_ids::SaleIdGenerator;
pub use sales::{SalesSnapshot, SalesStore, Subscription};
pub use storage::{browser_storage, KeyValueStorage, MemoryStorage};
pub use toasts::{Toast, ToastLevel, Toasts};

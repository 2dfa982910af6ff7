use std::rc::Rc;

use log::{debug, error, info, warn};
use salesboard_api_types::Sale;

use crate::{
    error::{LoadError, PersistError},
    global_state::storage::KeyValueStorage,
};

pub const DEFAULT_STORAGE_KEY: &str = "dashboard-sales";

pub fn encode_sales(sales: &[Sale]) -> Result<String, serde_json::Error> {
    serde_json::to_string(sales)
}

/// Timestamps are revived from their string form by `Sale`'s deserializer.
pub fn decode_sales(raw: &str) -> Result<Vec<Sale>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Where the starting collection came from.
#[derive(Clone, Debug)]
pub enum LoadOutcome {
    Restored { count: usize },
    Seeded(SeedReason),
}

#[derive(Clone, Debug)]
pub enum SeedReason {
    NoStorage,
    NothingStored,
    Unreadable(LoadError),
}

impl LoadOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, LoadOutcome::Restored { .. })
    }

    /// True when something was stored but could not be used.
    pub fn is_degraded(&self) -> bool {
        matches!(self, LoadOutcome::Seeded(SeedReason::Unreadable(_)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Written { bytes: usize },
    /// No storage is attached, the collection only lives in memory.
    Detached,
}

/// One-way mirror of the sales collection into a single storage slot.
#[derive(Clone)]
pub struct SalesMirror {
    storage: Option<Rc<dyn KeyValueStorage>>,
    key: String,
}

impl std::fmt::Debug for SalesMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesMirror")
            .field("attached", &self.storage.is_some())
            .field("key", &self.key)
            .finish()
    }
}

impl SalesMirror {
    pub fn new(storage: Option<Rc<dyn KeyValueStorage>>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn attached(storage: impl KeyValueStorage + 'static, key: impl Into<String>) -> Self {
        Self::new(Some(Rc::new(storage)), key)
    }

    pub fn detached() -> Self {
        Self::new(None, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_attached(&self) -> bool {
        self.storage.is_some()
    }

    /// `Ok(None)` when there is no storage or the slot is empty.
    pub fn read(&self) -> Result<Option<Vec<Sale>>, LoadError> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        match storage.get_item(&self.key)? {
            Some(raw) if !raw.trim().is_empty() => Ok(Some(decode_sales(&raw)?)),
            _ => Ok(None),
        }
    }

    /// Reads the slot, falling back to `seed` when nothing usable is stored.
    pub fn load_or_seed(&self, seed: impl FnOnce() -> Vec<Sale>) -> (Vec<Sale>, LoadOutcome) {
        if self.storage.is_none() {
            debug!("no storage attached, starting from seed sales");
            return (seed(), LoadOutcome::Seeded(SeedReason::NoStorage));
        }
        match self.read() {
            Ok(Some(sales)) => {
                info!("restored {} sales from {}", sales.len(), self.key);
                let count = sales.len();
                (sales, LoadOutcome::Restored { count })
            }
            Ok(None) => {
                debug!("nothing stored under {}, starting from seed sales", self.key);
                (seed(), LoadOutcome::Seeded(SeedReason::NothingStored))
            }
            Err(e) => {
                warn!("ignoring stored sales under {}: {e}", self.key);
                (seed(), LoadOutcome::Seeded(SeedReason::Unreadable(e)))
            }
        }
    }

    pub fn save(&self, sales: &[Sale]) -> Result<SaveOutcome, PersistError> {
        let Some(storage) = &self.storage else {
            return Ok(SaveOutcome::Detached);
        };
        let encoded = encode_sales(sales)?;
        storage.set_item(&self.key, &encoded)?;
        Ok(SaveOutcome::Written {
            bytes: encoded.len(),
        })
    }

    /// Like [`SalesMirror::save`] but also reports failures to the log.
    pub(crate) fn save_logged(&self, sales: &[Sale]) -> Result<SaveOutcome, PersistError> {
        let saved = self.save(sales);
        if let Err(e) = &saved {
            error!("error saving {} sales under {}: {e}", sales.len(), self.key);
        }
        saved
    }

    pub fn clear(&self) -> Result<(), LoadError> {
        if let Some(storage) = &self.storage {
            storage.remove_item(&self.key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::StorageError, global_state::storage::MemoryStorage};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use salesboard_api_types::{seed::seed_sales, PaymentMethod};

    fn arb_sale() -> impl Strategy<Value = Sale> {
        (
            "V[0-9]{1,6}",
            0i64..4_102_444_800_000,
            "[a-zA-Z áéíóúñ]{0,20}",
            1u64..10_000_000_000,
            prop_oneof![
                Just(PaymentMethod::Cash),
                Just(PaymentMethod::Debit),
                Just(PaymentMethod::Credit),
            ],
        )
            .prop_map(|(id, millis, seller, amount, method)| {
                let timestamp = Utc.timestamp_millis_opt(millis).unwrap();
                Sale::new(id, timestamp, seller, amount, method)
            })
    }

    proptest! {
        #[test]
        fn round_trip_reproduces_the_collection(sales in prop::collection::vec(arb_sale(), 0..20)) {
            let decoded = decode_sales(&encode_sales(&sales).unwrap()).unwrap();
            prop_assert_eq!(decoded, sales);
        }
    }

    #[test]
    fn first_start_uses_seed() {
        let mirror = SalesMirror::attached(MemoryStorage::new(), DEFAULT_STORAGE_KEY);
        let (sales, outcome) = mirror.load_or_seed(seed_sales);
        assert_eq!(sales, seed_sales());
        assert!(matches!(outcome, LoadOutcome::Seeded(SeedReason::NothingStored)));
    }

    #[test]
    fn detached_mirror_seeds_and_skips_writes() {
        let mirror = SalesMirror::detached();
        let (sales, outcome) = mirror.load_or_seed(seed_sales);
        assert_eq!(sales.len(), 10);
        assert!(matches!(outcome, LoadOutcome::Seeded(SeedReason::NoStorage)));
        assert_eq!(mirror.save(&sales).unwrap(), SaveOutcome::Detached);
    }

    #[test]
    fn corrupt_slot_falls_back_to_seed() {
        let storage = MemoryStorage::new();
        storage.set_item(DEFAULT_STORAGE_KEY, "[{\"id\":").unwrap();
        let mirror = SalesMirror::attached(storage, DEFAULT_STORAGE_KEY);
        let (sales, outcome) = mirror.load_or_seed(seed_sales);
        assert_eq!(sales, seed_sales());
        assert!(outcome.is_degraded());
    }

    #[test]
    fn empty_string_counts_as_nothing_stored() {
        let storage = MemoryStorage::new();
        storage.set_item(DEFAULT_STORAGE_KEY, "").unwrap();
        let mirror = SalesMirror::attached(storage, DEFAULT_STORAGE_KEY);
        let (_, outcome) = mirror.load_or_seed(seed_sales);
        assert!(matches!(outcome, LoadOutcome::Seeded(SeedReason::NothingStored)));
    }

    #[test]
    fn stored_empty_list_is_respected() {
        let storage = MemoryStorage::new();
        storage.set_item(DEFAULT_STORAGE_KEY, "[]").unwrap();
        let mirror = SalesMirror::attached(storage, DEFAULT_STORAGE_KEY);
        let (sales, outcome) = mirror.load_or_seed(seed_sales);
        assert!(sales.is_empty());
        assert!(outcome.is_restored());
    }

    #[test]
    fn revives_offsetless_timestamps() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                DEFAULT_STORAGE_KEY,
                r#"[{"id":"V9","timestamp":"2025-05-09T08:30:00","sellerName":"Juan","amount":10,"paymentMethod":"debit"}]"#,
            )
            .unwrap();
        let mirror = SalesMirror::attached(storage, DEFAULT_STORAGE_KEY);
        let sales = mirror.read().unwrap().unwrap();
        assert_eq!(
            sales[0].timestamp,
            Utc.with_ymd_and_hms(2025, 5, 9, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn quota_failure_is_reported() {
        let mirror = SalesMirror::attached(MemoryStorage::with_quota(32), DEFAULT_STORAGE_KEY);
        let err = mirror.save(&seed_sales()).unwrap_err();
        assert!(matches!(
            err,
            PersistError::Storage(StorageError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn save_then_read_and_clear() {
        let storage = MemoryStorage::new();
        let mirror = SalesMirror::attached(storage.clone(), "custom-key");
        let outcome = mirror.save(&seed_sales()).unwrap();
        assert!(matches!(outcome, SaveOutcome::Written { bytes } if bytes == storage.used_bytes() - "custom-key".len()));
        assert_eq!(mirror.read().unwrap(), Some(seed_sales()));
        mirror.clear().unwrap();
        assert_eq!(mirror.read().unwrap(), None);
    }
}

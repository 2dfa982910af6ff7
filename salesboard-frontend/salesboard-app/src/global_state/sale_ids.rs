use std::cell::Cell;

use salesboard_api_types::Sale;

/// Hands out readable sale ids (`V0011`, `V0012`, ...) from a counter that starts
/// past the highest numbered id already held, so ids never repeat within a session.
#[derive(Debug)]
pub struct SaleIdGenerator {
    prefix: String,
    /// `None` once every number has been handed out
    next: Cell<Option<u64>>,
}

impl SaleIdGenerator {
    pub fn new(prefix: impl Into<String>, next: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(Some(next)),
        }
    }

    pub fn continuing_from(prefix: impl Into<String>, sales: &[Sale]) -> Self {
        let prefix = prefix.into();
        let highest = sales
            .iter()
            .filter_map(|sale| sale.id.strip_prefix(prefix.as_str()))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            prefix,
            next: Cell::new(highest.checked_add(1)),
        }
    }

    /// `None` when the counter has run past `u64::MAX`.
    pub fn next_id(&self) -> Option<String> {
        let number = self.next.get()?;
        self.next.set(number.checked_add(1));
        Some(format!("{}{:04}", self.prefix, number))
    }

    pub fn peek(&self) -> Option<u64> {
        self.next.get()
    }
}

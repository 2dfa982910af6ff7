use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::global_state::persistence::DEFAULT_STORAGE_KEY;

/// How long each toast level stays up, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToastDurations {
    pub info: u64,
    pub success: u64,
    pub warning: u64,
    pub error: u64,
}

impl Default for ToastDurations {
    fn default() -> Self {
        Self {
            info: 3000,
            success: 3000,
            warning: 5000,
            error: 5000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Storage slot the sales collection is mirrored into
    pub storage_key: String,
    /// Prefix for generated sale ids
    pub id_prefix: String,
    /// Seller recorded on sales entered through the form
    pub seller_name: String,
    /// Rows per table page
    pub page_size: usize,
    pub toast_durations: ToastDurations,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            id_prefix: "V".to_string(),
            seller_name: "Usuario Ejemplo".to_string(),
            page_size: 10,
            toast_durations: ToastDurations::default(),
        }
    }
}

impl DashboardConfig {
    /// Parses a settings blob. Missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("Failed to parse dashboard settings")?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by the `SALESBOARD_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(key) = lookup("SALESBOARD_STORAGE_KEY") {
            self.storage_key = key;
        }
        if let Some(prefix) = lookup("SALESBOARD_ID_PREFIX") {
            self.id_prefix = prefix;
        }
        if let Some(seller) = lookup("SALESBOARD_SELLER_NAME") {
            self.seller_name = seller;
        }
        if let Some(page_size) = lookup("SALESBOARD_PAGE_SIZE") {
            self.page_size = page_size
                .trim()
                .parse()
                .with_context(|| format!("SALESBOARD_PAGE_SIZE {page_size:?} is not a number"))?;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.page_size > 0, "page size must be at least 1");
        ensure!(!self.storage_key.trim().is_empty(), "storage key must not be empty");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.storage_key, "dashboard-sales");
        assert_eq!(config.id_prefix, "V");
        assert_eq!(config.seller_name, "Usuario Ejemplo");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.toast_durations.error, 5000);
    }

    #[test]
    fn json_fills_missing_fields() {
        let config =
            DashboardConfig::from_json(r#"{"pageSize": 25, "toastDurations": {"success": 1000}}"#)
                .unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.toast_durations.success, 1000);
        assert_eq!(config.toast_durations.warning, 5000);
        assert_eq!(config.storage_key, "dashboard-sales");
    }

    #[test]
    fn json_rejects_zero_page_size() {
        assert!(DashboardConfig::from_json(r#"{"pageSize": 0}"#).is_err());
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SALESBOARD_STORAGE_KEY", "other-sales"),
            ("SALESBOARD_PAGE_SIZE", " 5 "),
            ("SALESBOARD_SELLER_NAME", "Caja 2"),
        ]
        .into_iter()
        .collect();
        let config = DashboardConfig::default()
            .with_env_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.storage_key, "other-sales");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.seller_name, "Caja 2");
        assert_eq!(config.id_prefix, "V");
    }

    #[test]
    fn bad_page_size_is_reported() {
        let err = DashboardConfig::default()
            .with_env_overrides(|name| (name == "SALESBOARD_PAGE_SIZE").then(|| "ten".to_string()))
            .unwrap_err();
        assert!(format!("{err:#}").starts_with("SALESBOARD_PAGE_SIZE \"ten\" is not a number"));
    }
}

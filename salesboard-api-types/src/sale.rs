use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown payment method {0:?}")]
pub struct UnknownPaymentMethod(pub String);

/// How a sale was paid. The set is closed; anything else is rejected when parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Debit,
    Credit,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Debit,
        PaymentMethod::Credit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Credit => "credit",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "debit" => Ok(PaymentMethod::Debit),
            "credit" => Ok(PaymentMethod::Credit),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// One completed transaction as held by the sales store and written to storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub seller_name: String,
    /// Whole currency units, there are no cents.
    pub amount: u64,
    pub payment_method: PaymentMethod,
}

impl Sale {
    /// Builds a sale with its timestamp truncated to the millisecond precision
    /// it will have after a trip through storage.
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        seller_name: impl Into<String>,
        amount: u64,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.trunc_subsecs(3),
            seller_name: seller_name.into(),
            amount,
            payment_method,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.amount > 0 && !self.id.is_empty()
    }

    /// Merges every field the patch carries. The id is never patched.
    pub fn apply(&mut self, patch: &SalePatch) {
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp.trunc_subsecs(3);
        }
        if let Some(seller_name) = &patch.seller_name {
            self.seller_name.clone_from(seller_name);
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(payment_method) = patch.payment_method {
            self.payment_method = payment_method;
        }
    }
}

/// Partial update for a [`Sale`]; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SalePatch {
    pub timestamp: Option<DateTime<Utc>>,
    pub seller_name: Option<String>,
    pub amount: Option<u64>,
    pub payment_method: Option<PaymentMethod>,
}

impl SalePatch {
    /// Truncated to milliseconds like [`Sale::new`].
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp.trunc_subsecs(3));
        self
    }

    pub fn seller_name(mut self, seller_name: impl Into<String>) -> Self {
        self.seller_name = Some(seller_name.into());
        self
    }

    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = Some(payment_method);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.timestamp.is_none()
            && self.seller_name.is_none()
            && self.amount.is_none()
            && self.payment_method.is_none()
    }
}

/// Timestamps are written as `2025-05-09T08:30:00.000Z`. Reading also accepts any
/// RFC 3339 offset, offset-less date-times and bare dates, all taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, ParseError, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, ParseError> {
        let raw = raw.trim();
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Ok(with_offset.with_timezone(&Utc));
        }
        match raw.parse::<NaiveDateTime>() {
            Ok(naive) => Ok(naive.and_utc()),
            Err(e) => raw
                .parse::<NaiveDate>()
                .map(|date| date.and_time(chrono::NaiveTime::default()).and_utc())
                .map_err(|_| e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sale() -> Sale {
        Sale::new(
            "V0001",
            Utc.with_ymd_and_hms(2025, 5, 9, 8, 30, 0).unwrap(),
            "Juan Pérez",
            125_000,
            PaymentMethod::Cash,
        )
    }

    #[test]
    fn payment_method_parses_case_insensitively() {
        assert_eq!("Cash".parse::<PaymentMethod>(), Ok(PaymentMethod::Cash));
        assert_eq!(" debit ".parse::<PaymentMethod>(), Ok(PaymentMethod::Debit));
        assert_eq!("CREDIT".parse::<PaymentMethod>(), Ok(PaymentMethod::Credit));
        assert!("cheque".parse::<PaymentMethod>().is_err());
        assert!("".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn sale_serializes_with_camel_case_and_iso_timestamp() {
        let json = serde_json::to_value(sale()).unwrap();
        assert_eq!(json["id"], "V0001");
        assert_eq!(json["timestamp"], "2025-05-09T08:30:00.000Z");
        assert_eq!(json["sellerName"], "Juan Pérez");
        assert_eq!(json["amount"], 125_000);
        assert_eq!(json["paymentMethod"], "cash");
    }

    #[test]
    fn timestamp_revives_from_several_shapes() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 9, 8, 30, 0).unwrap();
        assert_eq!(timestamp::parse("2025-05-09T08:30:00.000Z").unwrap(), expected);
        assert_eq!(timestamp::parse("2025-05-09T04:30:00-04:00").unwrap(), expected);
        assert_eq!(timestamp::parse("2025-05-09T08:30:00").unwrap(), expected);
        assert_eq!(
            timestamp::parse("2025-05-09").unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 9, 0, 0, 0).unwrap()
        );
        assert!(timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn new_truncates_to_milliseconds() {
        let precise = Utc.with_ymd_and_hms(2025, 5, 9, 8, 30, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let sale = Sale::new("V1", precise, "x", 1, PaymentMethod::Debit);
        assert_eq!(sale.timestamp.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut sale = sale();
        sale.apply(&SalePatch::default().amount(5_000));
        assert_eq!(sale.amount, 5_000);
        assert_eq!(sale.payment_method, PaymentMethod::Cash);
        assert_eq!(sale.seller_name, "Juan Pérez");

        sale.apply(
            &SalePatch::default()
                .seller_name("Ana Martínez")
                .payment_method(PaymentMethod::Credit),
        );
        assert_eq!(sale.seller_name, "Ana Martínez");
        assert_eq!(sale.payment_method, PaymentMethod::Credit);
        assert_eq!(sale.id, "V0001");
    }

    #[test]
    fn patched_timestamp_keeps_storage_precision() {
        let precise = Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(987_654_321);
        let patch = SalePatch::default().timestamp(precise);
        assert_eq!(patch.timestamp.unwrap().timestamp_subsec_nanos(), 987_000_000);

        // a patch built by hand is truncated when applied
        let mut sale = sale();
        sale.apply(&SalePatch {
            timestamp: Some(precise),
            ..SalePatch::default()
        });
        assert_eq!(sale.timestamp.timestamp_subsec_nanos(), 987_000_000);
        let json = serde_json::to_string(&sale).unwrap();
        assert_eq!(serde_json::from_str::<Sale>(&json).unwrap(), sale);
    }

    #[test]
    fn rejects_unknown_payment_method_in_json() {
        let raw = r#"{"id":"V1","timestamp":"2025-05-09T08:30:00.000Z","sellerName":"a","amount":1,"paymentMethod":"cheque"}"#;
        assert!(serde_json::from_str::<Sale>(raw).is_err());
    }
}

use std::{collections::BTreeMap, str::FromStr};

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use itertools::Itertools;
use salesboard_api_types::{PaymentMethod, Sale};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PeriodTotal {
    pub total: u64,
    pub count: usize,
    /// Percent change against the previous period, `None` when that period sold nothing.
    pub change: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SalesSummary {
    pub day: PeriodTotal,
    /// Monday to Sunday
    pub week: PeriodTotal,
    pub month: PeriodTotal,
    pub year: PeriodTotal,
    pub last_sale: Option<DateTime<Utc>>,
}

fn saturating_total<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> u64 {
    sales
        .into_iter()
        .fold(0u64, |total, sale| total.saturating_add(sale.amount))
}

fn total_where(sales: &[Sale], matches: impl Fn(NaiveDate) -> bool) -> (u64, usize) {
    sales
        .iter()
        .filter(|sale| matches(sale.timestamp.date_naive()))
        .fold((0u64, 0usize), |(total, count), sale| {
            (total.saturating_add(sale.amount), count + 1)
        })
}

fn period(current: (u64, usize), previous: (u64, usize)) -> PeriodTotal {
    let change = (previous.0 > 0)
        .then(|| (current.0 as f64 - previous.0 as f64) / previous.0 as f64 * 100.0);
    PeriodTotal {
        total: current.0,
        count: current.1,
        change,
    }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Totals for the day, week, month and year containing `now`, each compared
/// with the period right before it.
pub fn summarize(sales: &[Sale], now: DateTime<Utc>) -> SalesSummary {
    let today = now.date_naive();
    let yesterday = today.pred_opt().unwrap_or(today);
    let week = today.week(Weekday::Mon);
    let (monday, sunday) = (week.first_day(), week.last_day());
    let last_monday = monday.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN);
    let (year, month) = (today.year(), today.month());
    let (last_year, last_month) = previous_month(year, month);

    SalesSummary {
        day: period(
            total_where(sales, |date| date == today),
            total_where(sales, |date| date == yesterday),
        ),
        week: period(
            total_where(sales, |date| (monday..=sunday).contains(&date)),
            total_where(sales, |date| (last_monday..monday).contains(&date)),
        ),
        month: period(
            total_where(sales, |date| date.year() == year && date.month() == month),
            total_where(sales, |date| {
                date.year() == last_year && date.month() == last_month
            }),
        ),
        year: period(
            total_where(sales, |date| date.year() == year),
            total_where(sales, |date| date.year() == year - 1),
        ),
        last_sale: sales.iter().map(|sale| sale.timestamp).max(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown chart range {0:?}, expected 1d, 7d, 30d or 90d")]
pub struct UnknownChartRange(pub String);

/// Window of the daily sales chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChartRange {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
}

impl ChartRange {
    pub const ALL: [ChartRange; 4] = [
        ChartRange::Day,
        ChartRange::Week,
        ChartRange::Month,
        ChartRange::Quarter,
    ];

    pub fn days(&self) -> u64 {
        match self {
            ChartRange::Day => 1,
            ChartRange::Week => 7,
            ChartRange::Month => 30,
            ChartRange::Quarter => 90,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartRange::Day => "1d",
            ChartRange::Week => "7d",
            ChartRange::Month => "30d",
            ChartRange::Quarter => "90d",
        }
    }
}

impl FromStr for ChartRange {
    type Err = UnknownChartRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.as_str() == s.trim())
            .ok_or_else(|| UnknownChartRange(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: u64,
    pub count: usize,
}

/// One point per day of `range`, ending on `end`. Days without sales are zero.
pub fn daily_totals(sales: &[Sale], range: ChartRange, end: NaiveDate) -> Vec<DailyTotal> {
    let start = end
        .checked_sub_days(Days::new(range.days() - 1))
        .unwrap_or(NaiveDate::MIN);
    let by_day = sales
        .iter()
        .filter(|sale| (start..=end).contains(&sale.timestamp.date_naive()))
        .into_group_map_by(|sale| sale.timestamp.date_naive());

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            let day = by_day.get(&date).map(Vec::as_slice).unwrap_or_default();
            DailyTotal {
                date,
                total: saturating_total(day.iter().copied()),
                count: day.len(),
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonthlyMethodTotals {
    pub year: i32,
    pub month: u32,
    pub cash: u64,
    pub debit: u64,
    pub credit: u64,
}

impl MonthlyMethodTotals {
    pub fn get(&self, method: PaymentMethod) -> u64 {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Debit => self.debit,
            PaymentMethod::Credit => self.credit,
        }
    }

    fn add(&mut self, method: PaymentMethod, amount: u64) {
        let slot = match method {
            PaymentMethod::Cash => &mut self.cash,
            PaymentMethod::Debit => &mut self.debit,
            PaymentMethod::Credit => &mut self.credit,
        };
        *slot = slot.saturating_add(amount);
    }
}

/// Bar chart data, oldest month first. Only months with sales appear.
pub fn monthly_by_payment_method(sales: &[Sale]) -> Vec<MonthlyMethodTotals> {
    let mut months: BTreeMap<(i32, u32), MonthlyMethodTotals> = BTreeMap::new();
    for sale in sales {
        let date = sale.timestamp.date_naive();
        let key = (date.year(), date.month());
        months
            .entry(key)
            .or_insert_with(|| MonthlyMethodTotals {
                year: key.0,
                month: key.1,
                ..Default::default()
            })
            .add(sale.payment_method, sale.amount);
    }
    months.into_values().collect()
}

/// Every method in a fixed order, zero when unused.
pub fn totals_by_payment_method(sales: &[Sale]) -> Vec<(PaymentMethod, u64)> {
    let grouped = sales
        .iter()
        .into_group_map_by(|sale| sale.payment_method);
    PaymentMethod::ALL
        .into_iter()
        .map(|method| {
            let total = grouped
                .get(&method)
                .map(|sales| saturating_total(sales.iter().copied()))
                .unwrap_or(0);
            (method, total)
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SellerTotal {
    pub seller_name: String,
    pub total: u64,
    pub count: usize,
}

/// Sales report per seller, biggest total first. The length is the seller count.
pub fn totals_by_seller(sales: &[Sale]) -> Vec<SellerTotal> {
    sales
        .iter()
        .into_group_map_by(|sale| sale.seller_name.clone())
        .into_iter()
        .map(|(seller_name, sales)| SellerTotal {
            seller_name,
            total: saturating_total(sales.iter().copied()),
            count: sales.len(),
        })
        .sorted_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.seller_name.cmp(&b.seller_name))
        })
        .collect()
}

//! Period snapshot model
//!
//! A snapshot holds the aggregated financial facts for one closed date
//! range. It is built once from raw data, sanitized on construction, and
//! read-only afterwards. The balance is always derived from the totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analytics::numeric::{safe_division, safe_number};

/// Income and expenses recorded on a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub expenses: f64,
}

impl DailyEntry {
    pub fn new(date: NaiveDate, income: f64, expenses: f64) -> Self {
        Self {
            date,
            income: non_negative(income),
            expenses: non_negative(expenses),
        }
    }

    /// A day with no activity, used to fill gaps
    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, 0.0, 0.0)
    }

    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Spending attributed to one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    #[serde(default)]
    pub amount: f64,
}

impl CategoryAmount {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount: non_negative(amount),
        }
    }
}

/// Wire shape of a snapshot
///
/// `balance` is accepted for compatibility with exporters that include it,
/// but it is always recomputed from the totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotData {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default)]
    pub transaction_count: u64,
    #[serde(default)]
    pub daily_series: Vec<DailyEntry>,
    #[serde(default)]
    pub category_breakdown: Vec<CategoryAmount>,
}

/// Aggregated financial facts for a closed date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SnapshotData", into = "SnapshotData")]
pub struct PeriodSnapshot {
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_income: f64,
    total_expenses: f64,
    transaction_count: u64,
    daily_series: Vec<DailyEntry>,
    category_breakdown: Vec<CategoryAmount>,
}

impl PeriodSnapshot {
    /// Create an empty snapshot for a date range
    ///
    /// Reversed bounds are swapped.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let (start_date, end_date) = if end_date < start_date {
            (end_date, start_date)
        } else {
            (start_date, end_date)
        };

        Self {
            start_date,
            end_date,
            total_income: 0.0,
            total_expenses: 0.0,
            transaction_count: 0,
            daily_series: Vec::new(),
            category_breakdown: Vec::new(),
        }
    }

    /// Set the period totals
    pub fn with_totals(mut self, total_income: f64, total_expenses: f64) -> Self {
        self.total_income = non_negative(total_income);
        self.total_expenses = non_negative(total_expenses);
        self
    }

    pub fn with_transaction_count(mut self, count: u64) -> Self {
        self.transaction_count = count;
        self
    }

    /// Set the daily series; entries are sorted, merged by date and gap-filled
    pub fn with_daily_series(mut self, series: Vec<DailyEntry>) -> Self {
        self.daily_series = normalize_series(series);
        self
    }

    /// Set the category breakdown; duplicate names are merged
    pub fn with_categories(mut self, categories: Vec<CategoryAmount>) -> Self {
        self.category_breakdown = merge_categories(categories);
        self
    }

    /// Derive the totals from the daily series
    pub fn with_totals_from_series(self) -> Self {
        let income = self.daily_series.iter().map(|d| d.income).sum();
        let expenses = self.daily_series.iter().map(|d| d.expenses).sum();
        self.with_totals(income, expenses)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn total_income(&self) -> f64 {
        self.total_income
    }

    pub fn total_expenses(&self) -> f64 {
        self.total_expenses
    }

    /// Income minus expenses
    pub fn balance(&self) -> f64 {
        self.total_income - self.total_expenses
    }

    pub fn transaction_count(&self) -> u64 {
        self.transaction_count
    }

    pub fn daily_series(&self) -> &[DailyEntry] {
        &self.daily_series
    }

    pub fn category_breakdown(&self) -> &[CategoryAmount] {
        &self.category_breakdown
    }

    /// Number of calendar days covered by the range (inclusive)
    pub fn days_in_range(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Categories sorted by descending amount, ties broken by name
    pub fn categories_by_amount(&self) -> Vec<&CategoryAmount> {
        let mut sorted: Vec<_> = self.category_breakdown.iter().collect();
        sorted.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        sorted
    }

    /// Category with the largest amount
    pub fn top_category(&self) -> Option<&CategoryAmount> {
        self.categories_by_amount().into_iter().next()
    }

    /// Look up a category by exact name
    pub fn category(&self, name: &str) -> Option<&CategoryAmount> {
        self.category_breakdown.iter().find(|c| c.category == name)
    }

    pub fn income_series(&self) -> Vec<f64> {
        self.daily_series.iter().map(|d| d.income).collect()
    }

    pub fn expense_series(&self) -> Vec<f64> {
        self.daily_series.iter().map(|d| d.expenses).collect()
    }

    /// Share of income kept, as a fraction (0.25 = 25%)
    pub fn savings_rate(&self) -> f64 {
        safe_division(self.balance(), self.total_income, 0.0)
    }
}

impl From<SnapshotData> for PeriodSnapshot {
    fn from(data: SnapshotData) -> Self {
        PeriodSnapshot::new(data.start_date, data.end_date)
            .with_totals(data.total_income, data.total_expenses)
            .with_transaction_count(data.transaction_count)
            .with_daily_series(data.daily_series)
            .with_categories(data.category_breakdown)
    }
}

impl From<PeriodSnapshot> for SnapshotData {
    fn from(snapshot: PeriodSnapshot) -> Self {
        let balance = Some(snapshot.balance());
        Self {
            start_date: snapshot.start_date,
            end_date: snapshot.end_date,
            total_income: snapshot.total_income,
            total_expenses: snapshot.total_expenses,
            balance,
            transaction_count: snapshot.transaction_count,
            daily_series: snapshot.daily_series,
            category_breakdown: snapshot.category_breakdown,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    safe_number(value, 0.0).max(0.0)
}

/// Sort by date, merge duplicates and insert zero days for interior gaps
pub fn normalize_series(series: Vec<DailyEntry>) -> Vec<DailyEntry> {
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for entry in series {
        let slot = by_date.entry(entry.date).or_insert((0.0, 0.0));
        slot.0 += non_negative(entry.income);
        slot.1 += non_negative(entry.expenses);
    }

    let (first, last) = match (by_date.keys().next(), by_date.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    let mut normalized = Vec::with_capacity(by_date.len());
    let mut day = first;
    while day <= last {
        let (income, expenses) = by_date.get(&day).copied().unwrap_or((0.0, 0.0));
        normalized.push(DailyEntry::new(day, income, expenses));
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    normalized
}

fn merge_categories(categories: Vec<CategoryAmount>) -> Vec<CategoryAmount> {
    let mut merged: Vec<CategoryAmount> = Vec::with_capacity(categories.len());
    for item in categories {
        let amount = non_negative(item.amount);
        match merged.iter_mut().find(|c| c.category == item.category) {
            Some(existing) => existing.amount += amount,
            None => merged.push(CategoryAmount::new(item.category, amount)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_balance_is_derived() {
        let snapshot = PeriodSnapshot::new(date(2025, 1, 1), date(2025, 1, 31))
            .with_totals(10_000.0, 6_000.0);
        assert_eq!(snapshot.balance(), 4_000.0);
        assert!((snapshot.savings_rate() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_negative_and_non_finite_totals_are_zeroed() {
        let snapshot = PeriodSnapshot::new(date(2025, 1, 1), date(2025, 1, 31))
            .with_totals(-50.0, f64::NAN);
        assert_eq!(snapshot.total_income(), 0.0);
        assert_eq!(snapshot.total_expenses(), 0.0);
        assert_eq!(snapshot.savings_rate(), 0.0);
    }

    #[test]
    fn test_reversed_range_is_swapped() {
        let snapshot = PeriodSnapshot::new(date(2025, 2, 1), date(2025, 1, 1));
        assert_eq!(snapshot.start_date(), date(2025, 1, 1));
        assert_eq!(snapshot.days_in_range(), 32);
    }

    #[test]
    fn test_series_gaps_are_filled_and_sorted() {
        let snapshot = PeriodSnapshot::new(date(2025, 1, 1), date(2025, 1, 31))
            .with_daily_series(vec![
                DailyEntry::new(date(2025, 1, 4), 0.0, 30.0),
                DailyEntry::new(date(2025, 1, 1), 100.0, 10.0),
                DailyEntry::new(date(2025, 1, 4), 5.0, 5.0),
            ]);

        let series = snapshot.daily_series();
        assert_eq!(series.len(), 4);
        assert_eq!(series[0].date, date(2025, 1, 1));
        assert_eq!(series[1], DailyEntry::empty(date(2025, 1, 2)));
        assert_eq!(series[3].expenses, 35.0);
        assert_eq!(series[3].income, 5.0);
    }

    #[test]
    fn test_categories_merged_and_sorted() {
        let snapshot = PeriodSnapshot::new(date(2025, 1, 1), date(2025, 1, 31)).with_categories(
            vec![
                CategoryAmount::new("Dining", 200.0),
                CategoryAmount::new("Rent", 1500.0),
                CategoryAmount::new("Dining", 150.0),
            ],
        );

        assert_eq!(snapshot.category_breakdown().len(), 2);
        assert_eq!(snapshot.category("Dining").unwrap().amount, 350.0);
        assert_eq!(snapshot.top_category().unwrap().category, "Rent");
    }

    #[test]
    fn test_totals_from_series() {
        let snapshot = PeriodSnapshot::new(date(2025, 1, 1), date(2025, 1, 2))
            .with_daily_series(vec![
                DailyEntry::new(date(2025, 1, 1), 100.0, 40.0),
                DailyEntry::new(date(2025, 1, 2), 0.0, 10.0),
            ])
            .with_totals_from_series();
        assert_eq!(snapshot.total_income(), 100.0);
        assert_eq!(snapshot.total_expenses(), 50.0);
    }

    #[test]
    fn test_deserialize_ignores_supplied_balance() {
        let json = r#"{
            "start_date": "2025-01-01",
            "end_date": "2025-01-31",
            "total_income": 1000.0,
            "total_expenses": 400.0,
            "balance": 99999.0
        }"#;
        let snapshot: PeriodSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.balance(), 600.0);
        assert_eq!(snapshot.transaction_count(), 0);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["balance"], 600.0);
    }
}

//! Combined transaction listing
//!
//! Merges expenses and incomes into one list that can be searched, filtered by
//! kind or category, and sorted.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::{compute_global_stats, CountMode, Stats};
use crate::models::{Expense, ExpenseCategory, Income};

/// Whether a ledger entry is money out or money in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" | "expenses" => Ok(Self::Expense),
            "income" | "incomes" => Ok(Self::Income),
            _ => Err(format!("Unknown transaction type: {} (valid: expense, income)", s)),
        }
    }
}

/// Field to sort the ledger by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Title,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "title" => Ok(Self::Title),
            _ => Err(format!("Unknown sort key: {} (valid: date, amount, title)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("Unknown sort order: {} (valid: asc, desc)", s)),
        }
    }
}

/// One row of the combined list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub kind: EntryKind,
    pub title: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    pub created_at: DateTime<Utc>,
}

impl From<&Expense> for LedgerEntry {
    fn from(e: &Expense) -> Self {
        Self {
            id: e.id,
            kind: EntryKind::Expense,
            title: e.title.clone(),
            amount: e.amount,
            category: Some(e.category),
            created_at: e.created_at,
        }
    }
}

impl From<&Income> for LedgerEntry {
    fn from(i: &Income) -> Self {
        Self {
            id: i.id,
            kind: EntryKind::Income,
            title: i.title.clone(),
            amount: i.amount,
            category: None,
            created_at: i.created_at,
        }
    }
}

/// Search, filter, and sort options for the ledger
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    pub kind: Option<EntryKind>,
    /// Only expenses carry a category, so this excludes every income
    pub category: Option<ExpenseCategory>,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl LedgerFilter {
    fn matches(&self, entry: &LedgerEntry, needle: Option<&str>) -> bool {
        let matches_search = needle.map_or(true, |n| entry.title.to_lowercase().contains(n));
        let matches_kind = self.kind.map_or(true, |k| entry.kind == k);
        let matches_category = self.category.map_or(true, |c| {
            entry.kind == EntryKind::Expense && entry.category == Some(c)
        });
        matches_search && matches_kind && matches_category
    }

    fn compare(&self, a: &LedgerEntry, b: &LedgerEntry) -> Ordering {
        let ordering = match self.sort {
            SortKey::Date => a.created_at.cmp(&b.created_at),
            SortKey::Amount => a.amount.total_cmp(&b.amount),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Filtered ledger plus totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerView {
    pub entries: Vec<LedgerEntry>,
    /// Income among the filtered entries
    pub total_income: f64,
    /// Expenses among the filtered entries
    pub total_expenses: f64,
    pub net: f64,
    /// Unfiltered totals, counting expenses and incomes together
    pub stats: Stats,
}

/// Merge, filter, and sort the snapshot
pub fn build_ledger(expenses: &[Expense], incomes: &[Income], filter: &LedgerFilter) -> LedgerView {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut entries: Vec<LedgerEntry> = expenses
        .iter()
        .map(LedgerEntry::from)
        .chain(incomes.iter().map(LedgerEntry::from))
        .filter(|entry| filter.matches(entry, needle.as_deref()))
        .collect();

    entries.sort_by(|a, b| filter.compare(a, b));

    let total_income: f64 = entries
        .iter()
        .filter(|e| e.kind == EntryKind::Income)
        .map(|e| e.amount)
        .sum();
    let total_expenses: f64 = entries
        .iter()
        .filter(|e| e.kind == EntryKind::Expense)
        .map(|e| e.amount)
        .sum();

    LedgerView {
        entries,
        total_income,
        total_expenses,
        net: total_income - total_expenses,
        stats: compute_global_stats(expenses, incomes, CountMode::All),
    }
}

/// Distinct categories among the expenses, in first-seen order
pub fn categories_in_use(expenses: &[Expense]) -> Vec<ExpenseCategory> {
    let mut seen = Vec::new();
    for expense in expenses {
        if !seen.contains(&expense.category) {
            seen.push(expense.category);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, 9, 0, 0).unwrap()
    }

    fn sample() -> (Vec<Expense>, Vec<Income>) {
        let expenses = vec![
            Expense {
                id: 1,
                title: "Coffee Shop".to_string(),
                amount: 4.5,
                category: ExpenseCategory::Food,
                created_at: day(3),
            },
            Expense {
                id: 2,
                title: "Train ticket".to_string(),
                amount: 20.0,
                category: ExpenseCategory::Transport,
                created_at: day(1),
            },
            Expense {
                id: 3,
                title: "Groceries".to_string(),
                amount: 60.0,
                category: ExpenseCategory::Food,
                created_at: day(5),
            },
        ];
        let incomes = vec![
            Income {
                id: 1,
                title: "Salary".to_string(),
                amount: 1000.0,
                created_at: day(2),
            },
            Income {
                id: 2,
                title: "Coffee resale".to_string(),
                amount: 15.0,
                created_at: day(4),
            },
        ];
        (expenses, incomes)
    }

    fn titles(view: &LedgerView) -> Vec<&str> {
        view.entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_default_is_newest_first() {
        let (expenses, incomes) = sample();
        let view = build_ledger(&expenses, &incomes, &LedgerFilter::default());
        assert_eq!(
            titles(&view),
            vec!["Groceries", "Coffee resale", "Coffee Shop", "Salary", "Train ticket"]
        );
        assert_eq!(view.total_income, 1015.0);
        assert_eq!(view.total_expenses, 84.5);
        assert_eq!(view.net, 930.5);
        assert_eq!(view.stats.transaction_count, 5);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (expenses, incomes) = sample();
        let filter = LedgerFilter {
            search: Some("  COFFEE ".to_string()),
            ..Default::default()
        };
        let view = build_ledger(&expenses, &incomes, &filter);
        assert_eq!(titles(&view), vec!["Coffee resale", "Coffee Shop"]);
        assert_eq!(view.total_income, 15.0);
        assert_eq!(view.total_expenses, 4.5);
        // Unfiltered stats are not affected by the search
        assert_eq!(view.stats.total_income, 1015.0);
    }

    #[test]
    fn test_kind_filter() {
        let (expenses, incomes) = sample();
        let filter = LedgerFilter {
            kind: Some(EntryKind::Income),
            ..Default::default()
        };
        let view = build_ledger(&expenses, &incomes, &filter);
        assert!(view.entries.iter().all(|e| e.kind == EntryKind::Income));
        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.total_expenses, 0.0);
    }

    #[test]
    fn test_category_filter_excludes_incomes() {
        let (expenses, incomes) = sample();
        let filter = LedgerFilter {
            category: Some(ExpenseCategory::Food),
            sort: SortKey::Amount,
            order: SortOrder::Asc,
            ..Default::default()
        };
        let view = build_ledger(&expenses, &incomes, &filter);
        assert_eq!(titles(&view), vec!["Coffee Shop", "Groceries"]);
        assert_eq!(view.total_income, 0.0);
    }

    #[test]
    fn test_sort_by_title() {
        let (expenses, incomes) = sample();
        let filter = LedgerFilter {
            sort: SortKey::Title,
            order: SortOrder::Asc,
            ..Default::default()
        };
        let view = build_ledger(&expenses, &incomes, &filter);
        assert_eq!(
            titles(&view),
            vec!["Coffee resale", "Coffee Shop", "Groceries", "Salary", "Train ticket"]
        );
    }

    #[test]
    fn test_empty_snapshot() {
        let view = build_ledger(&[], &[], &LedgerFilter::default());
        assert!(view.entries.is_empty());
        assert_eq!(view.net, 0.0);
        assert_eq!(view.stats.transaction_count, 0);
        assert_eq!(view.stats.count_mode, CountMode::All);
    }

    #[test]
    fn test_categories_in_use() {
        let (expenses, _) = sample();
        assert_eq!(
            categories_in_use(&expenses),
            vec![ExpenseCategory::Food, ExpenseCategory::Transport]
        );
    }

    #[test]
    fn test_parse_filter_values() {
        assert_eq!("Expenses".parse::<EntryKind>(), Ok(EntryKind::Expense));
        assert_eq!("amount".parse::<SortKey>(), Ok(SortKey::Amount));
        assert_eq!("ASC".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}

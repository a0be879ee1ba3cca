//! Demo data
//!
//! A few months of realistic records (IDR amounts), dated relative to a
//! reference instant so the dashboard always has recent data to show.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};

use crate::analytics::month_offset;
use crate::models::{ExpenseCategory, ValidExpense, ValidIncome};

/// When a demo record happened, relative to the reference instant
#[derive(Debug, Clone, Copy)]
enum Ago {
    /// `months` calendar months and then `days` days earlier
    Back { months: u32, days: i64 },
    /// Midnight on the first day of the month `months` back
    MonthStart(u32),
}

impl Ago {
    fn resolve(self, reference: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Back { months, days } => {
                reference
                    .checked_sub_months(Months::new(months))
                    .unwrap_or(reference)
                    - Duration::days(days)
            }
            Self::MonthStart(months) => {
                let (year, month) = month_offset(reference, months);
                NaiveDate::from_ymd_opt(year, month, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
                    .unwrap_or(reference)
            }
        }
    }
}

const fn days(days: i64) -> Ago {
    Ago::Back { months: 0, days }
}

const fn back(months: u32, days: i64) -> Ago {
    Ago::Back { months, days }
}

use ExpenseCategory::*;

const EXPENSES: &[(&str, f64, ExpenseCategory, Ago)] = &[
    ("Groceries - Indomaret", 750_000.0, FoodAndDining, days(1)),
    ("Gas Station - Pertamina", 200_000.0, Transportation, days(2)),
    ("Coffee Shop", 45_000.0, FoodAndDining, days(3)),
    ("Internet Bill", 300_000.0, BillsAndUtilities, days(4)),
    ("Movie Tickets", 120_000.0, Entertainment, days(5)),
    ("Pharmacy", 85_000.0, Healthcare, days(6)),
    ("Lunch - Warteg", 35_000.0, FoodAndDining, days(7)),
    ("Ride Hailing", 25_000.0, Transportation, days(8)),
    ("Mobile Credit", 50_000.0, BillsAndUtilities, days(9)),
    ("Electricity Bill", 450_000.0, BillsAndUtilities, back(1, 5)),
    ("Restaurant Dinner", 320_000.0, FoodAndDining, back(1, 8)),
    ("Gym Membership", 500_000.0, HealthAndFitness, back(1, 10)),
    ("Online Shopping", 680_000.0, Shopping, back(1, 12)),
    ("Fuel", 180_000.0, Transportation, back(1, 15)),
    ("Streaming Subscription", 120_000.0, Entertainment, back(1, 18)),
    ("Haircut", 75_000.0, PersonalCare, back(1, 20)),
    ("Car Maintenance", 850_000.0, Transportation, back(2, 3)),
    ("Supermarket", 420_000.0, FoodAndDining, back(2, 7)),
    ("Book Purchase", 250_000.0, Education, back(2, 10)),
    ("Doctor Visit", 350_000.0, Healthcare, back(3, 5)),
    ("Clothing", 480_000.0, Shopping, back(3, 8)),
    ("Laptop Repair", 650_000.0, Technology, back(4, 3)),
    ("Birthday Gift", 200_000.0, Gifts, back(4, 10)),
    ("Hotel Stay", 720_000.0, Travel, back(4, 15)),
];

const INCOMES: &[(&str, f64, Ago)] = &[
    ("Monthly Salary", 8_500_000.0, Ago::MonthStart(0)),
    ("Freelance Project", 1_200_000.0, days(5)),
    ("Performance Bonus", 500_000.0, days(10)),
    ("Monthly Salary", 8_500_000.0, Ago::MonthStart(1)),
    ("Side Project", 2_000_000.0, back(1, 8)),
    ("Dividend", 300_000.0, back(1, 15)),
    ("Monthly Salary", 8_500_000.0, Ago::MonthStart(2)),
    ("Cashback", 150_000.0, back(2, 20)),
    ("Monthly Salary", 8_500_000.0, Ago::MonthStart(3)),
    ("Consulting Fee", 1_500_000.0, back(3, 10)),
    ("Monthly Salary", 8_500_000.0, Ago::MonthStart(4)),
    ("Annual Bonus", 5_000_000.0, back(4, 5)),
];

/// Demo expenses with their creation timestamps
pub fn demo_expenses(reference: DateTime<Utc>) -> Vec<(ValidExpense, DateTime<Utc>)> {
    EXPENSES
        .iter()
        .map(|(title, amount, category, ago)| {
            (
                ValidExpense {
                    title: title.to_string(),
                    amount: *amount,
                    category: *category,
                },
                ago.resolve(reference),
            )
        })
        .collect()
}

/// Demo incomes with their creation timestamps
pub fn demo_incomes(reference: DateTime<Utc>) -> Vec<(ValidIncome, DateTime<Utc>)> {
    INCOMES
        .iter()
        .map(|(title, amount, ago)| {
            (
                ValidIncome {
                    title: title.to_string(),
                    amount: *amount,
                },
                ago.resolve(reference),
            )
        })
        .collect()
}

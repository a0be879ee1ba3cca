//! Domain models for Tally

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length (in characters) for expenses and incomes
pub const MAX_TITLE_LEN: usize = 255;

/// Expense categories
///
/// The first six are the categories offered when recording an expense by hand.
/// The rest come from the demo data set and are accepted everywhere as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Entertainment,
    Health,
    Shopping,
    Other,
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    Transportation,
    #[serde(rename = "Bills & Utilities")]
    BillsAndUtilities,
    Education,
    Gifts,
    #[serde(rename = "Health & Fitness")]
    HealthAndFitness,
    Healthcare,
    #[serde(rename = "Personal Care")]
    PersonalCare,
    Technology,
    Travel,
}

impl ExpenseCategory {
    const ALL: [ExpenseCategory; 16] = [
        Self::Food,
        Self::Transport,
        Self::Entertainment,
        Self::Health,
        Self::Shopping,
        Self::Other,
        Self::FoodAndDining,
        Self::Transportation,
        Self::BillsAndUtilities,
        Self::Education,
        Self::Gifts,
        Self::HealthAndFitness,
        Self::Healthcare,
        Self::PersonalCare,
        Self::Technology,
        Self::Travel,
    ];

    /// Every category, in declaration order
    pub fn all() -> &'static [ExpenseCategory] {
        &Self::ALL
    }

    /// One of the six categories offered for manual entry
    pub fn is_core(&self) -> bool {
        matches!(
            self,
            Self::Food
                | Self::Transport
                | Self::Entertainment
                | Self::Health
                | Self::Shopping
                | Self::Other
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
            Self::FoodAndDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::BillsAndUtilities => "Bills & Utilities",
            Self::Education => "Education",
            Self::Gifts => "Gifts",
            Self::HealthAndFitness => "Health & Fitness",
            Self::Healthcare => "Healthcare",
            Self::PersonalCare => "Personal Care",
            Self::Technology => "Technology",
            Self::Travel => "Travel",
        }
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub title: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub created_at: DateTime<Utc>,
}

/// A recorded income entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub title: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

// ========== Creation Input ==========

/// Field-scoped validation messages, e.g. `{"amount": ["The amount must be at least 0."]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for a single field
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Take over `other`'s messages; a field present in both keeps only `other`'s
    pub fn override_with(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Unvalidated expense input, as it arrives from the CLI or an HTTP body
#[derive(Debug, Clone, Default)]
pub struct NewExpense {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
}

/// Unvalidated income input
#[derive(Debug, Clone, Default)]
pub struct NewIncome {
    pub title: Option<String>,
    pub amount: Option<f64>,
}

/// Expense input that passed validation and may be stored
#[derive(Debug, Clone, PartialEq)]
pub struct ValidExpense {
    pub title: String,
    pub amount: f64,
    pub category: ExpenseCategory,
}

/// Income input that passed validation and may be stored
#[derive(Debug, Clone, PartialEq)]
pub struct ValidIncome {
    pub title: String,
    pub amount: f64,
}

fn check_title(title: Option<&str>, errors: &mut ValidationErrors) -> String {
    let title = title.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        errors.add("title", "The title field is required.");
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.add(
            "title",
            format!("The title may not be greater than {} characters.", MAX_TITLE_LEN),
        );
    }
    title.to_string()
}

fn check_amount(amount: Option<f64>, errors: &mut ValidationErrors) -> f64 {
    match amount {
        None => {
            errors.add("amount", "The amount field is required.");
            0.0
        }
        Some(a) if !a.is_finite() => {
            errors.add("amount", "The amount must be a number.");
            0.0
        }
        Some(a) if a < 0.0 => {
            errors.add("amount", "The amount must be at least 0.");
            a
        }
        Some(a) => a,
    }
}

impl NewExpense {
    pub fn new(title: &str, amount: f64, category: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            amount: Some(amount),
            category: Some(category.to_string()),
        }
    }

    /// Check every field, collecting all failures
    pub fn validate(&self) -> std::result::Result<ValidExpense, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = check_title(self.title.as_deref(), &mut errors);
        let amount = check_amount(self.amount, &mut errors);

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("category", "The category field is required.");
                None
            }
            Some(raw) => match raw.parse::<ExpenseCategory>() {
                Ok(c) => Some(c),
                Err(_) => {
                    errors.add("category", "The selected category is invalid.");
                    None
                }
            },
        };

        match category {
            Some(category) if errors.is_empty() => Ok(ValidExpense {
                title,
                amount,
                category,
            }),
            _ => Err(errors),
        }
    }
}

impl NewIncome {
    pub fn new(title: &str, amount: f64) -> Self {
        Self {
            title: Some(title.to_string()),
            amount: Some(amount),
        }
    }

    pub fn validate(&self) -> std::result::Result<ValidIncome, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = check_title(self.title.as_deref(), &mut errors);
        let amount = check_amount(self.amount, &mut errors);

        if errors.is_empty() {
            Ok(ValidIncome { title, amount })
        } else {
            Err(errors)
        }
    }
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display label used when an income entry is added without a category.
pub const INCOME_PLACEHOLDER: &str = "Income";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Expense => "Expense",
            EntryKind::Income => "Income",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseGroup {
    #[default]
    Fixed,
    Variable,
}

impl ExpenseGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseGroup::Fixed => "Fixed",
            ExpenseGroup::Variable => "Variable",
        }
    }

    pub fn parse(s: &str) -> Option<ExpenseGroup> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Some(ExpenseGroup::Fixed),
            "variable" => Some(ExpenseGroup::Variable),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExpenseGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ledger record. Entries are never mutated after creation; an edit is
/// a delete followed by a fresh add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub amount: Decimal,
    pub description: String,
    /// Set for expenses only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<ExpenseGroup>,
    /// Category key for expenses; free text for income.
    pub category: String,
}

impl Entry {
    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// Year-month key of the entry date, e.g. `"2024-03"`.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

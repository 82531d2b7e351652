use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{Category, Entry, Settings};

/// How a category's month-to-date spending sits against its limit.
/// Each band maps to a distinct display tag for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LimitBand {
    Under,
    Near,
    Over,
}

impl LimitBand {
    pub(crate) fn tag(&self) -> &'static str {
        match self {
            LimitBand::Under => "under",
            LimitBand::Near => "near",
            LimitBand::Over => "over",
        }
    }

    /// Classify spending against a limit. No limit (zero) always reads as
    /// under; the near band starts at 80% of the limit.
    pub(crate) fn classify(used: Decimal, limit: Decimal) -> LimitBand {
        if limit <= Decimal::ZERO {
            return LimitBand::Under;
        }
        let ratio = used / limit;
        if ratio >= Decimal::ONE {
            LimitBand::Over
        } else if ratio >= Decimal::new(8, 1) {
            LimitBand::Near
        } else {
            LimitBand::Under
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategorySpending {
    pub(crate) key: String,
    pub(crate) label: String,
    pub(crate) used: Decimal,
    /// Zero when no limit is set.
    pub(crate) limit: Decimal,
    pub(crate) band: LimitBand,
}

/// Everything the presentation layer needs for one month, derived in a
/// single pass with no side effects.
#[derive(Debug, Clone)]
pub(crate) struct MonthView {
    /// Entries of the month, date ascending.
    pub(crate) entries: Vec<Entry>,
    pub(crate) expense_total: Decimal,
    pub(crate) income_total: Decimal,
    pub(crate) net: Decimal,
    pub(crate) fixed_total: Decimal,
    pub(crate) variable_total: Decimal,
    /// Expense sums for every known category (zero-activity ones included),
    /// followed by any keys seen only in the ledger.
    pub(crate) by_category: Vec<CategorySpending>,
    /// Binding-constraint income target; `None` while the model is invalid.
    pub(crate) desired_income: Option<Decimal>,
    /// Expense sums per calendar day, date ascending. Chart feed.
    pub(crate) daily_expenses: Vec<(NaiveDate, Decimal)>,
}

pub(crate) fn compute_month_view(
    entries: &[Entry],
    month: &str,
    categories: &[Category],
    settings: &Settings,
) -> MonthView {
    let mut month_entries: Vec<Entry> = entries
        .iter()
        .filter(|e| e.month_key() == month)
        .cloned()
        .collect();
    month_entries.sort_by_key(|e| e.date);

    let mut expense_total = Decimal::ZERO;
    let mut income_total = Decimal::ZERO;
    let mut fixed_total = Decimal::ZERO;
    let mut variable_total = Decimal::ZERO;
    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

    // Known categories first, in their display order; stray ledger keys
    // are appended as they appear.
    let mut order: Vec<String> = categories.iter().map(|c| c.key.clone()).collect();
    let mut used: BTreeMap<String, Decimal> = order
        .iter()
        .map(|k| (k.clone(), Decimal::ZERO))
        .collect();

    for entry in &month_entries {
        if entry.is_income() {
            income_total += entry.amount;
            continue;
        }
        expense_total += entry.amount;
        match entry.group {
            Some(crate::models::ExpenseGroup::Variable) => variable_total += entry.amount,
            _ => fixed_total += entry.amount,
        }
        *daily.entry(entry.date).or_insert(Decimal::ZERO) += entry.amount;
        if !used.contains_key(&entry.category) {
            order.push(entry.category.clone());
        }
        *used.entry(entry.category.clone()).or_insert(Decimal::ZERO) += entry.amount;
    }

    let by_category: Vec<CategorySpending> = order
        .iter()
        .map(|key| {
            let spent = used.get(key).copied().unwrap_or(Decimal::ZERO);
            let limit = settings.limit_for(key);
            CategorySpending {
                key: key.clone(),
                label: Category::label_for(categories, key).to_string(),
                used: spent,
                limit,
                band: LimitBand::classify(spent, limit),
            }
        })
        .collect();

    let desired_income = desired_income(fixed_total, variable_total, expense_total, settings);

    MonthView {
        entries: month_entries,
        expense_total,
        income_total,
        net: income_total - expense_total,
        fixed_total,
        variable_total,
        by_category,
        desired_income,
        daily_expenses: daily.into_iter().collect(),
    }
}

/// The income needed so that actual fixed, variable, and total spending
/// each fit inside their model percentage. The answer is the largest of
/// the three candidates, i.e. the binding constraint. Fractions are
/// floored at 0.0001 so an all-zero model cannot divide by zero.
fn desired_income(
    fixed_total: Decimal,
    variable_total: Decimal,
    expense_total: Decimal,
    settings: &Settings,
) -> Option<Decimal> {
    let model = &settings.model;
    if !model.is_valid() {
        return None;
    }
    let floor = Decimal::new(1, 4);
    let hundred = Decimal::from(100);
    let f = (model.fixed / hundred).max(floor);
    let v = (model.variable / hundred).max(floor);
    let fv = (f + v).max(floor);

    let need_fixed = if fixed_total > Decimal::ZERO {
        fixed_total / f
    } else {
        Decimal::ZERO
    };
    let need_variable = if variable_total > Decimal::ZERO {
        variable_total / v
    } else {
        Decimal::ZERO
    };
    let need_total = if expense_total > Decimal::ZERO {
        expense_total / fv
    } else {
        Decimal::ZERO
    };

    Some(need_fixed.max(need_variable).max(need_total))
}

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── Entry ─────────────────────────────────────────────────────

fn make_entry(kind: EntryKind, amount: Decimal) -> Entry {
    Entry {
        id: 1,
        date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        kind,
        amount,
        description: "Test".into(),
        group: match kind {
            EntryKind::Expense => Some(ExpenseGroup::Fixed),
            EntryKind::Income => None,
        },
        category: "food".into(),
    }
}

#[test]
fn test_entry_kind_checks() {
    let exp = make_entry(EntryKind::Expense, dec!(12.50));
    assert!(exp.is_expense());
    assert!(!exp.is_income());

    let inc = make_entry(EntryKind::Income, dec!(2000));
    assert!(inc.is_income());
    assert!(!inc.is_expense());
}

#[test]
fn test_entry_month_key() {
    let entry = make_entry(EntryKind::Expense, dec!(1));
    assert_eq!(entry.month_key(), "2024-03");
}

#[test]
fn test_entry_serde_roundtrip() {
    let entry = make_entry(EntryKind::Expense, dec!(42.99));
    let json = serde_json::to_string(&entry).unwrap();
    let back: Entry = serde_json::from_str(&json).unwrap();
    assert_eq!(entry, back);
}

#[test]
fn test_income_entry_omits_group() {
    let entry = make_entry(EntryKind::Income, dec!(100));
    let json = serde_json::to_string(&entry).unwrap();
    assert!(!json.contains("group"));
    let back: Entry = serde_json::from_str(&json).unwrap();
    assert!(back.group.is_none());
}

#[test]
fn test_expense_group_parse() {
    assert_eq!(ExpenseGroup::parse("fixed"), Some(ExpenseGroup::Fixed));
    assert_eq!(ExpenseGroup::parse("  Variable "), Some(ExpenseGroup::Variable));
    assert_eq!(ExpenseGroup::parse("weekly"), None);
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_derive_key() {
    assert_eq!(Category::derive_key("Food"), "food");
    assert_eq!(Category::derive_key("  Coffee  Shops "), "coffee_shops");
    assert_eq!(Category::derive_key("a b\tc"), "a_b_c");
    assert_eq!(Category::derive_key("   "), "");
    assert_eq!(Category::derive_key(""), "");
}

#[test]
fn test_defaults_unique_keys() {
    let defaults = Category::defaults();
    assert_eq!(defaults.len(), 8);
    let mut keys: Vec<&str> = defaults.iter().map(|c| c.key.as_str()).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), defaults.len());
}

#[test]
fn test_label_for_falls_back_to_key() {
    let cats = Category::defaults();
    assert_eq!(Category::label_for(&cats, "food"), "Food");
    assert_eq!(Category::label_for(&cats, "mystery"), "mystery");
}

#[test]
fn test_category_display() {
    let cat = Category::new("fun".into(), "Leisure".into());
    assert_eq!(format!("{cat}"), "Leisure");
}

// ── Model / Settings ──────────────────────────────────────────

#[test]
fn test_default_model_is_valid() {
    let model = Model::default();
    assert_eq!(model.fixed, dec!(80));
    assert_eq!(model.variable, dec!(10));
    assert_eq!(model.savings, dec!(10));
    assert!(model.is_valid());
}

#[test]
fn test_model_invalid_when_sum_off() {
    assert!(!Model::new(dec!(80), dec!(10), dec!(5)).is_valid());
    assert!(!Model::new(dec!(80), dec!(30), dec!(10)).is_valid());
}

#[test]
fn test_model_invalid_when_negative() {
    // Sums to 100 but a negative part disqualifies it
    assert!(!Model::new(dec!(110), dec!(-20), dec!(10)).is_valid());
}

#[test]
fn test_settings_limit_for() {
    let mut settings = Settings::default();
    assert_eq!(settings.limit_for("food"), Decimal::ZERO);
    settings.limits.insert("food".into(), dec!(250));
    assert_eq!(settings.limit_for("food"), dec!(250));
}

#[test]
fn test_settings_serde_roundtrip() {
    let mut settings = Settings::default();
    settings.limits.insert("home".into(), dec!(900));
    let json = serde_json::to_string(&settings).unwrap();
    let back: Settings = serde_json::from_str(&json).unwrap();
    assert_eq!(settings, back);
}

#[test]
fn test_settings_rehydrates_missing_fields() {
    // Older payloads without limits or model fall back to defaults
    let back: Settings = serde_json::from_str("{}").unwrap();
    assert_eq!(back, Settings::default());
}

// ── Month keys ────────────────────────────────────────────────

#[test]
fn test_is_month_key() {
    assert!(is_month_key("2024-03"));
    assert!(is_month_key("1999-12"));
    assert!(!is_month_key("2024-13"));
    assert!(!is_month_key("2024-3"));
    assert!(!is_month_key("March"));
    assert!(!is_month_key(""));
}

#[test]
fn test_current_month_shape() {
    assert!(is_month_key(&current_month()));
}

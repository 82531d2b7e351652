#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{Category, Entry, EntryKind, ExpenseGroup};

fn sample_entries() -> Vec<Entry> {
    vec![
        Entry {
            id: 2,
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            kind: EntryKind::Expense,
            amount: dec!(120),
            description: "groceries".into(),
            group: Some(ExpenseGroup::Variable),
            category: "food".into(),
        },
        Entry {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            kind: EntryKind::Expense,
            amount: dec!(500.5),
            description: "rent".into(),
            group: Some(ExpenseGroup::Fixed),
            category: "home".into(),
        },
        Entry {
            id: 3,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            kind: EntryKind::Income,
            amount: dec!(2000),
            description: "salary".into(),
            group: None,
            category: "Income".into(),
        },
        Entry {
            id: 4,
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            kind: EntryKind::Expense,
            amount: dec!(9),
            description: "april, not exported".into(),
            group: Some(ExpenseGroup::Fixed),
            category: "home".into(),
        },
    ]
}

#[test]
fn test_export_rows_filter_and_order() {
    let rows = export_rows(&sample_entries(), "2024-03", &Category::defaults());
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].date, "01.03.24");
    assert_eq!(rows[1].date, "05.03.24");
    assert_eq!(rows[2].date, "10.03.24");
}

#[test]
fn test_export_rows_labels() {
    let rows = export_rows(&sample_entries(), "2024-03", &Category::defaults());

    let income = &rows[0];
    assert_eq!(income.kind, "Income");
    assert_eq!(income.group, "");
    assert_eq!(income.category, "Income");

    let rent = &rows[1];
    assert_eq!(rent.kind, "Expense");
    assert_eq!(rent.group, "Fixed");
    assert_eq!(rent.category, "Housing");
    assert_eq!(rent.amount, "500,50");

    let groceries = &rows[2];
    assert_eq!(groceries.group, "Variable");
    assert_eq!(groceries.category, "Food");
    assert_eq!(groceries.amount, "120,00");
}

#[test]
fn test_export_rows_unknown_key_falls_back() {
    let mut entries = sample_entries();
    entries[0].category = "vacation".into();
    let rows = export_rows(&entries, "2024-03", &Category::defaults());
    assert_eq!(rows[2].category, "vacation");
}

#[test]
fn test_export_filename() {
    assert_eq!(export_filename("2024-03"), "budget_2024-03.csv");
}

#[test]
fn test_write_csv_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let rows = export_rows(&sample_entries(), "2024-03", &Category::defaults());
    write_csv(&path, &rows).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    // UTF-8 BOM first
    assert_eq!(&bytes[..3], [0xEF, 0xBB, 0xBF]);

    let text = String::from_utf8(bytes).unwrap();
    let mut lines = text.trim_start_matches('\u{FEFF}').lines();
    assert_eq!(
        lines.next().unwrap(),
        "\"Date\";\"Type\";\"Group\";\"Category\";\"Description\";\"Amount\""
    );
    assert_eq!(
        lines.next().unwrap(),
        "\"01.03.24\";\"Income\";\"\";\"Income\";\"salary\";\"2000,00\""
    );
    assert_eq!(lines.count(), 2);
}

#[test]
fn test_write_csv_empty_month() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    write_csv(&path, &[]).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    // Header only
    assert_eq!(text.trim_start_matches('\u{FEFF}').lines().count(), 1);
}

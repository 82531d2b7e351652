use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::models::{Category, Entry, EntryKind};

pub(crate) const HEADERS: [&str; 6] = [
    "Date",
    "Type",
    "Group",
    "Category",
    "Description",
    "Amount",
];

/// One flattened, human-labeled row ready for a delimited-text or
/// spreadsheet formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportRow {
    /// `dd.mm.yy`
    pub(crate) date: String,
    pub(crate) kind: String,
    /// Blank for income entries.
    pub(crate) group: String,
    pub(crate) category: String,
    pub(crate) description: String,
    /// Fixed to two decimals, comma decimal separator.
    pub(crate) amount: String,
}

/// Project the selected month's entries into export rows, date ascending.
/// Pure; writing the file is [`write_csv`]'s business.
pub(crate) fn export_rows(
    entries: &[Entry],
    month: &str,
    categories: &[Category],
) -> Vec<ExportRow> {
    let mut month_entries: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.month_key() == month)
        .collect();
    month_entries.sort_by_key(|e| e.date);

    month_entries
        .iter()
        .map(|e| {
            let (group, category) = match e.kind {
                EntryKind::Expense => (
                    e.group.map(|g| g.as_str()).unwrap_or("").to_string(),
                    Category::label_for(categories, &e.category).to_string(),
                ),
                EntryKind::Income => (String::new(), e.category.clone()),
            };
            ExportRow {
                date: e.date.format("%d.%m.%y").to_string(),
                kind: e.kind.as_str().to_string(),
                group,
                category,
                description: e.description.clone(),
                amount: format!("{:.2}", e.amount).replace('.', ","),
            }
        })
        .collect()
}

/// Default file name stem for a month's export, e.g. `budget_2024-03.csv`.
pub(crate) fn export_filename(month: &str) -> String {
    format!("budget_{month}.csv")
}

/// Write rows as semicolon-delimited CSV: UTF-8 with a byte-order marker so
/// spreadsheet apps pick up the encoding, every field quoted.
pub(crate) fn write_csv(path: &Path, rows: &[ExportRow]) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    file.write_all("\u{FEFF}".as_bytes())
        .context("Failed to write BOM")?;

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(file);

    wtr.write_record(HEADERS)
        .context("Failed to write CSV header")?;
    for row in rows {
        wtr.write_record([
            &row.date,
            &row.kind,
            &row.group,
            &row.category,
            &row.description,
            &row.amount,
        ])
        .context("Failed to write CSV row")?;
    }
    wtr.flush().context("Failed to flush CSV export")?;
    Ok(())
}

#[cfg(test)]
mod tests;

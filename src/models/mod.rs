mod category;
mod entry;
mod settings;

pub use category::Category;
pub use entry::{Entry, EntryKind, ExpenseGroup, INCOME_PLACEHOLDER};
pub use settings::{Model, Settings};

/// The current local year-month key, e.g. `"2024-03"`.
pub fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

/// Validate a `YYYY-MM` month key.
pub fn is_month_key(s: &str) -> bool {
    chrono::NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").is_ok()
        && s.len() == 7
        && s.as_bytes().get(4) == Some(&b'-')
}

#[cfg(test)]
mod tests;

mod view;

use anyhow::Result;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{
    current_month, is_month_key, Category, Entry, EntryKind, ExpenseGroup, Model, Settings,
    INCOME_PLACEHOLDER,
};
use crate::store::{Store, CATEGORIES_KEY, ENTRIES_KEY, MONTH_KEY, SETTINGS_KEY};

pub(crate) use view::{compute_month_view, CategorySpending, LimitBand, MonthView};

/// Raw submission for a new entry. Everything arrives as text, the way a
/// form hands it over; validation happens in [`Ledger::add_entry`].
#[derive(Debug, Clone, Default)]
pub(crate) struct EntryForm {
    pub(crate) date: String,
    pub(crate) kind: Option<EntryKind>,
    pub(crate) group: ExpenseGroup,
    pub(crate) category: String,
    /// Free-text category for income entries.
    pub(crate) income_category: String,
    pub(crate) description: String,
    pub(crate) amount: String,
}

/// The entry ledger plus its sibling collections, with write-through
/// persistence: every mutation re-serializes the touched collection
/// wholesale (last write wins, single-writer per process).
pub(crate) struct Ledger {
    store: Store,
    pub(crate) entries: Vec<Entry>,
    pub(crate) categories: Vec<Category>,
    pub(crate) settings: Settings,
    pub(crate) month: String,
    next_id: i64,
}

impl Ledger {
    /// Rehydrate all collections from the store, defaulting anything
    /// missing or malformed.
    pub(crate) fn open(store: Store) -> Result<Self> {
        let entries: Vec<Entry> = store.load(ENTRIES_KEY)?.unwrap_or_default();
        let categories: Vec<Category> = store
            .load(CATEGORIES_KEY)?
            .unwrap_or_else(Category::defaults);
        let settings: Settings = store.load(SETTINGS_KEY)?.unwrap_or_default();
        let month: String = store
            .load(MONTH_KEY)?
            .filter(|m: &String| is_month_key(m))
            .unwrap_or_else(current_month);
        let next_id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        Ok(Self {
            store,
            entries,
            categories,
            settings,
            month,
            next_id,
        })
    }

    // ── Mutations ─────────────────────────────────────────────

    /// Validate and insert a new entry at the front of the ledger.
    /// Invalid submissions are rejected silently: the contract is a no-op
    /// (`Ok(None)`), and interactive feedback is the caller's business.
    pub(crate) fn add_entry(&mut self, form: &EntryForm) -> Result<Option<i64>> {
        if form.description.trim().is_empty() {
            return Ok(None);
        }
        let Ok(date) = chrono::NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d") else {
            return Ok(None);
        };
        let Some(amount) = parse_amount(&form.amount).filter(|a| *a > Decimal::ZERO) else {
            return Ok(None);
        };

        let kind = form.kind.unwrap_or(EntryKind::Expense);
        let (group, category) = match kind {
            EntryKind::Expense => (Some(form.group), form.category.clone()),
            EntryKind::Income => {
                let text = form.income_category.trim();
                let category = if text.is_empty() {
                    INCOME_PLACEHOLDER.to_string()
                } else {
                    text.to_string()
                };
                (None, category)
            }
        };

        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            0,
            Entry {
                id,
                date,
                kind,
                amount,
                description: form.description.trim().to_string(),
                group,
                category,
            },
        );
        self.persist_entries()?;
        Ok(Some(id))
    }

    /// Remove an entry by id; absent ids are a no-op.
    pub(crate) fn delete_entry(&mut self, id: i64) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return Ok(false);
        }
        self.persist_entries()?;
        Ok(true)
    }

    /// Append a user category. The derived key wins on first add: a second
    /// label that collapses to an existing key is a no-op.
    pub(crate) fn add_category(&mut self, label: &str) -> Result<Option<String>> {
        let key = Category::derive_key(label);
        if key.is_empty() || Category::find_by_key(&self.categories, &key).is_some() {
            return Ok(None);
        }
        self.categories
            .push(Category::new(key.clone(), label.trim().to_string()));
        self.persist_categories()?;
        Ok(Some(key))
    }

    /// Store a per-category limit. Malformed input counts as zero and
    /// negative values clamp to zero.
    pub(crate) fn set_limit(&mut self, category_key: &str, raw: &str) -> Result<()> {
        let value = parse_amount(raw)
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO);
        self.settings.limits.insert(category_key.to_string(), value);
        self.persist_settings()?;
        Ok(())
    }

    /// Store the allocation model. Validity is judged at view time, so a
    /// half-edited model never blocks other features.
    pub(crate) fn set_model(&mut self, model: Model) -> Result<()> {
        self.settings.model = model;
        self.persist_settings()?;
        Ok(())
    }

    /// Switch the selected month. Returns false (and leaves the selection
    /// alone) for anything that is not a `YYYY-MM` key.
    pub(crate) fn set_month(&mut self, month: &str) -> Result<bool> {
        if !is_month_key(month) {
            return Ok(false);
        }
        self.month = month.to_string();
        self.store.save(MONTH_KEY, &self.month)?;
        Ok(true)
    }

    // ── Derived views ─────────────────────────────────────────

    /// Month view for the currently selected month.
    pub(crate) fn view(&self) -> MonthView {
        compute_month_view(&self.entries, &self.month, &self.categories, &self.settings)
    }

    /// Month view for an arbitrary month key.
    pub(crate) fn view_for(&self, month: &str) -> MonthView {
        compute_month_view(&self.entries, month, &self.categories, &self.settings)
    }

    // ── Persistence ───────────────────────────────────────────

    fn persist_entries(&self) -> Result<()> {
        self.store.save(ENTRIES_KEY, &self.entries)
    }

    fn persist_categories(&self) -> Result<()> {
        self.store.save(CATEGORIES_KEY, &self.categories)
    }

    fn persist_settings(&self) -> Result<()> {
        self.store.save(SETTINGS_KEY, &self.settings)
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &Store {
        &self.store
    }
}

/// Parse a currency amount accepting either `.` or `,` as the decimal
/// separator. Returns `None` for anything that is not a plain number.
pub(crate) fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

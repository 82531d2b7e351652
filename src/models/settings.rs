use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Target allocation of income, in percent. Valid when all three parts are
/// non-negative and sum to exactly 100; an invalid model only suppresses
/// the desired-income projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub fixed: Decimal,
    pub variable: Decimal,
    pub savings: Decimal,
}

impl Model {
    pub fn new(fixed: Decimal, variable: Decimal, savings: Decimal) -> Self {
        Self {
            fixed,
            variable,
            savings,
        }
    }

    pub fn is_valid(&self) -> bool {
        let parts = [self.fixed, self.variable, self.savings];
        parts.iter().all(|p| *p >= Decimal::ZERO)
            && parts.iter().sum::<Decimal>() == Decimal::from(100)
    }
}

impl Default for Model {
    fn default() -> Self {
        // The 80/10/10 split the original planner ships with.
        Self::new(Decimal::from(80), Decimal::from(10), Decimal::from(10))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Per-category monthly caps, in currency units. Absent key = no limit.
    #[serde(default)]
    pub limits: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub model: Model,
}

impl Settings {
    /// Limit for a category key; zero (no limit) when unset.
    pub fn limit_for(&self, key: &str) -> Decimal {
        self.limits.get(key).copied().unwrap_or(Decimal::ZERO)
    }
}

//! Core domain types shared by every scoring component.
//!
//! Everything here is plain data: pillars and channels with their fixed
//! weights, normalized category scores, and laboratory product-test results.
//! Values are built per cycle from snapshot rows and never mutated afterwards.

pub mod pillar;

pub use pillar::{Channel, Pillar};
pub use product_test::{FoodVehicle, NutrientResult, ProductTestResult};

use serde::{Deserialize, Serialize};

/// A single pillar contribution reported by one assessment channel.
///
/// `raw_value` is already expressed in weighted points on the pillar's own
/// scale (0..=`pillar.max_weight()`), not as a raw percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub company_id: String,
    pub pillar: Pillar,
    pub channel: Channel,
    pub raw_value: f64,
    pub cycle_id: String,
}

/// Descriptive company fields carried through to every output record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMeta {
    pub company_id: String,
    pub name: Option<String>,
    pub tier: Option<String>,
    pub size_category: Option<String>,
}

impl CompanyMeta {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            ..Self::default()
        }
    }

    /// Display name, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.company_id)
    }

    /// Fill any still-empty field from a later row. First value seen wins.
    pub fn absorb(&mut self, name: Option<&str>, tier: Option<&str>, size: Option<&str>) {
        if self.name.is_none() {
            self.name = name.map(str::to_string);
        }
        if self.tier.is_none() {
            self.tier = tier.map(str::to_string);
        }
        if self.size_category.is_none() {
            self.size_category = size.map(str::to_string);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_id() {
        let meta = CompanyMeta::new("c-17");
        assert_eq!(meta.display_name(), "c-17");
    }

    #[test]
    fn absorb_keeps_first_seen_values() {
        let mut meta = CompanyMeta::new("c-1");
        meta.absorb(Some("Millers Ltd"), None, Some("LARGE"));
        meta.absorb(Some("Other Name"), Some("1"), Some("SMALL"));

        assert_eq!(meta.name.as_deref(), Some("Millers Ltd"));
        assert_eq!(meta.tier.as_deref(), Some("1"));
        assert_eq!(meta.size_category.as_deref(), Some("LARGE"));
    }
}

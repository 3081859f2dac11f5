//! Data category domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::gdpr::{DataCategoryType, SensitivityLevel, SpecialCategoryBasis};

/// Raw category fields as submitted, before validation.
#[derive(Debug, Clone, Copy)]
pub struct CategoryDraft<'a> {
    /// Category name.
    pub name: &'a str,
    /// Description.
    pub description: Option<&'a str>,
    /// GDPR classification.
    pub category_type: &'a str,
    /// Sensitivity rating.
    pub sensitivity_level: &'a str,
    /// Article 9 basis, if any.
    pub special_category_basis: Option<&'a str>,
}

/// A draft that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCategory {
    /// Trimmed name.
    pub name: String,
    /// Trimmed description.
    pub description: Option<String>,
    /// GDPR classification.
    pub category_type: DataCategoryType,
    /// Sensitivity rating.
    pub sensitivity_level: SensitivityLevel,
    /// Article 9 basis, present exactly when the type is special.
    pub special_category_basis: Option<SpecialCategoryBasis>,
}

/// Where a category is referenced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryUsage {
    /// Processing activities linking the category.
    pub processing_activities: u64,
    /// Data-flow edges carrying the category.
    pub data_flow_edges: u64,
    /// Live child categories.
    pub child_categories: u64,
}

impl CategoryUsage {
    /// Total number of references.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.processing_activities + self.data_flow_edges + self.child_categories
    }

    /// Whether anything still references the category.
    #[must_use]
    pub const fn is_in_use(&self) -> bool {
        self.total() > 0
    }
}

/// Aggregate counts over a workspace's categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStatistics {
    /// Live categories.
    pub total: u64,
    /// Personal data categories.
    pub personal: u64,
    /// Special category data.
    pub special: u64,
    /// Criminal offence data.
    pub criminal: u64,
    /// Anonymous data.
    pub anonymous: u64,
    /// Categories without a parent.
    pub root_categories: u64,
    /// Share of special categories, in percent with two decimals.
    pub special_percentage: Decimal,
}

impl CategoryStatistics {
    /// Aggregates `(type, has_parent)` pairs.
    pub fn from_categories<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = (DataCategoryType, bool)>,
    {
        let mut stats = Self {
            total: 0,
            personal: 0,
            special: 0,
            criminal: 0,
            anonymous: 0,
            root_categories: 0,
            special_percentage: Decimal::ZERO,
        };

        for (category_type, has_parent) in categories {
            stats.total += 1;
            if !has_parent {
                stats.root_categories += 1;
            }
            match category_type {
                DataCategoryType::Personal => stats.personal += 1,
                DataCategoryType::Special => stats.special += 1,
                DataCategoryType::Criminal => stats.criminal += 1,
                DataCategoryType::Anonymous => stats.anonymous += 1,
            }
        }

        stats.special_percentage = percentage(stats.special, stats.total);
        stats
    }
}

/// `part / whole * 100`, rounded to two decimals; zero when `whole` is zero.
#[must_use]
pub fn percentage(part: u64, whole: u64) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) / Decimal::from(whole) * Decimal::ONE_HUNDRED).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_statistics_from_categories() {
        let stats = CategoryStatistics::from_categories([
            (DataCategoryType::Personal, false),
            (DataCategoryType::Personal, true),
            (DataCategoryType::Special, true),
            (DataCategoryType::Criminal, false),
            (DataCategoryType::Anonymous, false),
            (DataCategoryType::Special, false),
        ]);

        assert_eq!(stats.total, 6);
        assert_eq!(stats.personal, 2);
        assert_eq!(stats.special, 2);
        assert_eq!(stats.criminal, 1);
        assert_eq!(stats.anonymous, 1);
        assert_eq!(stats.root_categories, 4);
        assert_eq!(stats.special_percentage, dec!(33.33));
    }

    #[test]
    fn test_statistics_empty() {
        let stats = CategoryStatistics::from_categories(Vec::<(DataCategoryType, bool)>::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.special_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_usage_in_use() {
        let unused = CategoryUsage::default();
        assert!(!unused.is_in_use());

        let used = CategoryUsage {
            processing_activities: 1,
            data_flow_edges: 2,
            child_categories: 0,
        };
        assert!(used.is_in_use());
        assert_eq!(used.total(), 3);
    }
}

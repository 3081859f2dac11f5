//! Compliance scoring heuristic.

use rust_decimal::Decimal;

use super::types::{ComplianceCounts, ComplianceRating, ComplianceSummary, ComplianceWeights};
use crate::category::percentage;

/// Maximum (and starting) score.
pub const MAX_SCORE: u8 = 100;

/// `100 - Σ weight × count`, clipped to `0..=100`.
#[must_use]
pub fn compliance_score(counts: &ComplianceCounts, weights: &ComplianceWeights) -> u8 {
    let penalty = counts
        .overdue_reviews
        .saturating_mul(u64::from(weights.overdue_review))
        .saturating_add(
            counts
                .missing_dpo_reviews
                .saturating_mul(u64::from(weights.missing_dpo_review)),
        )
        .saturating_add(
            counts
                .unjustified_special_category
                .saturating_mul(u64::from(weights.unjustified_special_category)),
        );

    let penalty = u8::try_from(penalty.min(u64::from(MAX_SCORE))).unwrap_or(MAX_SCORE);
    MAX_SCORE - penalty
}

impl ComplianceSummary {
    /// Builds the summary for a set of counts.
    #[must_use]
    pub fn compute(counts: ComplianceCounts, weights: &ComplianceWeights) -> Self {
        let score = compliance_score(&counts, weights);

        let dpo_review_coverage = if counts.dpo_review_required == 0 {
            Decimal::ONE_HUNDRED
        } else {
            percentage(
                counts
                    .dpo_review_required
                    .saturating_sub(counts.missing_dpo_reviews),
                counts.dpo_review_required,
            )
        };

        Self {
            counts,
            dpo_review_coverage,
            score,
            rating: ComplianceRating::from_score(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn counts(overdue: u64, missing_dpo: u64, special: u64) -> ComplianceCounts {
        ComplianceCounts {
            total_activities: 10,
            overdue_reviews: overdue,
            dpo_review_required: missing_dpo.max(4),
            missing_dpo_reviews: missing_dpo,
            unjustified_special_category: special,
        }
    }

    #[test]
    fn test_clean_workspace_scores_100() {
        let weights = ComplianceWeights::default();
        assert_eq!(compliance_score(&counts(0, 0, 0), &weights), 100);
    }

    #[test]
    fn test_weighted_subtraction() {
        let weights = ComplianceWeights::default();
        // 2*10 + 1*15 + 1*20
        assert_eq!(compliance_score(&counts(2, 1, 1), &weights), 45);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let weights = ComplianceWeights::default();
        assert_eq!(compliance_score(&counts(50, 50, 50), &weights), 0);
        assert_eq!(
            compliance_score(&counts(u64::MAX, u64::MAX, u64::MAX), &weights),
            0
        );
    }

    #[test]
    fn test_custom_weights() {
        let weights = ComplianceWeights {
            overdue_review: 1,
            missing_dpo_review: 0,
            unjustified_special_category: 0,
        };
        assert_eq!(compliance_score(&counts(3, 7, 9), &weights), 97);
    }

    #[test]
    fn test_summary() {
        let summary = ComplianceSummary::compute(counts(1, 1, 0), &ComplianceWeights::default());
        assert_eq!(summary.score, 75);
        assert_eq!(summary.rating, ComplianceRating::Fair);
        assert_eq!(summary.dpo_review_coverage, dec!(75.00));
    }

    #[test]
    fn test_summary_without_required_reviews() {
        let summary = ComplianceSummary::compute(
            ComplianceCounts::default(),
            &ComplianceWeights::default(),
        );
        assert_eq!(summary.dpo_review_coverage, Decimal::ONE_HUNDRED);
        assert_eq!(summary.rating, ComplianceRating::Good);
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(ComplianceRating::from_score(100), ComplianceRating::Good);
        assert_eq!(ComplianceRating::from_score(80), ComplianceRating::Good);
        assert_eq!(ComplianceRating::from_score(79), ComplianceRating::Fair);
        assert_eq!(ComplianceRating::from_score(50), ComplianceRating::Fair);
        assert_eq!(ComplianceRating::from_score(49), ComplianceRating::Poor);
        assert_eq!(ComplianceRating::from_score(0), ComplianceRating::Poor);
    }

    fn weights_strategy() -> impl Strategy<Value = ComplianceWeights> {
        (0u32..50, 0u32..50, 0u32..50).prop_map(|(a, b, c)| ComplianceWeights {
            overdue_review: a,
            missing_dpo_review: b,
            unjustified_special_category: c,
        })
    }

    proptest! {
        /// Raising any penalised count never raises the score, and the
        /// score stays within 0..=100.
        #[test]
        fn prop_score_monotonic_non_increasing(
            weights in weights_strategy(),
            overdue in 0u64..20,
            missing in 0u64..20,
            special in 0u64..20,
            bump in 1u64..5,
            which in 0usize..3,
        ) {
            let base = counts(overdue, missing, special);
            let mut worse = base;
            match which {
                0 => worse.overdue_reviews += bump,
                1 => worse.missing_dpo_reviews += bump,
                _ => worse.unjustified_special_category += bump,
            }

            let before = compliance_score(&base, &weights);
            let after = compliance_score(&worse, &weights);

            prop_assert!(after <= before);
            prop_assert!(before <= MAX_SCORE);
        }
    }
}

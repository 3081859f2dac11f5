//! Cross-border transfer rules (GDPR Chapter V).

use serde::Serialize;

use super::error::FlowError;
use crate::gdpr::TransferMechanism;
use dataguard_shared::types::JurisdictionId;

/// What the transfer rules need to know about a jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JurisdictionFacts {
    /// Jurisdiction ID.
    pub id: JurisdictionId,
    /// EU or EEA member.
    pub is_eu_eea: bool,
    /// Covered by an Article 45 adequacy decision.
    pub gdpr_adequacy: bool,
}

impl JurisdictionFacts {
    /// Data may flow to this jurisdiction without extra safeguards.
    #[must_use]
    pub const fn is_safe_destination(&self) -> bool {
        self.is_eu_eea || self.gdpr_adequacy
    }
}

/// Outcome of a transfer check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferAssessment {
    /// Appropriate safeguards (Art. 46) or a derogation are needed.
    pub requires_safeguards: bool,
    /// The mechanism relies on Article 49 and should stay occasional.
    pub is_derogation: bool,
}

/// Validates a transfer between two jurisdictions.
///
/// # Errors
///
/// Returns `SameJurisdiction` when exporter and importer are identical, and
/// `AdequacyNotAvailable` when an adequacy decision is claimed for an
/// importer that has none.
pub fn validate_transfer(
    exporter: &JurisdictionFacts,
    importer: &JurisdictionFacts,
    mechanism: TransferMechanism,
) -> Result<TransferAssessment, FlowError> {
    if exporter.id == importer.id {
        return Err(FlowError::SameJurisdiction);
    }

    let requires_safeguards = !importer.is_safe_destination();
    if requires_safeguards && mechanism == TransferMechanism::AdequacyDecision {
        return Err(FlowError::AdequacyNotAvailable);
    }

    Ok(TransferAssessment {
        requires_safeguards,
        is_derogation: mechanism == TransferMechanism::Derogation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn jurisdiction(is_eu_eea: bool, gdpr_adequacy: bool) -> JurisdictionFacts {
        JurisdictionFacts {
            id: JurisdictionId::from_uuid(Uuid::new_v4()),
            is_eu_eea,
            gdpr_adequacy,
        }
    }

    #[test]
    fn test_same_jurisdiction_rejected() {
        let de = jurisdiction(true, true);
        assert!(matches!(
            validate_transfer(&de, &de, TransferMechanism::StandardContractualClauses),
            Err(FlowError::SameJurisdiction)
        ));
    }

    #[test]
    fn test_adequacy_claim_for_third_country_rejected() {
        let de = jurisdiction(true, true);
        let us = jurisdiction(false, false);
        assert!(matches!(
            validate_transfer(&de, &us, TransferMechanism::AdequacyDecision),
            Err(FlowError::AdequacyNotAvailable)
        ));
    }

    #[rstest]
    #[case(true, false, false)]
    #[case(false, true, false)]
    #[case(false, false, true)]
    fn test_requires_safeguards(
        #[case] is_eu_eea: bool,
        #[case] adequacy: bool,
        #[case] expected: bool,
    ) {
        let exporter = jurisdiction(true, true);
        let importer = jurisdiction(is_eu_eea, adequacy);
        let assessment = validate_transfer(
            &exporter,
            &importer,
            TransferMechanism::StandardContractualClauses,
        )
        .unwrap();
        assert_eq!(assessment.requires_safeguards, expected);
        assert!(!assessment.is_derogation);
    }

    #[test]
    fn test_derogation_flagged() {
        let assessment = validate_transfer(
            &jurisdiction(true, true),
            &jurisdiction(false, false),
            TransferMechanism::Derogation,
        )
        .unwrap();
        assert!(assessment.is_derogation);
    }
}

//! Enumerated GDPR vocabulary stored as lowercase strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A string did not name any variant of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} '{value}'")]
pub struct UnknownValue {
    /// Human name of the enumeration, e.g. "lawful basis".
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Generates a string-backed enum with `as_str`, `FromStr`, `Display`
/// and serde support through the string form.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the stored string form.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    other => Err(UnknownValue {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum! {
    /// GDPR classification of a data category.
    DataCategoryType ("data category type") {
        /// Ordinary personal data.
        Personal => "personal",
        /// Article 9 special category data.
        Special => "special",
        /// Article 10 criminal convictions and offences.
        Criminal => "criminal",
        /// Anonymous data, outside GDPR scope.
        Anonymous => "anonymous",
    }
}

string_enum! {
    /// Sensitivity rating of a data category.
    SensitivityLevel ("sensitivity level") {
        /// Low.
        Low => "low",
        /// Medium.
        Medium => "medium",
        /// High.
        High => "high",
        /// Critical.
        Critical => "critical",
    }
}

string_enum! {
    /// Article 9(2) exemptions permitting special category processing.
    SpecialCategoryBasis ("special category basis") {
        /// 9(2)(a).
        ExplicitConsent => "explicit_consent",
        /// 9(2)(b).
        EmploymentSocialSecurity => "employment_social_security",
        /// 9(2)(c).
        VitalInterests => "vital_interests",
        /// 9(2)(d).
        NotForProfitBody => "not_for_profit_body",
        /// 9(2)(e).
        ManifestlyMadePublic => "manifestly_made_public",
        /// 9(2)(f).
        LegalClaims => "legal_claims",
        /// 9(2)(g).
        SubstantialPublicInterest => "substantial_public_interest",
        /// 9(2)(h).
        HealthSocialCare => "health_social_care",
        /// 9(2)(i).
        PublicHealth => "public_health",
        /// 9(2)(j).
        ArchivingResearchStatistics => "archiving_research_statistics",
    }
}

string_enum! {
    /// Article 6(1) lawful bases.
    LawfulBasis ("lawful basis") {
        /// 6(1)(a).
        Consent => "consent",
        /// 6(1)(b).
        Contract => "contract",
        /// 6(1)(c).
        LegalObligation => "legal_obligation",
        /// 6(1)(d).
        VitalInterests => "vital_interests",
        /// 6(1)(e).
        PublicTask => "public_task",
        /// 6(1)(f).
        LegitimateInterests => "legitimate_interests",
    }
}

string_enum! {
    /// Lifecycle of a processing activity record.
    ProcessingStatus ("processing status") {
        /// Being drafted.
        Draft => "draft",
        /// In effect.
        Active => "active",
        /// Under review.
        UnderReview => "under_review",
        /// No longer performed.
        Archived => "archived",
    }
}

string_enum! {
    /// Role a vendor plays towards the organization.
    VendorRole ("vendor role") {
        /// Article 28 processor.
        Processor => "processor",
        /// Independent controller.
        Controller => "controller",
        /// Article 26 joint controller.
        JointController => "joint_controller",
        /// Processor engaged by another processor.
        SubProcessor => "sub_processor",
    }
}

string_enum! {
    /// Relationship status with a vendor.
    VendorStatus ("vendor status") {
        /// Active.
        Active => "active",
        /// Inactive.
        Inactive => "inactive",
        /// Being assessed.
        UnderReview => "under_review",
    }
}

string_enum! {
    /// Kind of vendor contract.
    ContractType ("contract type") {
        /// Data processing agreement.
        Dpa => "dpa",
        /// Standard contractual clauses.
        Scc => "scc",
        /// Master services agreement.
        Msa => "msa",
        /// Non-disclosure agreement.
        Nda => "nda",
        /// Anything else.
        Other => "other",
    }
}

string_enum! {
    /// Hosting model of an internal system.
    SystemType ("system type") {
        /// Software as a service.
        Saas => "saas",
        /// On premise.
        OnPremise => "on_premise",
        /// Cloud hosted.
        Cloud => "cloud",
        /// Hybrid.
        Hybrid => "hybrid",
    }
}

string_enum! {
    /// Business criticality of an internal system.
    Criticality ("criticality") {
        /// Low.
        Low => "low",
        /// Medium.
        Medium => "medium",
        /// High.
        High => "high",
        /// Critical.
        Critical => "critical",
    }
}

string_enum! {
    /// Lifecycle of an internal system.
    SystemStatus ("system status") {
        /// In use.
        Active => "active",
        /// Being phased out.
        Deprecated => "deprecated",
        /// Not yet in use.
        Planned => "planned",
    }
}

string_enum! {
    /// Kind of system endpoint.
    EndpointType ("endpoint type") {
        /// HTTP or RPC API.
        Api => "api",
        /// Database.
        Database => "database",
        /// File transfer.
        FileTransfer => "file_transfer",
        /// User interface.
        UserInterface => "user_interface",
        /// Message queue.
        MessageQueue => "message_queue",
        /// Anything else.
        Other => "other",
    }
}

string_enum! {
    /// Role of a system within a processing activity.
    ActivitySystemRole ("activity system role") {
        /// Main system of record.
        Primary => "primary",
        /// Supporting system.
        Supporting => "supporting",
        /// Backup or archive.
        Backup => "backup",
    }
}

string_enum! {
    /// Lifecycle of a data flow.
    DataFlowStatus ("data flow status") {
        /// Being modelled.
        Draft => "draft",
        /// In effect.
        Active => "active",
        /// No longer in effect.
        Retired => "retired",
    }
}

string_enum! {
    /// Chapter V transfer mechanism.
    TransferMechanism ("transfer mechanism") {
        /// Article 45 adequacy decision.
        AdequacyDecision => "adequacy_decision",
        /// Article 46(2)(c) standard contractual clauses.
        StandardContractualClauses => "standard_contractual_clauses",
        /// Article 47 binding corporate rules.
        BindingCorporateRules => "binding_corporate_rules",
        /// Article 42 certification.
        Certification => "certification",
        /// Article 40 code of conduct.
        CodeOfConduct => "code_of_conduct",
        /// Article 49 derogation.
        Derogation => "derogation",
    }
}

string_enum! {
    /// What happens to data when its retention period ends.
    DeletionMethod ("deletion method") {
        /// Erased.
        Delete => "delete",
        /// Irreversibly anonymized.
        Anonymize => "anonymize",
        /// Moved to restricted archive.
        Archive => "archive",
    }
}

string_enum! {
    /// Lifecycle of a DPIA assessment.
    DpiaStatus ("DPIA status") {
        /// No section completed yet.
        Draft => "draft",
        /// Some sections completed.
        InProgress => "in_progress",
        /// Every section completed.
        Completed => "completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("consent", LawfulBasis::Consent)]
    #[case("contract", LawfulBasis::Contract)]
    #[case("legal_obligation", LawfulBasis::LegalObligation)]
    #[case("vital_interests", LawfulBasis::VitalInterests)]
    #[case("public_task", LawfulBasis::PublicTask)]
    #[case("legitimate_interests", LawfulBasis::LegitimateInterests)]
    fn test_lawful_basis_parses(#[case] raw: &str, #[case] expected: LawfulBasis) {
        assert_eq!(raw.parse::<LawfulBasis>().unwrap(), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn test_six_lawful_bases() {
        assert_eq!(LawfulBasis::ALL.len(), 6);
    }

    #[test]
    fn test_ten_special_category_bases() {
        assert_eq!(SpecialCategoryBasis::ALL.len(), 10);
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let err = "gut_feeling".parse::<LawfulBasis>().unwrap_err();
        assert_eq!(err.kind, "lawful basis");
        assert_eq!(err.to_string(), "Unknown lawful basis 'gut_feeling'");
    }

    #[test]
    fn test_parsing_is_case_sensitive() {
        assert!("Special".parse::<DataCategoryType>().is_err());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let json = serde_json::to_string(&TransferMechanism::StandardContractualClauses).unwrap();
        assert_eq!(json, "\"standard_contractual_clauses\"");

        let parsed: VendorRole = serde_json::from_str("\"sub_processor\"").unwrap();
        assert_eq!(parsed, VendorRole::SubProcessor);

        assert!(serde_json::from_str::<VendorRole>("\"reseller\"").is_err());
    }

    #[test]
    fn test_every_variant_round_trips_through_str() {
        for value in DataCategoryType::ALL {
            assert_eq!(value.as_str().parse::<DataCategoryType>().unwrap(), *value);
        }
        for value in EndpointType::ALL {
            assert_eq!(value.as_str().parse::<EndpointType>().unwrap(), *value);
        }
    }
}

//! Reference data loaded by the seeder and by `seed_defaults`.

/// A jurisdiction as shipped with the application.
#[derive(Debug, Clone, Copy)]
pub struct JurisdictionSeed {
    pub country_code: &'static str,
    pub name_en: &'static str,
    pub name_local: &'static str,
    pub is_eu_eea: bool,
    pub gdpr_adequacy: bool,
    pub supervisory_authority: Option<&'static str>,
}

const fn eea(
    country_code: &'static str,
    name_en: &'static str,
    name_local: &'static str,
    authority: &'static str,
) -> JurisdictionSeed {
    JurisdictionSeed {
        country_code,
        name_en,
        name_local,
        is_eu_eea: true,
        gdpr_adequacy: true,
        supervisory_authority: Some(authority),
    }
}

const fn third(
    country_code: &'static str,
    name_en: &'static str,
    name_local: &'static str,
    gdpr_adequacy: bool,
) -> JurisdictionSeed {
    JurisdictionSeed {
        country_code,
        name_en,
        name_local,
        is_eu_eea: false,
        gdpr_adequacy,
        supervisory_authority: None,
    }
}

/// EU/EEA members plus common third countries, with Art. 45 adequacy flags.
pub const JURISDICTIONS: &[JurisdictionSeed] = &[
    eea("AT", "Austria", "Österreich", "Datenschutzbehörde"),
    eea("BE", "Belgium", "België / Belgique", "Gegevensbeschermingsautoriteit / Autorité de protection des données"),
    eea("BG", "Bulgaria", "България", "Commission for Personal Data Protection"),
    eea("HR", "Croatia", "Hrvatska", "Agencija za zaštitu osobnih podataka"),
    eea("CY", "Cyprus", "Κύπρος", "Commissioner for Personal Data Protection"),
    eea("CZ", "Czechia", "Česko", "Úřad pro ochranu osobních údajů"),
    eea("DK", "Denmark", "Danmark", "Datatilsynet"),
    eea("EE", "Estonia", "Eesti", "Andmekaitse Inspektsioon"),
    eea("FI", "Finland", "Suomi", "Tietosuojavaltuutetun toimisto"),
    eea("FR", "France", "France", "Commission Nationale de l'Informatique et des Libertés"),
    eea("DE", "Germany", "Deutschland", "Bundesbeauftragte für den Datenschutz und die Informationsfreiheit"),
    eea("GR", "Greece", "Ελλάδα", "Hellenic Data Protection Authority"),
    eea("HU", "Hungary", "Magyarország", "Nemzeti Adatvédelmi és Információszabadság Hatóság"),
    eea("IE", "Ireland", "Éire", "Data Protection Commission"),
    eea("IT", "Italy", "Italia", "Garante per la protezione dei dati personali"),
    eea("LV", "Latvia", "Latvija", "Datu valsts inspekcija"),
    eea("LT", "Lithuania", "Lietuva", "Valstybinė duomenų apsaugos inspekcija"),
    eea("LU", "Luxembourg", "Lëtzebuerg", "Commission nationale pour la protection des données"),
    eea("MT", "Malta", "Malta", "Information and Data Protection Commissioner"),
    eea("NL", "Netherlands", "Nederland", "Autoriteit Persoonsgegevens"),
    eea("PL", "Poland", "Polska", "Urząd Ochrony Danych Osobowych"),
    eea("PT", "Portugal", "Portugal", "Comissão Nacional de Proteção de Dados"),
    eea("RO", "Romania", "România", "Autoritatea Națională de Supraveghere a Prelucrării Datelor cu Caracter Personal"),
    eea("SK", "Slovakia", "Slovensko", "Úrad na ochranu osobných údajov"),
    eea("SI", "Slovenia", "Slovenija", "Informacijski pooblaščenec"),
    eea("ES", "Spain", "España", "Agencia Española de Protección de Datos"),
    eea("SE", "Sweden", "Sverige", "Integritetsskyddsmyndigheten"),
    eea("IS", "Iceland", "Ísland", "Persónuvernd"),
    eea("LI", "Liechtenstein", "Liechtenstein", "Datenschutzstelle"),
    eea("NO", "Norway", "Norge", "Datatilsynet"),
    third("AD", "Andorra", "Andorra", true),
    third("AR", "Argentina", "Argentina", true),
    third("CA", "Canada", "Canada", true),
    third("FO", "Faroe Islands", "Føroyar", true),
    third("GG", "Guernsey", "Guernsey", true),
    third("IL", "Israel", "ישראל", true),
    third("IM", "Isle of Man", "Isle of Man", true),
    third("JP", "Japan", "日本", true),
    third("JE", "Jersey", "Jersey", true),
    third("NZ", "New Zealand", "Aotearoa", true),
    third("KR", "South Korea", "대한민국", true),
    third("CH", "Switzerland", "Schweiz / Suisse / Svizzera", true),
    third("GB", "United Kingdom", "United Kingdom", true),
    third("UY", "Uruguay", "Uruguay", true),
    third("US", "United States", "United States", false),
    third("AU", "Australia", "Australia", false),
    third("BR", "Brazil", "Brasil", false),
    third("CN", "China", "中国", false),
    third("IN", "India", "भारत", false),
    third("SG", "Singapore", "Singapore", false),
];

/// A default data category seeded into each workspace.
#[derive(Debug, Clone, Copy)]
pub struct CategorySeed {
    pub name: &'static str,
    pub description: &'static str,
    pub category_type: &'static str,
    pub sensitivity_level: &'static str,
    pub special_category_basis: Option<&'static str>,
    /// Name of the parent seed, listed earlier.
    pub parent: Option<&'static str>,
}

const fn category(
    name: &'static str,
    description: &'static str,
    category_type: &'static str,
    sensitivity_level: &'static str,
    parent: Option<&'static str>,
) -> CategorySeed {
    CategorySeed {
        name,
        description,
        category_type,
        sensitivity_level,
        special_category_basis: None,
        parent,
    }
}

const fn special(
    name: &'static str,
    description: &'static str,
    basis: &'static str,
) -> CategorySeed {
    CategorySeed {
        name,
        description,
        category_type: "special",
        sensitivity_level: "critical",
        special_category_basis: Some(basis),
        parent: None,
    }
}

/// Parents come before their children.
pub const DATA_CATEGORIES: &[CategorySeed] = &[
    category("Identity data", "Data identifying a natural person", "personal", "medium", None),
    category("Name", "First, last and maiden names", "personal", "low", Some("Identity data")),
    category("Date of birth", "Date and place of birth", "personal", "medium", Some("Identity data")),
    category("National identifier", "Passport, ID card or tax numbers", "personal", "high", Some("Identity data")),
    category("Contact data", "Ways to reach a person", "personal", "low", None),
    category("Email address", "Private or business email", "personal", "low", Some("Contact data")),
    category("Postal address", "Home or delivery address", "personal", "medium", Some("Contact data")),
    category("Phone number", "Landline or mobile numbers", "personal", "low", Some("Contact data")),
    category("Financial data", "Bank, payment and salary information", "personal", "high", None),
    category("Employment data", "Contracts, positions and performance", "personal", "medium", None),
    category("Online identifiers", "IP addresses, cookie and device ids", "personal", "medium", None),
    category("Location data", "Geolocation and movement data", "personal", "high", None),
    special("Health data", "Physical or mental health, including care", "health_social_care"),
    special("Genetic data", "Inherited or acquired genetic characteristics", "explicit_consent"),
    special("Biometric data", "Biometrics used for unique identification", "explicit_consent"),
    special("Racial or ethnic origin", "Racial or ethnic origin", "explicit_consent"),
    special("Political opinions", "Political opinions", "explicit_consent"),
    special("Religious or philosophical beliefs", "Religious or philosophical beliefs", "explicit_consent"),
    special("Trade union membership", "Trade union membership", "employment_social_security"),
    special("Sex life or sexual orientation", "Sex life or sexual orientation", "explicit_consent"),
    category("Criminal convictions and offences", "Art. 10 GDPR data", "criminal", "critical", None),
    category("Anonymised statistics", "Aggregated data that no longer identifies a person", "anonymous", "low", None),
];

#[cfg(test)]
mod tests {
    use super::*;
    use dataguard_core::category::DataCategoryService;
    use dataguard_core::context::normalize_country_code;
    use std::collections::HashSet;

    #[test]
    fn test_jurisdiction_codes_are_unique_and_normalized() {
        let mut seen = HashSet::new();
        for j in JURISDICTIONS {
            assert_eq!(normalize_country_code(j.country_code).unwrap(), j.country_code);
            assert!(seen.insert(j.country_code), "duplicate {}", j.country_code);
            assert!(!j.is_eu_eea || j.gdpr_adequacy);
        }
        assert_eq!(JURISDICTIONS.iter().filter(|j| j.is_eu_eea).count(), 30);
    }

    #[test]
    fn test_default_categories_pass_validation() {
        let mut seen = HashSet::new();
        for seed in DATA_CATEGORIES {
            let special_basis = seed.special_category_basis;
            DataCategoryService::validate_special_basis(seed.category_type.parse().unwrap(), special_basis)
                .unwrap_or_else(|e| panic!("{}: {e}", seed.name));
            if let Some(parent) = seed.parent {
                assert!(seen.contains(parent), "{} listed before its parent", seed.name);
            }
            seen.insert(seed.name);
        }
    }
}

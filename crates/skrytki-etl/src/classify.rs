//! Government-office classification of entity names.
//!
//! A name is an office when it matches any positive pattern and none of the
//! exclusion patterns. Everything else, including names matching both, is
//! [`Category::Other`].

use regex::RegexSet;
use skrytki_core::model::Category;
use std::sync::LazyLock;

/// Municipal office, city office, commune.
const POSITIVE: &[&str] = &[
    r"(?i)urz[aą]d\s+miasta",
    r"(?i)urz[aą]d\s+miejski",
    r"(?i)urz[aą]d\s+gminy",
    r"(?i)\bgmin[ay]\b",
];

const NEGATIVE: &[&str] = &[
    // court
    r"(?i)\bs[aą]d(?:u|owi|em|zie|y|[oó]w|om|ami|ach|ow(?:y|a|e|ego|ej|ych|ym|ymi))?\b",
    // prosecutor's office
    r"(?i)prokuratur",
    // care centres
    r"(?i)o[sś]rod[eo]k",
    r"(?i)\bdom\s+pomocy",
    r"(?i)opiek",
    // school
    r"(?i)szko[lł]",
    // team / complex
    r"(?i)zesp[oó][lł]",
    // union
    r"(?i)zwi[aą]zek",
    // bureau
    r"(?i)biur",
    // social-assistance facility codes
    r"\b[GM]OPS\b",
    // service centre
    r"(?i)centrum\s+us[lł]ug",
    // institution
    r"(?i)zak[lł]ad",
    r"(?i)instytu",
    // county level
    r"(?i)powiat",
    // tax office
    r"(?i)skarbow",
    // labour office
    r"(?i)urz[aą]d\s+pracy",
    // board / management
    r"(?i)zarz[aą]d",
];

#[allow(clippy::expect_used)]
static POSITIVE_SET: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new(POSITIVE).expect("built-in office patterns must compile"));

#[allow(clippy::expect_used)]
static NEGATIVE_SET: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new(NEGATIVE).expect("built-in exclusion patterns must compile"));

/// Classify an entity by its (cleaned) name.
pub fn classify(name: &str) -> Category {
    if POSITIVE_SET.is_match(name) && !NEGATIVE_SET.is_match(name) {
        Category::Office
    } else {
        Category::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert_eq!(POSITIVE_SET.len(), POSITIVE.len());
        assert_eq!(NEGATIVE_SET.len(), NEGATIVE.len());
    }

    #[test]
    fn test_city_office_is_office() {
        assert_eq!(classify("Urząd Miasta Testowo"), Category::Office);
        assert_eq!(classify("URZĄD MIEJSKI W TESTOWIE"), Category::Office);
        assert_eq!(classify("Urzad Gminy Wólka"), Category::Office);
        assert_eq!(classify("Gmina Testowo"), Category::Office);
    }

    #[test]
    fn test_exclusions_win() {
        assert_eq!(classify("Sąd Rejonowy dla Gminy Testowo"), Category::Other);
        assert_eq!(classify("Gminny Ośrodek Pomocy Społecznej"), Category::Other);
        assert_eq!(classify("GOPS Gmina Testowo"), Category::Other);
        assert_eq!(classify("Szkoła Podstawowa Gminy Testowo"), Category::Other);
        assert_eq!(classify("Zespół Szkół Gminy Testowo"), Category::Other);
        assert_eq!(classify("Związek Gmin Testowskich"), Category::Other);
        assert_eq!(classify("Gminne Biuro Obsługi"), Category::Other);
        assert_eq!(classify("Gminny Zakład Komunalny w Gminie Testowo"), Category::Other);
        assert_eq!(classify("Zarząd Dróg Gminy Testowo"), Category::Other);
        assert_eq!(classify("Urząd Skarbowy Testowo Gmina"), Category::Other);
        assert_eq!(classify("Powiatowy Urząd Pracy Gmina Testowo"), Category::Other);
        assert_eq!(classify("Prokuratura Rejonowa Gmina Testowo"), Category::Other);
    }

    #[test]
    fn test_court_inflections_are_excluded() {
        for name in [
            "Kurator przy Sądzie Rejonowym dla Gminy Testowo",
            "Pełnomocnik przed Sądem dla Gminy Testowo",
            "Biegły przy Sądowi Gminy Testowo",
            "Obsługa Sądów Gminy Testowo",
            "Wydział Ksiąg przy Sądach Gminy Testowo",
            "Pomoc Sądom Gminy Testowo",
            "Współpraca z Sądami Gminy Testowo",
            "Kuratorska Służba Sądowa Gminy Testowo",
            "Komornik Sądowy Gminy Testowo",
            "Kurator Sądowego Okręgu Gminy Testowo",
            "Kancelaria Sądowej Egzekucji Gminy Testowo",
            "Archiwum Akt Sądowych Gminy Testowo",
            "Punkt Sadowy Gminy Testowo",
        ] {
            assert_eq!(classify(name), Category::Other, "{name}");
        }
    }

    #[test]
    fn test_court_pattern_does_not_hit_place_names() {
        assert_eq!(classify("Urząd Gminy Sadki"), Category::Office);
        assert_eq!(classify("Urząd Gminy Sadowo"), Category::Office);
        assert_eq!(classify("Urząd Gminy Sadowne"), Category::Office);
    }

    #[test]
    fn test_unrelated_names_are_other() {
        assert_eq!(classify("Spółdzielnia Mieszkaniowa Zgoda"), Category::Other);
        assert_eq!(classify(""), Category::Other);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let name = "Urząd Gminy Testowo";
        let first = classify(name);
        for _ in 0..10 {
            assert_eq!(classify(name), first);
        }
    }
}

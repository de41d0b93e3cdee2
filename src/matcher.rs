//! Case-insensitive matching of player guesses against country names and codes.

use std::ops::BitOr;

use crate::data::Country;

/// Which country fields a guess may match. Combine levels with `|`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchLevel(u8);

impl MatchLevel {
    pub const COMMON: Self = Self(1 << 0);
    pub const OFFICIAL: Self = Self(1 << 1);
    /// CCA2 or CCA3 code.
    pub const ABBREVIATION: Self = Self(1 << 2);
    pub const ALL: Self = Self(Self::COMMON.0 | Self::OFFICIAL.0 | Self::ABBREVIATION.0);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for MatchLevel {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

fn same(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.trim().to_lowercase()
}

pub fn match_country(input: &str, country: &Country, level: MatchLevel) -> bool {
    let input = input.trim();
    if input.is_empty() {
        return false;
    }

    (level.contains(MatchLevel::COMMON) && same(input, &country.name.common))
        || (level.contains(MatchLevel::OFFICIAL) && same(input, &country.name.official))
        || (level.contains(MatchLevel::ABBREVIATION) && (same(input, &country.cca2) || same(input, &country.cca3)))
}

/// Matches common name, official name or either ISO code.
pub fn matches_country(guess: &str, country: &Country) -> bool {
    match_country(guess, country, MatchLevel::ALL)
}

pub fn matches_name(guess: &str, name: &str) -> bool {
    let guess = guess.trim();
    !guess.is_empty() && same(guess, name)
}

/// First country in `countries` matching `guess` at `level`.
pub fn find_country<'a>(
    countries: impl IntoIterator<Item = &'a Country>,
    guess: &str,
    level: MatchLevel,
) -> Option<&'a Country> {
    countries.into_iter().find(|c| match_country(guess, c, level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn matches_each_field_case_insensitively() {
        let data = fixtures::world();
        let france = data.country_by_cca2("FR").unwrap();

        assert!(matches_country("france", france));
        assert!(matches_country("  FRENCH republic ", france));
        assert!(matches_country("fr", france));
        assert!(matches_country("Fra", france));
        assert!(!matches_country("Franc", france));
    }

    #[test]
    fn empty_input_never_matches() {
        let data = fixtures::world();
        let france = data.country_by_cca2("FR").unwrap();

        assert!(!matches_country("", france));
        assert!(!matches_country("   ", france));
        assert!(!matches_name(" ", ""));
    }

    #[test]
    fn level_restricts_fields() {
        let data = fixtures::world();
        let germany = data.country_by_cca2("DE").unwrap();
        let names = MatchLevel::COMMON | MatchLevel::OFFICIAL;

        assert!(match_country("Germany", germany, names));
        assert!(match_country("federal republic of germany", germany, names));
        assert!(!match_country("DEU", germany, names));
        assert!(!match_country("Germany", germany, MatchLevel::ABBREVIATION));
        assert!(match_country("de", germany, MatchLevel::ABBREVIATION));
    }

    #[test]
    fn non_ascii_names_compare_case_insensitively() {
        let data = fixtures::world();
        let ivory_coast = data.country_by_cca2("CI").unwrap();

        assert!(matches_country("REPUBLIC OF CÔTE D'IVOIRE", ivory_coast));
    }

    #[test]
    fn find_country_returns_first_match() {
        let data = fixtures::world();

        let found = find_country(data.countries(), "jpn", MatchLevel::ALL);
        assert_eq!(found.map(|c| c.name.common.as_str()), Some("Japan"));
        assert!(find_country(data.countries(), "Atlantis", MatchLevel::ALL).is_none());
    }

    #[test]
    fn matches_name_trims_both_sides() {
        assert!(matches_name(" new zealand", "New Zealand "));
        assert!(!matches_name("Zealand", "New Zealand"));
    }
}

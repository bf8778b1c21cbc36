//! Country code normalization.
//!
//! Company locations are stored as ISO alpha-2 codes in the survey, while
//! the income-by-country table is keyed by ISO alpha-3. The lookup accepts
//! alpha-2, alpha-3 and English short names, case-insensitively.

mod codes;

use std::collections::HashMap;

/// Key used for locations that cannot be resolved to a country.
pub const UNRESOLVED_COUNTRY: &str = "not found";

/// Maps a free-form country value to an ISO alpha-3 code.
pub trait CountryNormalizer {
    /// Returns the alpha-3 code, or `None` when the value is unknown.
    fn to_iso3(&self, value: &str) -> Option<&'static str>;

    /// Like [`to_iso3`](Self::to_iso3) but falls back to [`UNRESOLVED_COUNTRY`].
    fn normalize(&self, value: &str) -> String {
        self.to_iso3(value)
            .unwrap_or(UNRESOLVED_COUNTRY)
            .to_string()
    }
}

/// Built-in ISO 3166-1 lookup table.
#[derive(Debug, Clone)]
pub struct IsoCountryTable {
    by_key: HashMap<String, &'static str>,
}

impl IsoCountryTable {
    /// Build the lookup index.
    pub fn new() -> Self {
        let mut by_key = HashMap::with_capacity(codes::COUNTRIES.len() * 3);

        for &(alpha2, alpha3, name) in codes::COUNTRIES {
            by_key.insert(alpha2.to_string(), alpha3);
            by_key.insert(alpha3.to_string(), alpha3);
            by_key.insert(name.to_uppercase(), alpha3);
        }

        for &(alias, alpha3) in codes::ALIASES {
            by_key.insert(alias.to_string(), alpha3);
        }

        Self { by_key }
    }

    /// Number of distinct countries known to the table.
    #[allow(dead_code)] // Used by tests and diagnostics
    pub fn country_count(&self) -> usize {
        codes::COUNTRIES.len()
    }
}

impl Default for IsoCountryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryNormalizer for IsoCountryTable {
    fn to_iso3(&self, value: &str) -> Option<&'static str> {
        let key = value.trim().to_uppercase();
        if key.is_empty() {
            return None;
        }
        self.by_key.get(&key).copied()
    }
}

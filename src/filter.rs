// The listing filter engine. Pure functions only; no I/O happens here.

use crate::models::{Engine, Listing, Transmission};

/// The combined set of active search predicates at a point in time.
///
/// Held in view state, re-derived on every interaction, never persisted.
/// `None` on an enum field means "All". The default value is the identity
/// spec: empty texts, no enum constraints, maximal ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub search: String,
    pub engine: Option<Engine>,
    pub year: Option<u32>,
    /// Inclusive [lo, hi] in currency units.
    pub price: (f64, f64),
    /// Inclusive [lo, hi] in km.
    pub mileage: (u32, u32),
    /// Inclusive [lo, hi] in liters.
    pub engine_size: (f64, f64),
    pub transmission: Option<Transmission>,
    pub color: Option<String>,
    pub location: String,
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec {
            search: String::new(),
            engine: None,
            year: None,
            price: (0.0, f64::MAX),
            mileage: (0, u32::MAX),
            engine_size: (0.0, f64::MAX),
            transmission: None,
            color: None,
            location: String::new(),
        }
    }
}

impl FilterSpec {
    /// A listing is included iff every active predicate holds.
    ///
    /// An inverted range (lo > hi) cannot be satisfied, so it simply matches
    /// nothing; it is not an error.
    pub fn matches(&self, listing: &Listing) -> bool {
        let matches_search = self.search.is_empty()
            || listing
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        let matches_engine = self.engine.is_none_or(|e| listing.engine == e);
        let matches_year = self.year.is_none_or(|y| listing.year == y);
        let matches_price = listing.price >= self.price.0 && listing.price <= self.price.1;
        let matches_mileage =
            listing.mileage >= self.mileage.0 && listing.mileage <= self.mileage.1;
        let matches_engine_size =
            listing.engine_size >= self.engine_size.0 && listing.engine_size <= self.engine_size.1;
        let matches_transmission = self
            .transmission
            .is_none_or(|t| listing.transmission == t);
        let matches_color = self
            .color
            .as_deref()
            .is_none_or(|c| listing.color == c);
        let matches_location = self.location.is_empty()
            || listing
                .location
                .to_lowercase()
                .contains(&self.location.to_lowercase());

        matches_search
            && matches_engine
            && matches_year
            && matches_price
            && matches_mileage
            && matches_engine_size
            && matches_transmission
            && matches_color
            && matches_location
    }
}

/// Returns the subsequence of `listings` matching `spec`, in input order.
pub fn filter(listings: &[Listing], spec: &FilterSpec) -> Vec<Listing> {
    listings
        .iter()
        .filter(|listing| spec.matches(listing))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, name: &str) -> Listing {
        Listing {
            id: id.to_string(),
            name: name.to_string(),
            price: 20000.0,
            engine: Engine::Petrol,
            engine_size: 2.0,
            mileage: 60000,
            transmission: Transmission::Manual,
            color: "Red".to_string(),
            year: 2018,
            description: String::new(),
            images: vec![],
            location: "Dublin".to_string(),
        }
    }

    fn tesla() -> Listing {
        Listing {
            id: "1".to_string(),
            name: "Tesla Model 3".to_string(),
            price: 35000.0,
            engine: Engine::Electric,
            engine_size: 0.0,
            mileage: 5000,
            transmission: Transmission::Automatic,
            color: "Blue".to_string(),
            year: 2022,
            description: String::new(),
            images: vec![],
            location: "Berlin".to_string(),
        }
    }

    #[test]
    fn identity_spec_returns_input_unchanged() {
        let listings = vec![listing("a", "Volvo V60"), tesla(), listing("c", "Honda CB500")];
        let result = filter(&listings, &FilterSpec::default());
        let ids: Vec<&str> = result.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "1", "c"]);
    }

    #[test]
    fn result_is_a_subsequence_of_the_input() {
        let listings = vec![
            listing("a", "Volvo V60"),
            tesla(),
            listing("c", "Volvo XC40"),
            listing("d", "Fiat 500"),
        ];
        let spec = FilterSpec {
            search: "volvo".to_string(),
            ..FilterSpec::default()
        };
        let result = filter(&listings, &spec);
        let ids: Vec<&str> = result.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter(&[], &FilterSpec::default()).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_both_ways() {
        let listings = vec![listing("1", "Volvo")];
        for needle in ["volvo", "VOLVO", "Volvo", "oLv"] {
            let spec = FilterSpec {
                search: needle.to_string(),
                ..FilterSpec::default()
            };
            assert_eq!(filter(&listings, &spec).len(), 1, "search '{}'", needle);
        }
    }

    #[test]
    fn location_is_a_case_insensitive_substring_match() {
        let listings = vec![tesla()];
        let spec = FilterSpec {
            location: "berl".to_string(),
            ..FilterSpec::default()
        };
        assert_eq!(filter(&listings, &spec).len(), 1);
        let spec = FilterSpec {
            location: "Madrid".to_string(),
            ..FilterSpec::default()
        };
        assert!(filter(&listings, &spec).is_empty());
    }

    #[test]
    fn electric_in_price_band_matches_then_diesel_does_not() {
        // The browse scenario: one Tesla, an engine + price-range spec.
        let listings = vec![tesla()];
        let mut spec = FilterSpec {
            engine: Some(Engine::Electric),
            price: (30000.0, 40000.0),
            ..FilterSpec::default()
        };
        assert_eq!(filter(&listings, &spec).len(), 1);

        spec.engine = Some(Engine::Diesel);
        assert!(filter(&listings, &spec).is_empty());
    }

    #[test]
    fn inverted_ranges_match_nothing_without_error() {
        let listings = vec![tesla(), listing("2", "Volvo V60")];
        let price_inverted = FilterSpec {
            price: (50000.0, 10000.0),
            ..FilterSpec::default()
        };
        assert!(filter(&listings, &price_inverted).is_empty());

        let mileage_inverted = FilterSpec {
            mileage: (100000, 0),
            ..FilterSpec::default()
        };
        assert!(filter(&listings, &mileage_inverted).is_empty());

        let size_inverted = FilterSpec {
            engine_size: (8.0, 1.0),
            ..FilterSpec::default()
        };
        assert!(filter(&listings, &size_inverted).is_empty());
    }

    #[test]
    fn year_and_exact_enum_predicates() {
        let listings = vec![tesla(), listing("2", "Volvo V60")];

        let by_year = FilterSpec {
            year: Some(2022),
            ..FilterSpec::default()
        };
        assert_eq!(filter(&listings, &by_year).len(), 1);

        let by_transmission = FilterSpec {
            transmission: Some(Transmission::Manual),
            ..FilterSpec::default()
        };
        assert_eq!(filter(&listings, &by_transmission)[0].id, "2");

        let by_color = FilterSpec {
            color: Some("Blue".to_string()),
            ..FilterSpec::default()
        };
        assert_eq!(filter(&listings, &by_color)[0].id, "1");
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let listings = vec![tesla()];
        let spec = FilterSpec {
            price: (35000.0, 35000.0),
            mileage: (5000, 5000),
            engine_size: (0.0, 0.0),
            ..FilterSpec::default()
        };
        assert_eq!(filter(&listings, &spec).len(), 1);
    }
}

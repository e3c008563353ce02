//! # Catalog Filter
//!
//! Pure narrowing of a car list by the search screen's criteria.
//!
//! ## Matching Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Criterion   Active when        Matches                                │
//! │  ─────────   ───────────        ───────                                │
//! │  query       non-empty          make OR model contains (ignore case)   │
//! │  location    non-empty          location contains (ignore case)        │
//! │  category    known category     stored category, else heuristic:       │
//! │                                   sedan    make ∈ {toyota, honda}      │
//! │                                   suv      model ∋ "cr-v" | "x3"       │
//! │                                   luxury   make = bmw | price > 100    │
//! │                                   electric fuel == "Electric" (exact)  │
//! │  price       always             min <= price_per_day <= max            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All active criteria must hold. The output keeps input order; sorting is a
//! separate, explicit step ([`CatalogSort`]).

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Car, Category};
use crate::{DEFAULT_MAX_PRICE, LUXURY_PRICE_THRESHOLD};

// =============================================================================
// Search Criteria
// =============================================================================

/// Criteria set produced by the search screen.
///
/// `category` stays a raw string: unknown values (including `"all"`) apply
/// no category filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub query: String,
    pub location: String,
    pub category: String,
    pub min_price: Money,
    pub max_price: Money,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        SearchCriteria {
            query: String::new(),
            location: String::new(),
            category: String::new(),
            min_price: Money::zero(),
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

impl SearchCriteria {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_price_range(mut self, min: Money, max: Money) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Checks a single car against every active criterion.
    pub fn matches(&self, car: &Car) -> bool {
        matches_text(car, &self.query)
            && matches_location(car, &self.location)
            && matches_category(car, &self.category)
            && matches_price(car, self.min_price, self.max_price)
    }
}

/// Returns the cars matching `criteria`, in catalog order.
///
/// ## Example
/// ```rust
/// use carhire_core::filter::{filter_cars, SearchCriteria};
/// use carhire_core::seed::sample_catalog;
///
/// let hits = filter_cars(&sample_catalog(), &SearchCriteria::default().with_query("civic"));
/// assert!(hits.iter().all(|car| car.model == "Civic"));
/// ```
pub fn filter_cars(catalog: &[Car], criteria: &SearchCriteria) -> Vec<Car> {
    catalog
        .iter()
        .filter(|car| criteria.matches(car))
        .cloned()
        .collect()
}

// =============================================================================
// Individual Predicates
// =============================================================================

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_text(car: &Car, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    contains_ignore_case(&car.make, query) || contains_ignore_case(&car.model, query)
}

fn matches_location(car: &Car, location: &str) -> bool {
    if location.is_empty() {
        return true;
    }
    contains_ignore_case(&car.location, location)
}

fn matches_category(car: &Car, category: &str) -> bool {
    let Ok(category) = category.parse::<Category>() else {
        return true;
    };

    match car.category {
        Some(stored) => stored == category,
        None => heuristic_category(car, category),
    }
}

/// Category guess for listings created before category was stored.
fn heuristic_category(car: &Car, category: Category) -> bool {
    match category {
        Category::Sedan => {
            car.make.eq_ignore_ascii_case("toyota") || car.make.eq_ignore_ascii_case("honda")
        }
        Category::Suv => {
            let model = car.model.to_lowercase();
            model.contains("cr-v") || model.contains("x3")
        }
        Category::Luxury => {
            car.make.eq_ignore_ascii_case("bmw") || car.price_per_day() > LUXURY_PRICE_THRESHOLD
        }
        // Exact comparison: "electric" in lowercase does not match.
        Category::Electric => car.fuel == "Electric",
    }
}

fn matches_price(car: &Car, min: Money, max: Money) -> bool {
    let price = car.price_per_day();
    price >= min && price <= max
}

// =============================================================================
// Sorting
// =============================================================================

/// Optional ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSort {
    /// Keep catalog order.
    #[default]
    Catalog,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl CatalogSort {
    /// Stable sort: equal keys keep their filtered order.
    pub fn apply(&self, cars: &mut [Car]) {
        match self {
            CatalogSort::Catalog => {}
            CatalogSort::PriceAsc => cars.sort_by_key(|c| c.price_per_day_cents),
            CatalogSort::PriceDesc => {
                cars.sort_by(|a, b| b.price_per_day_cents.cmp(&a.price_per_day_cents))
            }
            CatalogSort::RatingDesc => cars.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_catalog;

    fn car(make: &str, model: &str, price_cents: i64) -> Car {
        let mut car = sample_catalog().remove(0);
        car.id = format!("{}-{}", make, model).to_lowercase();
        car.make = make.to_string();
        car.model = model.to_string();
        car.price_per_day_cents = price_cents;
        car.fuel = "Petrol".to_string();
        car.location = "Nairobi".to_string();
        car.category = None;
        car
    }

    fn ids(cars: &[Car]) -> Vec<String> {
        cars.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_luxury_is_bmw_or_expensive() {
        let catalog = vec![car("Toyota", "Camry", 8500), car("BMW", "X3", 14500)];
        let result = filter_cars(&catalog, &SearchCriteria::default().with_category("luxury"));
        assert_eq!(ids(&result), vec!["bmw-x3"]);

        let catalog = vec![car("Toyota", "Land Cruiser", 18000)];
        let result = filter_cars(&catalog, &SearchCriteria::default().with_category("luxury"));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_text_query_matches_model_ignoring_case() {
        let catalog = vec![car("Honda", "Civic", 6000), car("Honda", "CR-V", 7500)];
        let result = filter_cars(&catalog, &SearchCriteria::default().with_query("civic"));
        assert_eq!(ids(&result), vec!["honda-civic"]);

        let result = filter_cars(&catalog, &SearchCriteria::default().with_query("HONDA"));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_text_is_matched_untrimmed() {
        let catalog = vec![car("Toyota", "Camry", 8500)];

        let result = filter_cars(&catalog, &SearchCriteria::default().with_query("camry "));
        assert!(result.is_empty());

        let result = filter_cars(&catalog, &SearchCriteria::default().with_query("   "));
        assert!(result.is_empty());

        let result = filter_cars(&catalog, &SearchCriteria::default().with_location(" "));
        assert!(result.is_empty());

        let result = filter_cars(&catalog, &SearchCriteria::default().with_query(""));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_category_heuristics() {
        let catalog = vec![
            car("Toyota", "Camry", 8500),
            car("Honda", "CR-V", 7500),
            car("BMW", "X3", 14500),
            car("Ford", "Focus", 5000),
        ];

        let sedans = filter_cars(&catalog, &SearchCriteria::default().with_category("sedan"));
        assert_eq!(ids(&sedans), vec!["toyota-camry", "honda-cr-v"]);

        let suvs = filter_cars(&catalog, &SearchCriteria::default().with_category("suv"));
        assert_eq!(ids(&suvs), vec!["honda-cr-v", "bmw-x3"]);
    }

    #[test]
    fn test_electric_is_case_sensitive() {
        let mut tesla = car("Tesla", "Model 3", 12000);
        tesla.fuel = "Electric".to_string();
        let mut leaf = car("Nissan", "Leaf", 5000);
        leaf.fuel = "electric".to_string();

        let result = filter_cars(
            &[tesla, leaf],
            &SearchCriteria::default().with_category("electric"),
        );
        assert_eq!(ids(&result), vec!["tesla-model 3"]);
    }

    #[test]
    fn test_unknown_category_passes_everything() {
        let catalog = vec![car("Toyota", "Camry", 8500), car("Ford", "Focus", 5000)];
        for category in ["all", "", "convertible"] {
            let result = filter_cars(&catalog, &SearchCriteria::default().with_category(category));
            assert_eq!(result.len(), 2, "category {:?}", category);
        }
    }

    #[test]
    fn test_stored_category_overrides_heuristic() {
        let mut ford = car("Ford", "Explorer", 9000);
        ford.category = Some(Category::Suv);
        let mut bmw = car("BMW", "X3", 14500);
        bmw.category = Some(Category::Suv);

        let catalog = vec![ford, bmw];
        let suvs = filter_cars(&catalog, &SearchCriteria::default().with_category("suv"));
        assert_eq!(suvs.len(), 2);

        let luxury = filter_cars(&catalog, &SearchCriteria::default().with_category("luxury"));
        assert!(luxury.is_empty());
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let catalog = vec![
            car("A", "One", 5000),
            car("B", "Two", 8500),
            car("C", "Three", 14500),
        ];
        let criteria = SearchCriteria::default()
            .with_price_range(Money::from_major(50), Money::from_major(85));
        assert_eq!(ids(&filter_cars(&catalog, &criteria)), vec!["a-one", "b-two"]);
    }

    #[test]
    fn test_location_substring() {
        let mut mombasa = car("Toyota", "Vitz", 4000);
        mombasa.location = "Mombasa, Nyali".to_string();
        let catalog = vec![car("Toyota", "Camry", 8500), mombasa];

        let result = filter_cars(&catalog, &SearchCriteria::default().with_location("nyali"));
        assert_eq!(ids(&result), vec!["toyota-vitz"]);
    }

    #[test]
    fn test_filter_is_idempotent_and_stable() {
        let catalog = sample_catalog();
        let criteria = SearchCriteria::default()
            .with_query("o")
            .with_price_range(Money::from_major(40), Money::from_major(200));

        let once = filter_cars(&catalog, &criteria);
        let twice = filter_cars(&once, &criteria);
        assert_eq!(once, twice);

        let positions: Vec<usize> = once
            .iter()
            .map(|c| catalog.iter().position(|x| x.id == c.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sort_is_separate_step() {
        let mut cars = vec![car("A", "One", 9000), car("B", "Two", 5000), car("C", "Three", 7000)];
        CatalogSort::PriceAsc.apply(&mut cars);
        assert_eq!(ids(&cars), vec!["b-two", "c-three", "a-one"]);
        CatalogSort::PriceDesc.apply(&mut cars);
        assert_eq!(ids(&cars), vec!["a-one", "c-three", "b-two"]);
    }
}

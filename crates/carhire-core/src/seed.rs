//! # Sample Catalog
//!
//! Static listings loaded at process start until owners publish real ones.
//! Used by the client store's default catalog and by the database seeder.

use crate::types::Car;

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    owner_id: &str,
    make: &str,
    model: &str,
    year: i32,
    price_per_day_cents: i64,
    location: &str,
    fuel: &str,
    transmission: &str,
    seats: u8,
    rating: f64,
    review_count: u32,
    features: &[&str],
) -> Car {
    Car {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        make: make.to_string(),
        model: model.to_string(),
        year,
        image: format!("{}-{}.jpg", make, model).to_lowercase().replace(' ', "-"),
        price_per_day_cents,
        price_per_km_cents: None,
        location: location.to_string(),
        available: true,
        unavailable_dates: Vec::new(),
        features: features.iter().map(|f| f.to_string()).collect(),
        driver_available: false,
        driver_included: false,
        rating,
        review_count,
        fuel: fuel.to_string(),
        transmission: transmission.to_string(),
        seats,
        description: format!("{} {} {} in great condition.", year, make, model),
        contact_phone: "0712345678".to_string(),
        contact_email: format!("{}@carhire.example", owner_id),
        category: None,
    }
}

/// The built-in catalog, in display order.
pub fn sample_catalog() -> Vec<Car> {
    let mut cars = vec![
        listing(
            "1", "owner-1", "Toyota", "Camry", 2022, 8500, "Nairobi, Westlands",
            "Petrol", "Automatic", 5, 4.8, 124, &["Bluetooth", "Backup Camera", "Cruise Control"],
        ),
        listing(
            "2", "owner-1", "Honda", "Civic", 2021, 6000, "Nairobi, Kilimani",
            "Petrol", "Automatic", 5, 4.6, 89, &["Bluetooth", "USB Charging"],
        ),
        listing(
            "3", "owner-2", "Honda", "CR-V", 2023, 7500, "Mombasa, Nyali",
            "Hybrid", "Automatic", 7, 4.7, 56, &["AWD", "GPS", "Sunroof"],
        ),
        listing(
            "4", "owner-2", "BMW", "X3", 2023, 14500, "Nairobi, Karen",
            "Diesel", "Automatic", 5, 4.9, 42, &["Leather Seats", "GPS", "Parking Sensors"],
        ),
        listing(
            "5", "owner-3", "Tesla", "Model 3", 2024, 12000, "Nairobi, Upper Hill",
            "Electric", "Automatic", 5, 4.9, 31, &["Autopilot", "Fast Charging"],
        ),
        listing(
            "6", "owner-3", "Mazda", "Demio", 2019, 3500, "Kisumu, Milimani",
            "Petrol", "Manual", 5, 4.3, 77, &["Air Conditioning"],
        ),
    ];

    // The Camry and the X3 come with an optional chauffeur.
    cars[0].driver_available = true;
    cars[3].driver_available = true;
    cars[3].driver_included = true;
    cars[3].price_per_km_cents = Some(120);

    cars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_car;

    #[test]
    fn test_sample_catalog_is_valid_and_unique() {
        let cars = sample_catalog();
        for car in &cars {
            assert!(validate_car(car).is_ok(), "{} should be valid", car.id);
        }

        let mut ids: Vec<&str> = cars.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cars.len());
    }
}

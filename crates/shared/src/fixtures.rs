//! Built-in sample catalog used for offline mode, admin seeding and tests.

use crate::domain::Product;

/// Image assigned to products created locally before a real image exists.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/400x300.png?text=New+Property";

pub const SUMMER_RENTALS: &str = "Summer Rentals";
pub const WEEKEND_GETAWAYS: &str = "Weekend Getaways";
pub const FOR_SALE: &str = "Properties for Sale";

pub fn sample_products() -> Vec<Product> {
    vec![
        Product::new(
            1,
            "Beach Apartment",
            "Cozy apartment with an ocean view, ideal for holidays. Two bedrooms and one bathroom.",
            50_000.0,
            SUMMER_RENTALS,
            "res://beach_apartment",
        ),
        Product::new(
            2,
            "Forest Cabin",
            "Rustic cabin to get away from the city. Sleeps four.",
            75_000.0,
            SUMMER_RENTALS,
            "res://forest_cabin",
        ),
        Product::new(
            3,
            "Country House",
            "Comfortable house for a perfect weekend. Great for family holidays.",
            35_000.0,
            SUMMER_RENTALS,
            "res://country_house",
        ),
        Product::new(
            4,
            "Mountain House",
            "House in the mountains for an adventurous weekend. Great for families.",
            45_000.0,
            WEEKEND_GETAWAYS,
            "res://mountain_house",
        ),
        Product::new(
            5,
            "Downtown Apartment",
            "Quiet apartment in the city centre. Great for families.",
            40_000.0,
            FOR_SALE,
            "res://downtown_apartment",
        ),
    ]
}

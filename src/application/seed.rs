//! Sample catalogue for demos and local development.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use super::{CreateCategory, CreateProduct, Handler, Inventory, SeedSummary};
use crate::error::Result;

/// Inserts three categories and fifteen products through the regular
/// create handlers. Existing data is left in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedSampleData;

/// (name, description, price in cents, stock)
type SampleProduct = (&'static str, &'static str, i64, i32);

const CATALOGUE: [(&str, &str, [SampleProduct; 5]); 3] = [
    (
        "Electronics",
        "Consumer electronics and gadgets",
        [
            ("Galaxy S23 Smartphone", "Samsung Galaxy S23 smartphone, 128GB", 249_990, 25),
            ("Dell Inspiron Laptop", "Dell Inspiron 15 laptop, i5, 8GB RAM, 256GB SSD", 329_900, 15),
            ("JBL Bluetooth Headphones", "JBL Tune 760NC wireless headphones", 29_990, 40),
            ("LG 55\" Smart TV", "LG ThinQ AI 55\" 4K LED smart TV", 219_900, 8),
            ("Apple iPad", "iPad 10.2\" 64GB Wi-Fi, Space Gray", 209_900, 12),
        ],
    ),
    (
        "Clothing",
        "Apparel and accessories",
        [
            ("Nike Dri-FIT T-Shirt", "Men's Nike Dri-FIT t-shirt, size M", 8_990, 60),
            ("Levi's 501 Jeans", "Levi's 501 original men's jeans", 19_990, 35),
            ("Zara Floral Dress", "Zara floral print dress, size S", 14_990, 22),
            ("Adidas Ultraboost Sneakers", "Adidas Ultraboost 22 men's sneakers, black", 59_990, 18),
            ("North Face Jacket", "The North Face waterproof jacket, size M", 44_990, 28),
        ],
    ),
    (
        "Home & Garden",
        "Products for the home and garden",
        [
            ("Electrolux Vacuum Cleaner", "Electrolux Neo First 1200W vacuum cleaner", 18_990, 14),
            ("Rochedo Pressure Cooker", "Rochedo 6L stainless steel pressure cooker", 12_990, 32),
            ("Tramontina Knife Set", "Tramontina 12-piece knife set", 7_990, 45),
            ("Ceramic Vase", "Decorative ceramic vase, 25cm tall", 3_990, 50),
            ("Garden Watering Can", "Plastic garden watering can, 5L", 1_990, 67),
        ],
    ),
];

#[async_trait]
impl Handler<SeedSampleData> for Inventory {
    type Output = SeedSummary;

    async fn handle(&self, _command: SeedSampleData) -> Result<SeedSummary> {
        let mut summary = SeedSummary {
            categories_created: 0,
            products_created: 0,
        };

        for (name, description, products) in CATALOGUE {
            let category = self
                .send(CreateCategory {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                })
                .await?;
            summary.categories_created += 1;

            for (name, description, cents, stock) in products {
                self.send(CreateProduct {
                    name: name.to_string(),
                    description: description.to_string(),
                    price: Decimal::new(cents, 2),
                    category_id: Some(category.id.clone()),
                    stock_quantity: stock,
                })
                .await?;
                summary.products_created += 1;
            }
        }

        info!(
            categories = summary.categories_created,
            products = summary.products_created,
            "Sample data seeded"
        );
        Ok(summary)
    }
}

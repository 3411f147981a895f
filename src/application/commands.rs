//! Commands: requests that change stored state.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use super::{CategoryDto, Handler, Inventory, ProductDto, ValidationErrors};
use crate::domain::{Category, Product};
use crate::error::{AppError, Result};

// == Limits ==
const PRODUCT_NAME_MAX: usize = 200;
const PRODUCT_DESCRIPTION_MAX: usize = 1000;
const CATEGORY_NAME_MIN: usize = 3;
const CATEGORY_NAME_MAX: usize = 50;
const CATEGORY_DESCRIPTION_MAX: usize = 200;
const MAX_STOCK: i32 = 100_000;

fn max_price() -> Decimal {
    Decimal::from(10_000_000)
}

/// The trimmed value, or None when absent or blank.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// == Shared Rules ==
fn check_product_name(errors: &mut ValidationErrors, name: &str) {
    errors
        .rule_for("name", name)
        .not_empty("Product name is required")
        .length(1, PRODUCT_NAME_MAX, "Product name must be between 1 and 200 characters");
}

fn check_product_description(errors: &mut ValidationErrors, description: &str) {
    errors
        .rule_for("description", description)
        .not_empty("Product description is required")
        .length(
            1,
            PRODUCT_DESCRIPTION_MAX,
            "Product description must be between 1 and 1000 characters",
        );
}

fn check_price(errors: &mut ValidationErrors, price: Decimal) {
    errors
        .rule_for("price", price)
        .at_least(Decimal::ZERO, "Price must be greater than or equal to zero")
        .less_than(max_price(), "Price must be less than 10,000,000");
}

fn check_stock(errors: &mut ValidationErrors, field: &'static str, stock: i32) {
    errors
        .rule_for(field, stock)
        .at_least(0, "Stock quantity cannot be negative")
        .less_than(MAX_STOCK, "Stock quantity must be less than 100,000");
}

fn check_category_name(errors: &mut ValidationErrors, name: &str) {
    errors
        .rule_for("name", name)
        .not_empty("Category name is required")
        .length(
            CATEGORY_NAME_MIN,
            CATEGORY_NAME_MAX,
            "Category name must be between 3 and 50 characters",
        );
}

fn check_category_description(errors: &mut ValidationErrors, description: &str) {
    errors.rule_for("description", description).max_length(
        CATEGORY_DESCRIPTION_MAX,
        "Category description must be at most 200 characters",
    );
}

// == Products ==
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category_id: Option<String>,
    pub stock_quantity: i32,
}

#[async_trait]
impl Handler<CreateProduct> for Inventory {
    type Output = ProductDto;

    async fn handle(&self, command: CreateProduct) -> Result<ProductDto> {
        let name = command.name.trim();
        let description = command.description.trim();

        let mut errors = ValidationErrors::new();
        check_product_name(&mut errors, name);
        check_product_description(&mut errors, description);
        check_price(&mut errors, command.price);
        check_stock(&mut errors, "stockQuantity", command.stock_quantity);

        let category_id = non_empty(&command.category_id).unwrap_or_default().to_string();
        if !category_id.is_empty() {
            let exists = self.category_exists(&category_id).await?;
            errors
                .rule_for("categoryId", category_id.as_str())
                .must(exists, "Selected category does not exist");
        }
        errors.into_result()?;

        let product = Product::new(
            name,
            description,
            command.price,
            category_id,
            command.stock_quantity,
        );
        self.products.insert(&product).await?;
        info!(product_id = %product.id, name = %product.name, "Product created");

        self.to_dto(product).await
    }
}

/// Partial product update; absent or blank fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    /// Taken from the request path.
    #[serde(default, skip_deserializing)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<i32>,
}

#[async_trait]
impl Handler<UpdateProduct> for Inventory {
    type Output = ProductDto;

    async fn handle(&self, command: UpdateProduct) -> Result<ProductDto> {
        let name = non_empty(&command.name);
        let description = non_empty(&command.description);
        let category_id = non_empty(&command.category_id);

        let mut errors = ValidationErrors::new();
        if let Some(name) = name {
            check_product_name(&mut errors, name);
        }
        if let Some(description) = description {
            check_product_description(&mut errors, description);
        }
        if let Some(price) = command.price {
            check_price(&mut errors, price);
        }
        if let Some(stock) = command.stock_quantity {
            check_stock(&mut errors, "stockQuantity", stock);
        }
        if let Some(category_id) = category_id {
            let exists = self.category_exists(category_id).await?;
            errors
                .rule_for("categoryId", category_id)
                .must(exists, "Selected category does not exist");
        }
        errors.into_result()?;

        let mut product = self.require_product(&command.id).await?;
        if let Some(name) = name {
            product.name = name.to_string();
        }
        if let Some(description) = description {
            product.description = description.to_string();
        }
        if let Some(price) = command.price {
            product.set_price(price);
        }
        if let Some(category_id) = category_id {
            product.category_id = category_id.to_string();
        }
        if let Some(stock) = command.stock_quantity {
            product.stock_quantity = stock;
        }
        product.touch();

        if !self.products.update(&product).await? {
            return Err(AppError::NotFound(format!("Product '{}' not found", product.id)));
        }
        info!(product_id = %product.id, "Product updated");

        self.to_dto(product).await
    }
}

/// Sets a product's absolute stock quantity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStock {
    #[serde(default, skip_deserializing)]
    pub id: String,
    pub quantity: i32,
}

#[async_trait]
impl Handler<UpdateStock> for Inventory {
    type Output = ProductDto;

    async fn handle(&self, command: UpdateStock) -> Result<ProductDto> {
        let mut errors = ValidationErrors::new();
        check_stock(&mut errors, "quantity", command.quantity);
        errors.into_result()?;

        let mut product = self.require_product(&command.id).await?;
        let previous = product.stock_quantity;
        product.stock_quantity = command.quantity;
        product.touch();

        if !self.products.update(&product).await? {
            return Err(AppError::NotFound(format!("Product '{}' not found", product.id)));
        }
        info!(
            product_id = %product.id,
            previous,
            quantity = command.quantity,
            "Stock updated"
        );
        if product.is_low_stock(self.low_stock_threshold) {
            warn!(product_id = %product.id, quantity = command.quantity, "Product is low on stock");
        }

        self.to_dto(product).await
    }
}

#[derive(Debug, Clone)]
pub struct DeleteProduct {
    pub id: String,
}

#[async_trait]
impl Handler<DeleteProduct> for Inventory {
    type Output = ();

    async fn handle(&self, command: DeleteProduct) -> Result<()> {
        if !self.products.delete(&command.id).await? {
            return Err(AppError::NotFound(format!("Product '{}' not found", command.id)));
        }
        info!(product_id = %command.id, "Product deleted");
        Ok(())
    }
}

// == Categories ==
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
}

#[async_trait]
impl Handler<CreateCategory> for Inventory {
    type Output = CategoryDto;

    async fn handle(&self, command: CreateCategory) -> Result<CategoryDto> {
        let name = command.name.trim();
        let description = command.description.as_deref().unwrap_or_default().trim();

        let mut errors = ValidationErrors::new();
        check_category_name(&mut errors, name);
        check_category_description(&mut errors, description);
        errors.into_result()?;

        let category = Category::new(name, description);
        self.categories.insert(&category).await?;
        info!(category_id = %category.id, name = %category.name, "Category created");

        Ok(category.into())
    }
}

/// Partial category update; an absent description keeps its value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[serde(default, skip_deserializing)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[async_trait]
impl Handler<UpdateCategory> for Inventory {
    type Output = CategoryDto;

    async fn handle(&self, command: UpdateCategory) -> Result<CategoryDto> {
        let name = command.name.as_deref().map(str::trim);
        let description = command.description.as_deref().map(str::trim);

        let mut errors = ValidationErrors::new();
        if let Some(name) = name {
            check_category_name(&mut errors, name);
        }
        if let Some(description) = description {
            check_category_description(&mut errors, description);
        }
        errors.into_result()?;

        let mut category = self.require_category(&command.id).await?;
        if let Some(name) = name {
            category.name = name.to_string();
        }
        if let Some(description) = description {
            category.description = description.to_string();
        }
        category.touch();

        if !self.categories.update(&category).await? {
            return Err(AppError::NotFound(format!("Category '{}' not found", category.id)));
        }
        info!(category_id = %category.id, "Category updated");

        Ok(category.into())
    }
}

#[derive(Debug, Clone)]
pub struct DeleteCategory {
    pub id: String,
}

#[async_trait]
impl Handler<DeleteCategory> for Inventory {
    type Output = ();

    async fn handle(&self, command: DeleteCategory) -> Result<()> {
        if !self.categories.delete(&command.id).await? {
            return Err(AppError::NotFound(format!("Category '{}' not found", command.id)));
        }

        let orphaned = self.products.find_by_category(&command.id).await?.len();
        if orphaned > 0 {
            warn!(
                category_id = %command.id,
                products = orphaned,
                "Deleted category still referenced by products"
            );
        }
        info!(category_id = %command.id, "Category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::inventory;
    use crate::application::UNCATEGORIZED;
    use std::str::FromStr;

    fn create_product(name: &str, category_id: Option<&str>) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: format!("{name} description"),
            price: Decimal::from_str("19.999").unwrap(),
            category_id: category_id.map(str::to_string),
            stock_quantity: 5,
        }
    }

    fn create_category(name: &str) -> CreateCategory {
        CreateCategory {
            name: name.to_string(),
            description: Some("Things".to_string()),
        }
    }

    fn validation_fields(result: Result<impl std::fmt::Debug>) -> Vec<String> {
        match result {
            Err(AppError::Validation(errors)) => errors.fields().map(str::to_string).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_product_rounds_price_and_names_category() {
        let inventory = inventory();
        let category = inventory.send(create_category("Tools")).await.unwrap();

        let product = inventory
            .send(create_product("Hammer", Some(&category.id)))
            .await
            .unwrap();

        assert_eq!(product.price, Decimal::from_str("20.00").unwrap());
        assert_eq!(product.category_name, "Tools");
        assert_eq!(product.stock_quantity, 5);
    }

    #[tokio::test]
    async fn test_create_product_without_category() {
        let inventory = inventory();
        let product = inventory.send(create_product("Hammer", Some(""))).await.unwrap();
        assert_eq!(product.category_id, "");
        assert_eq!(product.category_name, UNCATEGORIZED);
    }

    #[tokio::test]
    async fn test_create_product_collects_all_failures() {
        let inventory = inventory();
        let command = CreateProduct {
            name: String::new(),
            description: "x".repeat(1001),
            price: Decimal::from(-1),
            category_id: Some("missing".to_string()),
            stock_quantity: 100_000,
        };

        let fields = validation_fields(inventory.send(command).await);
        assert_eq!(
            fields,
            vec!["categoryId", "description", "name", "price", "stockQuantity"]
        );
    }

    #[tokio::test]
    async fn test_price_upper_bound_is_exclusive() {
        let inventory = inventory();
        let mut command = create_product("Yacht", None);
        command.price = Decimal::from(10_000_000);
        assert_eq!(validation_fields(inventory.send(command).await), vec!["price"]);

        let mut command = create_product("Yacht", None);
        command.price = Decimal::from_str("9999999.99").unwrap();
        assert!(inventory.send(command).await.is_ok());
    }

    #[tokio::test]
    async fn test_product_name_length_boundary() {
        let inventory = inventory();
        let at_limit = inventory
            .send(create_product(&"n".repeat(200), None))
            .await
            .unwrap();
        assert_eq!(at_limit.name.chars().count(), 200);

        let over = inventory.send(create_product(&"n".repeat(201), None)).await;
        assert_eq!(validation_fields(over), vec!["name"]);
    }

    #[tokio::test]
    async fn test_product_fields_are_trimmed_before_validation() {
        let inventory = inventory();
        // 200 characters once the padding is gone
        let padded = format!("  {}  ", "n".repeat(200));
        let mut command = create_product(&padded, None);
        command.description = "  Claw hammer \t".to_string();
        let created = inventory.send(command).await.unwrap();
        assert_eq!(created.name, "n".repeat(200));
        assert_eq!(created.description, "Claw hammer");

        let mut blank = create_product("   ", None);
        blank.description = " \n ".to_string();
        assert_eq!(
            validation_fields(inventory.send(blank).await),
            vec!["description", "name"]
        );

        let updated = inventory
            .send(UpdateProduct {
                id: created.id,
                name: Some(padded.replace('n', "m")),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "m".repeat(200));
    }

    #[tokio::test]
    async fn test_update_product_changes_only_provided_fields() {
        let inventory = inventory();
        let created = inventory.send(create_product("Hammer", None)).await.unwrap();

        let updated = inventory
            .send(UpdateProduct {
                id: created.id.clone(),
                name: Some("Sledgehammer".to_string()),
                description: Some(String::new()),
                stock_quantity: Some(0),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "Sledgehammer");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.price, created.price);
        assert_eq!(updated.stock_quantity, 0);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_product_rejects_unknown_category() {
        let inventory = inventory();
        let created = inventory.send(create_product("Hammer", None)).await.unwrap();

        let result = inventory
            .send(UpdateProduct {
                id: created.id,
                category_id: Some("nope".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(validation_fields(result), vec!["categoryId"]);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let inventory = inventory();
        let result = inventory
            .send(UpdateProduct {
                id: "missing".to_string(),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_stock() {
        let inventory = inventory();
        let created = inventory.send(create_product("Hammer", None)).await.unwrap();

        let updated = inventory
            .send(UpdateStock {
                id: created.id.clone(),
                quantity: 42,
            })
            .await
            .unwrap();
        assert_eq!(updated.stock_quantity, 42);

        let result = inventory
            .send(UpdateStock {
                id: created.id,
                quantity: -3,
            })
            .await;
        assert_eq!(validation_fields(result), vec!["quantity"]);
    }

    #[tokio::test]
    async fn test_delete_product() {
        let inventory = inventory();
        let created = inventory.send(create_product("Hammer", None)).await.unwrap();

        inventory
            .send(DeleteProduct {
                id: created.id.clone(),
            })
            .await
            .unwrap();
        let again = inventory.send(DeleteProduct { id: created.id }).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_category_name_length() {
        let inventory = inventory();
        assert_eq!(
            validation_fields(inventory.send(create_category("TV")).await),
            vec!["name"]
        );
        assert_eq!(
            validation_fields(inventory.send(create_category(&"x".repeat(51))).await),
            vec!["name"]
        );
        assert!(inventory.send(create_category("Toys")).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_category() {
        let inventory = inventory();
        let created = inventory.send(create_category("Toys")).await.unwrap();

        let updated = inventory
            .send(UpdateCategory {
                id: created.id.clone(),
                name: Some("Games".to_string()),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Games");
        assert_eq!(updated.description, "Things");

        let result = inventory
            .send(UpdateCategory {
                id: created.id,
                name: Some("Go".to_string()),
                description: None,
            })
            .await;
        assert_eq!(validation_fields(result), vec!["name"]);
    }

    #[tokio::test]
    async fn test_category_description_length() {
        let inventory = inventory();
        let command = CreateCategory {
            name: "Toys".to_string(),
            description: Some("d".repeat(201)),
        };
        assert_eq!(validation_fields(inventory.send(command).await), vec!["description"]);

        let created = inventory
            .send(CreateCategory {
                name: "Toys".to_string(),
                description: Some(format!(" {} ", "d".repeat(200))),
            })
            .await
            .unwrap();
        assert_eq!(created.description, "d".repeat(200));

        let result = inventory
            .send(UpdateCategory {
                id: created.id.clone(),
                name: None,
                description: Some("d".repeat(201)),
            })
            .await;
        assert_eq!(validation_fields(result), vec!["description"]);

        let updated = inventory
            .send(UpdateCategory {
                id: created.id,
                name: Some("  Games  ".to_string()),
                description: Some("Board games".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Games");
        assert_eq!(updated.description, "Board games");
    }

    #[tokio::test]
    async fn test_delete_category_leaves_products_uncategorized() {
        let inventory = inventory();
        let category = inventory.send(create_category("Toys")).await.unwrap();
        let product = inventory
            .send(create_product("Kite", Some(&category.id)))
            .await
            .unwrap();

        inventory
            .send(DeleteCategory {
                id: category.id.clone(),
            })
            .await
            .unwrap();

        let fetched = inventory
            .send(crate::application::GetProductById { id: product.id })
            .await
            .unwrap();
        assert_eq!(fetched.category_id, category.id);
        assert_eq!(fetched.category_name, UNCATEGORIZED);

        let again = inventory.send(DeleteCategory { id: category.id }).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }
}

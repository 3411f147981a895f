//! Document-store backed repositories.

use std::sync::Arc;

use async_trait::async_trait;

use super::{CategoryRepository, ProductFilter, ProductRepository};
use crate::domain::{Category, Product};
use crate::store::{Collection, Document, Filter, FindOptions, Result, SortOrder};

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Category {
    const COLLECTION: &'static str = "categories";

    fn id(&self) -> &str {
        &self.id
    }
}

// == Products ==
pub struct DocumentProductRepository {
    products: Arc<Collection<Product>>,
}

impl DocumentProductRepository {
    pub fn new(products: Arc<Collection<Product>>) -> Self {
        Self { products }
    }
}

/// Translates listing criteria into a store filter.
fn product_filter(filter: &ProductFilter) -> Filter {
    let mut query = Filter::All;

    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let search = search.trim();
        query = query.and(Filter::Or(vec![
            Filter::contains_ignore_case("name", search),
            Filter::contains_ignore_case("description", search),
        ]));
    }

    if let Some(category_id) = filter.category_id.as_deref().filter(|c| !c.is_empty()) {
        query = query.and(Filter::eq("categoryId", category_id));
    }

    query
}

#[async_trait]
impl ProductRepository for DocumentProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>> {
        self.products
            .find(
                &Filter::All,
                &FindOptions::default().sort_by("createdAt", SortOrder::Descending),
            )
            .await
    }

    async fn find_page(
        &self,
        filter: &ProductFilter,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Product>, u64)> {
        let query = product_filter(filter);
        let skip = (page.max(1) as usize - 1) * page_size as usize;
        let options = FindOptions::default()
            .sort_by("createdAt", SortOrder::Descending)
            .skip(skip)
            .limit(page_size as usize);

        let total = self.products.count(&query).await?;
        let items = self.products.find(&query, &options).await?;
        Ok((items, total))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        self.products.find_by_id(id).await
    }

    async fn find_by_category(&self, category_id: &str) -> Result<Vec<Product>> {
        self.products
            .find(
                &Filter::eq("categoryId", category_id),
                &FindOptions::default().sort_by("createdAt", SortOrder::Descending),
            )
            .await
    }

    async fn find_low_stock(&self, threshold: i32) -> Result<Vec<Product>> {
        self.products
            .find(
                &Filter::lt("stockQuantity", f64::from(threshold)),
                &FindOptions::default().sort_by("stockQuantity", SortOrder::Ascending),
            )
            .await
    }

    async fn insert(&self, product: &Product) -> Result<()> {
        self.products.insert_one(product).await
    }

    async fn update(&self, product: &Product) -> Result<bool> {
        self.products.replace_one(product).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.products.delete_one(id).await
    }

    async fn count(&self) -> Result<u64> {
        self.products.count(&Filter::All).await
    }
}

// == Categories ==
pub struct DocumentCategoryRepository {
    categories: Arc<Collection<Category>>,
}

impl DocumentCategoryRepository {
    pub fn new(categories: Arc<Collection<Category>>) -> Self {
        Self { categories }
    }
}

#[async_trait]
impl CategoryRepository for DocumentCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>> {
        self.categories
            .find(
                &Filter::All,
                &FindOptions::default().sort_by("name", SortOrder::Ascending),
            )
            .await
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Category>> {
        self.categories.find_by_ids(ids).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Category>> {
        self.categories.find_by_id(id).await
    }

    async fn insert(&self, category: &Category) -> Result<()> {
        self.categories.insert_one(category).await
    }

    async fn update(&self, category: &Category) -> Result<bool> {
        self.categories.replace_one(category).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.categories.delete_one(id).await
    }
}

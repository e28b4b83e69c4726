//! Catalog management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::item::{CreateItem, Item},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new catalog item, available for lending immediately
    pub async fn create_item(&self, item: CreateItem) -> AppResult<Item> {
        item.validate()?;

        let created = self.repository.items.create(&item).await?;
        tracing::info!("Catalog item {} created: {}", created.id, created.title);
        Ok(created)
    }

    /// Get item by ID
    pub async fn get_item(&self, id: i32) -> AppResult<Item> {
        self.repository.items.get_by_id(id).await
    }

    /// List the whole catalog
    pub async fn list_items(&self) -> AppResult<Vec<Item>> {
        self.repository.items.list_all().await
    }

    /// List items currently available for lending
    pub async fn list_available(&self) -> AppResult<Vec<Item>> {
        self.repository.items.list_available().await
    }

    /// Search items by title or creator
    pub async fn search_items(&self, term: &str) -> AppResult<Vec<Item>> {
        self.repository.items.search(term).await
    }
}

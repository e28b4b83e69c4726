//! Items repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::item::{CreateItem, Item},
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new item; availability starts true
    pub async fn create(&self, item: &CreateItem) -> AppResult<Item> {
        let created = sqlx::query_as::<_, Item>(
            "INSERT INTO items (title, creator) VALUES ($1, $2) RETURNING *",
        )
        .bind(&item.title)
        .bind(&item.creator)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Get item by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// List the whole catalog in title order
    pub async fn list_all(&self) -> AppResult<Vec<Item>> {
        let items =
            sqlx::query_as::<_, Item>("SELECT * FROM items ORDER BY LOWER(title), id")
                .fetch_all(&self.pool)
                .await?;

        Ok(items)
    }

    /// List items currently available for lending
    pub async fn list_available(&self) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE available ORDER BY LOWER(title), id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Search items by title or creator, case-insensitive substring match
    pub async fn search(&self, term: &str) -> AppResult<Vec<Item>> {
        let pattern = format!("%{}%", term.to_lowercase());

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT * FROM items
            WHERE LOWER(title) LIKE $1 OR LOWER(creator) LIKE $1
            ORDER BY LOWER(title), id
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    // =========================================================================
    // Transaction-scoped access for the loan ledger
    //
    // The availability flag is only ever written through these, inside a
    // borrow/return unit of work. Crate-private: external callers cannot
    // flip availability directly.
    // =========================================================================

    /// Fetch an item inside `tx`, holding a row lock until commit or rollback
    pub(crate) async fn get_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// Flip the availability flag inside `tx`
    pub(crate) async fn set_availability(
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        available: bool,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE items SET available = $1 WHERE id = $2")
            .bind(available)
            .bind(id)
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item with id {} not found", id)));
        }

        Ok(())
    }
}

//! Catalog repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewSpice, Spice, UpdateSpice};

const SPICE_COLUMNS: &str = "id, name, price, description, image_url, created_at, updated_at";

fn map_spice_row(row: &PgRow) -> Spice {
    Spice {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        description: row.get("description"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Catalog repository
#[derive(Clone)]
pub struct SpiceRepository {
    pool: PgPool,
}

impl SpiceRepository {
    /// Create a new catalog repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the whole catalog
    pub async fn list(&self) -> Result<Vec<Spice>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SPICE_COLUMNS}
            FROM spices
            ORDER BY created_at
            "#,
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_spice_row).collect())
    }

    /// Find a catalog entry by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Spice>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {SPICE_COLUMNS}
            FROM spices
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_spice_row))
    }

    /// Insert a new catalog entry
    pub async fn create(&self, new_spice: &NewSpice) -> Result<Spice> {
        info!("Creating new spice: {}", new_spice.name);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO spices (name, price, description, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING {SPICE_COLUMNS}
            "#,
        ))
        .bind(&new_spice.name)
        .bind(new_spice.price)
        .bind(&new_spice.description)
        .bind(&new_spice.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_spice_row(&row))
    }

    /// Update a catalog entry. Fields left as `None` are kept unchanged.
    pub async fn update(&self, id: Uuid, update: &UpdateSpice) -> Result<Option<Spice>> {
        info!("Updating spice: {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE spices
            SET name = COALESCE($2, name),
                price = COALESCE($3, price),
                description = COALESCE($4, description),
                image_url = COALESCE($5, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SPICE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&update.name)
        .bind(update.price)
        .bind(&update.description)
        .bind(&update.image_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_spice_row))
    }

    /// Delete a catalog entry. Returns false if no such entry existed.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting spice: {}", id);

        let result = sqlx::query("DELETE FROM spices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

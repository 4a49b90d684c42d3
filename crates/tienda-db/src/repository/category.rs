//! # Category Repository
//!
//! Categories carry the tax rate applied to their products.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tienda_core::validation::validate_category_draft;
use tienda_core::{Category, CategoryDraft};

pub(crate) async fn fetch_category(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, tax_rate_bps FROM categories WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(category)
}

pub(crate) async fn fetch_all_categories(conn: &mut SqliteConnection) -> DbResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, tax_rate_bps FROM categories ORDER BY id",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(categories)
}

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists every category ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<Category>> {
        let mut conn = self.pool.acquire().await?;
        fetch_all_categories(&mut conn).await
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let mut conn = self.pool.acquire().await?;
        fetch_category(&mut conn, id).await
    }

    /// Inserts (`id: None`) or updates a category.
    ///
    /// Names are unique; a clash surfaces as [`DbError::UniqueViolation`].
    pub async fn save(&self, draft: &CategoryDraft) -> DbResult<Category> {
        validate_category_draft(draft)?;
        let name = draft.name.trim();

        let result = match draft.id {
            None => {
                debug!(name = %name, "Inserting category");

                sqlx::query_as::<_, Category>(
                    r#"
                    INSERT INTO categories (name, tax_rate_bps)
                    VALUES (?1, ?2)
                    RETURNING id, name, tax_rate_bps
                    "#,
                )
                .bind(name)
                .bind(draft.tax_rate_bps)
                .fetch_optional(&self.pool)
                .await
            }
            Some(id) => {
                debug!(id = %id, "Updating category");

                sqlx::query_as::<_, Category>(
                    r#"
                    UPDATE categories SET name = ?2, tax_rate_bps = ?3
                    WHERE id = ?1
                    RETURNING id, name, tax_rate_bps
                    "#,
                )
                .bind(id)
                .bind(name)
                .bind(draft.tax_rate_bps)
                .fetch_optional(&self.pool)
                .await
            }
        };

        match result.map_err(DbError::from) {
            Ok(Some(category)) => Ok(category),
            Ok(None) => Err(DbError::not_found("Category", draft.id.unwrap_or_default())),
            Err(DbError::UniqueViolation { .. }) => Err(DbError::duplicate("name", name)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn draft(name: &str, tax_rate_bps: u32) -> CategoryDraft {
        CategoryDraft {
            id: None,
            name: name.to_string(),
            tax_rate_bps,
        }
    }

    #[tokio::test]
    async fn test_save_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let stationery = repo.save(&draft("Papelería", 1600)).await.unwrap();
        repo.save(&draft("Alimentos", 0)).await.unwrap();

        let mut renamed = draft("Papelería escolar", 800);
        renamed.id = Some(stationery.id);
        let updated = repo.save(&renamed).await.unwrap();
        assert_eq!(updated.tax_rate_bps, 800);

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], updated);
        assert_eq!(repo.get_by_id(stationery.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        repo.save(&draft("Papelería", 1600)).await.unwrap();
        let err = repo.save(&draft("Papelería", 0)).await.unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "name");
                assert_eq!(value, "Papelería");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejects_tax_rate_above_100_percent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let result = db.categories().save(&draft("Lujo", 12_000)).await;
        assert!(matches!(result, Err(DbError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut ghost = draft("Fantasma", 0);
        ghost.id = Some(77);
        assert!(matches!(
            db.categories().save(&ghost).await,
            Err(DbError::NotFound { .. })
        ));
    }
}

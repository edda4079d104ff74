//! Authors repository for store operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorPayload},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all authors
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Create a new author
    pub async fn create(&self, author: &AuthorPayload) -> AppResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, birth_year, nationality, biography, books)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&author.name)
        .bind(author.birth_year)
        .bind(&author.nationality)
        .bind(&author.biography)
        .bind(&author.books)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an existing author
    pub async fn update(&self, id: Uuid, author: &AuthorPayload) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET name = $2, birth_year = $3, nationality = $4, biography = $5,
                books = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&author.name)
        .bind(author.birth_year)
        .bind(&author.nationality)
        .bind(&author.biography)
        .bind(&author.books)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Delete an author
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Author not found".to_string()));
        }
        Ok(())
    }
}

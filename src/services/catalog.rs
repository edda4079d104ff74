//! Catalog service for books and authors

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorPayload},
        book::{Book, BookPayload},
    },
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

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create_book(&self, book: &BookPayload) -> AppResult<Book> {
        self.repository.books.create(book).await
    }

    pub async fn update_book(&self, id: Uuid, book: &BookPayload) -> AppResult<Book> {
        self.repository.books.update(id, book).await
    }

    pub async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn get_author(&self, id: Uuid) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    pub async fn create_author(&self, author: &AuthorPayload) -> AppResult<Author> {
        self.repository.authors.create(author).await
    }

    pub async fn update_author(&self, id: Uuid, author: &AuthorPayload) -> AppResult<Author> {
        self.repository.authors.update(id, author).await
    }

    pub async fn delete_author(&self, id: Uuid) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }
}

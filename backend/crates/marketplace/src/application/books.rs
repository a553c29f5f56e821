//! Book service: CRUD plus the rental lifecycle.

use std::sync::Arc;

use chrono::Utc;
use kernel::actor::Actor;
use kernel::id::{BookId, UserId};

use crate::domain::book::{
    Book, BookStatus, Condition, DEFAULT_RENTAL_PERIOD_DAYS, NewBook, require_non_negative,
    require_text,
};
use crate::domain::query::{BookFilter, Page, Paginated};
use crate::domain::repository::{BookRecord, BookRepository};
use crate::error::{MarketError, MarketResult};

/// Partial listing update. `None` leaves the field unchanged;
/// `images: Some(_)` replaces the whole image list.
#[derive(Debug, Clone, Default)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub subject: Option<String>,
    pub edition: Option<String>,
    pub condition: Option<Condition>,
    pub price: Option<f64>,
    pub rental_price: Option<f64>,
    pub status: Option<BookStatus>,
    pub images: Option<Vec<String>>,
    pub location: Option<String>,
}

pub struct BookService<R>
where
    R: BookRepository,
{
    repo: Arc<R>,
}

impl<R> BookService<R>
where
    R: BookRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, actor: &Actor, input: NewBook) -> MarketResult<BookRecord> {
        let book = Book::new(actor.user_id, input)?;
        self.repo.create(&book).await?;

        tracing::info!(book_id = %book.book_id, owner = %actor.user_id, "Book listed");

        self.reload(book.book_id).await
    }

    pub async fn get(&self, book_id: BookId) -> MarketResult<BookRecord> {
        self.repo
            .find(book_id)
            .await?
            .ok_or(MarketError::BookNotFound)
    }

    pub async fn list(&self, filter: BookFilter, page: Page) -> MarketResult<Paginated<BookRecord>> {
        let (items, total) = self.repo.list(&filter, page).await?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn list_by_owner(&self, owner_id: UserId) -> MarketResult<Vec<BookRecord>> {
        self.repo.list_by_owner(owner_id).await
    }

    pub async fn update(
        &self,
        actor: &Actor,
        book_id: BookId,
        update: BookUpdate,
    ) -> MarketResult<BookRecord> {
        let mut book = self.get(book_id).await?.book;

        if !actor.can_mutate(book.owner_id) {
            return Err(MarketError::NotAuthorized);
        }

        apply_update(&mut book, update)?;
        self.repo.update(&book).await?;

        self.reload(book_id).await
    }

    pub async fn delete(&self, actor: &Actor, book_id: BookId) -> MarketResult<()> {
        let book = self.get(book_id).await?.book;

        if !actor.can_mutate(book.owner_id) {
            return Err(MarketError::NotAuthorized);
        }

        self.repo.delete(book_id).await?;

        tracing::info!(book_id = %book_id, "Book removed");
        Ok(())
    }

    /// Rent action. The default period is 30 days; the caller may
    /// supply another positive number of days.
    pub async fn rent(
        &self,
        actor: &Actor,
        book_id: BookId,
        rental_period: Option<i64>,
    ) -> MarketResult<BookRecord> {
        let mut book = self.get(book_id).await?.book;

        book.rent(
            actor.user_id,
            rental_period.unwrap_or(DEFAULT_RENTAL_PERIOD_DAYS),
        )?;
        self.repo.update(&book).await?;

        tracing::info!(book_id = %book_id, renter = %actor.user_id, "Book rented");

        self.reload(book_id).await
    }

    pub async fn return_rental(&self, actor: &Actor, book_id: BookId) -> MarketResult<BookRecord> {
        let mut book = self.get(book_id).await?.book;

        book.return_rental(actor)?;
        self.repo.update(&book).await?;

        tracing::info!(book_id = %book_id, "Book returned");

        self.reload(book_id).await
    }

    async fn reload(&self, book_id: BookId) -> MarketResult<BookRecord> {
        self.repo
            .find(book_id)
            .await?
            .ok_or_else(|| MarketError::Internal("Book vanished during operation".into()))
    }
}

fn apply_update(book: &mut Book, update: BookUpdate) -> MarketResult<()> {
    if let Some(title) = update.title {
        require_text("title", &title)?;
        book.title = title.trim().to_string();
    }
    if let Some(author) = update.author {
        require_text("author", &author)?;
        book.author = author;
    }
    if let Some(isbn) = update.isbn {
        book.isbn = Some(isbn);
    }
    if let Some(subject) = update.subject {
        require_text("subject", &subject)?;
        book.subject = subject;
    }
    if let Some(edition) = update.edition {
        book.edition = Some(edition);
    }
    if let Some(condition) = update.condition {
        book.condition = condition;
    }
    if let Some(price) = update.price {
        require_non_negative("price", price)?;
        book.price = price;
    }
    if let Some(rental_price) = update.rental_price {
        require_non_negative("rentalPrice", rental_price)?;
        book.rental_price = rental_price;
    }
    if let Some(status) = update.status {
        book.status = status;
    }
    if let Some(images) = update.images {
        book.images = images;
    }
    if let Some(location) = update.location {
        require_text("location", &location)?;
        book.location = location;
    }
    book.updated_at = Utc::now();
    Ok(())
}

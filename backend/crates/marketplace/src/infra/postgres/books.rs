//! Book repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use kernel::id::{BookId, UserId};

use crate::domain::book::{Book, BookStatus, Condition};
use crate::domain::query::{BookFilter, Page};
use crate::domain::repository::{BookRecord, BookRepository};
use crate::error::MarketResult;

use super::{PgMarketRepository, contains_pattern, user_public};

const BOOK_SELECT: &str = r#"
    SELECT
        b.book_id, b.title, b.author, b.isbn, b.subject, b.edition,
        b.condition, b.price, b.rental_price, b.status, b.images,
        b.owner_id, b.renter_id, b.rental_start, b.rental_end,
        b.location, b.created_at, b.updated_at,
        o.name AS owner_name, o.email AS owner_email,
        o.college AS owner_college, o.year AS owner_year,
        o.phone AS owner_phone,
        r.name AS renter_name, r.email AS renter_email,
        r.college AS renter_college, r.year AS renter_year,
        r.phone AS renter_phone
    FROM books b
    JOIN users o ON o.user_id = b.owner_id
    LEFT JOIN users r ON r.user_id = b.renter_id
"#;

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    qb.push(" WHERE TRUE");
    if let Some(subject) = &filter.subject {
        qb.push(" AND b.subject ILIKE ")
            .push_bind(contains_pattern(subject));
    }
    if let Some(location) = &filter.location {
        qb.push(" AND b.location ILIKE ")
            .push_bind(contains_pattern(location));
    }
    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        qb.push(" AND (b.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR b.author ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR b.subject ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

impl BookRepository for PgMarketRepository {
    async fn create(&self, book: &Book) -> MarketResult<()> {
        sqlx::query(
            r#"
            INSERT INTO books (
                book_id, title, author, isbn, subject, edition,
                condition, price, rental_price, status, images,
                owner_id, renter_id, rental_start, rental_end,
                location, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18
            )
            "#,
        )
        .bind(book.book_id.as_uuid())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.subject)
        .bind(&book.edition)
        .bind(book.condition.id())
        .bind(book.price)
        .bind(book.rental_price)
        .bind(book.status.id())
        .bind(&book.images)
        .bind(book.owner_id.as_uuid())
        .bind(book.renter_id.map(|id| *id.as_uuid()))
        .bind(book.rental_start)
        .bind(book.rental_end)
        .bind(&book.location)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn find(&self, book_id: BookId) -> MarketResult<Option<BookRecord>> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{} WHERE b.book_id = $1", BOOK_SELECT))
            .bind(book_id.as_uuid())
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|r| r.into_record()))
    }

    async fn list(
        &self,
        filter: &BookFilter,
        page: Page,
    ) -> MarketResult<(Vec<BookRecord>, u64)> {
        let mut qb = QueryBuilder::new(BOOK_SELECT);
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY b.created_at DESC LIMIT ")
            .push_bind(page.limit as i64)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<BookRow> = qb.build_query_as().fetch_all(self.pool()).await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM books b");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await?;

        Ok((
            rows.into_iter().map(BookRow::into_record).collect(),
            total as u64,
        ))
    }

    async fn list_by_owner(&self, owner_id: UserId) -> MarketResult<Vec<BookRecord>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "{} WHERE b.owner_id = $1 ORDER BY b.created_at DESC",
            BOOK_SELECT
        ))
        .bind(owner_id.as_uuid())
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(BookRow::into_record).collect())
    }

    async fn update(&self, book: &Book) -> MarketResult<()> {
        sqlx::query(
            r#"
            UPDATE books SET
                title = $2,
                author = $3,
                isbn = $4,
                subject = $5,
                edition = $6,
                condition = $7,
                price = $8,
                rental_price = $9,
                status = $10,
                images = $11,
                renter_id = $12,
                rental_start = $13,
                rental_end = $14,
                location = $15,
                updated_at = $16
            WHERE book_id = $1
            "#,
        )
        .bind(book.book_id.as_uuid())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.subject)
        .bind(&book.edition)
        .bind(book.condition.id())
        .bind(book.price)
        .bind(book.rental_price)
        .bind(book.status.id())
        .bind(&book.images)
        .bind(book.renter_id.map(|id| *id.as_uuid()))
        .bind(book.rental_start)
        .bind(book.rental_end)
        .bind(&book.location)
        .bind(book.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn delete(&self, book_id: BookId) -> MarketResult<()> {
        sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(book_id.as_uuid())
            .execute(self.pool())
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    book_id: Uuid,
    title: String,
    author: String,
    isbn: Option<String>,
    subject: String,
    edition: Option<String>,
    condition: i16,
    price: f64,
    rental_price: f64,
    status: i16,
    images: Vec<String>,
    owner_id: Uuid,
    renter_id: Option<Uuid>,
    rental_start: Option<DateTime<Utc>>,
    rental_end: Option<DateTime<Utc>>,
    location: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_name: String,
    owner_email: String,
    owner_college: String,
    owner_year: String,
    owner_phone: String,
    renter_name: Option<String>,
    renter_email: Option<String>,
    renter_college: Option<String>,
    renter_year: Option<String>,
    renter_phone: Option<String>,
}

impl BookRow {
    fn into_record(self) -> BookRecord {
        let owner = user_public(
            self.owner_id,
            self.owner_name,
            self.owner_email,
            self.owner_college,
            self.owner_year,
            self.owner_phone,
        );

        let renter = match (
            self.renter_id,
            self.renter_name,
            self.renter_email,
            self.renter_college,
            self.renter_year,
            self.renter_phone,
        ) {
            (Some(id), Some(name), Some(email), Some(college), Some(year), Some(phone)) => {
                Some(user_public(id, name, email, college, year, phone))
            }
            _ => None,
        };

        BookRecord {
            book: Book {
                book_id: BookId::from_uuid(self.book_id),
                title: self.title,
                author: self.author,
                isbn: self.isbn,
                subject: self.subject,
                edition: self.edition,
                condition: Condition::from_id(self.condition),
                price: self.price,
                rental_price: self.rental_price,
                status: BookStatus::from_id(self.status),
                images: self.images,
                owner_id: UserId::from_uuid(self.owner_id),
                renter_id: self.renter_id.map(UserId::from_uuid),
                rental_start: self.rental_start,
                rental_end: self.rental_end,
                location: self.location,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            owner,
            renter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter_ors_over_title_author_subject() {
        let filter = BookFilter {
            search: Some("algo".into()),
            ..Default::default()
        };
        let mut qb = QueryBuilder::new("SELECT 1 FROM books b");
        push_filters(&mut qb, &filter);

        let sql = qb.into_sql();
        assert!(sql.contains("b.title ILIKE $1"));
        assert!(sql.contains("OR b.author ILIKE $2"));
        assert!(sql.contains("OR b.subject ILIKE $3"));
    }

    #[test]
    fn test_unset_filters_add_no_clauses() {
        let mut qb = QueryBuilder::new("SELECT 1 FROM books b");
        push_filters(&mut qb, &BookFilter::default());
        assert_eq!(qb.into_sql(), "SELECT 1 FROM books b WHERE TRUE");
    }
}

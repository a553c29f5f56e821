//! Book endpoints: CRUD plus rent/return.

use std::sync::Arc;

use axum::Extension;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use kernel::actor::Actor;
use kernel::id::{BookId, UserId};
use platform::upload::{UploadKind, UploadStore};

use crate::application::{BookService, BookUpdate};
use crate::domain::book::{BookStatus, Condition, NewBook};
use crate::domain::query::{BookFilter, Page, non_empty};
use crate::domain::repository::BookRepository;
use crate::error::{MarketError, MarketResult};
use crate::presentation::dto::{
    BookResponse, CreateBookRequest, ListResponse, MessageResponse, RentBookRequest,
    UpdateBookRequest, parse_book_status, parse_condition,
};
use crate::presentation::extract::collect_body;

pub struct BooksState<R>
where
    R: BookRepository,
{
    pub service: Arc<BookService<R>>,
    pub uploads: Arc<UploadStore>,
}

impl<R> Clone for BooksState<R>
where
    R: BookRepository,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            uploads: Arc::clone(&self.uploads),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BookListQuery {
    page: Option<String>,
    limit: Option<String>,
    subject: Option<String>,
    location: Option<String>,
    search: Option<String>,
}

fn book_id_from(raw: &str) -> MarketResult<BookId> {
    raw.parse().map_err(|_| MarketError::BookNotFound)
}

fn user_id_from(raw: &str) -> MarketResult<UserId> {
    raw.parse()
        .map_err(|_| MarketError::Validation("Invalid user id".into()))
}

pub async fn list_books<R>(
    State(state): State<BooksState<R>>,
    Query(query): Query<BookListQuery>,
) -> MarketResult<Json<ListResponse<BookResponse>>>
where
    R: BookRepository,
{
    let page = Page::from_params(query.page.as_deref(), query.limit.as_deref());
    let filter = BookFilter {
        subject: non_empty(query.subject),
        location: non_empty(query.location),
        search: non_empty(query.search),
    };

    let result = state.service.list(filter, page).await?;
    Ok(Json(ListResponse::from_page(result, |r| BookResponse::from(r))))
}

pub async fn get_book<R>(
    State(state): State<BooksState<R>>,
    Path(id): Path<String>,
) -> MarketResult<Json<BookResponse>>
where
    R: BookRepository,
{
    let record = state.service.get(book_id_from(&id)?).await?;
    Ok(Json(BookResponse::from(&record)))
}

pub async fn list_books_by_user<R>(
    State(state): State<BooksState<R>>,
    Path(user_id): Path<String>,
) -> MarketResult<Json<Vec<BookResponse>>>
where
    R: BookRepository,
{
    let records = state.service.list_by_owner(user_id_from(&user_id)?).await?;
    Ok(Json(records.iter().map(BookResponse::from).collect()))
}

pub async fn create_book<R>(
    State(state): State<BooksState<R>>,
    Extension(actor): Extension<Actor>,
    req: Request,
) -> MarketResult<(StatusCode, Json<BookResponse>)>
where
    R: BookRepository,
{
    let body = collect_body(&state.uploads, req).await?;
    let input: CreateBookRequest = body.parse()?;

    let new_book = NewBook {
        title: input.title,
        author: input.author,
        isbn: input.isbn,
        subject: input.subject,
        edition: input.edition,
        condition: match input.condition.as_deref() {
            Some(code) => parse_condition(code)?,
            None => Condition::default(),
        },
        price: input.price,
        rental_price: input.rental_price,
        status: match input.status.as_deref() {
            Some(code) => parse_book_status(code)?,
            None => BookStatus::default(),
        },
        images: body.uploads(UploadKind::BookImage).to_vec(),
        location: input.location,
    };

    let record = state.service.create(&actor, new_book).await?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(&record))))
}

pub async fn update_book<R>(
    State(state): State<BooksState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    req: Request,
) -> MarketResult<Json<BookResponse>>
where
    R: BookRepository,
{
    let book_id = book_id_from(&id)?;
    let body = collect_body(&state.uploads, req).await?;
    let input: UpdateBookRequest = body.parse()?;

    let images = body.uploads(UploadKind::BookImage);
    let update = BookUpdate {
        title: input.title,
        author: input.author,
        isbn: input.isbn,
        subject: input.subject,
        edition: input.edition,
        condition: input.condition.as_deref().map(parse_condition).transpose()?,
        price: input.price,
        rental_price: input.rental_price,
        status: input.status.as_deref().map(parse_book_status).transpose()?,
        images: (!images.is_empty()).then(|| images.to_vec()),
        location: input.location,
    };

    let record = state.service.update(&actor, book_id, update).await?;
    Ok(Json(BookResponse::from(&record)))
}

pub async fn delete_book<R>(
    State(state): State<BooksState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> MarketResult<Json<MessageResponse>>
where
    R: BookRepository,
{
    state.service.delete(&actor, book_id_from(&id)?).await?;
    Ok(Json(MessageResponse {
        message: "Book removed",
    }))
}

pub async fn rent_book<R>(
    State(state): State<BooksState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    req: Request,
) -> MarketResult<Json<BookResponse>>
where
    R: BookRepository,
{
    let book_id = book_id_from(&id)?;
    let body = collect_body(&state.uploads, req).await?;
    let input: RentBookRequest = body.parse()?;

    let record = state
        .service
        .rent(&actor, book_id, input.rental_period)
        .await?;
    Ok(Json(BookResponse::from(&record)))
}

pub async fn return_book<R>(
    State(state): State<BooksState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> MarketResult<Json<BookResponse>>
where
    R: BookRepository,
{
    let record = state
        .service
        .return_rental(&actor, book_id_from(&id)?)
        .await?;
    Ok(Json(BookResponse::from(&record)))
}

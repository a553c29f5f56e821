//! Route tables.
//!
//! Each entity exposes a [`RouterPair`]: the `public` router carries
//! the read endpoints, the `protected` router carries every mutation
//! and expects the caller to layer an authentication middleware that
//! injects a [`kernel::actor::Actor`] extension before merging.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};

use platform::upload::{MAX_UPLOAD_BYTES, UploadStore};

use crate::application::{BlogService, BookService, MentorService, PyqService};
use crate::domain::repository::{BlogRepository, BookRepository, MentorRepository, PyqRepository};
use crate::infra::postgres::PgMarketRepository;
use crate::presentation::handlers::{
    BlogsState, BooksState, MentorsState, PyqsState, blogs, books, mentors, pyqs,
};

/// Public (read) and protected (mutation) halves of one entity's routes
pub struct RouterPair {
    pub public: Router,
    pub protected: Router,
}

/// Request body ceiling for multipart routes. Axum's default limit is
/// 2 MB, below the per-file cap, so routes that accept uploads raise it
/// to the cap plus headroom for multipart framing and text fields.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn books_router(repo: PgMarketRepository, uploads: Arc<UploadStore>) -> RouterPair {
    books_router_generic(Arc::new(repo), uploads)
}

pub fn books_router_generic<R>(repo: Arc<R>, uploads: Arc<UploadStore>) -> RouterPair
where
    R: BookRepository + Send + Sync + 'static,
{
    let state = BooksState {
        service: Arc::new(BookService::new(repo)),
        uploads,
    };

    let public = Router::new()
        .route("/", get(books::list_books::<R>))
        .route("/user/{user_id}", get(books::list_books_by_user::<R>))
        .route("/{id}", get(books::get_book::<R>))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/", post(books::create_book::<R>))
        .route(
            "/{id}",
            put(books::update_book::<R>).delete(books::delete_book::<R>),
        )
        .route("/{id}/rent", put(books::rent_book::<R>))
        .route("/{id}/return", put(books::return_book::<R>))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state);

    RouterPair { public, protected }
}

pub fn mentors_router(repo: PgMarketRepository) -> RouterPair {
    mentors_router_generic(Arc::new(repo))
}

pub fn mentors_router_generic<R>(repo: Arc<R>) -> RouterPair
where
    R: MentorRepository + Send + Sync + 'static,
{
    let state = MentorsState {
        service: Arc::new(MentorService::new(repo)),
    };

    let public = Router::new()
        .route("/", get(mentors::list_mentors::<R>))
        .route("/{id}", get(mentors::get_mentor::<R>))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/", post(mentors::create_mentor::<R>))
        .route(
            "/{id}",
            put(mentors::update_mentor::<R>).delete(mentors::delete_mentor::<R>),
        )
        .route("/{id}/rate", put(mentors::rate_mentor::<R>))
        .with_state(state);

    RouterPair { public, protected }
}

pub fn pyqs_router(repo: PgMarketRepository, uploads: Arc<UploadStore>) -> RouterPair {
    pyqs_router_generic(Arc::new(repo), uploads)
}

pub fn pyqs_router_generic<R>(repo: Arc<R>, uploads: Arc<UploadStore>) -> RouterPair
where
    R: PyqRepository + Send + Sync + 'static,
{
    let state = PyqsState {
        service: Arc::new(PyqService::new(repo)),
        uploads,
    };

    let public = Router::new()
        .route("/", get(pyqs::list_pyqs::<R>))
        .route("/user/{user_id}", get(pyqs::list_pyqs_by_user::<R>))
        .route("/{id}", get(pyqs::get_pyq::<R>))
        .route("/{id}/download", get(pyqs::download_pyq::<R>))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/", post(pyqs::create_pyq::<R>))
        .route(
            "/{id}",
            put(pyqs::update_pyq::<R>).delete(pyqs::delete_pyq::<R>),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state);

    RouterPair { public, protected }
}

pub fn blogs_router(repo: PgMarketRepository, uploads: Arc<UploadStore>) -> RouterPair {
    blogs_router_generic(Arc::new(repo), uploads)
}

pub fn blogs_router_generic<R>(repo: Arc<R>, uploads: Arc<UploadStore>) -> RouterPair
where
    R: BlogRepository + Send + Sync + 'static,
{
    let state = BlogsState {
        service: Arc::new(BlogService::new(repo)),
        uploads,
    };

    let public = Router::new()
        .route("/", get(blogs::list_blogs::<R>))
        .route("/user/{user_id}", get(blogs::list_blogs_by_user::<R>))
        .route("/{id}", get(blogs::get_blog::<R>))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/", post(blogs::create_blog::<R>))
        .route(
            "/{id}",
            put(blogs::update_blog::<R>).delete(blogs::delete_blog::<R>),
        )
        .route("/{id}/like", put(blogs::like_blog::<R>))
        .route("/{id}/comment", post(blogs::add_comment::<R>))
        .route(
            "/{id}/comment/{comment_id}",
            delete(blogs::delete_comment::<R>),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state);

    RouterPair { public, protected }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_body_limit_clears_file_cap() {
        // A request carrying a maximum-size file plus its multipart
        // framing must fit under the route body limit.
        assert!(UPLOAD_BODY_LIMIT > MAX_UPLOAD_BYTES);
        assert!(UPLOAD_BODY_LIMIT - MAX_UPLOAD_BYTES >= 64 * 1024);
    }
}

//! Blog endpoints: CRUD, views, likes, comments.

use std::sync::Arc;

use axum::Extension;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use kernel::actor::Actor;
use kernel::id::{BlogId, CommentId, UserId};
use platform::upload::{UploadKind, UploadStore};

use crate::application::{BlogService, BlogUpdate};
use crate::domain::blog::{BlogCategory, NewBlog};
use crate::domain::query::{BlogFilter, Page, non_empty};
use crate::domain::repository::BlogRepository;
use crate::error::{MarketError, MarketResult};
use crate::presentation::dto::{
    AddCommentRequest, BlogResponse, CreateBlogRequest, ListResponse, MessageResponse,
    UpdateBlogRequest, parse_blog_category,
};
use crate::presentation::extract::{collect_body, collect_json_body};

pub struct BlogsState<R>
where
    R: BlogRepository,
{
    pub service: Arc<BlogService<R>>,
    pub uploads: Arc<UploadStore>,
}

impl<R> Clone for BlogsState<R>
where
    R: BlogRepository,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            uploads: Arc::clone(&self.uploads),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogListQuery {
    page: Option<String>,
    limit: Option<String>,
    category: Option<String>,
    search: Option<String>,
}

fn blog_id_from(raw: &str) -> MarketResult<BlogId> {
    raw.parse().map_err(|_| MarketError::BlogNotFound)
}

pub async fn list_blogs<R>(
    State(state): State<BlogsState<R>>,
    Query(query): Query<BlogListQuery>,
) -> MarketResult<Json<ListResponse<BlogResponse>>>
where
    R: BlogRepository,
{
    let page = Page::from_params(query.page.as_deref(), query.limit.as_deref());
    let filter = BlogFilter {
        // Unknown category codes behave as if the parameter were absent
        category: query
            .category
            .as_deref()
            .and_then(BlogCategory::try_from_code),
        search: non_empty(query.search),
    };

    let result = state.service.list(filter, page).await?;
    Ok(Json(ListResponse::from_page(result, |r| BlogResponse::from(r))))
}

pub async fn get_blog<R>(
    State(state): State<BlogsState<R>>,
    Path(id): Path<String>,
) -> MarketResult<Json<BlogResponse>>
where
    R: BlogRepository,
{
    let record = state.service.get(blog_id_from(&id)?).await?;
    Ok(Json(BlogResponse::from(&record)))
}

pub async fn list_blogs_by_user<R>(
    State(state): State<BlogsState<R>>,
    Path(user_id): Path<String>,
) -> MarketResult<Json<Vec<BlogResponse>>>
where
    R: BlogRepository,
{
    let user_id: UserId = user_id
        .parse()
        .map_err(|_| MarketError::Validation("Invalid user id".into()))?;
    let records = state.service.list_by_author(user_id).await?;
    Ok(Json(records.iter().map(BlogResponse::from).collect()))
}

pub async fn create_blog<R>(
    State(state): State<BlogsState<R>>,
    Extension(actor): Extension<Actor>,
    req: Request,
) -> MarketResult<(StatusCode, Json<BlogResponse>)>
where
    R: BlogRepository,
{
    let body = collect_body(&state.uploads, req).await?;
    let input: CreateBlogRequest = body.parse()?;

    let new_blog = NewBlog {
        title: input.title,
        content: input.content,
        category: parse_blog_category(&input.category)?,
        tags: input.tags,
        image_path: body.upload(UploadKind::BlogImage).map(str::to_string),
    };

    let record = state.service.create(&actor, new_blog).await?;
    Ok((StatusCode::CREATED, Json(BlogResponse::from(&record))))
}

pub async fn update_blog<R>(
    State(state): State<BlogsState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    req: Request,
) -> MarketResult<Json<BlogResponse>>
where
    R: BlogRepository,
{
    let blog_id = blog_id_from(&id)?;
    let body = collect_body(&state.uploads, req).await?;
    let input: UpdateBlogRequest = body.parse()?;

    let update = BlogUpdate {
        title: input.title,
        content: input.content,
        category: input
            .category
            .as_deref()
            .map(parse_blog_category)
            .transpose()?,
        tags: input.tags,
        image_path: body.upload(UploadKind::BlogImage).map(str::to_string),
    };

    let record = state.service.update(&actor, blog_id, update).await?;
    Ok(Json(BlogResponse::from(&record)))
}

pub async fn delete_blog<R>(
    State(state): State<BlogsState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> MarketResult<Json<MessageResponse>>
where
    R: BlogRepository,
{
    state.service.delete(&actor, blog_id_from(&id)?).await?;
    Ok(Json(MessageResponse {
        message: "Blog removed",
    }))
}

pub async fn like_blog<R>(
    State(state): State<BlogsState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> MarketResult<Json<BlogResponse>>
where
    R: BlogRepository,
{
    let record = state.service.toggle_like(&actor, blog_id_from(&id)?).await?;
    Ok(Json(BlogResponse::from(&record)))
}

pub async fn add_comment<R>(
    State(state): State<BlogsState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    req: Request,
) -> MarketResult<(StatusCode, Json<BlogResponse>)>
where
    R: BlogRepository,
{
    let blog_id = blog_id_from(&id)?;
    let input: AddCommentRequest = collect_json_body(req).await?.parse()?;

    let record = state
        .service
        .add_comment(&actor, blog_id, input.comment)
        .await?;
    Ok((StatusCode::CREATED, Json(BlogResponse::from(&record))))
}

pub async fn delete_comment<R>(
    State(state): State<BlogsState<R>>,
    Extension(actor): Extension<Actor>,
    Path((id, comment_id)): Path<(String, String)>,
) -> MarketResult<Json<BlogResponse>>
where
    R: BlogRepository,
{
    let blog_id = blog_id_from(&id)?;
    let comment_id: CommentId = comment_id
        .parse()
        .map_err(|_| MarketError::CommentNotFound)?;

    let record = state
        .service
        .delete_comment(&actor, blog_id, comment_id)
        .await?;
    Ok(Json(BlogResponse::from(&record)))
}

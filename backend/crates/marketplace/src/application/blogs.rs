//! Blog service: CRUD, view counter, like toggle, comments.

use std::sync::Arc;

use chrono::Utc;
use kernel::actor::Actor;
use kernel::id::{BlogId, CommentId, UserId};

use crate::domain::blog::{Blog, BlogCategory, BlogComment, NewBlog};
use crate::domain::book::require_text;
use crate::domain::query::{BlogFilter, Page, Paginated};
use crate::domain::repository::{BlogRecord, BlogRepository};
use crate::error::{MarketError, MarketResult};

/// Partial update. `None` leaves the field unchanged; `tags: Some(_)`
/// replaces the whole tag list.
#[derive(Debug, Clone, Default)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<BlogCategory>,
    pub tags: Option<Vec<String>>,
    pub image_path: Option<String>,
}

pub struct BlogService<R>
where
    R: BlogRepository,
{
    repo: Arc<R>,
}

impl<R> BlogService<R>
where
    R: BlogRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, actor: &Actor, input: NewBlog) -> MarketResult<BlogRecord> {
        let blog = Blog::new(actor.user_id, input)?;
        self.repo.create(&blog).await?;

        tracing::info!(blog_id = %blog.blog_id, author = %actor.user_id, "Blog published");

        self.reload(blog.blog_id).await
    }

    /// Single-blog fetch. Counts a view on every call, including the
    /// first one after creation; no deduplication by viewer.
    pub async fn get(&self, blog_id: BlogId) -> MarketResult<BlogRecord> {
        let mut record = self.find(blog_id).await?;

        self.repo.increment_views(blog_id).await?;
        record.blog.views += 1;

        Ok(record)
    }

    pub async fn list(&self, filter: BlogFilter, page: Page) -> MarketResult<Paginated<BlogRecord>> {
        let (items, total) = self.repo.list(&filter, page).await?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn list_by_author(&self, author_id: UserId) -> MarketResult<Vec<BlogRecord>> {
        self.repo.list_by_author(author_id).await
    }

    pub async fn update(
        &self,
        actor: &Actor,
        blog_id: BlogId,
        update: BlogUpdate,
    ) -> MarketResult<BlogRecord> {
        let mut blog = self.find(blog_id).await?.blog;

        if !actor.can_mutate(blog.author_id) {
            return Err(MarketError::NotAuthorized);
        }

        apply_update(&mut blog, update)?;
        self.repo.update(&blog).await?;

        self.reload(blog_id).await
    }

    pub async fn delete(&self, actor: &Actor, blog_id: BlogId) -> MarketResult<()> {
        let blog = self.find(blog_id).await?.blog;

        if !actor.can_mutate(blog.author_id) {
            return Err(MarketError::NotAuthorized);
        }

        self.repo.delete(blog_id).await?;

        tracing::info!(blog_id = %blog_id, "Blog removed");
        Ok(())
    }

    /// Like toggle: flips the actor's membership in the likes set.
    /// Toggling twice restores the original state.
    pub async fn toggle_like(&self, actor: &Actor, blog_id: BlogId) -> MarketResult<BlogRecord> {
        self.find(blog_id).await?;

        let liked = self.repo.toggle_like(blog_id, actor.user_id).await?;
        tracing::debug!(blog_id = %blog_id, user = %actor.user_id, liked, "Like toggled");

        self.reload(blog_id).await
    }

    pub async fn add_comment(
        &self,
        actor: &Actor,
        blog_id: BlogId,
        body: String,
    ) -> MarketResult<BlogRecord> {
        require_text("comment", &body)?;
        self.find(blog_id).await?;

        let comment = BlogComment::new(blog_id, actor.user_id, body)?;
        self.repo.add_comment(&comment).await?;

        self.reload(blog_id).await
    }

    /// Remove one comment under the three-way guard: comment author,
    /// blog author, or admin.
    pub async fn delete_comment(
        &self,
        actor: &Actor,
        blog_id: BlogId,
        comment_id: CommentId,
    ) -> MarketResult<BlogRecord> {
        let blog = self.find(blog_id).await?.blog;

        let comment = self
            .repo
            .find_comment(comment_id)
            .await?
            .filter(|c| c.blog_id == blog_id)
            .ok_or(MarketError::CommentNotFound)?;

        comment.ensure_can_delete(actor, blog.author_id)?;

        self.repo.delete_comment(comment_id).await?;

        self.reload(blog_id).await
    }

    /// Load without counting a view (mutation paths).
    async fn find(&self, blog_id: BlogId) -> MarketResult<BlogRecord> {
        self.repo
            .find(blog_id)
            .await?
            .ok_or(MarketError::BlogNotFound)
    }

    async fn reload(&self, blog_id: BlogId) -> MarketResult<BlogRecord> {
        self.repo
            .find(blog_id)
            .await?
            .ok_or_else(|| MarketError::Internal("Blog vanished during operation".into()))
    }
}

fn apply_update(blog: &mut Blog, update: BlogUpdate) -> MarketResult<()> {
    if let Some(title) = update.title {
        require_text("title", &title)?;
        blog.title = title.trim().to_string();
    }
    if let Some(content) = update.content {
        require_text("content", &content)?;
        blog.content = content;
    }
    if let Some(category) = update.category {
        blog.category = category;
    }
    if let Some(tags) = update.tags {
        blog.tags = tags;
    }
    if let Some(image_path) = update.image_path {
        blog.image_path = Some(image_path);
    }
    blog.updated_at = Utc::now();
    Ok(())
}

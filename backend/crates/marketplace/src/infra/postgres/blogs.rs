//! Blog repository implementation.
//!
//! Likes and comments are normalized into their own tables; reads
//! batch-fetch them for a whole page of posts instead of going row by
//! row.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use kernel::id::{BlogId, CommentId, UserId};

use crate::domain::blog::{Blog, BlogCategory, BlogComment};
use crate::domain::query::{BlogFilter, Page};
use crate::domain::repository::{BlogRecord, BlogRepository, CommentRecord};
use crate::error::MarketResult;

use super::{PgMarketRepository, contains_pattern, user_public};

const BLOG_SELECT: &str = r#"
    SELECT
        b.blog_id, b.title, b.content, b.author_id, b.category,
        b.tags, b.image_path, b.views, b.created_at, b.updated_at,
        a.name AS author_name, a.email AS author_email,
        a.college AS author_college, a.year AS author_year,
        a.phone AS author_phone
    FROM blogs b
    JOIN users a ON a.user_id = b.author_id
"#;

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &BlogFilter) {
    qb.push(" WHERE TRUE");
    if let Some(category) = filter.category {
        qb.push(" AND b.category = ").push_bind(category.id());
    }
    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        qb.push(" AND (b.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR b.content ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR array_to_string(b.tags, ' ') ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

impl PgMarketRepository {
    /// Likes and expanded comments for a batch of posts, keyed by blog id.
    async fn engagement_for(
        &self,
        blog_ids: &[Uuid],
    ) -> MarketResult<(
        HashMap<Uuid, Vec<UserId>>,
        HashMap<Uuid, Vec<CommentRecord>>,
    )> {
        let like_rows = sqlx::query_as::<_, LikeRow>(
            "SELECT blog_id, user_id FROM blog_likes WHERE blog_id = ANY($1) ORDER BY created_at",
        )
        .bind(blog_ids)
        .fetch_all(self.pool())
        .await?;

        let mut likes: HashMap<Uuid, Vec<UserId>> = HashMap::new();
        for row in like_rows {
            likes
                .entry(row.blog_id)
                .or_default()
                .push(UserId::from_uuid(row.user_id));
        }

        let comment_rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT
                c.comment_id, c.blog_id, c.user_id, c.body, c.created_at,
                u.name AS user_name, u.email AS user_email,
                u.college AS user_college, u.year AS user_year,
                u.phone AS user_phone
            FROM blog_comments c
            JOIN users u ON u.user_id = c.user_id
            WHERE c.blog_id = ANY($1)
            ORDER BY c.created_at
            "#,
        )
        .bind(blog_ids)
        .fetch_all(self.pool())
        .await?;

        let mut comments: HashMap<Uuid, Vec<CommentRecord>> = HashMap::new();
        for row in comment_rows {
            comments
                .entry(row.blog_id)
                .or_default()
                .push(row.into_record());
        }

        Ok((likes, comments))
    }

    async fn expand(&self, rows: Vec<BlogRow>) -> MarketResult<Vec<BlogRecord>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.blog_id).collect();
        let (mut likes, mut comments) = self.engagement_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let blog_id = row.blog_id;
                row.into_record(
                    likes.remove(&blog_id).unwrap_or_default(),
                    comments.remove(&blog_id).unwrap_or_default(),
                )
            })
            .collect())
    }
}

impl BlogRepository for PgMarketRepository {
    async fn create(&self, blog: &Blog) -> MarketResult<()> {
        sqlx::query(
            r#"
            INSERT INTO blogs (
                blog_id, title, content, author_id, category, tags,
                image_path, views, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(blog.blog_id.as_uuid())
        .bind(&blog.title)
        .bind(&blog.content)
        .bind(blog.author_id.as_uuid())
        .bind(blog.category.id())
        .bind(&blog.tags)
        .bind(&blog.image_path)
        .bind(blog.views)
        .bind(blog.created_at)
        .bind(blog.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn find(&self, blog_id: BlogId) -> MarketResult<Option<BlogRecord>> {
        let row = sqlx::query_as::<_, BlogRow>(&format!("{} WHERE b.blog_id = $1", BLOG_SELECT))
            .bind(blog_id.as_uuid())
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(self.expand(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: &BlogFilter,
        page: Page,
    ) -> MarketResult<(Vec<BlogRecord>, u64)> {
        let mut qb = QueryBuilder::new(BLOG_SELECT);
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY b.created_at DESC LIMIT ")
            .push_bind(page.limit as i64)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<BlogRow> = qb.build_query_as().fetch_all(self.pool()).await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM blogs b");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await?;

        Ok((self.expand(rows).await?, total as u64))
    }

    async fn list_by_author(&self, author_id: UserId) -> MarketResult<Vec<BlogRecord>> {
        let rows = sqlx::query_as::<_, BlogRow>(&format!(
            "{} WHERE b.author_id = $1 ORDER BY b.created_at DESC",
            BLOG_SELECT
        ))
        .bind(author_id.as_uuid())
        .fetch_all(self.pool())
        .await?;

        self.expand(rows).await
    }

    async fn update(&self, blog: &Blog) -> MarketResult<()> {
        sqlx::query(
            r#"
            UPDATE blogs SET
                title = $2,
                content = $3,
                category = $4,
                tags = $5,
                image_path = $6,
                views = $7,
                updated_at = $8
            WHERE blog_id = $1
            "#,
        )
        .bind(blog.blog_id.as_uuid())
        .bind(&blog.title)
        .bind(&blog.content)
        .bind(blog.category.id())
        .bind(&blog.tags)
        .bind(&blog.image_path)
        .bind(blog.views)
        .bind(blog.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn delete(&self, blog_id: BlogId) -> MarketResult<()> {
        sqlx::query("DELETE FROM blogs WHERE blog_id = $1")
            .bind(blog_id.as_uuid())
            .execute(self.pool())
            .await?;

        Ok(())
    }

    async fn increment_views(&self, blog_id: BlogId) -> MarketResult<()> {
        sqlx::query("UPDATE blogs SET views = views + 1 WHERE blog_id = $1")
            .bind(blog_id.as_uuid())
            .execute(self.pool())
            .await?;

        Ok(())
    }

    async fn toggle_like(&self, blog_id: BlogId, user_id: UserId) -> MarketResult<bool> {
        let removed = sqlx::query("DELETE FROM blog_likes WHERE blog_id = $1 AND user_id = $2")
            .bind(blog_id.as_uuid())
            .bind(user_id.as_uuid())
            .execute(self.pool())
            .await?
            .rows_affected();

        if removed > 0 {
            return Ok(false);
        }

        // The primary key keeps the set free of duplicates even if two
        // toggles race.
        sqlx::query(
            r#"
            INSERT INTO blog_likes (blog_id, user_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (blog_id, user_id) DO NOTHING
            "#,
        )
        .bind(blog_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        Ok(true)
    }

    async fn add_comment(&self, comment: &BlogComment) -> MarketResult<()> {
        sqlx::query(
            r#"
            INSERT INTO blog_comments (comment_id, blog_id, user_id, body, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.blog_id.as_uuid())
        .bind(comment.user_id.as_uuid())
        .bind(&comment.body)
        .bind(comment.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn find_comment(&self, comment_id: CommentId) -> MarketResult<Option<BlogComment>> {
        let row = sqlx::query_as::<_, BareCommentRow>(
            r#"
            SELECT comment_id, blog_id, user_id, body, created_at
            FROM blog_comments
            WHERE comment_id = $1
            "#,
        )
        .bind(comment_id.as_uuid())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|r| r.into_comment()))
    }

    async fn delete_comment(&self, comment_id: CommentId) -> MarketResult<()> {
        sqlx::query("DELETE FROM blog_comments WHERE comment_id = $1")
            .bind(comment_id.as_uuid())
            .execute(self.pool())
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct BlogRow {
    blog_id: Uuid,
    title: String,
    content: String,
    author_id: Uuid,
    category: i16,
    tags: Vec<String>,
    image_path: Option<String>,
    views: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_name: String,
    author_email: String,
    author_college: String,
    author_year: String,
    author_phone: String,
}

impl BlogRow {
    fn into_record(self, likes: Vec<UserId>, comments: Vec<CommentRecord>) -> BlogRecord {
        BlogRecord {
            blog: Blog {
                blog_id: BlogId::from_uuid(self.blog_id),
                title: self.title,
                content: self.content,
                author_id: UserId::from_uuid(self.author_id),
                category: BlogCategory::from_id(self.category),
                tags: self.tags,
                image_path: self.image_path,
                views: self.views,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            author: user_public(
                self.author_id,
                self.author_name,
                self.author_email,
                self.author_college,
                self.author_year,
                self.author_phone,
            ),
            likes,
            comments,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LikeRow {
    blog_id: Uuid,
    user_id: Uuid,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    blog_id: Uuid,
    user_id: Uuid,
    body: String,
    created_at: DateTime<Utc>,
    user_name: String,
    user_email: String,
    user_college: String,
    user_year: String,
    user_phone: String,
}

impl CommentRow {
    fn into_record(self) -> CommentRecord {
        CommentRecord {
            comment: BlogComment {
                comment_id: CommentId::from_uuid(self.comment_id),
                blog_id: BlogId::from_uuid(self.blog_id),
                user_id: UserId::from_uuid(self.user_id),
                body: self.body,
                created_at: self.created_at,
            },
            user: user_public(
                self.user_id,
                self.user_name,
                self.user_email,
                self.user_college,
                self.user_year,
                self.user_phone,
            ),
        }
    }
}

#[derive(sqlx::FromRow)]
struct BareCommentRow {
    comment_id: Uuid,
    blog_id: Uuid,
    user_id: Uuid,
    body: String,
    created_at: DateTime<Utc>,
}

impl BareCommentRow {
    fn into_comment(self) -> BlogComment {
        BlogComment {
            comment_id: CommentId::from_uuid(self.comment_id),
            blog_id: BlogId::from_uuid(self.blog_id),
            user_id: UserId::from_uuid(self.user_id),
            body: self.body,
            created_at: self.created_at,
        }
    }
}

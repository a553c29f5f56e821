//! Blog entity, comments, and the three-way comment deletion guard.

use chrono::{DateTime, Utc};
use kernel::actor::Actor;
use kernel::id::{BlogId, CommentId, UserId};

use crate::domain::book::require_text;
use crate::error::{MarketError, MarketResult};

/// Blog post category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum BlogCategory {
    StudyTips = 0,
    Technology = 1,
    Experiences = 2,
    CareerGuidance = 3,
    ExamPreparation = 4,
}

impl BlogCategory {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use BlogCategory::*;
        match self {
            StudyTips => "Study Tips",
            Technology => "Technology",
            Experiences => "Experiences",
            CareerGuidance => "Career Guidance",
            ExamPreparation => "Exam Preparation",
        }
    }

    /// For database values, which are write-validated.
    #[inline]
    pub fn from_id(id: i16) -> Self {
        use BlogCategory::*;
        match id {
            0 => StudyTips,
            1 => Technology,
            2 => Experiences,
            3 => CareerGuidance,
            4 => ExamPreparation,
            _ => unreachable!("Invalid BlogCategory id: {}", id),
        }
    }

    /// For API input; unknown codes are rejected.
    #[inline]
    pub fn try_from_code(code: &str) -> Option<Self> {
        use BlogCategory::*;
        match code {
            "Study Tips" => Some(StudyTips),
            "Technology" => Some(Technology),
            "Experiences" => Some(Experiences),
            "Career Guidance" => Some(CareerGuidance),
            "Exam Preparation" => Some(ExamPreparation),
            _ => None,
        }
    }
}

/// A blog post. Likes and comments are stored in their own tables; the
/// entity carries only what a mutation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blog {
    pub blog_id: BlogId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    pub category: BlogCategory,
    pub tags: Vec<String>,
    pub image_path: Option<String>,
    pub views: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a post.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub category: BlogCategory,
    pub tags: Vec<String>,
    pub image_path: Option<String>,
}

impl Blog {
    pub fn new(author_id: UserId, input: NewBlog) -> MarketResult<Self> {
        require_text("title", &input.title)?;
        require_text("content", &input.content)?;

        let now = Utc::now();
        Ok(Self {
            blog_id: BlogId::new(),
            title: input.title.trim().to_string(),
            content: input.content,
            author_id,
            category: input.category,
            tags: input.tags,
            image_path: input.image_path,
            views: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

/// One comment on a blog post, independently removable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogComment {
    pub comment_id: CommentId,
    pub blog_id: BlogId,
    pub user_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl BlogComment {
    pub fn new(blog_id: BlogId, user_id: UserId, body: String) -> MarketResult<Self> {
        require_text("comment", &body)?;

        Ok(Self {
            comment_id: CommentId::new(),
            blog_id,
            user_id,
            body,
            created_at: Utc::now(),
        })
    }

    /// Three-way deletion guard: the comment's author, the blog's
    /// author, or an admin.
    pub fn can_delete(&self, actor: &Actor, blog_author: UserId) -> bool {
        actor.user_id == self.user_id || actor.can_mutate(blog_author)
    }

    pub fn ensure_can_delete(&self, actor: &Actor, blog_author: UserId) -> MarketResult<()> {
        if self.can_delete(actor, blog_author) {
            Ok(())
        } else {
            Err(MarketError::NotAuthorized)
        }
    }
}

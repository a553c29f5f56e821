//! Repository traits for the content domains.
//!
//! Relation expansion is explicit: read operations return composite
//! records with the referenced users already joined in as `UserPublic`
//! projections. Implementations live in `infra`.

use kernel::id::{BlogId, BookId, CommentId, MentorId, PyqId, UserId};
use kernel::role::UserRole;

use crate::domain::UserPublic;
use crate::domain::blog::{Blog, BlogComment};
use crate::domain::book::Book;
use crate::domain::mentor::MentorProfile;
use crate::domain::pyq::Pyq;
use crate::domain::query::{BlogFilter, BookFilter, MentorFilter, Page, PyqFilter};
use crate::error::MarketResult;

/// Book with owner and renter expanded
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub book: Book,
    pub owner: UserPublic,
    pub renter: Option<UserPublic>,
}

/// Mentor profile with the owning user expanded
#[derive(Debug, Clone)]
pub struct MentorRecord {
    pub profile: MentorProfile,
    pub user: UserPublic,
}

/// PYQ with the uploader expanded
#[derive(Debug, Clone)]
pub struct PyqRecord {
    pub pyq: Pyq,
    pub uploader: UserPublic,
}

/// Comment with its author expanded
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub comment: BlogComment,
    pub user: UserPublic,
}

/// Blog with author, likes, and comments expanded
#[derive(Debug, Clone)]
pub struct BlogRecord {
    pub blog: Blog,
    pub author: UserPublic,
    pub likes: Vec<UserId>,
    pub comments: Vec<CommentRecord>,
}

/// Book persistence
#[trait_variant::make(BookRepository: Send)]
pub trait LocalBookRepository {
    async fn create(&self, book: &Book) -> MarketResult<()>;

    async fn find(&self, book_id: BookId) -> MarketResult<Option<BookRecord>>;

    /// `(items, total)` under the filter; items carry expanded users
    async fn list(&self, filter: &BookFilter, page: Page)
    -> MarketResult<(Vec<BookRecord>, u64)>;

    /// All listings of one owner, newest first, unpaginated
    async fn list_by_owner(&self, owner_id: UserId) -> MarketResult<Vec<BookRecord>>;

    async fn update(&self, book: &Book) -> MarketResult<()>;

    async fn delete(&self, book_id: BookId) -> MarketResult<()>;
}

/// Mentor profile persistence
#[trait_variant::make(MentorRepository: Send)]
pub trait LocalMentorRepository {
    async fn create(&self, profile: &MentorProfile) -> MarketResult<()>;

    async fn find(&self, mentor_id: MentorId) -> MarketResult<Option<MentorRecord>>;

    async fn find_by_user(&self, user_id: UserId) -> MarketResult<Option<MentorProfile>>;

    async fn list(
        &self,
        filter: &MentorFilter,
        page: Page,
    ) -> MarketResult<(Vec<MentorRecord>, u64)>;

    async fn update(&self, profile: &MentorProfile) -> MarketResult<()>;

    async fn delete(&self, mentor_id: MentorId) -> MarketResult<()>;

    /// Role promotion/demotion alongside profile create/delete
    async fn set_user_role(&self, user_id: UserId, role: UserRole) -> MarketResult<()>;
}

/// PYQ persistence
#[trait_variant::make(PyqRepository: Send)]
pub trait LocalPyqRepository {
    async fn create(&self, pyq: &Pyq) -> MarketResult<()>;

    async fn find(&self, pyq_id: PyqId) -> MarketResult<Option<PyqRecord>>;

    async fn list(&self, filter: &PyqFilter, page: Page) -> MarketResult<(Vec<PyqRecord>, u64)>;

    async fn list_by_uploader(&self, user_id: UserId) -> MarketResult<Vec<PyqRecord>>;

    async fn update(&self, pyq: &Pyq) -> MarketResult<()>;

    async fn delete(&self, pyq_id: PyqId) -> MarketResult<()>;

    /// Single-statement counter bump; the race between concurrent
    /// downloads is harmless
    async fn increment_downloads(&self, pyq_id: PyqId) -> MarketResult<()>;

    /// College of the uploading user, stamped onto new papers
    async fn user_college(&self, user_id: UserId) -> MarketResult<Option<String>>;
}

/// Blog persistence
#[trait_variant::make(BlogRepository: Send)]
pub trait LocalBlogRepository {
    async fn create(&self, blog: &Blog) -> MarketResult<()>;

    async fn find(&self, blog_id: BlogId) -> MarketResult<Option<BlogRecord>>;

    async fn list(&self, filter: &BlogFilter, page: Page)
    -> MarketResult<(Vec<BlogRecord>, u64)>;

    async fn list_by_author(&self, author_id: UserId) -> MarketResult<Vec<BlogRecord>>;

    async fn update(&self, blog: &Blog) -> MarketResult<()>;

    async fn delete(&self, blog_id: BlogId) -> MarketResult<()>;

    async fn increment_views(&self, blog_id: BlogId) -> MarketResult<()>;

    /// Flip membership of (blog, user) in the likes set; returns true
    /// when the user now likes the post
    async fn toggle_like(&self, blog_id: BlogId, user_id: UserId) -> MarketResult<bool>;

    async fn add_comment(&self, comment: &BlogComment) -> MarketResult<()>;

    async fn find_comment(&self, comment_id: CommentId) -> MarketResult<Option<BlogComment>>;

    async fn delete_comment(&self, comment_id: CommentId) -> MarketResult<()>;
}

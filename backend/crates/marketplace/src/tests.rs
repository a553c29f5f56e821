//! Crate-level behavior tests for the domain rules that every
//! endpoint leans on: the rental state machine, the rating fold, the
//! comment deletion guard, and query coercion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Duration;

use kernel::actor::Actor;
use kernel::id::{BlogId, CommentId, UserId};
use kernel::role::UserRole;

use crate::application::BlogService;
use crate::domain::UserPublic;
use crate::domain::blog::{Blog, BlogCategory, BlogComment, NewBlog};
use crate::domain::book::{Book, BookStatus, Condition, NewBook};
use crate::domain::mentor::{Availability, MentorProfile, NewMentorProfile};
use crate::domain::pyq::ExamType;
use crate::domain::query::{BlogFilter, Page, escape_like, non_empty};
use crate::domain::repository::{BlogRecord, BlogRepository};
use crate::error::{MarketError, MarketResult};

fn actor(user_id: UserId, role: UserRole) -> Actor {
    Actor { user_id, role }
}

fn sample_book(owner: UserId) -> Book {
    Book::new(
        owner,
        NewBook {
            title: "Introduction to Algorithms".into(),
            author: "Cormen".into(),
            isbn: Some("9780262033848".into()),
            subject: "Computer Science".into(),
            edition: Some("3rd".into()),
            condition: Condition::Good,
            price: 450.0,
            rental_price: 40.0,
            status: BookStatus::Available,
            images: vec![],
            location: "Hostel 4".into(),
        },
    )
    .unwrap()
}

fn sample_mentor(user: UserId) -> MentorProfile {
    MentorProfile::new(
        user,
        NewMentorProfile {
            subjects: vec!["Algorithms".into(), "  ".into()],
            bio: "Final-year CS student".into(),
            experience: None,
            education: None,
            hourly_rate: Some(200.0),
            availability: Availability::Available,
        },
    )
    .unwrap()
}

// ----------------------------------------------------------------------------
// Rental state machine
// ----------------------------------------------------------------------------

#[test]
fn test_rent_sets_renter_and_window() {
    let owner = UserId::new();
    let renter = UserId::new();
    let mut book = sample_book(owner);

    book.rent(renter, 7).unwrap();

    assert_eq!(book.status, BookStatus::RentedOut);
    assert_eq!(book.renter_id, Some(renter));
    let start = book.rental_start.unwrap();
    let end = book.rental_end.unwrap();
    assert_eq!(end - start, Duration::days(7));
}

#[test]
fn test_rent_rejected_unless_available() {
    let owner = UserId::new();
    let renter = UserId::new();

    let mut book = sample_book(owner);
    book.status = BookStatus::Unavailable;
    let err = book.rent(renter, 7).unwrap_err();
    assert!(matches!(err, MarketError::BusinessRule(_)));

    let mut book = sample_book(owner);
    book.rent(UserId::new(), 7).unwrap();
    // Already rented out
    let err = book.rent(renter, 7).unwrap_err();
    assert!(matches!(err, MarketError::BusinessRule(_)));
}

#[test]
fn test_owner_cannot_rent_own_book() {
    let owner = UserId::new();
    let mut book = sample_book(owner);

    let err = book.rent(owner, 7).unwrap_err();
    assert!(matches!(err, MarketError::BusinessRule(_)));
    assert_eq!(book.status, BookStatus::Available);
    assert_eq!(book.renter_id, None);
}

#[test]
fn test_rent_rejects_non_positive_period() {
    let mut book = sample_book(UserId::new());

    let err = book.rent(UserId::new(), 0).unwrap_err();
    assert!(matches!(err, MarketError::Validation(_)));
    assert_eq!(book.status, BookStatus::Available);
}

#[test]
fn test_rent_rejects_oversized_period() {
    let mut book = sample_book(UserId::new());

    // Far beyond any representable end date
    let err = book.rent(UserId::new(), 100_000_000).unwrap_err();
    assert!(matches!(err, MarketError::Validation(_)));
    assert_eq!(book.status, BookStatus::Available);
    assert_eq!(book.renter_id, None);
    assert_eq!(book.rental_end, None);

    let err = book.rent(UserId::new(), i64::MAX).unwrap_err();
    assert!(matches!(err, MarketError::Validation(_)));
    assert_eq!(book.status, BookStatus::Available);
}

#[test]
fn test_return_permitted_for_renter_owner_and_admin() {
    let owner = UserId::new();
    let renter = UserId::new();

    for who in [
        actor(renter, UserRole::Student),
        actor(owner, UserRole::Student),
        actor(UserId::new(), UserRole::Admin),
    ] {
        let mut book = sample_book(owner);
        book.rent(renter, 7).unwrap();

        book.return_rental(&who).unwrap();
        assert_eq!(book.status, BookStatus::Available);
        assert_eq!(book.renter_id, None);
        assert_eq!(book.rental_start, None);
        assert_eq!(book.rental_end, None);
    }
}

#[test]
fn test_return_rejected_for_stranger() {
    let owner = UserId::new();
    let renter = UserId::new();
    let mut book = sample_book(owner);
    book.rent(renter, 7).unwrap();

    let err = book
        .return_rental(&actor(UserId::new(), UserRole::Student))
        .unwrap_err();
    assert!(matches!(err, MarketError::NotAuthorized));
    assert_eq!(book.status, BookStatus::RentedOut);
    assert_eq!(book.renter_id, Some(renter));
}

#[test]
fn test_book_listing_validation() {
    let owner = UserId::new();

    let mut input = NewBook {
        title: "  ".into(),
        author: "a".into(),
        isbn: None,
        subject: "s".into(),
        edition: None,
        condition: Condition::default(),
        price: 10.0,
        rental_price: 1.0,
        status: BookStatus::default(),
        images: vec![],
        location: "l".into(),
    };
    assert!(Book::new(owner, input.clone()).is_err());

    input.title = "Physics".into();
    input.price = -1.0;
    assert!(Book::new(owner, input.clone()).is_err());

    input.price = f64::NAN;
    assert!(Book::new(owner, input.clone()).is_err());

    input.price = 10.0;
    assert!(Book::new(owner, input).is_ok());
}

// ----------------------------------------------------------------------------
// Mentor rating fold
// ----------------------------------------------------------------------------

#[test]
fn test_new_profile_starts_unrated_and_drops_blank_subjects() {
    let profile = sample_mentor(UserId::new());
    assert_eq!(profile.rating, 0.0);
    assert_eq!(profile.total_ratings, 0);
    assert_eq!(profile.subjects, vec!["Algorithms".to_string()]);
}

#[test]
fn test_rating_running_mean() {
    let mut profile = sample_mentor(UserId::new());

    profile.submit_rating(4).unwrap();
    assert_eq!(profile.rating, 4.0);
    assert_eq!(profile.total_ratings, 1);

    profile.submit_rating(5).unwrap();
    assert_eq!(profile.rating, 4.5);
    assert_eq!(profile.total_ratings, 2);

    profile.submit_rating(3).unwrap();
    assert!((profile.rating - 4.0).abs() < 1e-9);
    assert_eq!(profile.total_ratings, 3);
}

#[test]
fn test_out_of_range_rating_leaves_state_unchanged() {
    let mut profile = sample_mentor(UserId::new());
    profile.submit_rating(5).unwrap();

    for bad in [0, 6, -1] {
        let err = profile.submit_rating(bad).unwrap_err();
        assert!(matches!(err, MarketError::Validation(_)));
    }
    assert_eq!(profile.rating, 5.0);
    assert_eq!(profile.total_ratings, 1);
}

// ----------------------------------------------------------------------------
// Comment deletion guard
// ----------------------------------------------------------------------------

#[test]
fn test_comment_delete_guard_is_three_way() {
    let blog_author = UserId::new();
    let commenter = UserId::new();
    let blog_id = BlogId::new();

    let comment = BlogComment::new(blog_id, commenter, "nice writeup".into()).unwrap();

    assert!(comment.can_delete(&actor(commenter, UserRole::Student), blog_author));
    assert!(comment.can_delete(&actor(blog_author, UserRole::Student), blog_author));
    assert!(comment.can_delete(&actor(UserId::new(), UserRole::Admin), blog_author));
    assert!(!comment.can_delete(&actor(UserId::new(), UserRole::Student), blog_author));

    let err = comment
        .ensure_can_delete(&actor(UserId::new(), UserRole::Mentor), blog_author)
        .unwrap_err();
    assert!(matches!(err, MarketError::NotAuthorized));
}

#[test]
fn test_blank_comment_rejected() {
    let err = BlogComment::new(BlogId::new(), UserId::new(), "   ".into()).unwrap_err();
    assert!(matches!(err, MarketError::Validation(_)));
}

// ----------------------------------------------------------------------------
// Pagination and filter coercion
// ----------------------------------------------------------------------------

#[test]
fn test_page_coerces_malformed_values() {
    assert_eq!(Page::from_params(None, None), Page { page: 1, limit: 10 });
    assert_eq!(
        Page::from_params(Some("3"), Some("25")),
        Page { page: 3, limit: 25 }
    );
    assert_eq!(
        Page::from_params(Some("abc"), Some("0")),
        Page { page: 1, limit: 10 }
    );
    assert_eq!(
        Page::from_params(Some("-2"), Some("1e3")),
        Page { page: 1, limit: 10 }
    );
}

#[test]
fn test_page_offset_and_total_pages() {
    let page = Page { page: 3, limit: 10 };
    assert_eq!(page.offset(), 20);
    assert_eq!(page.total_pages(0), 0);
    assert_eq!(page.total_pages(10), 1);
    assert_eq!(page.total_pages(11), 2);
    assert_eq!(page.total_pages(95), 10);
}

#[test]
fn test_escape_like_escapes_wildcards() {
    assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    assert_eq!(escape_like("plain"), "plain");
}

#[test]
fn test_blank_filter_values_act_absent() {
    assert_eq!(non_empty(Some("  ".into())), None);
    assert_eq!(non_empty(Some("".into())), None);
    assert_eq!(non_empty(Some("math".into())), Some("math".into()));
    assert_eq!(non_empty(None), None);
}

// ----------------------------------------------------------------------------
// Enum codes
// ----------------------------------------------------------------------------

#[test]
fn test_enum_codes_round_trip_and_reject_unknown() {
    for condition in [
        Condition::New,
        Condition::LikeNew,
        Condition::Good,
        Condition::Fair,
        Condition::Poor,
    ] {
        assert_eq!(Condition::try_from_code(condition.code()), Some(condition));
        assert_eq!(Condition::from_id(condition.id()), condition);
    }
    assert_eq!(Condition::try_from_code("Mint"), None);

    assert_eq!(BookStatus::try_from_code("Rented Out"), Some(BookStatus::RentedOut));
    assert_eq!(BookStatus::try_from_code("rented out"), None);

    assert_eq!(ExamType::try_from_code("Midterm"), Some(ExamType::Midterm));
    assert_eq!(ExamType::try_from_code("midterm"), None);

    assert_eq!(
        BlogCategory::try_from_code("Study Tips"),
        Some(BlogCategory::StudyTips)
    );
    assert_eq!(BlogCategory::try_from_code("Gossip"), None);
}

// ----------------------------------------------------------------------------
// Like toggle through the service
// ----------------------------------------------------------------------------

/// Blog store backed by maps, enough to drive the like toggle.
#[derive(Default)]
struct InMemoryBlogs {
    blogs: Mutex<HashMap<BlogId, Blog>>,
    likes: Mutex<HashMap<BlogId, Vec<UserId>>>,
}

impl InMemoryBlogs {
    fn insert(&self, blog: Blog) {
        self.blogs.lock().unwrap().insert(blog.blog_id, blog);
    }
}

fn stub_user(user_id: UserId) -> UserPublic {
    UserPublic {
        user_id,
        name: "Asha".into(),
        email: "asha@campus.edu".into(),
        college: String::new(),
        year: String::new(),
        phone: String::new(),
    }
}

impl BlogRepository for InMemoryBlogs {
    async fn create(&self, blog: &Blog) -> MarketResult<()> {
        self.insert(blog.clone());
        Ok(())
    }

    async fn find(&self, blog_id: BlogId) -> MarketResult<Option<BlogRecord>> {
        let blog = self.blogs.lock().unwrap().get(&blog_id).cloned();
        let likes = self
            .likes
            .lock()
            .unwrap()
            .get(&blog_id)
            .cloned()
            .unwrap_or_default();

        Ok(blog.map(|blog| BlogRecord {
            author: stub_user(blog.author_id),
            likes,
            comments: Vec::new(),
            blog,
        }))
    }

    async fn list(
        &self,
        _filter: &BlogFilter,
        _page: Page,
    ) -> MarketResult<(Vec<BlogRecord>, u64)> {
        unimplemented!()
    }

    async fn list_by_author(&self, _author_id: UserId) -> MarketResult<Vec<BlogRecord>> {
        unimplemented!()
    }

    async fn update(&self, _blog: &Blog) -> MarketResult<()> {
        unimplemented!()
    }

    async fn delete(&self, _blog_id: BlogId) -> MarketResult<()> {
        unimplemented!()
    }

    async fn increment_views(&self, blog_id: BlogId) -> MarketResult<()> {
        if let Some(blog) = self.blogs.lock().unwrap().get_mut(&blog_id) {
            blog.views += 1;
        }
        Ok(())
    }

    async fn toggle_like(&self, blog_id: BlogId, user_id: UserId) -> MarketResult<bool> {
        let mut likes = self.likes.lock().unwrap();
        let entry = likes.entry(blog_id).or_default();
        if let Some(pos) = entry.iter().position(|u| *u == user_id) {
            entry.remove(pos);
            Ok(false)
        } else {
            entry.push(user_id);
            Ok(true)
        }
    }

    async fn add_comment(&self, _comment: &BlogComment) -> MarketResult<()> {
        unimplemented!()
    }

    async fn find_comment(&self, _comment_id: CommentId) -> MarketResult<Option<BlogComment>> {
        unimplemented!()
    }

    async fn delete_comment(&self, _comment_id: CommentId) -> MarketResult<()> {
        unimplemented!()
    }
}

fn sample_blog(author: UserId) -> Blog {
    Blog::new(
        author,
        NewBlog {
            title: "Surviving week one".into(),
            content: "Bring earplugs.".into(),
            category: BlogCategory::Experiences,
            tags: vec![],
            image_path: None,
        },
    )
    .unwrap()
}

#[tokio::test]
async fn test_like_toggled_twice_restores_state() {
    let repo = Arc::new(InMemoryBlogs::default());
    let blog = sample_blog(UserId::new());
    let blog_id = blog.blog_id;
    repo.insert(blog);

    let service = BlogService::new(repo);
    let reader = actor(UserId::new(), UserRole::Student);

    let record = service.toggle_like(&reader, blog_id).await.unwrap();
    assert_eq!(record.likes, vec![reader.user_id]);

    let record = service.toggle_like(&reader, blog_id).await.unwrap();
    assert!(record.likes.is_empty());
}

#[tokio::test]
async fn test_like_toggle_leaves_other_users_likes() {
    let repo = Arc::new(InMemoryBlogs::default());
    let blog = sample_blog(UserId::new());
    let blog_id = blog.blog_id;
    repo.insert(blog);

    let service = BlogService::new(repo);
    let first = actor(UserId::new(), UserRole::Student);
    let second = actor(UserId::new(), UserRole::Student);

    service.toggle_like(&first, blog_id).await.unwrap();
    service.toggle_like(&second, blog_id).await.unwrap();

    let record = service.toggle_like(&first, blog_id).await.unwrap();
    assert_eq!(record.likes, vec![second.user_id]);
}

#[tokio::test]
async fn test_like_on_missing_blog_is_not_found() {
    let service = BlogService::new(Arc::new(InMemoryBlogs::default()));
    let reader = actor(UserId::new(), UserRole::Student);

    let err = service.toggle_like(&reader, BlogId::new()).await.unwrap_err();
    assert!(matches!(err, MarketError::BlogNotFound));
}

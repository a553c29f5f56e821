//! API DTOs (Data Transfer Objects)
//!
//! Create/update bodies may arrive as JSON or as multipart text
//! fields, so numeric fields accept both number and string forms (the
//! `flex` deserializers). Enum codes in bodies are validated strictly:
//! an unknown code is a 400, never a silent default.

use serde::{Deserialize, Serialize};

use crate::domain::UserPublic;
use crate::domain::blog::BlogCategory;
use crate::domain::book::{BookStatus, Condition};
use crate::domain::mentor::Availability;
use crate::domain::pyq::ExamType;
use crate::domain::query::Paginated;
use crate::domain::repository::{BlogRecord, BookRecord, CommentRecord, MentorRecord, PyqRecord};
use crate::error::{MarketError, MarketResult};

// ============================================================================
// Shared projections
// ============================================================================

/// Public projection of a referenced user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublicDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub college: String,
    pub year: String,
    pub phone: String,
}

impl From<&UserPublic> for UserPublicDto {
    fn from(user: &UserPublic) -> Self {
        Self {
            id: user.user_id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            college: user.college.clone(),
            year: user.year.clone(),
            phone: user.phone.clone(),
        }
    }
}

/// Uniform list envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

impl<T> ListResponse<T> {
    pub fn from_page<R>(page: Paginated<R>, map: impl Fn(&R) -> T) -> Self {
        Self {
            items: page.items.iter().map(map).collect(),
            total: page.total,
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }
}

/// Bare acknowledgement for deletions
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ============================================================================
// Books
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub subject: String,
    pub edition: Option<String>,
    pub condition: Option<String>,
    #[serde(deserialize_with = "flex::f64_lenient")]
    pub price: f64,
    #[serde(deserialize_with = "flex::f64_lenient")]
    pub rental_price: f64,
    pub status: Option<String>,
    pub location: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub subject: Option<String>,
    pub edition: Option<String>,
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_f64_lenient")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "flex::opt_f64_lenient")]
    pub rental_price: Option<f64>,
    pub status: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentBookRequest {
    #[serde(default, deserialize_with = "flex::opt_i64_lenient")]
    pub rental_period: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub subject: String,
    pub edition: Option<String>,
    pub condition: &'static str,
    pub price: f64,
    pub rental_price: f64,
    pub status: &'static str,
    pub images: Vec<String>,
    pub owner: UserPublicDto,
    pub renter: Option<UserPublicDto>,
    pub rental_start_date: Option<String>,
    pub rental_end_date: Option<String>,
    pub location: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&BookRecord> for BookResponse {
    fn from(record: &BookRecord) -> Self {
        let book = &record.book;
        Self {
            id: book.book_id.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            subject: book.subject.clone(),
            edition: book.edition.clone(),
            condition: book.condition.code(),
            price: book.price,
            rental_price: book.rental_price,
            status: book.status.code(),
            images: book.images.clone(),
            owner: UserPublicDto::from(&record.owner),
            renter: record.renter.as_ref().map(UserPublicDto::from),
            rental_start_date: book.rental_start.map(|d| d.to_rfc3339()),
            rental_end_date: book.rental_end.map(|d| d.to_rfc3339()),
            location: book.location.clone(),
            created_at: book.created_at.to_rfc3339(),
            updated_at: book.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Mentors
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMentorRequest {
    #[serde(deserialize_with = "flex::string_list")]
    pub subjects: Vec<String>,
    pub bio: String,
    pub experience: Option<String>,
    pub education: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_f64_lenient")]
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMentorRequest {
    #[serde(default, deserialize_with = "flex::opt_string_list")]
    pub subjects: Option<Vec<String>>,
    pub bio: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_f64_lenient")]
    pub hourly_rate: Option<f64>,
    pub availability: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateMentorRequest {
    #[serde(deserialize_with = "flex::i32_lenient")]
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorResponse {
    pub id: String,
    pub user: UserPublicDto,
    pub subjects: Vec<String>,
    pub bio: String,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub hourly_rate: Option<f64>,
    pub availability: &'static str,
    pub rating: f64,
    pub total_ratings: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&MentorRecord> for MentorResponse {
    fn from(record: &MentorRecord) -> Self {
        let profile = &record.profile;
        Self {
            id: profile.mentor_id.to_string(),
            user: UserPublicDto::from(&record.user),
            subjects: profile.subjects.clone(),
            bio: profile.bio.clone(),
            experience: profile.experience.clone(),
            education: profile.education.clone(),
            hourly_rate: profile.hourly_rate,
            availability: profile.availability.code(),
            rating: profile.rating,
            total_ratings: profile.total_ratings,
            created_at: profile.created_at.to_rfc3339(),
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// PYQs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePyqRequest {
    pub course: String,
    pub subject: String,
    pub semester: String,
    pub exam_type: String,
    #[serde(deserialize_with = "flex::i32_lenient")]
    pub year: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePyqRequest {
    pub course: Option<String>,
    pub subject: Option<String>,
    pub semester: Option<String>,
    pub exam_type: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_i32_lenient")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PyqResponse {
    pub id: String,
    pub course: String,
    pub subject: String,
    pub semester: String,
    pub exam_type: &'static str,
    pub year: i32,
    pub file: String,
    pub uploaded_by: UserPublicDto,
    pub downloads: i32,
    pub college: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&PyqRecord> for PyqResponse {
    fn from(record: &PyqRecord) -> Self {
        let pyq = &record.pyq;
        Self {
            id: pyq.pyq_id.to_string(),
            course: pyq.course.clone(),
            subject: pyq.subject.clone(),
            semester: pyq.semester.clone(),
            exam_type: pyq.exam_type.code(),
            year: pyq.year,
            file: pyq.file_path.clone(),
            uploaded_by: UserPublicDto::from(&record.uploader),
            downloads: pyq.downloads,
            college: pyq.college.clone(),
            created_at: pyq.created_at.to_rfc3339(),
            updated_at: pyq.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Blogs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default, deserialize_with = "flex::string_list")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_string_list")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCommentRequest {
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub user: UserPublicDto,
    pub comment: String,
    pub created_at: String,
}

impl From<&CommentRecord> for CommentResponse {
    fn from(record: &CommentRecord) -> Self {
        Self {
            id: record.comment.comment_id.to_string(),
            user: UserPublicDto::from(&record.user),
            comment: record.comment.body.clone(),
            created_at: record.comment.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: UserPublicDto,
    pub category: &'static str,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub likes: Vec<String>,
    pub comments: Vec<CommentResponse>,
    pub views: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&BlogRecord> for BlogResponse {
    fn from(record: &BlogRecord) -> Self {
        let blog = &record.blog;
        Self {
            id: blog.blog_id.to_string(),
            title: blog.title.clone(),
            content: blog.content.clone(),
            author: UserPublicDto::from(&record.author),
            category: blog.category.code(),
            tags: blog.tags.clone(),
            image: blog.image_path.clone(),
            likes: record.likes.iter().map(|id| id.to_string()).collect(),
            comments: record.comments.iter().map(CommentResponse::from).collect(),
            views: blog.views,
            created_at: blog.created_at.to_rfc3339(),
            updated_at: blog.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Enum code parsing (bodies are strict)
// ============================================================================

pub fn parse_condition(code: &str) -> MarketResult<Condition> {
    Condition::try_from_code(code)
        .ok_or_else(|| MarketError::Validation(format!("Unknown condition: {}", code)))
}

pub fn parse_book_status(code: &str) -> MarketResult<BookStatus> {
    BookStatus::try_from_code(code)
        .ok_or_else(|| MarketError::Validation(format!("Unknown status: {}", code)))
}

pub fn parse_availability(code: &str) -> MarketResult<Availability> {
    Availability::try_from_code(code)
        .ok_or_else(|| MarketError::Validation(format!("Unknown availability: {}", code)))
}

pub fn parse_exam_type(code: &str) -> MarketResult<ExamType> {
    ExamType::try_from_code(code)
        .ok_or_else(|| MarketError::Validation(format!("Unknown examType: {}", code)))
}

pub fn parse_blog_category(code: &str) -> MarketResult<BlogCategory> {
    BlogCategory::try_from_code(code)
        .ok_or_else(|| MarketError::Validation(format!("Unknown category: {}", code)))
}

// ============================================================================
// Lenient field deserializers
// ============================================================================

/// Multipart text fields arrive as strings; JSON bodies carry real
/// numbers and arrays. These accept either form.
pub(crate) mod flex {
    use serde::{Deserialize, Deserializer, de};
    use serde_json::Value;

    pub fn f64_lenient<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
        match Value::deserialize(de)? {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| de::Error::custom("expected a number")),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| de::Error::custom("expected a number")),
            _ => Err(de::Error::custom("expected a number")),
        }
    }

    pub fn opt_f64_lenient<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
        match Option::<Value>::deserialize(de)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| de::Error::custom("expected a number")),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| de::Error::custom("expected a number")),
            Some(_) => Err(de::Error::custom("expected a number")),
        }
    }

    pub fn i32_lenient<'de, D: Deserializer<'de>>(de: D) -> Result<i32, D::Error> {
        match Value::deserialize(de)? {
            Value::Number(n) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| de::Error::custom("expected an integer")),
            Value::String(s) => s
                .trim()
                .parse::<i32>()
                .map_err(|_| de::Error::custom("expected an integer")),
            _ => Err(de::Error::custom("expected an integer")),
        }
    }

    pub fn opt_i32_lenient<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i32>, D::Error> {
        match Option::<Value>::deserialize(de)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| de::Error::custom("expected an integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i32>()
                .map(Some)
                .map_err(|_| de::Error::custom("expected an integer")),
            Some(_) => Err(de::Error::custom("expected an integer")),
        }
    }

    pub fn opt_i64_lenient<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
        match Option::<Value>::deserialize(de)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| de::Error::custom("expected an integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| de::Error::custom("expected an integer")),
            Some(_) => Err(de::Error::custom("expected an integer")),
        }
    }

    /// Array of strings, or a single string (comma-separated values
    /// allowed), or absent for an empty list.
    pub fn string_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
        match Option::<Value>::deserialize(de)? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => list_from_value(value).map_err(de::Error::custom),
        }
    }

    pub fn opt_string_list<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        match Option::<Value>::deserialize(de)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => list_from_value(value).map(Some).map_err(de::Error::custom),
        }
    }

    fn list_from_value(value: Value) -> Result<Vec<String>, String> {
        match value {
            Value::String(s) => Ok(s
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect()),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(format!("expected a string, got {}", other)),
                })
                .collect(),
            other => Err(format!("expected a string or array, got {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::Page;

    #[test]
    fn test_list_envelope_maps_borrowed_items() {
        let page = Paginated::new(
            vec!["alpha".to_string(), "beta".to_string()],
            7,
            Page { page: 2, limit: 2 },
        );
        let resp = ListResponse::from_page(page, |s| s.to_uppercase());
        assert_eq!(resp.items, vec!["ALPHA", "BETA"]);
        assert_eq!(resp.total, 7);
        assert_eq!(resp.total_pages, 4);
        assert_eq!(resp.current_page, 2);
    }

    #[test]
    fn test_create_book_accepts_string_numbers() {
        let req: CreateBookRequest = serde_json::from_value(serde_json::json!({
            "title": "Linear Algebra",
            "author": "Strang",
            "subject": "Math",
            "price": "450",
            "rentalPrice": 50,
            "location": "Hostel 3"
        }))
        .unwrap();
        assert_eq!(req.price, 450.0);
        assert_eq!(req.rental_price, 50.0);
    }

    #[test]
    fn test_string_list_forms() {
        let req: CreateBlogRequest = serde_json::from_value(serde_json::json!({
            "title": "t",
            "content": "c",
            "category": "Technology",
            "tags": "rust, axum"
        }))
        .unwrap();
        assert_eq!(req.tags, vec!["rust", "axum"]);

        let req: CreateBlogRequest = serde_json::from_value(serde_json::json!({
            "title": "t",
            "content": "c",
            "category": "Technology",
            "tags": ["a", "b"]
        }))
        .unwrap();
        assert_eq!(req.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_enum_codes_rejected() {
        assert!(parse_condition("Mint").is_err());
        assert!(parse_blog_category("Gossip").is_err());
        assert!(parse_exam_type("Surprise").is_err());
        assert!(parse_condition("Like New").is_ok());
    }
}

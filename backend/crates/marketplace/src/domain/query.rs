//! Pagination and list filters.
//!
//! Query-string values here are coerced, never rejected: a malformed
//! page number or an unknown enum code behaves as if the parameter were
//! absent. Bodies are validated strictly; only list filters get this
//! forgiving treatment.

use crate::domain::blog::BlogCategory;
use crate::domain::pyq::ExamType;

/// Default page size for list endpoints
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// 1-indexed page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Page {
    /// Build from raw query values; anything unparseable or
    /// non-positive falls back to the default.
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |v: Option<&str>, default: u32| {
            v.and_then(|s| s.parse::<u32>().ok())
                .filter(|n| *n >= 1)
                .unwrap_or(default)
        };
        Self {
            page: parse(page, 1),
            limit: parse(limit, DEFAULT_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        ((self.page - 1) as i64) * (self.limit as i64)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        (total as f64 / self.limit as f64).ceil() as u64
    }
}

/// A page of expanded records plus the count metadata every list
/// endpoint returns.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, page: Page) -> Self {
        Self {
            items,
            total,
            total_pages: page.total_pages(total),
            current_page: page.page,
        }
    }
}

/// Escape `%` and `_` so user input is matched literally inside ILIKE.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Book list filters: substring on subject/location, `search` ORs over
/// title/author/subject.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub subject: Option<String>,
    pub location: Option<String>,
    pub search: Option<String>,
}

/// Mentor list filters: substring on subjects, `search` ORs over
/// bio/subjects.
#[derive(Debug, Clone, Default)]
pub struct MentorFilter {
    pub subject: Option<String>,
    pub search: Option<String>,
}

/// PYQ list filters: substring on course/subject, exact on
/// semester/year/examType.
#[derive(Debug, Clone, Default)]
pub struct PyqFilter {
    pub course: Option<String>,
    pub subject: Option<String>,
    pub semester: Option<String>,
    pub year: Option<i32>,
    pub exam_type: Option<ExamType>,
}

/// Blog list filters: exact on category, `search` ORs over
/// title/content/tags.
#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    pub category: Option<BlogCategory>,
    pub search: Option<String>,
}

/// Drop empty strings so blank query parameters act like absent ones.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

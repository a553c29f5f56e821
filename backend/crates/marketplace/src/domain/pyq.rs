//! PYQ (previous year question paper) entity.

use chrono::{DateTime, Utc};
use kernel::id::{PyqId, UserId};

use crate::domain::book::require_text;
use crate::error::{MarketError, MarketResult};

/// Exam the paper belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum ExamType {
    Midterm = 0,
    Final = 1,
    Quiz = 2,
}

impl ExamType {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use ExamType::*;
        match self {
            Midterm => "Midterm",
            Final => "Final",
            Quiz => "Quiz",
        }
    }

    /// For database values, which are write-validated.
    #[inline]
    pub fn from_id(id: i16) -> Self {
        use ExamType::*;
        match id {
            0 => Midterm,
            1 => Final,
            2 => Quiz,
            _ => unreachable!("Invalid ExamType id: {}", id),
        }
    }

    /// For API input; unknown codes are rejected.
    #[inline]
    pub fn try_from_code(code: &str) -> Option<Self> {
        use ExamType::*;
        match code {
            "Midterm" => Some(Midterm),
            "Final" => Some(Final),
            "Quiz" => Some(Quiz),
            _ => None,
        }
    }
}

/// An uploaded past exam paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pyq {
    pub pyq_id: PyqId,
    pub course: String,
    pub subject: String,
    pub semester: String,
    pub exam_type: ExamType,
    pub year: i32,
    pub file_path: String,
    pub uploaded_by: UserId,
    pub downloads: i32,
    pub college: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for uploading a paper.
#[derive(Debug, Clone)]
pub struct NewPyq {
    pub course: String,
    pub subject: String,
    pub semester: String,
    pub exam_type: ExamType,
    pub year: i32,
    pub file_path: String,
    pub college: String,
}

impl Pyq {
    pub fn new(uploaded_by: UserId, input: NewPyq) -> MarketResult<Self> {
        require_text("course", &input.course)?;
        require_text("subject", &input.subject)?;
        require_text("semester", &input.semester)?;
        if input.file_path.trim().is_empty() {
            return Err(MarketError::Validation("file is required".into()));
        }
        if input.year <= 0 {
            return Err(MarketError::Validation("year must be positive".into()));
        }

        let now = Utc::now();
        Ok(Self {
            pyq_id: PyqId::new(),
            course: input.course,
            subject: input.subject,
            semester: input.semester,
            exam_type: input.exam_type,
            year: input.year,
            file_path: input.file_path,
            uploaded_by,
            downloads: 0,
            college: input.college,
            created_at: now,
            updated_at: now,
        })
    }
}

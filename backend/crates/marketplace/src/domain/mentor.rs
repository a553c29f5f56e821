//! Mentor profile entity and the running-mean rating aggregator.

use chrono::{DateTime, Utc};
use kernel::id::{MentorId, UserId};

use crate::domain::book::require_text;
use crate::error::{MarketError, MarketResult};

/// Mentor availability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum Availability {
    #[default]
    Available = 0,
    Busy = 1,
    Away = 2,
}

impl Availability {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Availability::*;
        match self {
            Available => "Available",
            Busy => "Busy",
            Away => "Away",
        }
    }

    /// For database values, which are write-validated.
    #[inline]
    pub fn from_id(id: i16) -> Self {
        use Availability::*;
        match id {
            0 => Available,
            1 => Busy,
            2 => Away,
            _ => unreachable!("Invalid Availability id: {}", id),
        }
    }

    /// For API input; unknown codes are rejected.
    #[inline]
    pub fn try_from_code(code: &str) -> Option<Self> {
        use Availability::*;
        match code {
            "Available" => Some(Available),
            "Busy" => Some(Busy),
            "Away" => Some(Away),
            _ => None,
        }
    }
}

/// A peer mentor profile, one per user.
///
/// `rating` is a running mean over all submitted ratings; no history of
/// individual ratings is retained, so a rating cannot be edited or
/// retracted once folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct MentorProfile {
    pub mentor_id: MentorId,
    pub user_id: UserId,
    pub subjects: Vec<String>,
    pub bio: String,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub hourly_rate: Option<f64>,
    pub availability: Availability,
    pub rating: f64,
    pub total_ratings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a profile.
#[derive(Debug, Clone)]
pub struct NewMentorProfile {
    pub subjects: Vec<String>,
    pub bio: String,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub hourly_rate: Option<f64>,
    pub availability: Availability,
}

impl MentorProfile {
    pub fn new(user_id: UserId, input: NewMentorProfile) -> MarketResult<Self> {
        require_text("bio", &input.bio)?;
        if input.subjects.iter().all(|s| s.trim().is_empty()) {
            return Err(MarketError::Validation(
                "subjects must contain at least one subject".into(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            mentor_id: MentorId::new(),
            user_id,
            subjects: input
                .subjects
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect(),
            bio: input.bio,
            experience: input.experience,
            education: input.education,
            hourly_rate: input.hourly_rate,
            availability: input.availability,
            rating: 0.0,
            total_ratings: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Fold one rating into the running mean.
    ///
    /// The rating must be an integer in [1,5]; anything else is a
    /// validation failure with no state change.
    pub fn submit_rating(&mut self, rating: i32) -> MarketResult<()> {
        if !(1..=5).contains(&rating) {
            return Err(MarketError::Validation(
                "Rating must be between 1 and 5".into(),
            ));
        }

        let total = self.total_ratings as f64;
        self.rating = (self.rating * total + rating as f64) / (total + 1.0);
        self.total_ratings += 1;
        self.updated_at = Utc::now();
        Ok(())
    }
}

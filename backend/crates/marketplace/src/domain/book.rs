//! Book entity and the rental state machine.

use chrono::{DateTime, Duration, Utc};
use kernel::actor::Actor;
use kernel::id::{BookId, UserId};

use crate::error::{MarketError, MarketResult};

/// Default rental period in days when the caller supplies none
pub const DEFAULT_RENTAL_PERIOD_DAYS: i64 = 30;

/// Physical condition of a listed book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum Condition {
    New = 0,
    LikeNew = 1,
    #[default]
    Good = 2,
    Fair = 3,
    Poor = 4,
}

impl Condition {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Condition::*;
        match self {
            New => "New",
            LikeNew => "Like New",
            Good => "Good",
            Fair => "Fair",
            Poor => "Poor",
        }
    }

    /// For database values, which are write-validated.
    #[inline]
    pub fn from_id(id: i16) -> Self {
        use Condition::*;
        match id {
            0 => New,
            1 => LikeNew,
            2 => Good,
            3 => Fair,
            4 => Poor,
            _ => unreachable!("Invalid Condition id: {}", id),
        }
    }

    /// For API input; unknown codes are rejected.
    #[inline]
    pub fn try_from_code(code: &str) -> Option<Self> {
        use Condition::*;
        match code {
            "New" => Some(New),
            "Like New" => Some(LikeNew),
            "Good" => Some(Good),
            "Fair" => Some(Fair),
            "Poor" => Some(Poor),
            _ => None,
        }
    }
}

/// Rental status. `Unavailable` is inert: the owner can set it by edit,
/// but no transition produces or leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum BookStatus {
    #[default]
    Available = 0,
    RentedOut = 1,
    Unavailable = 2,
}

impl BookStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use BookStatus::*;
        match self {
            Available => "Available",
            RentedOut => "Rented Out",
            Unavailable => "Unavailable",
        }
    }

    /// For database values, which are write-validated.
    #[inline]
    pub fn from_id(id: i16) -> Self {
        use BookStatus::*;
        match id {
            0 => Available,
            1 => RentedOut,
            2 => Unavailable,
            _ => unreachable!("Invalid BookStatus id: {}", id),
        }
    }

    /// For API input; unknown codes are rejected.
    #[inline]
    pub fn try_from_code(code: &str) -> Option<Self> {
        use BookStatus::*;
        match code {
            "Available" => Some(Available),
            "Rented Out" => Some(RentedOut),
            "Unavailable" => Some(Unavailable),
            _ => None,
        }
    }
}

/// A textbook listing.
///
/// Invariant: renter and both rental dates are set together or all
/// absent, and status is `RentedOut` exactly when a renter is present.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub subject: String,
    pub edition: Option<String>,
    pub condition: Condition,
    pub price: f64,
    pub rental_price: f64,
    pub status: BookStatus,
    pub images: Vec<String>,
    pub owner_id: UserId,
    pub renter_id: Option<UserId>,
    pub rental_start: Option<DateTime<Utc>>,
    pub rental_end: Option<DateTime<Utc>>,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a listing.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub subject: String,
    pub edition: Option<String>,
    pub condition: Condition,
    pub price: f64,
    pub rental_price: f64,
    pub status: BookStatus,
    pub images: Vec<String>,
    pub location: String,
}

impl Book {
    pub fn new(owner_id: UserId, input: NewBook) -> MarketResult<Self> {
        require_text("title", &input.title)?;
        require_text("author", &input.author)?;
        require_text("subject", &input.subject)?;
        require_text("location", &input.location)?;
        require_non_negative("price", input.price)?;
        require_non_negative("rentalPrice", input.rental_price)?;

        let now = Utc::now();
        Ok(Self {
            book_id: BookId::new(),
            title: input.title.trim().to_string(),
            author: input.author,
            isbn: input.isbn,
            subject: input.subject,
            edition: input.edition,
            condition: input.condition,
            price: input.price,
            rental_price: input.rental_price,
            status: input.status,
            images: input.images,
            owner_id,
            renter_id: None,
            rental_start: None,
            rental_end: None,
            location: input.location,
            created_at: now,
            updated_at: now,
        })
    }

    /// `Available -> RentedOut`.
    ///
    /// Fails if the book is not available, or if the renter is the
    /// owner. Both are business-rule failures (400), checked after
    /// existence and before any state change.
    pub fn rent(&mut self, renter: UserId, period_days: i64) -> MarketResult<()> {
        if self.status != BookStatus::Available {
            return Err(MarketError::BusinessRule(
                "Book is not available for rent".into(),
            ));
        }
        if renter == self.owner_id {
            return Err(MarketError::BusinessRule("Cannot rent your own book".into()));
        }
        if period_days <= 0 {
            return Err(MarketError::Validation(
                "rentalPeriod must be a positive integer".into(),
            ));
        }

        let now = Utc::now();
        // Checked arithmetic: a period of e.g. 100_000_000 days must be
        // a 400, not an overflow panic.
        let rental_end = Duration::try_days(period_days)
            .and_then(|period| now.checked_add_signed(period))
            .ok_or_else(|| {
                MarketError::Validation("rentalPeriod is too large".into())
            })?;

        self.renter_id = Some(renter);
        self.status = BookStatus::RentedOut;
        self.rental_start = Some(now);
        self.rental_end = Some(rental_end);
        self.updated_at = now;
        Ok(())
    }

    /// `RentedOut -> Available`. Permitted for the renter, the owner,
    /// or an admin; everyone else is rejected with an authorization
    /// failure.
    pub fn return_rental(&mut self, actor: &Actor) -> MarketResult<()> {
        let is_renter = self.renter_id == Some(actor.user_id);
        if !is_renter && !actor.can_mutate(self.owner_id) {
            return Err(MarketError::NotAuthorized);
        }

        self.renter_id = None;
        self.status = BookStatus::Available;
        self.rental_start = None;
        self.rental_end = None;
        self.updated_at = Utc::now();
        Ok(())
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> MarketResult<()> {
    if value.trim().is_empty() {
        return Err(MarketError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> MarketResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(MarketError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

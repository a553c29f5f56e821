//! Mentor service: profile lifecycle, role promotion, rating.

use std::sync::Arc;

use chrono::Utc;
use kernel::actor::Actor;
use kernel::id::MentorId;
use kernel::role::UserRole;

use crate::domain::book::require_text;
use crate::domain::mentor::{Availability, MentorProfile, NewMentorProfile};
use crate::domain::query::{MentorFilter, Page, Paginated};
use crate::domain::repository::{MentorRecord, MentorRepository};
use crate::error::{MarketError, MarketResult};

/// Partial profile update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct MentorUpdate {
    pub subjects: Option<Vec<String>>,
    pub bio: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub hourly_rate: Option<f64>,
    pub availability: Option<Availability>,
}

pub struct MentorService<R>
where
    R: MentorRepository,
{
    repo: Arc<R>,
}

impl<R> MentorService<R>
where
    R: MentorRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create the actor's mentor profile and promote them to the
    /// mentor role. One profile per user.
    pub async fn create(
        &self,
        actor: &Actor,
        input: NewMentorProfile,
    ) -> MarketResult<MentorRecord> {
        if self.repo.find_by_user(actor.user_id).await?.is_some() {
            return Err(MarketError::BusinessRule(
                "Mentor profile already exists".into(),
            ));
        }

        let profile = MentorProfile::new(actor.user_id, input)?;

        self.repo
            .set_user_role(actor.user_id, UserRole::Mentor)
            .await?;
        self.repo.create(&profile).await?;

        tracing::info!(mentor_id = %profile.mentor_id, user = %actor.user_id, "Mentor profile created");

        self.reload(profile.mentor_id).await
    }

    pub async fn get(&self, mentor_id: MentorId) -> MarketResult<MentorRecord> {
        self.repo
            .find(mentor_id)
            .await?
            .ok_or(MarketError::MentorNotFound)
    }

    pub async fn list(
        &self,
        filter: MentorFilter,
        page: Page,
    ) -> MarketResult<Paginated<MentorRecord>> {
        let (items, total) = self.repo.list(&filter, page).await?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn update(
        &self,
        actor: &Actor,
        mentor_id: MentorId,
        update: MentorUpdate,
    ) -> MarketResult<MentorRecord> {
        let mut profile = self.get(mentor_id).await?.profile;

        if !actor.can_mutate(profile.user_id) {
            return Err(MarketError::NotAuthorized);
        }

        apply_update(&mut profile, update)?;
        self.repo.update(&profile).await?;

        self.reload(mentor_id).await
    }

    /// Delete the profile and revert the owning user to the student
    /// role (the owner, even when an admin performs the deletion).
    pub async fn delete(&self, actor: &Actor, mentor_id: MentorId) -> MarketResult<()> {
        let profile = self.get(mentor_id).await?.profile;

        if !actor.can_mutate(profile.user_id) {
            return Err(MarketError::NotAuthorized);
        }

        self.repo
            .set_user_role(profile.user_id, UserRole::Student)
            .await?;
        self.repo.delete(mentor_id).await?;

        tracing::info!(mentor_id = %mentor_id, "Mentor profile removed");
        Ok(())
    }

    /// Submit a rating. Any authenticated user may rate; the range is
    /// validated before the profile is even looked up.
    pub async fn rate(&self, mentor_id: MentorId, rating: i32) -> MarketResult<MentorRecord> {
        if !(1..=5).contains(&rating) {
            return Err(MarketError::Validation(
                "Rating must be between 1 and 5".into(),
            ));
        }

        let mut profile = self.get(mentor_id).await?.profile;

        profile.submit_rating(rating)?;
        self.repo.update(&profile).await?;

        self.reload(mentor_id).await
    }

    async fn reload(&self, mentor_id: MentorId) -> MarketResult<MentorRecord> {
        self.repo
            .find(mentor_id)
            .await?
            .ok_or_else(|| MarketError::Internal("Mentor vanished during operation".into()))
    }
}

fn apply_update(profile: &mut MentorProfile, update: MentorUpdate) -> MarketResult<()> {
    if let Some(subjects) = update.subjects {
        let subjects: Vec<String> = subjects
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if subjects.is_empty() {
            return Err(MarketError::Validation(
                "subjects must contain at least one subject".into(),
            ));
        }
        profile.subjects = subjects;
    }
    if let Some(bio) = update.bio {
        require_text("bio", &bio)?;
        profile.bio = bio;
    }
    if let Some(experience) = update.experience {
        profile.experience = Some(experience);
    }
    if let Some(education) = update.education {
        profile.education = Some(education);
    }
    if let Some(hourly_rate) = update.hourly_rate {
        profile.hourly_rate = Some(hourly_rate);
    }
    if let Some(availability) = update.availability {
        profile.availability = availability;
    }
    profile.updated_at = Utc::now();
    Ok(())
}

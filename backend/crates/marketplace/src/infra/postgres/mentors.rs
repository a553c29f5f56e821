//! Mentor repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use kernel::id::{MentorId, UserId};
use kernel::role::UserRole;

use crate::domain::mentor::{Availability, MentorProfile};
use crate::domain::query::{MentorFilter, Page};
use crate::domain::repository::{MentorRecord, MentorRepository};
use crate::error::MarketResult;

use super::{PgMarketRepository, contains_pattern, user_public};

const MENTOR_SELECT: &str = r#"
    SELECT
        m.mentor_id, m.user_id, m.subjects, m.bio, m.experience,
        m.education, m.hourly_rate, m.availability, m.rating,
        m.total_ratings, m.created_at, m.updated_at,
        u.name AS user_name, u.email AS user_email,
        u.college AS user_college, u.year AS user_year,
        u.phone AS user_phone
    FROM mentor_profiles m
    JOIN users u ON u.user_id = m.user_id
"#;

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &MentorFilter) {
    qb.push(" WHERE TRUE");
    if let Some(subject) = &filter.subject {
        qb.push(" AND array_to_string(m.subjects, ' ') ILIKE ")
            .push_bind(contains_pattern(subject));
    }
    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        qb.push(" AND (m.bio ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR array_to_string(m.subjects, ' ') ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

impl MentorRepository for PgMarketRepository {
    async fn create(&self, profile: &MentorProfile) -> MarketResult<()> {
        sqlx::query(
            r#"
            INSERT INTO mentor_profiles (
                mentor_id, user_id, subjects, bio, experience,
                education, hourly_rate, availability, rating,
                total_ratings, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(profile.mentor_id.as_uuid())
        .bind(profile.user_id.as_uuid())
        .bind(&profile.subjects)
        .bind(&profile.bio)
        .bind(&profile.experience)
        .bind(&profile.education)
        .bind(profile.hourly_rate)
        .bind(profile.availability.id())
        .bind(profile.rating)
        .bind(profile.total_ratings)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn find(&self, mentor_id: MentorId) -> MarketResult<Option<MentorRecord>> {
        let row =
            sqlx::query_as::<_, MentorRow>(&format!("{} WHERE m.mentor_id = $1", MENTOR_SELECT))
                .bind(mentor_id.as_uuid())
                .fetch_optional(self.pool())
                .await?;

        Ok(row.map(|r| r.into_record()))
    }

    async fn find_by_user(&self, user_id: UserId) -> MarketResult<Option<MentorProfile>> {
        let row =
            sqlx::query_as::<_, MentorRow>(&format!("{} WHERE m.user_id = $1", MENTOR_SELECT))
                .bind(user_id.as_uuid())
                .fetch_optional(self.pool())
                .await?;

        Ok(row.map(|r| r.into_record().profile))
    }

    async fn list(
        &self,
        filter: &MentorFilter,
        page: Page,
    ) -> MarketResult<(Vec<MentorRecord>, u64)> {
        let mut qb = QueryBuilder::new(MENTOR_SELECT);
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY m.rating DESC, m.created_at DESC LIMIT ")
            .push_bind(page.limit as i64)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<MentorRow> = qb.build_query_as().fetch_all(self.pool()).await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM mentor_profiles m");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await?;

        Ok((
            rows.into_iter().map(MentorRow::into_record).collect(),
            total as u64,
        ))
    }

    async fn update(&self, profile: &MentorProfile) -> MarketResult<()> {
        sqlx::query(
            r#"
            UPDATE mentor_profiles SET
                subjects = $2,
                bio = $3,
                experience = $4,
                education = $5,
                hourly_rate = $6,
                availability = $7,
                rating = $8,
                total_ratings = $9,
                updated_at = $10
            WHERE mentor_id = $1
            "#,
        )
        .bind(profile.mentor_id.as_uuid())
        .bind(&profile.subjects)
        .bind(&profile.bio)
        .bind(&profile.experience)
        .bind(&profile.education)
        .bind(profile.hourly_rate)
        .bind(profile.availability.id())
        .bind(profile.rating)
        .bind(profile.total_ratings)
        .bind(profile.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn delete(&self, mentor_id: MentorId) -> MarketResult<()> {
        sqlx::query("DELETE FROM mentor_profiles WHERE mentor_id = $1")
            .bind(mentor_id.as_uuid())
            .execute(self.pool())
            .await?;

        Ok(())
    }

    async fn set_user_role(&self, user_id: UserId, role: UserRole) -> MarketResult<()> {
        sqlx::query("UPDATE users SET role = $2, updated_at = $3 WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .bind(role.id())
            .bind(Utc::now())
            .execute(self.pool())
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct MentorRow {
    mentor_id: Uuid,
    user_id: Uuid,
    subjects: Vec<String>,
    bio: String,
    experience: Option<String>,
    education: Option<String>,
    hourly_rate: Option<f64>,
    availability: i16,
    rating: f64,
    total_ratings: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_name: String,
    user_email: String,
    user_college: String,
    user_year: String,
    user_phone: String,
}

impl MentorRow {
    fn into_record(self) -> MentorRecord {
        MentorRecord {
            profile: MentorProfile {
                mentor_id: MentorId::from_uuid(self.mentor_id),
                user_id: UserId::from_uuid(self.user_id),
                subjects: self.subjects,
                bio: self.bio,
                experience: self.experience,
                education: self.education,
                hourly_rate: self.hourly_rate,
                availability: Availability::from_id(self.availability),
                rating: self.rating,
                total_ratings: self.total_ratings,
                created_at: self.created_at,
                updated_at: self.updated_at,
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

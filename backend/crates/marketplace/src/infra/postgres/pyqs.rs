//! PYQ repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use kernel::id::{PyqId, UserId};

use crate::domain::pyq::{ExamType, Pyq};
use crate::domain::query::{Page, PyqFilter};
use crate::domain::repository::{PyqRecord, PyqRepository};
use crate::error::MarketResult;

use super::{PgMarketRepository, contains_pattern, user_public};

const PYQ_SELECT: &str = r#"
    SELECT
        p.pyq_id, p.course, p.subject, p.semester, p.exam_type,
        p.year, p.file_path, p.uploaded_by, p.downloads, p.college,
        p.created_at, p.updated_at,
        u.name AS uploader_name, u.email AS uploader_email,
        u.college AS uploader_college, u.year AS uploader_year,
        u.phone AS uploader_phone
    FROM pyqs p
    JOIN users u ON u.user_id = p.uploaded_by
"#;

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &PyqFilter) {
    qb.push(" WHERE TRUE");
    if let Some(course) = &filter.course {
        qb.push(" AND p.course ILIKE ")
            .push_bind(contains_pattern(course));
    }
    if let Some(subject) = &filter.subject {
        qb.push(" AND p.subject ILIKE ")
            .push_bind(contains_pattern(subject));
    }
    if let Some(semester) = &filter.semester {
        qb.push(" AND p.semester = ").push_bind(semester.clone());
    }
    if let Some(year) = filter.year {
        qb.push(" AND p.year = ").push_bind(year);
    }
    if let Some(exam_type) = filter.exam_type {
        qb.push(" AND p.exam_type = ").push_bind(exam_type.id());
    }
}

impl PyqRepository for PgMarketRepository {
    async fn create(&self, pyq: &Pyq) -> MarketResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pyqs (
                pyq_id, course, subject, semester, exam_type, year,
                file_path, uploaded_by, downloads, college,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(pyq.pyq_id.as_uuid())
        .bind(&pyq.course)
        .bind(&pyq.subject)
        .bind(&pyq.semester)
        .bind(pyq.exam_type.id())
        .bind(pyq.year)
        .bind(&pyq.file_path)
        .bind(pyq.uploaded_by.as_uuid())
        .bind(pyq.downloads)
        .bind(&pyq.college)
        .bind(pyq.created_at)
        .bind(pyq.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn find(&self, pyq_id: PyqId) -> MarketResult<Option<PyqRecord>> {
        let row = sqlx::query_as::<_, PyqRow>(&format!("{} WHERE p.pyq_id = $1", PYQ_SELECT))
            .bind(pyq_id.as_uuid())
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|r| r.into_record()))
    }

    async fn list(&self, filter: &PyqFilter, page: Page) -> MarketResult<(Vec<PyqRecord>, u64)> {
        let mut qb = QueryBuilder::new(PYQ_SELECT);
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY p.year DESC, p.created_at DESC LIMIT ")
            .push_bind(page.limit as i64)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<PyqRow> = qb.build_query_as().fetch_all(self.pool()).await?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM pyqs p");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await?;

        Ok((
            rows.into_iter().map(PyqRow::into_record).collect(),
            total as u64,
        ))
    }

    async fn list_by_uploader(&self, user_id: UserId) -> MarketResult<Vec<PyqRecord>> {
        let rows = sqlx::query_as::<_, PyqRow>(&format!(
            "{} WHERE p.uploaded_by = $1 ORDER BY p.created_at DESC",
            PYQ_SELECT
        ))
        .bind(user_id.as_uuid())
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(PyqRow::into_record).collect())
    }

    async fn update(&self, pyq: &Pyq) -> MarketResult<()> {
        sqlx::query(
            r#"
            UPDATE pyqs SET
                course = $2,
                subject = $3,
                semester = $4,
                exam_type = $5,
                year = $6,
                file_path = $7,
                college = $8,
                updated_at = $9
            WHERE pyq_id = $1
            "#,
        )
        .bind(pyq.pyq_id.as_uuid())
        .bind(&pyq.course)
        .bind(&pyq.subject)
        .bind(&pyq.semester)
        .bind(pyq.exam_type.id())
        .bind(pyq.year)
        .bind(&pyq.file_path)
        .bind(&pyq.college)
        .bind(pyq.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn delete(&self, pyq_id: PyqId) -> MarketResult<()> {
        sqlx::query("DELETE FROM pyqs WHERE pyq_id = $1")
            .bind(pyq_id.as_uuid())
            .execute(self.pool())
            .await?;

        Ok(())
    }

    async fn increment_downloads(&self, pyq_id: PyqId) -> MarketResult<()> {
        sqlx::query("UPDATE pyqs SET downloads = downloads + 1 WHERE pyq_id = $1")
            .bind(pyq_id.as_uuid())
            .execute(self.pool())
            .await?;

        Ok(())
    }

    async fn user_college(&self, user_id: UserId) -> MarketResult<Option<String>> {
        let college =
            sqlx::query_scalar::<_, String>("SELECT college FROM users WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_optional(self.pool())
                .await?;

        Ok(college)
    }
}

#[derive(sqlx::FromRow)]
struct PyqRow {
    pyq_id: Uuid,
    course: String,
    subject: String,
    semester: String,
    exam_type: i16,
    year: i32,
    file_path: String,
    uploaded_by: Uuid,
    downloads: i32,
    college: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    uploader_name: String,
    uploader_email: String,
    uploader_college: String,
    uploader_year: String,
    uploader_phone: String,
}

impl PyqRow {
    fn into_record(self) -> PyqRecord {
        PyqRecord {
            pyq: Pyq {
                pyq_id: PyqId::from_uuid(self.pyq_id),
                course: self.course,
                subject: self.subject,
                semester: self.semester,
                exam_type: ExamType::from_id(self.exam_type),
                year: self.year,
                file_path: self.file_path,
                uploaded_by: UserId::from_uuid(self.uploaded_by),
                downloads: self.downloads,
                college: self.college,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            uploader: user_public(
                self.uploaded_by,
                self.uploader_name,
                self.uploader_email,
                self.uploader_college,
                self.uploader_year,
                self.uploader_phone,
            ),
        }
    }
}

//! PYQ service: CRUD plus the download counter.

use std::sync::Arc;

use chrono::Utc;
use kernel::actor::Actor;
use kernel::id::{PyqId, UserId};

use crate::domain::book::require_text;
use crate::domain::pyq::{ExamType, NewPyq, Pyq};
use crate::domain::query::{Page, Paginated, PyqFilter};
use crate::domain::repository::{PyqRecord, PyqRepository};
use crate::error::{MarketError, MarketResult};

/// Upload input before the uploader's college is stamped on.
#[derive(Debug, Clone)]
pub struct PyqInput {
    pub course: String,
    pub subject: String,
    pub semester: String,
    pub exam_type: ExamType,
    pub year: i32,
    pub file_path: String,
}

/// Partial update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct PyqUpdate {
    pub course: Option<String>,
    pub subject: Option<String>,
    pub semester: Option<String>,
    pub exam_type: Option<ExamType>,
    pub year: Option<i32>,
    pub file_path: Option<String>,
}

pub struct PyqService<R>
where
    R: PyqRepository,
{
    repo: Arc<R>,
}

impl<R> PyqService<R>
where
    R: PyqRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, actor: &Actor, input: PyqInput) -> MarketResult<PyqRecord> {
        let college = self
            .repo
            .user_college(actor.user_id)
            .await?
            .unwrap_or_default();

        let pyq = Pyq::new(
            actor.user_id,
            NewPyq {
                course: input.course,
                subject: input.subject,
                semester: input.semester,
                exam_type: input.exam_type,
                year: input.year,
                file_path: input.file_path,
                college,
            },
        )?;
        self.repo.create(&pyq).await?;

        tracing::info!(pyq_id = %pyq.pyq_id, uploader = %actor.user_id, "PYQ uploaded");

        self.reload(pyq.pyq_id).await
    }

    pub async fn get(&self, pyq_id: PyqId) -> MarketResult<PyqRecord> {
        self.repo.find(pyq_id).await?.ok_or(MarketError::PyqNotFound)
    }

    pub async fn list(&self, filter: PyqFilter, page: Page) -> MarketResult<Paginated<PyqRecord>> {
        let (items, total) = self.repo.list(&filter, page).await?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn list_by_uploader(&self, user_id: UserId) -> MarketResult<Vec<PyqRecord>> {
        self.repo.list_by_uploader(user_id).await
    }

    pub async fn update(
        &self,
        actor: &Actor,
        pyq_id: PyqId,
        update: PyqUpdate,
    ) -> MarketResult<PyqRecord> {
        let mut pyq = self.get(pyq_id).await?.pyq;

        if !actor.can_mutate(pyq.uploaded_by) {
            return Err(MarketError::NotAuthorized);
        }

        apply_update(&mut pyq, update)?;
        self.repo.update(&pyq).await?;

        self.reload(pyq_id).await
    }

    pub async fn delete(&self, actor: &Actor, pyq_id: PyqId) -> MarketResult<()> {
        let pyq = self.get(pyq_id).await?.pyq;

        if !actor.can_mutate(pyq.uploaded_by) {
            return Err(MarketError::NotAuthorized);
        }

        self.repo.delete(pyq_id).await?;

        tracing::info!(pyq_id = %pyq_id, "PYQ removed");
        Ok(())
    }

    /// Bump the download counter and hand back the record with the
    /// stored file path so the handler can stream it.
    pub async fn download(&self, pyq_id: PyqId) -> MarketResult<PyqRecord> {
        let mut record = self.get(pyq_id).await?;

        self.repo.increment_downloads(pyq_id).await?;
        record.pyq.downloads += 1;

        Ok(record)
    }

    async fn reload(&self, pyq_id: PyqId) -> MarketResult<PyqRecord> {
        self.repo
            .find(pyq_id)
            .await?
            .ok_or_else(|| MarketError::Internal("PYQ vanished during operation".into()))
    }
}

fn apply_update(pyq: &mut Pyq, update: PyqUpdate) -> MarketResult<()> {
    if let Some(course) = update.course {
        require_text("course", &course)?;
        pyq.course = course;
    }
    if let Some(subject) = update.subject {
        require_text("subject", &subject)?;
        pyq.subject = subject;
    }
    if let Some(semester) = update.semester {
        require_text("semester", &semester)?;
        pyq.semester = semester;
    }
    if let Some(exam_type) = update.exam_type {
        pyq.exam_type = exam_type;
    }
    if let Some(year) = update.year {
        if year <= 0 {
            return Err(MarketError::Validation("year must be positive".into()));
        }
        pyq.year = year;
    }
    if let Some(file_path) = update.file_path {
        pyq.file_path = file_path;
    }
    pyq.updated_at = Utc::now();
    Ok(())
}

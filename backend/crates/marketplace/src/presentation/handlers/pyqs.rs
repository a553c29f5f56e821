//! PYQ endpoints: CRUD plus the counted download.

use std::sync::Arc;

use axum::Extension;
use axum::extract::{Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use kernel::actor::Actor;
use kernel::id::{PyqId, UserId};
use platform::upload::{UploadKind, UploadStore, content_type_for};

use crate::application::{PyqInput, PyqService, PyqUpdate};
use crate::domain::query::{Page, PyqFilter, non_empty};
use crate::domain::repository::PyqRepository;
use crate::error::{MarketError, MarketResult};
use crate::presentation::dto::{
    CreatePyqRequest, ListResponse, MessageResponse, PyqResponse, UpdatePyqRequest,
    parse_exam_type,
};
use crate::presentation::extract::collect_body;

pub struct PyqsState<R>
where
    R: PyqRepository,
{
    pub service: Arc<PyqService<R>>,
    pub uploads: Arc<UploadStore>,
}

impl<R> Clone for PyqsState<R>
where
    R: PyqRepository,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            uploads: Arc::clone(&self.uploads),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyqListQuery {
    page: Option<String>,
    limit: Option<String>,
    course: Option<String>,
    subject: Option<String>,
    semester: Option<String>,
    year: Option<String>,
    exam_type: Option<String>,
}

fn pyq_id_from(raw: &str) -> MarketResult<PyqId> {
    raw.parse().map_err(|_| MarketError::PyqNotFound)
}

pub async fn list_pyqs<R>(
    State(state): State<PyqsState<R>>,
    Query(query): Query<PyqListQuery>,
) -> MarketResult<Json<ListResponse<PyqResponse>>>
where
    R: PyqRepository,
{
    let page = Page::from_params(query.page.as_deref(), query.limit.as_deref());
    let filter = PyqFilter {
        course: non_empty(query.course),
        subject: non_empty(query.subject),
        semester: non_empty(query.semester),
        // Malformed filter values behave as if the parameter were absent
        year: query.year.as_deref().and_then(|y| y.trim().parse().ok()),
        exam_type: query
            .exam_type
            .as_deref()
            .and_then(crate::domain::pyq::ExamType::try_from_code),
    };

    let result = state.service.list(filter, page).await?;
    Ok(Json(ListResponse::from_page(result, |r| PyqResponse::from(r))))
}

pub async fn get_pyq<R>(
    State(state): State<PyqsState<R>>,
    Path(id): Path<String>,
) -> MarketResult<Json<PyqResponse>>
where
    R: PyqRepository,
{
    let record = state.service.get(pyq_id_from(&id)?).await?;
    Ok(Json(PyqResponse::from(&record)))
}

pub async fn list_pyqs_by_user<R>(
    State(state): State<PyqsState<R>>,
    Path(user_id): Path<String>,
) -> MarketResult<Json<Vec<PyqResponse>>>
where
    R: PyqRepository,
{
    let user_id: UserId = user_id
        .parse()
        .map_err(|_| MarketError::Validation("Invalid user id".into()))?;
    let records = state.service.list_by_uploader(user_id).await?;
    Ok(Json(records.iter().map(PyqResponse::from).collect()))
}

pub async fn create_pyq<R>(
    State(state): State<PyqsState<R>>,
    Extension(actor): Extension<Actor>,
    req: Request,
) -> MarketResult<(StatusCode, Json<PyqResponse>)>
where
    R: PyqRepository,
{
    let body = collect_body(&state.uploads, req).await?;
    let input: CreatePyqRequest = body.parse()?;

    let file_path = body
        .upload(UploadKind::PyqFile)
        .ok_or_else(|| MarketError::Validation("Please upload a file".into()))?
        .to_string();

    let record = state
        .service
        .create(
            &actor,
            PyqInput {
                course: input.course,
                subject: input.subject,
                semester: input.semester,
                exam_type: parse_exam_type(&input.exam_type)?,
                year: input.year,
                file_path,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(PyqResponse::from(&record))))
}

pub async fn update_pyq<R>(
    State(state): State<PyqsState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    req: Request,
) -> MarketResult<Json<PyqResponse>>
where
    R: PyqRepository,
{
    let pyq_id = pyq_id_from(&id)?;
    let body = collect_body(&state.uploads, req).await?;
    let input: UpdatePyqRequest = body.parse()?;

    let update = PyqUpdate {
        course: input.course,
        subject: input.subject,
        semester: input.semester,
        exam_type: input.exam_type.as_deref().map(parse_exam_type).transpose()?,
        year: input.year,
        file_path: body.upload(UploadKind::PyqFile).map(str::to_string),
    };

    let record = state.service.update(&actor, pyq_id, update).await?;
    Ok(Json(PyqResponse::from(&record)))
}

pub async fn delete_pyq<R>(
    State(state): State<PyqsState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> MarketResult<Json<MessageResponse>>
where
    R: PyqRepository,
{
    state.service.delete(&actor, pyq_id_from(&id)?).await?;
    Ok(Json(MessageResponse {
        message: "PYQ removed",
    }))
}

/// Stream the stored file back and count the download.
pub async fn download_pyq<R>(
    State(state): State<PyqsState<R>>,
    Path(id): Path<String>,
) -> MarketResult<Response>
where
    R: PyqRepository,
{
    let record = state.service.download(pyq_id_from(&id)?).await?;
    let path = &record.pyq.file_path;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|_| MarketError::Internal(format!("Stored file is missing: {}", path)))?;

    let file_name = path.rsplit('/').next().unwrap_or("download");
    let headers = [
        (header::CONTENT_TYPE, content_type_for(path).to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
    ];

    Ok((headers, bytes).into_response())
}

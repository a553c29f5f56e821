//! Mentor endpoints: profile lifecycle and rating.

use std::sync::Arc;

use axum::Extension;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use kernel::actor::Actor;
use kernel::id::MentorId;

use crate::application::{MentorService, MentorUpdate};
use crate::domain::mentor::{Availability, NewMentorProfile};
use crate::domain::query::{MentorFilter, Page, non_empty};
use crate::domain::repository::MentorRepository;
use crate::error::{MarketError, MarketResult};
use crate::presentation::dto::{
    CreateMentorRequest, ListResponse, MentorResponse, MessageResponse, RateMentorRequest,
    UpdateMentorRequest, parse_availability,
};
use crate::presentation::extract::collect_json_body;

pub struct MentorsState<R>
where
    R: MentorRepository,
{
    pub service: Arc<MentorService<R>>,
}

impl<R> Clone for MentorsState<R>
where
    R: MentorRepository,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MentorListQuery {
    page: Option<String>,
    limit: Option<String>,
    subject: Option<String>,
    search: Option<String>,
}

fn mentor_id_from(raw: &str) -> MarketResult<MentorId> {
    raw.parse().map_err(|_| MarketError::MentorNotFound)
}

pub async fn list_mentors<R>(
    State(state): State<MentorsState<R>>,
    Query(query): Query<MentorListQuery>,
) -> MarketResult<Json<ListResponse<MentorResponse>>>
where
    R: MentorRepository,
{
    let page = Page::from_params(query.page.as_deref(), query.limit.as_deref());
    let filter = MentorFilter {
        subject: non_empty(query.subject),
        search: non_empty(query.search),
    };

    let result = state.service.list(filter, page).await?;
    Ok(Json(ListResponse::from_page(result, |r| MentorResponse::from(r))))
}

pub async fn get_mentor<R>(
    State(state): State<MentorsState<R>>,
    Path(id): Path<String>,
) -> MarketResult<Json<MentorResponse>>
where
    R: MentorRepository,
{
    let record = state.service.get(mentor_id_from(&id)?).await?;
    Ok(Json(MentorResponse::from(&record)))
}

pub async fn create_mentor<R>(
    State(state): State<MentorsState<R>>,
    Extension(actor): Extension<Actor>,
    req: Request,
) -> MarketResult<(StatusCode, Json<MentorResponse>)>
where
    R: MentorRepository,
{
    let input: CreateMentorRequest = collect_json_body(req).await?.parse()?;

    let profile = NewMentorProfile {
        subjects: input.subjects,
        bio: input.bio,
        experience: input.experience,
        education: input.education,
        hourly_rate: input.hourly_rate,
        availability: match input.availability.as_deref() {
            Some(code) => parse_availability(code)?,
            None => Availability::default(),
        },
    };

    let record = state.service.create(&actor, profile).await?;
    Ok((StatusCode::CREATED, Json(MentorResponse::from(&record))))
}

pub async fn update_mentor<R>(
    State(state): State<MentorsState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    req: Request,
) -> MarketResult<Json<MentorResponse>>
where
    R: MentorRepository,
{
    let mentor_id = mentor_id_from(&id)?;
    let input: UpdateMentorRequest = collect_json_body(req).await?.parse()?;

    let update = MentorUpdate {
        subjects: input.subjects,
        bio: input.bio,
        experience: input.experience,
        education: input.education,
        hourly_rate: input.hourly_rate,
        availability: input
            .availability
            .as_deref()
            .map(parse_availability)
            .transpose()?,
    };

    let record = state.service.update(&actor, mentor_id, update).await?;
    Ok(Json(MentorResponse::from(&record)))
}

pub async fn delete_mentor<R>(
    State(state): State<MentorsState<R>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> MarketResult<Json<MessageResponse>>
where
    R: MentorRepository,
{
    state.service.delete(&actor, mentor_id_from(&id)?).await?;
    Ok(Json(MessageResponse {
        message: "Mentor profile removed",
    }))
}

pub async fn rate_mentor<R>(
    State(state): State<MentorsState<R>>,
    Extension(_actor): Extension<Actor>,
    Path(id): Path<String>,
    req: Request,
) -> MarketResult<Json<MentorResponse>>
where
    R: MentorRepository,
{
    let mentor_id = mentor_id_from(&id)?;
    let input: RateMentorRequest = collect_json_body(req).await?.parse()?;

    let record = state.service.rate(mentor_id, input.rating).await?;
    Ok(Json(MentorResponse::from(&record)))
}

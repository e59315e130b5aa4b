// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the portfolio API.

use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::gate::SubmissionGate;
use crate::limiter::SubmissionThrottle;
use crate::mailer::Mailer;
use crate::models::{
    ContactAck, ContactListQuery, ContactListResponse, ContactRequest, ContactStatusUpdate,
    ContactSubmission, NewProject, NewSkill, Pagination, Project, ProjectListQuery,
    ProjectListResponse, ProjectPatch, Skill, SkillListQuery, SkillListResponse, SkillPatch,
};
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub gate: SubmissionGate,
    pub throttle: SubmissionThrottle,
    pub mailer: Mailer,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Simple acknowledgment body.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "portfolio-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ------------------------------------------------------------------
// Contact
// ------------------------------------------------------------------

/// Accept or reject a contact-form submission.
///
/// The gate runs the full validation chain; on success the submission is
/// persisted first and the notification mail is sent second, so a failed
/// send leaves the stored record in place.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<ContactRequest>,
) -> Result<impl IntoResponse> {
    let client = addr.ip();
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let now_ms = Utc::now().timestamp_millis();

    state
        .gate
        .evaluate(&request, client, &state.throttle, now_ms)
        .await?;

    let form_duration_ms = request
        .form_start_time
        .map(|started| now_ms - started)
        .unwrap_or(0);

    let submission = ContactSubmission::new(
        &request.name,
        &request.subject,
        &request.message,
        client.to_string(),
        user_agent,
        form_duration_ms,
    );

    state.db.create_contact(&submission).await?;

    state
        .mailer
        .send_contact_notification(&submission)
        .await
        .map_err(AppError::Mail)?;

    info!(id = %submission.id, %client, "Contact submission accepted");

    Ok((
        StatusCode::CREATED,
        Json(ContactAck {
            message: "Message sent successfully! I'll get back to you soon.".to_string(),
            id: submission.id,
        }),
    ))
}

/// List contact submissions, newest first.
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<ContactListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(state.config.default_page_size).max(1);

    let (contacts, total) = state.db.list_contacts(query.status, page, limit).await?;

    Ok(Json(ContactListResponse {
        contacts,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// Advance a contact submission through the read/replied lifecycle.
pub async fn update_contact_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<ContactStatusUpdate>,
) -> Result<Json<ContactSubmission>> {
    let status = update.status.parse().map_err(AppError::Validation)?;
    let contact = state.db.update_contact_status(&id, status).await?;
    Ok(Json(contact))
}

// ------------------------------------------------------------------
// Projects
// ------------------------------------------------------------------

/// List projects by manual order then recency.
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<ProjectListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(state.config.default_page_size).max(1);

    let (projects, total) = state
        .db
        .list_projects(query.category, query.featured, page, limit)
        .await?;

    Ok(Json(ProjectListResponse {
        projects,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// Get a project by id.
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Project>> {
    Ok(Json(state.db.get_project(&id).await?))
}

/// Create a project.
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewProject>,
) -> Result<impl IntoResponse> {
    payload.validate().map_err(AppError::Validation)?;

    let project = payload.into_project();
    state.db.create_project(&project).await?;

    info!(id = %project.id, title = %project.title, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// Update a project.
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ProjectPatch>,
) -> Result<Json<Project>> {
    patch.validate().map_err(AppError::Validation)?;

    let patch = serde_json::to_value(&patch)?;
    let project = state.db.update_project(&id, patch).await?;
    Ok(Json(project))
}

/// Delete a project.
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>> {
    state.db.delete_project(&id).await?;
    info!(%id, "Project deleted");
    Ok(Json(MessageBody {
        message: "Project deleted successfully",
    }))
}

// ------------------------------------------------------------------
// Skills
// ------------------------------------------------------------------

/// List skills by manual order then recency.
pub async fn list_skills(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SkillListQuery>,
) -> Result<Json<SkillListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(state.config.default_page_size).max(1);

    let (skills, total) = state.db.list_skills(query.category, page, limit).await?;

    Ok(Json(SkillListResponse {
        skills,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// Get a skill by id.
pub async fn get_skill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Skill>> {
    Ok(Json(state.db.get_skill(&id).await?))
}

/// Create a skill.
pub async fn create_skill(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewSkill>,
) -> Result<impl IntoResponse> {
    payload.validate().map_err(AppError::Validation)?;

    let skill = payload.into_skill();
    state.db.create_skill(&skill).await?;

    info!(id = %skill.id, name = %skill.name, "Skill created");
    Ok((StatusCode::CREATED, Json(skill)))
}

/// Update a skill.
pub async fn update_skill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<SkillPatch>,
) -> Result<Json<Skill>> {
    patch.validate().map_err(AppError::Validation)?;

    let patch = serde_json::to_value(&patch)?;
    let skill = state.db.update_skill(&id, patch).await?;
    Ok(Json(skill))
}

/// Delete a skill.
pub async fn delete_skill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>> {
    state.db.delete_skill(&id).await?;
    info!(%id, "Skill deleted");
    Ok(Json(MessageBody {
        message: "Skill deleted successfully",
    }))
}

//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Reads take the registry's read lock; every mutation (duplicate scan or
//! integrity check, then insert/replace/remove) runs under a single write lock.

use super::{
    AppState,
    extract::{ApiJson, ApiPath, ApiQuery},
    types::{AverageQuery, DeleteResponse, GradeFilter, HealthResponse, StatusResponse},
};
use crate::error::AppError;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use gradebook_core::{
    EntityKind, Grade, GradeAverage, IdPolicy, Person, RecordId, Roster, Subject,
};

type ApiResult<T> = Result<T, AppError>;

/// Warn about an update whose record id differs from the addressed id.
///
/// Under `IdPolicy::Strict` the registry rejects it; otherwise it goes
/// through and only this log line records it.
fn warn_on_id_mismatch(
    policy: IdPolicy,
    kind: EntityKind,
    path_id: RecordId,
    record_id: RecordId,
) {
    if policy == IdPolicy::Lenient && path_id != record_id {
        tracing::warn!(
            entity = kind.name(),
            path_id,
            record_id,
            "Update record id differs from path id; replacing anyway"
        );
    }
}

// =============================================================================
// HEALTH / STATUS / ROSTER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Record counts per collection.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.registry.read().await;
    Json(StatusResponse::new(registry.summary(), registry.id_policy()))
}

/// Snapshot of every collection.
pub async fn roster_handler(State(state): State<AppState>) -> Json<Roster> {
    let registry = state.registry.read().await;
    Json(registry.to_roster())
}

// =============================================================================
// STUDENTS
// =============================================================================

pub async fn list_students(State(state): State<AppState>) -> Json<Vec<Person>> {
    let registry = state.registry.read().await;
    Json(registry.list_students().to_vec())
}

pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(student): ApiJson<Person>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    let created = state.registry.write().await.create_student(student)?;
    tracing::info!(entity = "student", id = created.id, "Record created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecordId>,
    ApiJson(student): ApiJson<Person>,
) -> ApiResult<Json<Person>> {
    let mut registry = state.registry.write().await;
    warn_on_id_mismatch(registry.id_policy(), EntityKind::Student, id, student.id);
    let updated = registry.update_student(id, student)?;
    tracing::info!(entity = "student", id, "Record updated");
    Ok(Json(updated))
}

pub async fn delete_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<Json<DeleteResponse<Person>>> {
    let removed = state.registry.write().await.delete_student(id)?;
    tracing::info!(entity = "student", id, "Record deleted");
    Ok(Json(DeleteResponse::new("student", removed)))
}

// =============================================================================
// TEACHERS
// =============================================================================

pub async fn list_teachers(State(state): State<AppState>) -> Json<Vec<Person>> {
    let registry = state.registry.read().await;
    Json(registry.list_teachers().to_vec())
}

pub async fn create_teacher(
    State(state): State<AppState>,
    ApiJson(teacher): ApiJson<Person>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    let created = state.registry.write().await.create_teacher(teacher)?;
    tracing::info!(entity = "teacher", id = created.id, "Record created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_teacher(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecordId>,
    ApiJson(teacher): ApiJson<Person>,
) -> ApiResult<Json<Person>> {
    let mut registry = state.registry.write().await;
    warn_on_id_mismatch(registry.id_policy(), EntityKind::Teacher, id, teacher.id);
    let updated = registry.update_teacher(id, teacher)?;
    tracing::info!(entity = "teacher", id, "Record updated");
    Ok(Json(updated))
}

pub async fn delete_teacher(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<Json<DeleteResponse<Person>>> {
    let removed = state.registry.write().await.delete_teacher(id)?;
    tracing::info!(entity = "teacher", id, "Record deleted");
    Ok(Json(DeleteResponse::new("teacher", removed)))
}

// =============================================================================
// SUBJECTS
// =============================================================================

pub async fn list_subjects(State(state): State<AppState>) -> Json<Vec<Subject>> {
    let registry = state.registry.read().await;
    Json(registry.list_subjects().to_vec())
}

pub async fn create_subject(
    State(state): State<AppState>,
    ApiJson(subject): ApiJson<Subject>,
) -> ApiResult<(StatusCode, Json<Subject>)> {
    let created = state.registry.write().await.create_subject(subject)?;
    tracing::info!(entity = "subject", id = created.id, "Record created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_subject(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecordId>,
    ApiJson(subject): ApiJson<Subject>,
) -> ApiResult<Json<Subject>> {
    let mut registry = state.registry.write().await;
    warn_on_id_mismatch(registry.id_policy(), EntityKind::Subject, id, subject.id);
    let updated = registry.update_subject(id, subject)?;
    tracing::info!(entity = "subject", id, "Record updated");
    Ok(Json(updated))
}

pub async fn delete_subject(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<Json<DeleteResponse<Subject>>> {
    let removed = state.registry.write().await.delete_subject(id)?;
    tracing::info!(entity = "subject", id, "Record deleted");
    Ok(Json(DeleteResponse::new("subject", removed)))
}

// =============================================================================
// GRADES
// =============================================================================

/// Record a grade. Its student, teacher and subject must exist.
pub async fn create_grade(
    State(state): State<AppState>,
    ApiJson(grade): ApiJson<Grade>,
) -> ApiResult<(StatusCode, Json<Grade>)> {
    let created = state.registry.write().await.create_grade(grade)?;
    tracing::info!(
        entity = "grade",
        student_id = created.student_id,
        teacher_id = created.teacher_id,
        subject_id = created.subject_id,
        "Record created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// All grades, optionally filtered by `student_id` and/or `subject_id`.
pub async fn list_grades(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<GradeFilter>,
) -> Json<Vec<Grade>> {
    let registry = state.registry.read().await;
    Json(registry.grades_matching(filter.student_id, filter.subject_id))
}

/// Grades of one student; empty when the student has none.
pub async fn student_grades(
    State(state): State<AppState>,
    ApiPath(student_id): ApiPath<RecordId>,
) -> Json<Vec<Grade>> {
    let registry = state.registry.read().await;
    Json(registry.grades_for_student(student_id))
}

/// Average of a student's grades in a subject.
pub async fn average_grade(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AverageQuery>,
) -> ApiResult<Json<GradeAverage>> {
    let registry = state.registry.read().await;
    let average = registry.average_grade(query.student_id, query.subject_id)?;
    Ok(Json(average))
}

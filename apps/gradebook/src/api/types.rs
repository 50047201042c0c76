//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API that are not
//! core records. Students, teachers, subjects and grades travel as the core
//! `Person`, `Subject` and `Grade` types directly.

use gradebook_core::{IdPolicy, RecordId, RegistrySummary};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Registry status: record counts and the active id policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub students: usize,
    pub teachers: usize,
    pub subjects: usize,
    pub grades: usize,
    pub id_policy: IdPolicy,
}

impl StatusResponse {
    pub fn new(summary: RegistrySummary, id_policy: IdPolicy) -> Self {
        Self {
            students: summary.students,
            teachers: summary.teachers,
            subjects: summary.subjects,
            grades: summary.grades,
            id_policy,
        }
    }
}

// =============================================================================
// DELETE RESPONSE
// =============================================================================

/// Confirmation of a delete, carrying the removed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse<T> {
    pub message: String,
    pub record: T,
}

impl<T> DeleteResponse<T> {
    pub fn new(entity: &str, record: T) -> Self {
        Self {
            message: format!("{} deleted", entity),
            record,
        }
    }
}

// =============================================================================
// GRADE QUERIES
// =============================================================================

/// Optional filters for `GET /grades`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GradeFilter {
    pub student_id: Option<RecordId>,
    pub subject_id: Option<RecordId>,
}

/// Required parameters for `GET /grades/average`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AverageQuery {
    pub student_id: RecordId,
    pub subject_id: RecordId,
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error tag, e.g. `duplicate_id` or `missing_student`.
    pub kind: String,
}

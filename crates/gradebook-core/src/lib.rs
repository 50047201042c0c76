//! # gradebook-core
//!
//! The registry engine for Gradebook - THE LOGIC.
//!
//! Four ordered in-memory collections (students, teachers, subjects, grades)
//! behind a CRUD façade that enforces id uniqueness on create, existence on
//! update/delete, and referential integrity when a grade is recorded.
//!
//! ## Layout
//!
//! - `store` - ordered collection of records of one kind
//! - `integrity` - grade reference checks
//! - `query` - grade filters and averages
//! - `registry` - the CRUD façade owning the four stores
//! - `roster` - serializable snapshot used for seeding and export
//!
//! ## Architectural Constraints
//!
//! - Synchronous and single-threaded; callers that share a `Registry` across
//!   tasks must serialize mutations themselves (one lock around the registry)
//! - No I/O, no logging, no global state

// =============================================================================
// MODULES
// =============================================================================

pub mod integrity;
pub mod query;
pub mod registry;
pub mod roster;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use types::{EntityKind, Grade, GradebookError, Person, Record, RecordId, Subject};

pub use integrity::validate_grade;
pub use query::{GradeAverage, average_grade, grades_for_student, grades_matching};
pub use registry::{IdPolicy, Registry, RegistrySummary};
pub use roster::Roster;
pub use store::EntityStore;

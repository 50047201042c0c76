//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use gradebook::{AppError, ServerConfig, api};
use gradebook_core::{Registry, RegistrySummary, Roster};
use std::path::{Path, PathBuf};

/// Maximum roster file size (50 MB).
const MAX_ROSTER_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Resolve a roster path, rejecting anything that is not a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, AppError> {
    let canonical = path.canonicalize().map_err(|e| {
        AppError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(AppError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Read and parse a roster JSON file.
pub fn load_roster(path: &Path) -> Result<Roster, AppError> {
    let validated = validate_file_path(path)?;

    let metadata = std::fs::metadata(&validated)
        .map_err(|e| AppError::Io(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_ROSTER_FILE_SIZE {
        return Err(AppError::Serialization(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_ROSTER_FILE_SIZE
        )));
    }

    let contents = std::fs::read(&validated)
        .map_err(|e| AppError::Io(format!("Read file: {}", e)))?;
    serde_json::from_slice(&contents)
        .map_err(|e| AppError::Serialization(format!("Invalid roster JSON: {}", e)))
}

/// Restore a registry from a roster file under the configured id policy.
///
/// Exported snapshots may carry grades of since-deleted records; they are
/// kept and reported with a warning.
fn load_registry(config: &ServerConfig, path: &Path) -> Result<Registry, AppError> {
    let roster = load_roster(path)?;
    tracing::info!(
        path = %path.display(),
        records = roster.record_count(),
        "Loading roster"
    );
    let registry = Registry::restore(roster, config.id_policy())?;
    let orphaned = registry.orphaned_grades();
    if orphaned > 0 {
        tracing::warn!(orphaned, "Roster holds grades of unregistered records");
    }
    Ok(registry)
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// CLI flags that override the loaded configuration.
#[derive(Debug, Default)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub seed: Option<PathBuf>,
    pub strict_ids: bool,
}

/// Start the HTTP server.
pub async fn cmd_server(
    mut config: ServerConfig,
    overrides: ServerOverrides,
) -> Result<(), AppError> {
    if let Some(host) = overrides.host {
        config.host = host;
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if overrides.seed.is_some() {
        config.seed = overrides.seed;
    }
    if overrides.strict_ids {
        config.strict_update_ids = true;
    }

    let registry = match &config.seed {
        Some(seed) => load_registry(&config, seed)?,
        None => Registry::with_id_policy(config.id_policy()),
    };
    let summary = registry.summary();

    println!("Gradebook Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.host);
    println!("  Port:       {}", config.port);
    println!("  Rate limit: {} req/s", config.rate_limit);
    println!("  Id policy:  {:?}", config.id_policy());
    if let Some(seed) = &config.seed {
        println!("  Seed:       {}", seed.display());
    }
    println!();
    println!(
        "Loaded: {} students, {} teachers, {} subjects, {} grades",
        summary.students, summary.teachers, summary.subjects, summary.grades
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(config, registry).await
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Load a roster and print what it contains.
///
/// A roster that breaks uniqueness or referential integrity fails with the
/// same error the server would return for the offending record.
pub fn cmd_check(config: &ServerConfig, file: &Path, json_mode: bool) -> Result<(), AppError> {
    let outcome = load_roster(file).and_then(|roster| {
        Registry::from_roster(roster, config.id_policy())
            .map(|registry| registry.summary())
            .map_err(AppError::from)
    });

    if json_mode {
        print_json(&check_report(file, &outcome));
    }
    let summary = outcome?;
    if json_mode {
        return Ok(());
    }

    println!("Gradebook Roster Check");
    println!("======================");
    println!("File: {}", file.display());
    println!();
    println!("Students: {}", summary.students);
    println!("Teachers: {}", summary.teachers);
    println!("Subjects: {}", summary.subjects);
    println!("Grades:   {}", summary.grades);
    println!();
    println!("Roster is valid");

    Ok(())
}

/// JSON document printed by `check --json-mode`, for valid and invalid rosters.
fn check_report(
    file: &Path,
    outcome: &Result<RegistrySummary, AppError>,
) -> serde_json::Value {
    match outcome {
        Ok(summary) => serde_json::json!({
            "file": file.to_string_lossy(),
            "valid": true,
            "students": summary.students,
            "teachers": summary.teachers,
            "subjects": summary.subjects,
            "grades": summary.grades
        }),
        Err(e) => serde_json::json!({
            "file": file.to_string_lossy(),
            "valid": false,
            "error": e.to_string(),
            "kind": e.kind_tag()
        }),
    }
}

// =============================================================================
// AVERAGE COMMAND
// =============================================================================

/// Print a student's average in a subject.
pub fn cmd_average(
    config: &ServerConfig,
    file: &Path,
    student: i64,
    subject: i64,
    json_mode: bool,
) -> Result<(), AppError> {
    let registry = load_registry(config, file)?;
    let average = registry.average_grade(student, subject)?;

    if json_mode {
        print_json(&serde_json::json!({
            "student_id": average.student_id,
            "subject_id": average.subject_id,
            "average": average.average,
            "count": average.count
        }));
        return Ok(());
    }

    println!(
        "Student {} in subject {}: {:.2} ({} grades)",
        average.student_id, average.subject_id, average.average, average.count
    );

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

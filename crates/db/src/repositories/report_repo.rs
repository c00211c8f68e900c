//! Repository for the `reports` table.

use sqlx::PgPool;

use crate::models::report::{CreateReport, Report};

const COLUMNS: &str = "id, title, description, report_type, generated_by, file_path, created_at";

/// Provides create and list operations for saved reports.
pub struct ReportRepo;

impl ReportRepo {
    /// Insert a new report record, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateReport) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports (title, description, report_type, generated_by, file_path)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.report_type)
            .bind(input.generated_by)
            .bind(&input.file_path)
            .fetch_one(pool)
            .await
    }

    /// List all saved reports, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports ORDER BY created_at DESC");
        sqlx::query_as::<_, Report>(&query).fetch_all(pool).await
    }
}

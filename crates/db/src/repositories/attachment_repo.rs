//! Repository for the `defect_attachments` table. Append-only.

use snagtrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::attachment::{CreateAttachment, DefectAttachment};

const COLUMNS: &str = "id, defect_id, file_name, file_path, uploaded_by, uploaded_at";

/// Provides append and list operations for attachment metadata.
pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Append an attachment record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAttachment,
    ) -> Result<DefectAttachment, sqlx::Error> {
        let query = format!(
            "INSERT INTO defect_attachments (defect_id, file_name, file_path, uploaded_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DefectAttachment>(&query)
            .bind(input.defect_id)
            .bind(&input.file_name)
            .bind(&input.file_path)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// List a defect's attachments, newest first.
    pub async fn list_for_defect(
        pool: &PgPool,
        defect_id: DbId,
    ) -> Result<Vec<DefectAttachment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM defect_attachments WHERE defect_id = $1 ORDER BY uploaded_at DESC"
        );
        sqlx::query_as::<_, DefectAttachment>(&query)
            .bind(defect_id)
            .fetch_all(pool)
            .await
    }
}

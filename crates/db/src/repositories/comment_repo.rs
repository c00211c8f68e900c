//! Repository for the `defect_comments` table. Append-only.

use snagtrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{CreateComment, DefectComment};

const COLUMNS: &str = "id, defect_id, author_id, text, created_at";

/// Provides append and list operations for defect comments. There is no
/// update or delete; comments are immutable once created.
pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<DefectComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO defect_comments (defect_id, author_id, text)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DefectComment>(&query)
            .bind(input.defect_id)
            .bind(input.author_id)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// List a defect's comments in creation order.
    pub async fn list_for_defect(
        pool: &PgPool,
        defect_id: DbId,
    ) -> Result<Vec<DefectComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM defect_comments WHERE defect_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, DefectComment>(&query)
            .bind(defect_id)
            .fetch_all(pool)
            .await
    }
}

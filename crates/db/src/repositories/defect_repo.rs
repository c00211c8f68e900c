//! Repository for the `defects` table, including the read-side aggregates.
//!
//! Aggregations are computed fresh per call with plain GROUP BY queries;
//! data volumes are small and nothing here is a hot path.

use snagtrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::defect::{AssignDefect, CreateDefect, Defect, UpdateDefect};
use crate::models::stats::{BucketCount, ProjectRollupRow};

const COLUMNS: &str = "id, title, description, project_id, status, priority, \
                       assigned_to, created_by, deadline, created_at, updated_at";

/// Statuses excluded from the open and overdue sets.
const TERMINAL: &str = "('closed', 'cancelled')";

/// Provides CRUD and aggregation queries for defects.
pub struct DefectRepo;

impl DefectRepo {
    /// Insert a new defect, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateDefect) -> Result<Defect, sqlx::Error> {
        let query = format!(
            "INSERT INTO defects
                 (title, description, project_id, status, priority, assigned_to, created_by, deadline)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Defect>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.project_id)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.assigned_to)
            .bind(input.created_by)
            .bind(input.deadline)
            .fetch_one(pool)
            .await
    }

    /// Find a defect by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Defect>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM defects WHERE id = $1");
        sqlx::query_as::<_, Defect>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a defect by ID, scoped to its assigned engineer.
    ///
    /// Returns `None` both for missing rows and for rows assigned to someone
    /// else, so the caller surfaces NotFound rather than leaking existence.
    pub async fn find_by_id_for_assignee(
        pool: &PgPool,
        id: DbId,
        assignee_id: DbId,
    ) -> Result<Option<Defect>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM defects WHERE id = $1 AND assigned_to = $2");
        sqlx::query_as::<_, Defect>(&query)
            .bind(id)
            .bind(assignee_id)
            .fetch_optional(pool)
            .await
    }

    /// List defects assigned to one engineer, newest first, optionally
    /// filtered by status.
    pub async fn list_for_assignee(
        pool: &PgPool,
        assignee_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Defect>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM defects
             WHERE assigned_to = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Defect>(&query)
            .bind(assignee_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// List all defects, newest first, optionally filtered by status and
    /// priority.
    pub async fn list_all(
        pool: &PgPool,
        status: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Vec<Defect>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM defects
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::TEXT IS NULL OR priority = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Defect>(&query)
            .bind(status)
            .bind(priority)
            .fetch_all(pool)
            .await
    }

    /// List all defects for one project, newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Defect>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM defects WHERE project_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Defect>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// The most recent defects across all projects.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Defect>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM defects ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, Defect>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update a defect. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDefect,
    ) -> Result<Option<Defect>, sqlx::Error> {
        let query = format!(
            "UPDATE defects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                assigned_to = COALESCE($6, assigned_to),
                deadline = COALESCE($7, deadline),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Defect>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.assigned_to)
            .bind(input.deadline)
            .fetch_optional(pool)
            .await
    }

    /// Manager assignment: sets assignee, deadline, and priority. The status
    /// is never touched by assignment.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        input: &AssignDefect,
    ) -> Result<Option<Defect>, sqlx::Error> {
        let query = format!(
            "UPDATE defects SET
                assigned_to = $2,
                deadline = $3,
                priority = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Defect>(&query)
            .bind(id)
            .bind(input.assigned_to)
            .bind(input.deadline)
            .bind(&input.priority)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Aggregations
    // -----------------------------------------------------------------------

    /// Defect counts grouped by status, optionally scoped to one assignee
    /// and/or one status.
    pub async fn counts_by_status(
        pool: &PgPool,
        assignee_id: Option<DbId>,
        status: Option<&str>,
    ) -> Result<Vec<BucketCount>, sqlx::Error> {
        sqlx::query_as::<_, BucketCount>(
            "SELECT status AS bucket, COUNT(*) AS count FROM defects
             WHERE ($1::BIGINT IS NULL OR assigned_to = $1)
               AND ($2::TEXT IS NULL OR status = $2)
             GROUP BY status",
        )
        .bind(assignee_id)
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// Defect counts grouped by priority, optionally scoped to one assignee.
    pub async fn counts_by_priority(
        pool: &PgPool,
        assignee_id: Option<DbId>,
    ) -> Result<Vec<BucketCount>, sqlx::Error> {
        sqlx::query_as::<_, BucketCount>(
            "SELECT priority AS bucket, COUNT(*) AS count FROM defects
             WHERE ($1::BIGINT IS NULL OR assigned_to = $1)
             GROUP BY priority",
        )
        .bind(assignee_id)
        .fetch_all(pool)
        .await
    }

    /// Defect counts grouped by project name.
    pub async fn counts_by_project(pool: &PgPool) -> Result<Vec<BucketCount>, sqlx::Error> {
        sqlx::query_as::<_, BucketCount>(
            "SELECT p.name AS bucket, COUNT(d.id) AS count
             FROM defects d JOIN projects p ON p.id = d.project_id
             GROUP BY p.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Overdue defects: past deadline and not in a terminal status,
    /// optionally scoped to one assignee.
    pub async fn list_overdue(
        pool: &PgPool,
        assignee_id: Option<DbId>,
    ) -> Result<Vec<Defect>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM defects
             WHERE deadline < CURRENT_DATE
               AND status NOT IN {TERMINAL}
               AND ($1::BIGINT IS NULL OR assigned_to = $1)
             ORDER BY deadline ASC"
        );
        sqlx::query_as::<_, Defect>(&query)
            .bind(assignee_id)
            .fetch_all(pool)
            .await
    }

    /// Total/open/closed counts per project, including projects with no
    /// defects.
    pub async fn project_rollups(pool: &PgPool) -> Result<Vec<ProjectRollupRow>, sqlx::Error> {
        let query = format!(
            "SELECT p.id AS project_id,
                    p.name AS project_name,
                    COUNT(d.id) AS total_defects,
                    COUNT(d.id) FILTER (WHERE d.status NOT IN {TERMINAL}) AS open_defects,
                    COUNT(d.id) FILTER (WHERE d.status = 'closed') AS closed_defects
             FROM projects p LEFT JOIN defects d ON d.project_id = p.id
             GROUP BY p.id, p.name
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, ProjectRollupRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Total/open/closed counts for a single project.
    pub async fn rollup_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<ProjectRollupRow>, sqlx::Error> {
        let query = format!(
            "SELECT p.id AS project_id,
                    p.name AS project_name,
                    COUNT(d.id) AS total_defects,
                    COUNT(d.id) FILTER (WHERE d.status NOT IN {TERMINAL}) AS open_defects,
                    COUNT(d.id) FILTER (WHERE d.status = 'closed') AS closed_defects
             FROM projects p LEFT JOIN defects d ON d.project_id = p.id
             WHERE p.id = $1
             GROUP BY p.id, p.name"
        );
        sqlx::query_as::<_, ProjectRollupRow>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }
}

//! Integration tests for the repository layer against a real database:
//! defect CRUD and partial updates, scoped queries, aggregate counts, the
//! append-only comment/audit trails, and unique constraint behaviour.

use chrono::Utc;
use snagtrack_core::audit::{outcomes, AuditEvent};
use sqlx::PgPool;

use snagtrack_db::models::comment::CreateComment;
use snagtrack_db::models::defect::{CreateDefect, UpdateDefect};
use snagtrack_db::models::project::CreateProject;
use snagtrack_db::models::user::CreateUser;
use snagtrack_db::repositories::{
    AuditLogRepo, CommentRepo, DefectRepo, ProjectRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str, role: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        phone: String::new(),
        password_hash: "$argon2id$stub".to_string(),
        role: role.to_string(),
    }
}

fn date(s: &str) -> chrono::NaiveDate {
    s.parse().unwrap()
}

async fn seed_project(pool: &PgPool, manager_id: i64) -> i64 {
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Tower A".to_string(),
            description: String::new(),
            start_date: date("2024-01-01"),
            end_date: date("2024-12-31"),
            created_by: manager_id,
            manager_id,
        },
    )
    .await
    .expect("project creation should succeed");
    project.id
}

fn new_defect(project_id: i64, engineer_id: i64, title: &str, status: &str) -> CreateDefect {
    CreateDefect {
        title: title.to_string(),
        description: "desc".to_string(),
        project_id,
        status: status.to_string(),
        priority: "medium".to_string(),
        assigned_to: engineer_id,
        created_by: engineer_id,
        deadline: date("2024-06-30"),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Duplicate usernames violate the `uq_users_username` constraint.
#[sqlx::test(migrations = "./migrations")]
async fn duplicate_username_is_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("ivanov_e", "engineer"))
        .await
        .expect("first insert should succeed");

    let err = UserRepo::create(&pool, &new_user("ivanov_e", "viewer"))
        .await
        .expect_err("second insert must fail");
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert!(db_err.constraint().unwrap_or("").starts_with("uq_"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

/// `list_by_role` returns only users holding that role.
#[sqlx::test(migrations = "./migrations")]
async fn list_by_role_filters(pool: PgPool) {
    UserRepo::create(&pool, &new_user("ivanov_e", "engineer"))
        .await
        .unwrap();
    UserRepo::create(&pool, &new_user("sidorov_e", "engineer"))
        .await
        .unwrap();
    UserRepo::create(&pool, &new_user("petrov_m", "manager"))
        .await
        .unwrap();

    let engineers = UserRepo::list_by_role(&pool, "engineer").await.unwrap();
    assert_eq!(engineers.len(), 2);
    assert!(engineers.iter().all(|u| u.role == "engineer"));
}

/// A role outside the vocabulary is stopped by the CHECK constraint.
#[sqlx::test(migrations = "./migrations")]
async fn unknown_role_is_rejected_by_schema(pool: PgPool) {
    let result = UserRepo::create(&pool, &new_user("rogue", "admin")).await;
    assert!(result.is_err(), "role outside the CHECK must fail");
}

// ---------------------------------------------------------------------------
// Defects
// ---------------------------------------------------------------------------

/// Partial update applies only the non-None fields.
#[sqlx::test(migrations = "./migrations")]
async fn defect_update_is_partial(pool: PgPool) {
    let engineer = UserRepo::create(&pool, &new_user("ivanov_e", "engineer"))
        .await
        .unwrap();
    let manager = UserRepo::create(&pool, &new_user("petrov_m", "manager"))
        .await
        .unwrap();
    let project_id = seed_project(&pool, manager.id).await;

    let defect = DefectRepo::create(&pool, &new_defect(project_id, engineer.id, "Crack", "new"))
        .await
        .unwrap();

    let updated = DefectRepo::update(
        &pool,
        defect.id,
        &UpdateDefect {
            status: Some("in_progress".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("defect exists");

    assert_eq!(updated.status, "in_progress");
    assert_eq!(updated.title, "Crack");
    assert_eq!(updated.priority, "medium");
    assert_eq!(updated.deadline, defect.deadline);
}

/// Assignee scoping: rows assigned to someone else come back as None.
#[sqlx::test(migrations = "./migrations")]
async fn find_for_assignee_hides_foreign_rows(pool: PgPool) {
    let owner = UserRepo::create(&pool, &new_user("ivanov_e", "engineer"))
        .await
        .unwrap();
    let other = UserRepo::create(&pool, &new_user("sidorov_e", "engineer"))
        .await
        .unwrap();
    let manager = UserRepo::create(&pool, &new_user("petrov_m", "manager"))
        .await
        .unwrap();
    let project_id = seed_project(&pool, manager.id).await;

    let defect = DefectRepo::create(&pool, &new_defect(project_id, owner.id, "Crack", "new"))
        .await
        .unwrap();

    let found = DefectRepo::find_by_id_for_assignee(&pool, defect.id, owner.id)
        .await
        .unwrap();
    assert!(found.is_some());

    let hidden = DefectRepo::find_by_id_for_assignee(&pool, defect.id, other.id)
        .await
        .unwrap();
    assert!(hidden.is_none());
}

/// Overdue excludes terminal statuses; rollups count per project.
#[sqlx::test(migrations = "./migrations")]
async fn overdue_and_rollups(pool: PgPool) {
    let engineer = UserRepo::create(&pool, &new_user("ivanov_e", "engineer"))
        .await
        .unwrap();
    let manager = UserRepo::create(&pool, &new_user("petrov_m", "manager"))
        .await
        .unwrap();
    let project_id = seed_project(&pool, manager.id).await;

    DefectRepo::create(&pool, &new_defect(project_id, engineer.id, "Open late", "new"))
        .await
        .unwrap();
    DefectRepo::create(
        &pool,
        &new_defect(project_id, engineer.id, "Closed late", "closed"),
    )
    .await
    .unwrap();
    DefectRepo::create(
        &pool,
        &new_defect(project_id, engineer.id, "Cancelled late", "cancelled"),
    )
    .await
    .unwrap();

    // All deadlines are in the past, but only the open defect is overdue.
    let overdue = DefectRepo::list_overdue(&pool, None).await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].title, "Open late");

    let rollups = DefectRepo::project_rollups(&pool).await.unwrap();
    assert_eq!(rollups.len(), 1);
    assert_eq!(rollups[0].total_defects, 3);
    assert_eq!(rollups[0].open_defects, 1);
    assert_eq!(rollups[0].closed_defects, 1);
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Comments list in creation order.
#[sqlx::test(migrations = "./migrations")]
async fn comments_list_in_creation_order(pool: PgPool) {
    let engineer = UserRepo::create(&pool, &new_user("ivanov_e", "engineer"))
        .await
        .unwrap();
    let manager = UserRepo::create(&pool, &new_user("petrov_m", "manager"))
        .await
        .unwrap();
    let project_id = seed_project(&pool, manager.id).await;
    let defect = DefectRepo::create(&pool, &new_defect(project_id, engineer.id, "Crack", "new"))
        .await
        .unwrap();

    for text in ["first", "second", "third"] {
        CommentRepo::create(
            &pool,
            &CreateComment {
                defect_id: defect.id,
                author_id: engineer.id,
                text: text.to_string(),
            },
        )
        .await
        .unwrap();
    }

    let comments = CommentRepo::list_for_defect(&pool, defect.id).await.unwrap();
    let texts: Vec<_> = comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
}

// ---------------------------------------------------------------------------
// Audit trail
// ---------------------------------------------------------------------------

/// Audit entries persist and query newest first, per user or globally.
#[sqlx::test(migrations = "./migrations")]
async fn audit_trail_round_trip(pool: PgPool) {
    let event = AuditEvent::authz(
        Some(7),
        Some("ivanov_e".to_string()),
        "GET /api/v1/engineer/defects".to_string(),
        outcomes::PASS,
        Some("10.0.0.5".to_string()),
    );
    AuditLogRepo::insert(&pool, &event).await.unwrap();

    // An unauthenticated attempt has no user attached.
    let anonymous = AuditEvent::authz(
        None,
        None,
        "GET /api/v1/manager/projects".to_string(),
        outcomes::REDIRECT_LOGIN,
        None,
    );
    AuditLogRepo::insert(&pool, &anonymous).await.unwrap();

    let recent = AuditLogRepo::list_recent(&pool, 10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].outcome, "redirect_login");
    assert!(recent[0].user_id.is_none());
    assert!(recent[0].timestamp <= Utc::now());

    let for_user = AuditLogRepo::list_for_user(&pool, 7, 10).await.unwrap();
    assert_eq!(for_user.len(), 1);
    assert_eq!(for_user[0].username.as_deref(), Some("ivanov_e"));
    assert_eq!(for_user[0].outcome, "pass");
}

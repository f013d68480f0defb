//! Integration tests for tasks, comments, monthly targets, and the
//! activity summary aggregates.

use chrono::{Datelike, Utc};
use sqlx::PgPool;

use immo_db::models::apartment::{AssignApartment, CreateApartment};
use immo_db::models::client::CreateClient;
use immo_db::models::monthly_target::{CreateMonthlyTarget, UpdateMonthlyTarget};
use immo_db::models::project::CreateProject;
use immo_db::models::status::{ApartmentStatus, PropertyType, TaskStatus, UserRole};
use immo_db::models::task::{CreateComment, CreateTask};
use immo_db::models::user::CreateUser;
use immo_db::repositories::{
    ApartmentRepo, ClientRepo, MonthlyTargetRepo, ProjectRepo, TaskRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_task(title: &str, status: Option<TaskStatus>) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: None,
        due_date: None,
        status,
    }
}

fn new_target(year: i32, month: i32, amount: f64) -> CreateMonthlyTarget {
    CreateMonthlyTarget {
        year,
        month,
        target_amount: amount,
        notes: None,
    }
}

/// Seed a project with `prices.len()` apartments SOLD this month.
async fn seed_sales(pool: &PgPool, prices: &[f64]) {
    let agent = UserRepo::create(
        pool,
        &CreateUser {
            name: "Agent Test".to_string(),
            email: "agent@agency.ma".to_string(),
            phone_number: None,
            password_hash: "$argon2id$fake-hash-for-tests".to_string(),
            role: UserRole::Agent,
        },
    )
    .await
    .unwrap();
    let client = ClientRepo::create(
        pool,
        &CreateClient {
            first_name: "Yassine".to_string(),
            last_name: "Berrada".to_string(),
            email: "yassine@mail.ma".to_string(),
            phone_number: None,
            whatsapp_number: None,
            status: None,
            notes: None,
            provenance: None,
        },
        agent.id,
    )
    .await
    .unwrap();
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Les Palmiers".to_string(),
            address: None,
            number_of_apartments: None,
            total_surface: None,
            notes: None,
            image_url: None,
            status: None,
            progress: None,
            folder_fees: None,
            commission_per_m2: None,
            latitude: None,
            longitude: None,
        },
    )
    .await
    .unwrap();

    for (i, price) in prices.iter().enumerate() {
        let apartment = ApartmentRepo::create(
            pool,
            &CreateApartment {
                project_id: project.id,
                number: format!("A-{i}"),
                floor: None,
                property_type: PropertyType::Apartment,
                area: None,
                price: Some(*price),
                price_per_m2: None,
                status: None,
                zone: None,
                notes: None,
                image_url: None,
            },
        )
        .await
        .unwrap();
        ApartmentRepo::assign(
            pool,
            apartment.id,
            &AssignApartment {
                client_id: client.id,
                status: ApartmentStatus::Sold,
                expected_version: None,
            },
        )
        .await
        .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Tasks and comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_task_counts_group_by_status(pool: PgPool) {
    TaskRepo::create(&pool, &new_task("call notary", None))
        .await
        .unwrap();
    TaskRepo::create(&pool, &new_task("site visit", Some(TaskStatus::InProgress)))
        .await
        .unwrap();
    TaskRepo::create(&pool, &new_task("send contract", Some(TaskStatus::InProgress)))
        .await
        .unwrap();
    TaskRepo::create(&pool, &new_task("archive file", Some(TaskStatus::Completed)))
        .await
        .unwrap();

    let counts = TaskRepo::counts(&pool).await.unwrap();
    assert_eq!(counts.todo, 1);
    assert_eq!(counts.in_progress, 2);
    assert_eq!(counts.completed, 1);
    assert_eq!(counts.total, 4);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_comments_cascade_with_task(pool: PgPool) {
    let task = TaskRepo::create(&pool, &new_task("call notary", None))
        .await
        .unwrap();
    TaskRepo::add_comment(
        &pool,
        task.id,
        &CreateComment {
            content: "left a voicemail".to_string(),
        },
    )
    .await
    .unwrap()
    .unwrap();

    let with_comments = TaskRepo::find_with_comments(&pool, task.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(with_comments.comments.len(), 1);

    assert!(TaskRepo::delete(&pool, task.id).await.unwrap());

    let orphans: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphans.0, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_comment_on_missing_task_returns_none(pool: PgPool) {
    let result = TaskRepo::add_comment(
        &pool,
        9999,
        &CreateComment {
            content: "into the void".to_string(),
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_comment_is_scoped_to_task(pool: PgPool) {
    let task_a = TaskRepo::create(&pool, &new_task("a", None)).await.unwrap();
    let task_b = TaskRepo::create(&pool, &new_task("b", None)).await.unwrap();
    let comment = TaskRepo::add_comment(
        &pool,
        task_a.id,
        &CreateComment {
            content: "on task a".to_string(),
        },
    )
    .await
    .unwrap()
    .unwrap();

    // Wrong task id does not delete the comment.
    assert!(!TaskRepo::delete_comment(&pool, task_b.id, comment.id)
        .await
        .unwrap());
    assert!(TaskRepo::delete_comment(&pool, task_a.id, comment.id)
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Monthly targets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_monthly_target_pair_is_unique(pool: PgPool) {
    MonthlyTargetRepo::create(&pool, &new_target(2026, 8, 2_000_000.0))
        .await
        .unwrap();

    let err = MonthlyTargetRepo::create(&pool, &new_target(2026, 8, 500_000.0))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_monthly_targets_year_month"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_target_list_filters_by_year(pool: PgPool) {
    MonthlyTargetRepo::create(&pool, &new_target(2025, 12, 1_000_000.0))
        .await
        .unwrap();
    MonthlyTargetRepo::create(&pool, &new_target(2026, 1, 1_500_000.0))
        .await
        .unwrap();
    MonthlyTargetRepo::create(&pool, &new_target(2026, 2, 1_500_000.0))
        .await
        .unwrap();

    assert_eq!(MonthlyTargetRepo::list(&pool, None).await.unwrap().len(), 3);
    let year_2026 = MonthlyTargetRepo::list(&pool, Some(2026)).await.unwrap();
    assert_eq!(year_2026.len(), 2);
    // Chronological order within the year.
    assert_eq!(year_2026[0].month, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_target_partial_update(pool: PgPool) {
    let target = MonthlyTargetRepo::create(&pool, &new_target(2026, 8, 2_000_000.0))
        .await
        .unwrap();

    let updated = MonthlyTargetRepo::update(
        &pool,
        target.id,
        &UpdateMonthlyTarget {
            target_amount: Some(2_500_000.0),
            ..UpdateMonthlyTarget::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!((updated.target_amount - 2_500_000.0).abs() < f64::EPSILON);
    assert_eq!(updated.year, 2026);
    assert_eq!(updated.month, 8);
}

// ---------------------------------------------------------------------------
// Activity summary
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_summary_computes_attainment(pool: PgPool) {
    let now = Utc::now();
    let (year, month) = (now.year(), now.month() as i32);

    seed_sales(&pool, &[400_000.0, 200_000.0]).await;
    MonthlyTargetRepo::create(&pool, &new_target(year, month, 1_000_000.0))
        .await
        .unwrap();

    let summary = MonthlyTargetRepo::summary(&pool, year, month).await.unwrap();
    assert_eq!(summary.apartment_counts.sold, 2);
    assert_eq!(summary.apartment_counts.total, 2);
    assert!((summary.total_sales - 600_000.0).abs() < f64::EPSILON);
    assert!((summary.month_sales - 600_000.0).abs() < f64::EPSILON);
    assert_eq!(summary.target_amount, Some(1_000_000.0));
    let attainment = summary.attainment_pct.expect("target set");
    assert!((attainment - 60.0).abs() < 1e-9);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_summary_without_target_has_null_attainment(pool: PgPool) {
    let now = Utc::now();
    seed_sales(&pool, &[300_000.0]).await;

    let summary = MonthlyTargetRepo::summary(&pool, now.year(), now.month() as i32)
        .await
        .unwrap();
    assert!((summary.month_sales - 300_000.0).abs() < f64::EPSILON);
    assert!(summary.target_amount.is_none());
    assert!(summary.attainment_pct.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_summary_excludes_other_months(pool: PgPool) {
    seed_sales(&pool, &[300_000.0]).await;

    // A month with no sales: counts are global, monthly volume is zero.
    let summary = MonthlyTargetRepo::summary(&pool, 2020, 1).await.unwrap();
    assert_eq!(summary.apartment_counts.sold, 1);
    assert!((summary.total_sales - 300_000.0).abs() < f64::EPSILON);
    assert!((summary.month_sales - 0.0).abs() < f64::EPSILON);
}

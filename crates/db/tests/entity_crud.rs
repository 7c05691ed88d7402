//! Integration tests for the repository layer against a real database:
//! - Create full hierarchy (user -> course -> material -> planning sheet)
//! - Unique constraint violations (course identity, planning week)
//! - Cascade delete behaviour on course removal
//! - Customization profile defaults and upsert semantics

use planner_core::planning::{
    AssessmentMethod, GeneratedPlanning, ProviderKind, Question,
};
use planner_db::models::course::CreateCourse;
use planner_db::models::customization::UpdateCustomizationProfile;
use planner_db::models::material::CreateCourseMaterial;
use planner_db::models::planning_sheet::{CreatePlanningSheet, UpdatePlanningSheet};
use planner_db::models::user::CreateUser;
use planner_db::repositories::{
    CourseRepo, CustomizationRepo, MaterialRepo, PlanningSheetRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str, student_id: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$fake-hash-for-tests".to_string(),
        first_name: "Sam".to_string(),
        last_name: "Okafor".to_string(),
        student_id: student_id.to_string(),
    }
}

fn new_course(code: &str) -> CreateCourse {
    CreateCourse {
        course_code: code.to_string(),
        course_name: "Introduction to Computer Science".to_string(),
        semester: "Fall".to_string(),
        year: 2025,
        description: None,
        session_frequency: None,
        total_weeks: None,
    }
}

fn new_material(course_id: i64, uploaded_by: i64, week: Option<i32>) -> CreateCourseMaterial {
    CreateCourseMaterial {
        course_id,
        uploaded_by,
        title: "Lecture 5".to_string(),
        description: Some("Recursion basics".to_string()),
        material_type: "lecture_notes".to_string(),
        file_name: "lecture5.pdf".to_string(),
        file_path: "uploads/lecture5.pdf".to_string(),
        file_size: 1024,
        mime_type: "application/pdf".to_string(),
        extracted_text: Some("Recursion: base case and recursive step.".to_string()),
        week_number: week,
    }
}

fn generated_planning() -> GeneratedPlanning {
    GeneratedPlanning {
        weekly_abstract: "Recursion and sorting.".to_string(),
        learning_objectives: vec!["Understand recursion".to_string()],
        questions: vec![Question {
            question_text: "What is a base case?".to_string(),
            difficulty: "easy".to_string(),
            estimated_time: 5.0,
            expected_answer: None,
        }],
        assessment_methods: vec![AssessmentMethod {
            method_name: "Quick Quiz".to_string(),
            description: "Short quiz.".to_string(),
            duration: 10.0,
        }],
        additional_notes: None,
    }
}

fn new_sheet(course_id: i64, created_by: i64, week: i32) -> CreatePlanningSheet {
    CreatePlanningSheet {
        course_id,
        created_by,
        week_number: week,
        session_date: None,
        generated: generated_planning(),
        ai_provider: ProviderKind::Openai,
        generated_with: "openai AI".to_string(),
    }
}

/// Whether an error is a Postgres unique violation on the given constraint.
fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_full_hierarchy_crud(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("lead@test.com", "S123"))
        .await
        .expect("user creation should succeed");

    let course = CourseRepo::create(&pool, user.id, &new_course("cs101"))
        .await
        .expect("course creation should succeed");
    assert_eq!(course.course_code, "CS101", "course code is uppercased");
    assert_eq!(course.session_frequency, 2);
    assert_eq!(course.total_weeks, 15);

    let material = MaterialRepo::create(&pool, &new_material(course.id, user.id, Some(3)))
        .await
        .expect("material creation should succeed");
    assert_eq!(material.week_number, Some(3));

    let sheet = PlanningSheetRepo::create(&pool, &new_sheet(course.id, user.id, 3))
        .await
        .expect("sheet creation should succeed");
    assert!(!sheet.is_customized);
    assert_eq!(sheet.ai_provider, ProviderKind::Openai);
    assert_eq!(sheet.questions.0.len(), 1);

    let found = PlanningSheetRepo::find_by_course_and_week(&pool, course.id, 3)
        .await
        .expect("lookup should succeed")
        .expect("sheet should exist");
    assert_eq!(found.id, sheet.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_week_rejected_by_constraint(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("lead@test.com", "S123"))
        .await
        .expect("user creation should succeed");
    let course = CourseRepo::create(&pool, user.id, &new_course("CS101"))
        .await
        .expect("course creation should succeed");

    PlanningSheetRepo::create(&pool, &new_sheet(course.id, user.id, 3))
        .await
        .expect("first sheet should insert");

    let err = PlanningSheetRepo::create(&pool, &new_sheet(course.id, user.id, 3))
        .await
        .expect_err("second sheet for the same week must fail");
    assert!(
        is_unique_violation(&err, "uq_planning_sheets_course_week"),
        "expected unique violation, got {err:?}"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_course_identity_rejected(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("lead@test.com", "S123"))
        .await
        .expect("user creation should succeed");

    CourseRepo::create(&pool, user.id, &new_course("CS101"))
        .await
        .expect("first course should insert");

    let err = CourseRepo::create(&pool, user.id, &new_course("CS101"))
        .await
        .expect_err("same (lead, code, semester, year) must fail");
    assert!(
        is_unique_violation(&err, "uq_courses_lead_code_semester_year"),
        "expected unique violation, got {err:?}"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_delete_cascades(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("lead@test.com", "S123"))
        .await
        .expect("user creation should succeed");
    let course = CourseRepo::create(&pool, user.id, &new_course("CS101"))
        .await
        .expect("course creation should succeed");

    let material = MaterialRepo::create(&pool, &new_material(course.id, user.id, Some(1)))
        .await
        .expect("material creation should succeed");
    let sheet = PlanningSheetRepo::create(&pool, &new_sheet(course.id, user.id, 1))
        .await
        .expect("sheet creation should succeed");
    CustomizationRepo::create_default(&pool, course.id, user.id, ProviderKind::Openai)
        .await
        .expect("profile creation should succeed");

    assert!(CourseRepo::delete(&pool, course.id)
        .await
        .expect("delete should succeed"));

    assert!(MaterialRepo::find_by_id(&pool, material.id)
        .await
        .expect("lookup should succeed")
        .is_none());
    assert!(PlanningSheetRepo::find_by_id(&pool, sheet.id)
        .await
        .expect("lookup should succeed")
        .is_none());
    assert!(CustomizationRepo::find_by_course(&pool, course.id)
        .await
        .expect("lookup should succeed")
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_customization_defaults_and_upsert(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("lead@test.com", "S123"))
        .await
        .expect("user creation should succeed");
    let course = CourseRepo::create(&pool, user.id, &new_course("CS101"))
        .await
        .expect("course creation should succeed");

    let profile =
        CustomizationRepo::create_default(&pool, course.id, user.id, ProviderKind::Gemini)
            .await
            .expect("default profile should insert");
    assert_eq!(profile.default_session_duration, 90);
    assert_eq!(profile.number_of_questions, 5);
    assert_eq!(
        (
            profile.difficulty_easy,
            profile.difficulty_medium,
            profile.difficulty_hard
        ),
        (30, 50, 20)
    );
    assert_eq!(profile.teaching_style, "interactive");
    assert_eq!(profile.preferred_ai_provider, ProviderKind::Gemini);
    assert_eq!(
        profile.assessment_preferences.0,
        vec!["Quick Quiz", "Group Discussion", "Problem Solving"]
    );

    // Partial upsert: only the question count changes.
    let updated = CustomizationRepo::upsert(
        &pool,
        course.id,
        user.id,
        &UpdateCustomizationProfile {
            number_of_questions: Some(8),
            ..Default::default()
        },
    )
    .await
    .expect("upsert should succeed");
    assert_eq!(updated.number_of_questions, 8);
    assert_eq!(updated.default_session_duration, 90, "untouched field kept");
    assert_eq!(updated.preferred_ai_provider, ProviderKind::Gemini);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_previous_abstracts_window(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("lead@test.com", "S123"))
        .await
        .expect("user creation should succeed");
    let course = CourseRepo::create(&pool, user.id, &new_course("CS101"))
        .await
        .expect("course creation should succeed");

    for week in 1..=5 {
        let mut input = new_sheet(course.id, user.id, week);
        input.generated.weekly_abstract = format!("Topics of week {week}");
        PlanningSheetRepo::create(&pool, &input)
            .await
            .expect("sheet should insert");
    }

    let abstracts = PlanningSheetRepo::list_previous_abstracts(&pool, course.id, 5, 3)
        .await
        .expect("listing should succeed");
    assert_eq!(
        abstracts,
        vec![
            "Topics of week 4".to_string(),
            "Topics of week 3".to_string(),
            "Topics of week 2".to_string(),
        ],
        "most recent prior weeks first, capped at 3, target week excluded"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_preserves_untouched_fields(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("lead@test.com", "S123"))
        .await
        .expect("user creation should succeed");
    let course = CourseRepo::create(&pool, user.id, &new_course("CS101"))
        .await
        .expect("course creation should succeed");
    let sheet = PlanningSheetRepo::create(&pool, &new_sheet(course.id, user.id, 3))
        .await
        .expect("sheet creation should succeed");

    let updated = PlanningSheetRepo::update(
        &pool,
        sheet.id,
        &UpdatePlanningSheet {
            session_date: Some(chrono::Utc::now()),
            ..Default::default()
        },
    )
    .await
    .expect("update should succeed")
    .expect("sheet should exist");

    assert!(updated.session_date.is_some());
    assert_eq!(updated.weekly_abstract, sheet.weekly_abstract);
    assert!(!updated.is_customized, "flag untouched by a date-only update");
}

use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};
use university_api::models::UserRole;
use university_api::test_support::{TestDatabase, TestFixtures, TestRocketBuilder, test_auth_config};

const PASSWORD: &str = "correct horse battery staple";

/// Seed three accounts and one course: `owner` teaches the course, `rival` is
/// another instructor, `root` stays an admin. Registration order matters
/// because course ownership compares the caller's user id against the
/// course's instructor id.
async fn spawn_with_course() -> (TestDatabase, Client, i64) {
    let test_db = TestDatabase::new()
        .await
        .expect("failed to provision test database");
    let client = TestRocketBuilder::new()
        .mount_api_routes(university_api::api_routes())
        .manage_app_state(test_db.pool_clone(), test_auth_config())
        .async_client()
        .await;

    for username in ["owner", "rival", "root"] {
        register(&client, username).await;
    }

    login(&client, "root").await;
    let owner_instructor = create_instructor(&client, 1).await;
    create_instructor(&client, 2).await;

    let response = client
        .post("/api/courses")
        .header(ContentType::JSON)
        .body(
            json!({
                "title": "Distributed Systems",
                "description": "Consensus and replication",
                "course_code": "CS-501",
                "credits": 6,
                "instructor_id": owner_instructor["id"],
                "semester": "autumn",
                "year": 2024,
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let course: Value = response.into_json().await.expect("course payload");

    (test_db, client, course["id"].as_i64().expect("course id"))
}

async fn register(client: &Client, username: &str) {
    let response = client
        .post("/api/auth/register")
        .header(ContentType::JSON)
        .body(
            json!({
                "first_name": "Test",
                "last_name": "User",
                "username": username,
                "password": PASSWORD,
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
}

async fn login(client: &Client, username: &str) {
    let response = client
        .post("/api/auth/login")
        .header(ContentType::JSON)
        .body(json!({"username": username, "password": PASSWORD}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
}

async fn create_instructor(client: &Client, user_id: i32) -> Value {
    let response = client
        .post("/api/instructors")
        .header(ContentType::JSON)
        .body(
            json!({
                "user_id": user_id,
                "position": "Lecturer",
                "department": "Computer Science",
                "academic_degree": "PhD",
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    response.into_json().await.expect("instructor payload")
}

async fn update_title(client: &Client, course_id: i64, title: &str) -> Status {
    client
        .put(format!("/api/courses/{course_id}"))
        .header(ContentType::JSON)
        .body(json!({"title": title}).to_string())
        .dispatch()
        .await
        .status()
}

#[tokio::test]
async fn course_updates_require_the_owner_or_an_admin() {
    let (_db, client, course_id) = spawn_with_course().await;

    login(&client, "rival").await;
    assert_eq!(
        update_title(&client, course_id, "Hijacked").await,
        Status::Forbidden
    );
    let response = client
        .delete(format!("/api/courses/{course_id}"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    login(&client, "owner").await;
    assert_eq!(
        update_title(&client, course_id, "Distributed Systems II").await,
        Status::Ok
    );

    login(&client, "root").await;
    assert_eq!(
        update_title(&client, course_id, "Distributed Systems III").await,
        Status::Ok
    );

    let response = client
        .get(format!("/api/courses/{course_id}"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let course: Value = response.into_json().await.expect("course payload");
    assert_eq!(course["title"], "Distributed Systems III");
}

#[tokio::test]
async fn course_deletion_is_allowed_for_admins() {
    let (_db, client, course_id) = spawn_with_course().await;

    login(&client, "root").await;
    let response = client
        .delete(format!("/api/courses/{course_id}"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .get(format!("/api/courses/{course_id}"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[tokio::test]
async fn listing_filters_courses_by_semester_and_year() {
    let (db, client, _course_id) = spawn_with_course().await;

    // Seed a second autumn course directly, taught by a third instructor.
    let fixtures = TestFixtures::new(db.pool());
    let ghost_id = fixtures
        .insert_user("ghost", "irrelevant-hash", UserRole::Instructor)
        .await
        .expect("insert user");
    let instructor_id = fixtures
        .insert_instructor(ghost_id)
        .await
        .expect("insert instructor");
    fixtures
        .insert_course(instructor_id, "Operating Systems")
        .await
        .expect("insert course");

    let response = client
        .get("/api/courses?semester=autumn&year=2024")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let courses: Value = response.into_json().await.expect("course list");
    assert_eq!(courses.as_array().map(Vec::len), Some(2));

    let response = client.get("/api/courses?semester=spring").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let courses: Value = response.into_json().await.expect("course list");
    assert_eq!(courses.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn schedule_slots_follow_course_ownership() {
    let (_db, client, course_id) = spawn_with_course().await;

    login(&client, "owner").await;
    let response = client
        .post(format!("/api/courses/{course_id}/schedule"))
        .header(ContentType::JSON)
        .body(
            json!({
                "start_time": "2024-10-01T10:00:00Z",
                "end_time": "2024-10-01T11:30:00Z",
                "classroom": "B-204",
                "lesson_type": "lecture",
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let slot: Value = response.into_json().await.expect("schedule payload");
    let slot_id = slot["id"].as_i64().expect("slot id");

    login(&client, "rival").await;
    let response = client
        .delete(format!("/api/schedule/{slot_id}"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    login(&client, "owner").await;
    let response = client
        .get(format!("/api/courses/{course_id}/schedule"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let slots: Value = response.into_json().await.expect("schedule list");
    assert_eq!(slots.as_array().map(Vec::len), Some(1));

    let response = client
        .delete(format!("/api/schedule/{slot_id}"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .get(format!("/api/courses/{course_id}/schedule"))
        .dispatch()
        .await;
    let slots: Value = response.into_json().await.expect("schedule list");
    assert_eq!(slots.as_array().map(Vec::len), Some(0));
}

use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};
use university_api::models::UserRole;
use university_api::test_support::{TestDatabase, TestFixtures, TestRocketBuilder, test_auth_config};

const PASSWORD: &str = "correct horse battery staple";

async fn spawn_api() -> (TestDatabase, Client) {
    let test_db = TestDatabase::new()
        .await
        .expect("failed to provision test database");
    let client = TestRocketBuilder::new()
        .mount_api_routes(university_api::api_routes())
        .manage_app_state(test_db.pool_clone(), test_auth_config())
        .async_client()
        .await;
    (test_db, client)
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

async fn post_json(client: &Client, uri: &str, payload: Value) -> (Status, Value) {
    let response = client
        .post(uri.to_string())
        .header(ContentType::JSON)
        .body(payload.to_string())
        .dispatch()
        .await;
    let status = response.status();
    let body = response.into_json().await.unwrap_or(Value::Null);
    (status, body)
}

/// Full academic seeding path: catalog entries, a student profile, an
/// instructor, a course, and one active enrollment.
async fn seed_academics(client: &Client) -> (i64, i64) {
    login(client, "root").await;

    let (status, group) = post_json(client, "/api/groups?name=CS-01", Value::Null).await;
    assert_eq!(status, Status::Ok);
    let (status, faculty) = post_json(client, "/api/faculty?name=Engineering", Value::Null).await;
    assert_eq!(status, Status::Ok);

    let (status, student) = post_json(
        client,
        "/api/students",
        json!({
            "user_id": 2,
            "student_number": "S-2024-001",
            "group_id": group["id"],
            "enrollment_year": 2024,
            "faculty_id": faculty["id"],
        }),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(student["group_name"], "CS-01");
    assert_eq!(student["faculty_name"], "Engineering");
    let student_id = student["id"].as_i64().expect("student id");

    let (status, instructor) = post_json(
        client,
        "/api/instructors",
        json!({
            "user_id": 3,
            "position": "Professor",
            "department": "Computer Science",
            "academic_degree": "PhD",
        }),
    )
    .await;
    assert_eq!(status, Status::Ok);

    let (status, course) = post_json(
        client,
        "/api/courses",
        json!({
            "title": "Algorithms",
            "description": "Sorting and graphs",
            "course_code": "CS-201",
            "credits": 5,
            "instructor_id": instructor["id"],
            "semester": "autumn",
            "year": 2024,
        }),
    )
    .await;
    assert_eq!(status, Status::Ok);
    let course_id = course["id"].as_i64().expect("course id");

    let (status, enrollment) = post_json(
        client,
        &format!("/api/courses/{course_id}/enrollments"),
        json!({"student_id": student_id}),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(enrollment["status"], "active");

    (student_id, course_id)
}

#[tokio::test]
async fn student_creation_flips_the_user_role() {
    let (db, client) = spawn_api().await;
    for username in ["root", "stud", "prof"] {
        register(&client, username).await;
    }
    seed_academics(&client).await;

    let role: String = sqlx::query_scalar("SELECT user_role::text FROM users WHERE username = $1")
        .bind("stud")
        .fetch_one(db.pool())
        .await
        .expect("student user exists");
    assert_eq!(role, "student");

    let role: String = sqlx::query_scalar("SELECT user_role::text FROM users WHERE username = $1")
        .bind("prof")
        .fetch_one(db.pool())
        .await
        .expect("instructor user exists");
    assert_eq!(role, "instructor");
}

#[tokio::test]
async fn student_listing_resolves_enrollment_filters() {
    let (db, client) = spawn_api().await;
    for username in ["root", "stud", "prof"] {
        register(&client, username).await;
    }
    let (student_id, course_id) = seed_academics(&client).await;

    // A second student with no enrollments, seeded directly.
    let fixtures = TestFixtures::new(db.pool());
    let user_id = fixtures
        .insert_user("lurker", "irrelevant-hash", UserRole::Student)
        .await
        .expect("insert user");
    let group_id = fixtures.insert_group("CS-99").await.expect("insert group");
    let faculty_id = fixtures
        .insert_faculty("Science")
        .await
        .expect("insert faculty");
    fixtures
        .insert_student(user_id, group_id, faculty_id)
        .await
        .expect("insert student");

    // Without filters every student is returned.
    let response = client.get("/api/students").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let students: Value = response.into_json().await.expect("student list");
    assert_eq!(students.as_array().map(Vec::len), Some(2));

    let response = client
        .get(format!("/api/students?course_id={course_id}"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let students: Value = response.into_json().await.expect("student list");
    let students = students.as_array().expect("array");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["id"].as_i64(), Some(student_id));

    // No dropped enrollments exist yet.
    let response = client
        .get(format!(
            "/api/students?course_id={course_id}&enrollment_status=dropped"
        ))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let students: Value = response.into_json().await.expect("student list");
    assert_eq!(students.as_array().map(Vec::len), Some(0));

    // Unknown course id means no matching enrollments at all.
    let response = client.get("/api/students?course_id=999").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let students: Value = response.into_json().await.expect("student list");
    assert_eq!(students.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn student_updates_rewrite_the_enriched_view() {
    let (_db, client) = spawn_api().await;
    for username in ["root", "stud", "prof"] {
        register(&client, username).await;
    }
    let (student_id, _course_id) = seed_academics(&client).await;

    let (status, group) = post_json(&client, "/api/groups?name=CS-02", Value::Null).await;
    assert_eq!(status, Status::Ok);

    let response = client
        .put(format!("/api/students/{student_id}"))
        .header(ContentType::JSON)
        .body(json!({"group_id": group["id"]}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let student: Value = response.into_json().await.expect("student payload");
    assert_eq!(student["group_name"], "CS-02");
    assert_eq!(student["faculty_name"], "Engineering");
}

#[tokio::test]
async fn instructor_listing_filters_by_department_and_course() {
    let (_db, client) = spawn_api().await;
    for username in ["root", "stud", "prof"] {
        register(&client, username).await;
    }
    let (_student_id, course_id) = seed_academics(&client).await;

    let response = client
        .get("/api/instructors?department=Computer%20Science")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let instructors: Value = response.into_json().await.expect("instructor list");
    assert_eq!(instructors.as_array().map(Vec::len), Some(1));

    let response = client
        .get(format!("/api/instructors?course_id={course_id}"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let instructors: Value = response.into_json().await.expect("instructor list");
    assert_eq!(instructors.as_array().map(Vec::len), Some(1));

    // A missing course yields an empty list rather than an error.
    let response = client.get("/api/instructors?course_id=999").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let instructors: Value = response.into_json().await.expect("instructor list");
    assert_eq!(instructors.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn catalog_writes_are_admin_only() {
    let (_db, client) = spawn_api().await;
    for username in ["root", "stud", "prof"] {
        register(&client, username).await;
    }
    seed_academics(&client).await;

    login(&client, "root").await;
    let response = client.delete("/api/groups/999").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let response = client.delete("/api/faculty/999").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);

    // A student-role caller is rejected by the guard.
    login(&client, "stud").await;
    let (status, _body) = post_json(&client, "/api/groups?name=Nope", Value::Null).await;
    assert_eq!(status, Status::Forbidden);
}

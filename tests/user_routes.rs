use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};
use university_api::test_support::{TestDatabase, TestRocketBuilder, test_auth_config};

const PASSWORD: &str = "correct horse battery staple";

/// Seed an admin (`boss`, user id 1) and a non-admin (`worker`, user id 2);
/// the worker's role is demoted to instructor through profile creation.
async fn spawn_with_accounts() -> (TestDatabase, Client) {
    let test_db = TestDatabase::new()
        .await
        .expect("failed to provision test database");
    let client = TestRocketBuilder::new()
        .mount_api_routes(university_api::api_routes())
        .manage_app_state(test_db.pool_clone(), test_auth_config())
        .async_client()
        .await;

    register(&client, "boss").await;
    register(&client, "worker").await;

    login(&client, "boss").await;
    let response = client
        .post("/api/instructors")
        .header(ContentType::JSON)
        .body(
            json!({
                "user_id": 2,
                "position": "Lecturer",
                "department": "Mathematics",
                "academic_degree": "MSc",
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    drop(response);

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

#[tokio::test]
async fn only_admins_can_list_users() {
    let (_db, client) = spawn_with_accounts().await;

    login(&client, "worker").await;
    let response = client.post("/api/users").dispatch().await;
    assert_eq!(response.status(), Status::Forbidden);
    let body: Value = response.into_json().await.expect("error payload");
    assert_eq!(body["message"], "Only admin can get all users");

    login(&client, "boss").await;
    let response = client.post("/api/users").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("user list");
    let usernames: Vec<&str> = body["users"]
        .as_array()
        .expect("users array")
        .iter()
        .map(|user| user["username"].as_str().unwrap())
        .collect();
    assert!(usernames.contains(&"boss"));
    assert!(usernames.contains(&"worker"));
}

#[tokio::test]
async fn profile_updates_are_limited_to_self_or_admin() {
    let (_db, client) = spawn_with_accounts().await;

    login(&client, "worker").await;
    let response = client
        .put("/api/users/2")
        .header(ContentType::JSON)
        .body(json!({"first_name": "Renamed"}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("user payload");
    assert_eq!(body["first_name"], "Renamed");

    let response = client
        .put("/api/users/1")
        .header(ContentType::JSON)
        .body(json!({"first_name": "Sneaky"}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    login(&client, "boss").await;
    let response = client
        .put("/api/users/2")
        .header(ContentType::JSON)
        .body(json!({"last_name": "Promoted"}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("user payload");
    assert_eq!(body["first_name"], "Renamed");
    assert_eq!(body["last_name"], "Promoted");
}

#[tokio::test]
async fn deactivation_and_reactivation_cycle() {
    let (_db, client) = spawn_with_accounts().await;

    // Only admins may reactivate.
    login(&client, "worker").await;
    let response = client.patch("/api/users/activate/2").dispatch().await;
    assert_eq!(response.status(), Status::Forbidden);

    // Users may deactivate themselves, after which the guard shuts them out.
    let response = client.delete("/api/users/deactivate/2").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let response = client.get("/api/users/2").dispatch().await;
    assert_eq!(response.status(), Status::Forbidden);

    login(&client, "boss").await;
    let response = client.patch("/api/users/activate/2").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    login(&client, "worker").await;
    let response = client.get("/api/users/2").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
}

#[macro_use]
extern crate rocket;

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod request_logger;
pub mod routes;
pub mod services;
pub mod store;

use crate::auth::{AuthConfig, AuthError, AuthState, PasswordService, TokenCodec};
use crate::db::UniversityDb;
use crate::request_logger::RequestLogger;
use crate::services::{CourseService, InstructorService, StudentService, UserService};
use crate::store::catalog::{FacultyStore, GroupStore};
use crate::store::courses::CourseStore;
use crate::store::enrollments::EnrollmentStore;
use crate::store::instructors::InstructorStore;
use crate::store::schedules::ScheduleStore;
use crate::store::students::StudentStore;
use crate::store::users::UserStore;
use env_logger::Env;
use rocket::fairing::AdHoc;
use rocket::http::Method;
use rocket::{Build, Rocket};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_db_pools::Database;
use rocket_db_pools::sqlx::PgPool;
use rocket_okapi::{
    openapi_get_routes,
    rapidoc::{GeneralConfig, HideShowConfig, RapiDocConfig, make_rapidoc},
    settings::UrlObject,
    swagger_ui::{SwaggerUIConfig, make_swagger_ui},
};
use std::sync::Once;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

static LOGGER: Once = Once::new();

fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(
            Env::default().default_filter_or("info,rocket::server=warn,rocket::request=warn"),
        )
        .init();
    });
}

/// Construct every store and service from the shared pool and hand them to
/// Rocket as managed state. Explicit constructor composition: services take
/// their collaborator stores as arguments, nothing is wired up reflectively.
pub fn manage_app_state(
    rocket: Rocket<Build>,
    pool: PgPool,
    config: AuthConfig,
) -> Result<Rocket<Build>, AuthError> {
    let password_service = PasswordService::new()?;
    let token_codec = TokenCodec::from_config(&config);
    let auth_state = AuthState::new(config, password_service, token_codec);

    let users = UserStore::new(pool.clone());
    let students = StudentStore::new(pool.clone());
    let instructors = InstructorStore::new(pool.clone());
    let courses = CourseStore::new(pool.clone());
    let enrollments = EnrollmentStore::new(pool.clone());
    let schedules = ScheduleStore::new(pool.clone());
    let groups = GroupStore::new(pool.clone());
    let faculties = FacultyStore::new(pool.clone());

    let user_service = UserService::new(users.clone());
    let course_service =
        CourseService::new(courses.clone(), enrollments.clone(), schedules.clone());
    let student_service = StudentService::new(
        users.clone(),
        students.clone(),
        groups.clone(),
        faculties.clone(),
        enrollments.clone(),
    );
    let instructor_service =
        InstructorService::new(users.clone(), instructors.clone(), courses.clone());

    Ok(rocket
        .manage(pool)
        .manage(auth_state)
        .manage(users)
        .manage(groups)
        .manage(faculties)
        .manage(user_service)
        .manage(course_service)
        .manage(student_service)
        .manage(instructor_service))
}

pub fn api_routes() -> Vec<rocket::Route> {
    openapi_get_routes![
        // Health routes
        routes::health::health_check,
        // Auth routes
        auth::routes::register,
        auth::routes::login,
        auth::routes::refresh,
        auth::routes::logout,
        // User routes
        routes::users::list_users,
        routes::users::get_user,
        routes::users::update_user,
        routes::users::deactivate_user,
        routes::users::activate_user,
        // Group and faculty routes
        routes::groups::create_group,
        routes::groups::delete_group,
        routes::faculty::create_faculty,
        routes::faculty::delete_faculty,
        // Student routes
        routes::students::create_student,
        routes::students::get_student,
        routes::students::list_students,
        routes::students::update_student,
        // Instructor routes
        routes::instructors::create_instructor,
        routes::instructors::get_instructor,
        routes::instructors::list_instructors,
        // Course, enrollment, and schedule routes
        routes::courses::create_course,
        routes::courses::get_course,
        routes::courses::list_courses,
        routes::courses::update_course,
        routes::courses::delete_course,
        routes::courses::enroll_student,
        routes::courses::list_enrollments,
        routes::courses::get_course_schedule,
        routes::courses::add_schedule_slot,
        routes::courses::delete_schedule_slot,
    ]
}

pub fn rocket() -> Rocket<Build> {
    init_logger();

    // Configure CORS
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(
            vec![
                Method::Get,
                Method::Post,
                Method::Put,
                Method::Delete,
                Method::Patch,
            ]
            .into_iter()
            .map(From::from)
            .collect(),
        )
        .allow_credentials(true)
        .to_cors()
        .expect("Error creating CORS");

    rocket::build()
        .attach(RequestLogger)
        .attach(UniversityDb::init())
        .attach(cors)
        // Run database migrations on startup
        .attach(AdHoc::try_on_ignite("Run Migrations", |rocket| async move {
            match UniversityDb::fetch(&rocket) {
                Some(db) => {
                    let pool = (**db).clone();
                    match MIGRATOR.run(&pool).await {
                        Ok(_) => {
                            log::info!("database migrations successful");
                            Ok(rocket)
                        }
                        Err(e) => {
                            log::error!("database migrations failed: {}", e);
                            Err(rocket)
                        }
                    }
                }
                None => {
                    log::error!("database pool not available for migrations");
                    Err(rocket)
                }
            }
        }))
        // Compose auth state, stores, and services around the shared pool
        .attach(AdHoc::try_on_ignite(
            "Manage Application State",
            |rocket| async move {
                let pool = match UniversityDb::fetch(&rocket) {
                    Some(db) => (**db).clone(),
                    None => {
                        log::error!("database pool not available for application state");
                        return Err(rocket);
                    }
                };

                let config = match AuthConfig::from_env() {
                    Ok(config) => config,
                    Err(err) => {
                        log::error!("invalid auth configuration: {}", err);
                        return Err(rocket);
                    }
                };

                match manage_app_state(rocket, pool, config) {
                    Ok(rocket) => Ok(rocket),
                    Err(err) => {
                        log::error!("failed to build application state: {}", err);
                        Err(rocket::build())
                    }
                }
            },
        ))
        .mount("/api", api_routes())
        .mount(
            "/api/docs/swagger/",
            make_swagger_ui(&SwaggerUIConfig {
                url: "../../openapi.json".to_owned(),
                ..Default::default()
            }),
        )
        .mount(
            "/api/docs/rapidoc/",
            make_rapidoc(&RapiDocConfig {
                general: GeneralConfig {
                    spec_urls: vec![UrlObject::new("University API", "../../openapi.json")],
                    ..Default::default()
                },
                hide_show: HideShowConfig {
                    allow_spec_url_load: false,
                    allow_spec_file_load: false,
                    ..Default::default()
                },
                ..Default::default()
            }),
        )
}

pub mod test_support {
    use rocket::config::LogLevel;
    use rocket::figment::Figment;
    use rocket::local::asynchronous::Client as AsyncClient;
    use rocket::local::blocking::Client;
    use rocket::{Build, Rocket, Route};
    use rocket_db_pools::sqlx::{self, PgPool};

    use crate::auth::AuthConfig;
    use crate::models::UserRole;

    pub use database::{TestDatabase, TestDatabaseError};

    /// Auth configuration for tests: fixed secrets, short access TTL, no
    /// secure flag so the local client accepts the cookies.
    pub fn test_auth_config() -> AuthConfig {
        AuthConfig {
            access_secret: "test-access-secret".into(),
            refresh_secret: "test-refresh-secret".into(),
            access_ttl_minutes: 5,
            refresh_ttl_minutes: 60,
            access_cookie_name: "access_token".into(),
            refresh_cookie_name: "refresh_token".into(),
            cookie_secure: false,
            default_role: UserRole::Admin,
        }
    }

    /// Convenience helpers for seeding identity and academic tables in tests.
    pub struct TestFixtures<'a> {
        pool: &'a PgPool,
    }

    impl<'a> TestFixtures<'a> {
        pub fn new(pool: &'a PgPool) -> Self {
            Self { pool }
        }

        /// Insert a user row with a pre-hashed password, returning the id.
        pub async fn insert_user(
            &self,
            username: &str,
            password_hash: &str,
            role: UserRole,
        ) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar(
                "INSERT INTO users (first_name, last_name, username, password, user_role) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING id",
            )
            .bind("Test")
            .bind("User")
            .bind(username)
            .bind(password_hash)
            .bind(role)
            .fetch_one(self.pool)
            .await
        }

        pub async fn insert_group(&self, name: &str) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar("INSERT INTO groups (name) VALUES ($1) RETURNING id")
                .bind(name)
                .fetch_one(self.pool)
                .await
        }

        pub async fn insert_faculty(&self, name: &str) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar("INSERT INTO faculties (name) VALUES ($1) RETURNING id")
                .bind(name)
                .fetch_one(self.pool)
                .await
        }

        pub async fn insert_instructor(&self, user_id: i32) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar(
                "INSERT INTO instructors (user_id, position, department, academic_degree) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(user_id)
            .bind("Lecturer")
            .bind("Computer Science")
            .bind("PhD")
            .fetch_one(self.pool)
            .await
        }

        pub async fn insert_student(
            &self,
            user_id: i32,
            group_id: i32,
            faculty_id: i32,
        ) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar(
                "INSERT INTO students (user_id, student_number, group_id, enrollment_year, faculty_id) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING id",
            )
            .bind(user_id)
            .bind("S-0001")
            .bind(group_id)
            .bind(2024)
            .bind(faculty_id)
            .fetch_one(self.pool)
            .await
        }

        pub async fn insert_course(&self, instructor_id: i32, title: &str) -> Result<i32, sqlx::Error> {
            sqlx::query_scalar(
                "INSERT INTO courses (title, description, course_code, credits, instructor_id, semester, year) \
                 VALUES ($1, $2, $3, $4, $5, 'autumn', 2024) RETURNING id",
            )
            .bind(title)
            .bind("A course")
            .bind("CS-101")
            .bind(5)
            .bind(instructor_id)
            .fetch_one(self.pool)
            .await
        }
    }

    pub mod database {
        use log::LevelFilter;
        use rocket_db_pools::sqlx::postgres::{PgConnectOptions, PgPoolOptions};
        use rocket_db_pools::sqlx::{self, ConnectOptions, PgPool};
        use testcontainers::{GenericImage, ImageExt, core::WaitFor};
        use testcontainers_modules::testcontainers::{
            ContainerAsync, core::error::TestcontainersError, runners::AsyncRunner,
        };
        use thiserror::Error;
        use uuid::Uuid;

        #[derive(Debug, Error)]
        pub enum TestDatabaseError {
            #[error("database error: {0}")]
            Sqlx(#[from] sqlx::Error),
            #[error("migration error: {0}")]
            Migration(#[from] sqlx::migrate::MigrateError),
            #[error("container error: {0}")]
            Container(#[from] TestcontainersError),
        }

        /// Ephemeral database factory for integration tests: a disposable
        /// Postgres container plus a uniquely named database with the
        /// embedded migrations applied.
        pub struct TestDatabase {
            pool: Option<PgPool>,
            _container: ContainerAsync<GenericImage>,
        }

        impl TestDatabase {
            pub async fn new() -> Result<Self, TestDatabaseError> {
                let image = GenericImage::new("postgres", "16-alpine")
                    .with_wait_for(WaitFor::message_on_stdout(
                        "database system is ready to accept connections",
                    ))
                    .with_wait_for(WaitFor::message_on_stderr(
                        "database system is ready to accept connections",
                    ));

                let request = image
                    .with_env_var("POSTGRES_DB", "postgres")
                    .with_env_var("POSTGRES_USER", "postgres")
                    .with_env_var("POSTGRES_PASSWORD", "postgres");

                let container = request.start().await?;

                let host = container.get_host().await?.to_string();
                let port = container.get_host_port_ipv4(5432).await?;
                let admin_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

                let admin_options: PgConnectOptions =
                    admin_url.parse().map_err(TestDatabaseError::Sqlx)?;
                let admin_options = admin_options.log_statements(LevelFilter::Off);

                let admin_pool = PgPoolOptions::new()
                    .max_connections(1)
                    .connect_with(admin_options.clone())
                    .await?;

                let database_name = format!("university_test_{}", Uuid::new_v4().simple());
                let create_sql = format!("CREATE DATABASE \"{}\"", database_name);
                sqlx::query(&create_sql).execute(&admin_pool).await?;

                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect_with(admin_options.database(&database_name))
                    .await?;

                crate::MIGRATOR.run(&pool).await?;

                Ok(Self {
                    pool: Some(pool),
                    _container: container,
                })
            }

            pub fn pool(&self) -> &PgPool {
                self.pool.as_ref().expect("test database pool is available")
            }

            pub fn pool_clone(&self) -> PgPool {
                self.pool().clone()
            }

            /// Close pool connections; the container is torn down on drop.
            pub async fn close(mut self) -> Result<(), TestDatabaseError> {
                if let Some(pool) = self.pool.take() {
                    pool.close().await;
                }
                Ok(())
            }
        }
    }

    /// Builder for constructing Rocket instances tailored for integration
    /// tests.
    #[derive(Default)]
    pub struct TestRocketBuilder {
        figment: Figment,
        mounts: Vec<(String, Vec<Route>)>,
        app_state: Option<(PgPool, AuthConfig)>,
    }

    impl TestRocketBuilder {
        /// Start a builder with sensible defaults: random port, logging
        /// disabled.
        pub fn new() -> Self {
            let figment = rocket::Config::figment()
                .merge(("port", 0))
                .merge(("log_level", LogLevel::Off))
                .merge(("cli_colors", false));

            Self {
                figment,
                mounts: Vec::new(),
                app_state: None,
            }
        }

        /// Mount routes under `/api`.
        pub fn mount_api_routes(mut self, routes: Vec<Route>) -> Self {
            self.mounts.push(("/api".to_string(), routes));
            self
        }

        /// Compose the full store/service graph around `pool` so tests
        /// exercise the same wiring as the production ignite path.
        pub fn manage_app_state(mut self, pool: PgPool, config: AuthConfig) -> Self {
            self.app_state = Some((pool, config));
            self
        }

        /// Finish building the Rocket instance.
        pub fn build(self) -> Rocket<Build> {
            let mut rocket = rocket::custom(self.figment);

            for (base, routes) in self.mounts {
                rocket = rocket.mount(base, routes);
            }

            if let Some((pool, config)) = self.app_state {
                rocket = crate::manage_app_state(rocket, pool, config)
                    .expect("application state composes");
            }

            rocket
        }

        /// Convenience helper to produce a blocking local client.
        pub fn blocking_client(self) -> Client {
            Client::tracked(self.build()).expect("valid Rocket instance")
        }

        /// Convenience helper to produce an asynchronous local client.
        pub async fn async_client(self) -> AsyncClient {
            AsyncClient::tracked(self.build())
                .await
                .expect("valid Rocket instance")
        }
    }
}

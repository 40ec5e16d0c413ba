use rocket_db_pools::{sqlx, Database};

#[derive(Database)]
#[database("university_db")]
pub struct UniversityDb(sqlx::PgPool);

//! Resource services: guard decisions plus entity-specific ownership rules.
//!
//! Each service takes its collaborator stores through its constructor and is
//! composed once at ignition. Mutating methods load the target first
//! (`NotFound`), apply the ownership predicate (`Forbidden`), perform the
//! write, and return a reloaded view.

pub mod courses;
pub mod instructors;
pub mod students;
pub mod users;

pub use courses::CourseService;
pub use instructors::InstructorService;
pub use students::StudentService;
pub use users::UserService;

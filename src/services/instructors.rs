use crate::error::{ApiError, write_conflict};
use crate::models::{Instructor, UserRole};
use crate::store::courses::CourseStore;
use crate::store::instructors::{InstructorFilter, InstructorStore, NewInstructor};
use crate::store::users::UserStore;

#[derive(Clone)]
pub struct InstructorService {
    users: UserStore,
    instructors: InstructorStore,
    courses: CourseStore,
}

impl InstructorService {
    pub fn new(users: UserStore, instructors: InstructorStore, courses: CourseStore) -> Self {
        Self {
            users,
            instructors,
            courses,
        }
    }

    /// Create the instructor profile and flip the linked user's role to
    /// INSTRUCTOR in one transaction.
    pub async fn create(&self, instructor: NewInstructor) -> Result<Instructor, ApiError> {
        let user_id = instructor.user_id;
        let mut tx = self
            .instructors
            .pool()
            .begin()
            .await
            .map_err(|err| write_conflict("failed to open transaction", err))?;

        let created = self
            .instructors
            .insert_tx(&mut tx, instructor)
            .await
            .map_err(|err| write_conflict("failed to create instructor", err))?;

        self.users
            .set_role_tx(&mut tx, user_id, UserRole::Instructor)
            .await
            .map_err(|err| write_conflict("failed to assign instructor role", err))?;

        tx.commit()
            .await
            .map_err(|err| write_conflict("failed to commit instructor creation", err))?;

        Ok(created)
    }

    pub async fn get(&self, instructor_id: i32) -> Result<Instructor, ApiError> {
        self.instructors
            .find_by_id(instructor_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Instructor {instructor_id} not found")))
    }

    /// Filter by department and/or by the course an instructor teaches. An
    /// unknown course yields an empty list, not an error.
    pub async fn list(
        &self,
        department: Option<String>,
        course_id: Option<i32>,
    ) -> Result<Vec<Instructor>, ApiError> {
        let mut filters = Vec::new();
        if let Some(department) = department {
            filters.push(InstructorFilter::Department(department));
        }
        if let Some(course_id) = course_id {
            match self.courses.find_by_id(course_id).await? {
                Some(course) => filters.push(InstructorFilter::Id(course.instructor_id)),
                None => return Ok(Vec::new()),
            }
        }

        Ok(self.instructors.find_all(&filters).await?)
    }
}

use chrono::Utc;

use crate::auth::AuthUser;
use crate::error::{ApiError, write_conflict};
use crate::models::{Course, Enrollment, EnrollmentStatus, Schedule, Semester};
use crate::store::courses::{CourseChanges, CourseFilter, CourseStore, NewCourse};
use crate::store::enrollments::{EnrollmentFilter, EnrollmentStore, NewEnrollment};
use crate::store::schedules::{NewSchedule, ScheduleStore};

#[derive(Clone)]
pub struct CourseService {
    courses: CourseStore,
    enrollments: EnrollmentStore,
    schedules: ScheduleStore,
}

impl CourseService {
    pub fn new(courses: CourseStore, enrollments: EnrollmentStore, schedules: ScheduleStore) -> Self {
        Self {
            courses,
            enrollments,
            schedules,
        }
    }

    pub async fn create(&self, course: NewCourse) -> Result<Course, ApiError> {
        self.courses
            .insert(course)
            .await
            .map_err(|err| write_conflict("failed to create course", err))
    }

    pub async fn get(&self, course_id: i32) -> Result<Course, ApiError> {
        self.courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))
    }

    pub async fn list(
        &self,
        semester: Option<Semester>,
        year: Option<i32>,
        instructor_id: Option<i32>,
    ) -> Result<Vec<Course>, ApiError> {
        let mut filters = Vec::new();
        if let Some(semester) = semester {
            filters.push(CourseFilter::Semester(semester));
        }
        if let Some(year) = year {
            filters.push(CourseFilter::Year(year));
        }
        if let Some(instructor_id) = instructor_id {
            filters.push(CourseFilter::Instructor(instructor_id));
        }
        Ok(self.courses.find_all(&filters).await?)
    }

    pub async fn update(
        &self,
        course_id: i32,
        caller: &AuthUser,
        changes: CourseChanges,
    ) -> Result<Course, ApiError> {
        let course = self.get(course_id).await?;
        check_course_ownership(&course, caller, "You can't update this course")?;

        let updated = self
            .courses
            .update(course_id, changes)
            .await
            .map_err(|err| write_conflict("failed to update course", err))?
            .ok_or_else(|| ApiError::NotFound(format!("Course {course_id} not found")))?;
        Ok(updated)
    }

    pub async fn delete(&self, course_id: i32, caller: &AuthUser) -> Result<bool, ApiError> {
        let course = self.get(course_id).await?;
        check_course_ownership(&course, caller, "You don't have permission for this")?;

        self.courses
            .delete_by_id(course_id)
            .await
            .map_err(|err| write_conflict("failed to delete course", err))?;
        Ok(true)
    }

    /// Enroll a student; the enrollment starts ACTIVE with the current time.
    /// Duplicate enrollment or a missing student surfaces as `Conflict` from
    /// the composite-key/FK constraints.
    pub async fn enroll(&self, course_id: i32, student_id: i32) -> Result<Enrollment, ApiError> {
        self.get(course_id).await?;

        self.enrollments
            .insert(NewEnrollment {
                student_id,
                course_id,
                enrollment_date: Utc::now(),
                status: EnrollmentStatus::Active,
            })
            .await
            .map_err(|err| write_conflict("failed to enroll student", err))
    }

    pub async fn enrollments(&self, course_id: i32) -> Result<Vec<Enrollment>, ApiError> {
        self.get(course_id).await?;
        Ok(self
            .enrollments
            .find_all(&[EnrollmentFilter::Course(course_id)])
            .await?)
    }

    pub async fn schedule(&self, course_id: i32) -> Result<Vec<Schedule>, ApiError> {
        self.get(course_id).await?;
        Ok(self.schedules.list_for_course(course_id).await?)
    }

    pub async fn add_schedule_slot(
        &self,
        course_id: i32,
        caller: &AuthUser,
        slot: NewSchedule,
    ) -> Result<Schedule, ApiError> {
        let course = self.get(course_id).await?;
        check_course_ownership(&course, caller, "You can't modify this course's schedule")?;

        self.schedules
            .insert(NewSchedule { course_id, ..slot })
            .await
            .map_err(|err| write_conflict("failed to add schedule slot", err))
    }

    pub async fn delete_schedule_slot(&self, slot_id: i32, caller: &AuthUser) -> Result<bool, ApiError> {
        let slot = self
            .schedules
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Schedule slot {slot_id} not found")))?;

        let course = self.get(slot.course_id).await?;
        check_course_ownership(&course, caller, "You can't modify this course's schedule")?;

        self.schedules
            .delete_by_id(slot_id)
            .await
            .map_err(|err| write_conflict("failed to delete schedule slot", err))?;
        Ok(true)
    }
}

/// Course mutation predicate: the owning instructor or an admin.
fn check_course_ownership(course: &Course, caller: &AuthUser, detail: &str) -> Result<(), ApiError> {
    if caller.id() != course.instructor_id && !caller.is_admin() {
        return Err(ApiError::Forbidden(detail.to_string()));
    }
    Ok(())
}

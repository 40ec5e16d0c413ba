use std::collections::HashSet;

use crate::error::{ApiError, write_conflict};
use crate::models::{EnrollmentStatus, StudentInfo, UserRole};
use crate::store::catalog::{FacultyStore, GroupStore};
use crate::store::enrollments::{EnrollmentFilter, EnrollmentStore};
use crate::store::students::{NewStudent, StudentChanges, StudentFilter, StudentStore};
use crate::store::users::UserStore;

#[derive(Clone)]
pub struct StudentService {
    users: UserStore,
    students: StudentStore,
    groups: GroupStore,
    faculties: FacultyStore,
    enrollments: EnrollmentStore,
}

impl StudentService {
    pub fn new(
        users: UserStore,
        students: StudentStore,
        groups: GroupStore,
        faculties: FacultyStore,
        enrollments: EnrollmentStore,
    ) -> Self {
        Self {
            users,
            students,
            groups,
            faculties,
            enrollments,
        }
    }

    /// Enriched view: group and faculty names are resolved at read time by
    /// following the foreign keys.
    pub async fn info(&self, student_id: i32) -> Result<StudentInfo, ApiError> {
        let student = self
            .students
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Student {student_id} not found")))?;

        let group = self
            .groups
            .find_by_id(student.group_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Group {} not found", student.group_id)))?;
        let faculty = self.faculties.find_by_id(student.faculty_id).await?.ok_or_else(|| {
            ApiError::NotFound(format!("Faculty {} not found", student.faculty_id))
        })?;

        Ok(StudentInfo {
            id: student.id,
            user_id: student.user_id,
            student_number: student.student_number,
            group_name: group.name,
            enrollment_year: student.enrollment_year,
            faculty_name: faculty.name,
        })
    }

    /// Create the student profile and flip the linked user's role to STUDENT
    /// in one transaction.
    pub async fn create(&self, student: NewStudent) -> Result<StudentInfo, ApiError> {
        let user_id = student.user_id;
        let mut tx = self
            .students
            .pool()
            .begin()
            .await
            .map_err(|err| write_conflict("failed to open transaction", err))?;

        let created = self
            .students
            .insert_tx(&mut tx, student)
            .await
            .map_err(|err| write_conflict("failed to create student", err))?;

        self.users
            .set_role_tx(&mut tx, user_id, UserRole::Student)
            .await
            .map_err(|err| write_conflict("failed to assign student role", err))?;

        tx.commit()
            .await
            .map_err(|err| write_conflict("failed to commit student creation", err))?;

        self.info(created.id).await
    }

    /// Combined filtering: group/year/faculty restrict the student query
    /// itself; course and enrollment status are applied through the
    /// enrollments join.
    pub async fn list(
        &self,
        group_id: Option<i32>,
        enrollment_year: Option<i32>,
        faculty_id: Option<i32>,
        course_id: Option<i32>,
        enrollment_status: Option<EnrollmentStatus>,
    ) -> Result<Vec<StudentInfo>, ApiError> {
        let mut filters = Vec::new();
        if let Some(group_id) = group_id {
            filters.push(StudentFilter::Group(group_id));
        }
        if let Some(year) = enrollment_year {
            filters.push(StudentFilter::EnrollmentYear(year));
        }
        if let Some(faculty_id) = faculty_id {
            filters.push(StudentFilter::Faculty(faculty_id));
        }

        let mut students = self.students.find_all(&filters).await?;

        if course_id.is_some() || enrollment_status.is_some() {
            let mut enrollment_filters = Vec::new();
            if let Some(course_id) = course_id {
                enrollment_filters.push(EnrollmentFilter::Course(course_id));
            }
            if let Some(status) = enrollment_status {
                enrollment_filters.push(EnrollmentFilter::Status(status));
            }

            let enrollments = self.enrollments.find_all(&enrollment_filters).await?;
            let enrolled: HashSet<i32> = enrollments.iter().map(|e| e.student_id).collect();
            students.retain(|student| enrolled.contains(&student.id));
        }

        let mut infos = Vec::with_capacity(students.len());
        for student in students {
            infos.push(self.info(student.id).await?);
        }
        Ok(infos)
    }

    pub async fn update(
        &self,
        student_id: i32,
        changes: StudentChanges,
    ) -> Result<StudentInfo, ApiError> {
        self.students
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Student {student_id} not found")))?;

        self.students
            .update(student_id, changes)
            .await
            .map_err(|err| write_conflict("failed to update student", err))?;

        self.info(student_id).await
    }
}
